//! Request inputs for the OCR.space parse endpoint.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::recognizer::OcrResult;

/// Public OCR.space endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.ocr.space/parse/image";

/// Recognition language sent with every request.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to send label images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    pub endpoint: String,
    pub language: String,
    pub timeout: Duration,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// An image file ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// File name sent with the upload; the service infers the format from it
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> OcrResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "label.jpg".to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Text fields of the multipart form, in upload order.
pub fn form_fields<'a>(api_key: &'a str, options: &'a OcrOptions) -> [(&'static str, &'a str); 3] {
    [
        ("apikey", api_key),
        ("language", options.language.as_str()),
        ("isOverlayRequired", "false"),
    ]
}
