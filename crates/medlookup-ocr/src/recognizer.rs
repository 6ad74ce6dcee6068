//! Text recognition seam.

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use crate::request::ImagePayload;

/// OCR errors.
#[derive(Error, Debug)]
pub enum OcrError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OCR service error: {0}")]
    Service(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR API key is not configured")]
    MissingApiKey,
}

pub type OcrResult<T> = Result<T, OcrError>;

/// Anything that turns a label image into raw text.
#[allow(async_fn_in_trait)]
pub trait Recognizer {
    async fn recognize(&self, image: &ImagePayload) -> OcrResult<String>;
}

/// Recognizer with a canned reply, for tests and offline use.
#[derive(Debug)]
pub struct MockRecognizer {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl MockRecognizer {
    /// Always recognize `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with a service error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of images seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Recognizer for MockRecognizer {
    async fn recognize(&self, _image: &ImagePayload) -> OcrResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(OcrError::Service)
    }
}
