//! HTTP client for the OCR.space parse endpoint.

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::recognizer::{OcrError, OcrResult, Recognizer};
use crate::request::{form_fields, ImagePayload, OcrOptions};
use crate::response::parse_ocr_response;

/// Recognizer backed by the OCR.space REST API.
#[derive(Debug, Clone)]
pub struct OcrSpaceClient {
    http: reqwest::Client,
    api_key: String,
    options: OcrOptions,
}

impl OcrSpaceClient {
    /// Build a client. Fails when the key is blank.
    pub fn new(api_key: impl Into<String>, options: OcrOptions) -> OcrResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OcrError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("medlookup/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            api_key,
            options,
        })
    }

    pub fn options(&self) -> &OcrOptions {
        &self.options
    }

    fn form(&self, image: &ImagePayload) -> Form {
        let form = form_fields(&self.api_key, &self.options)
            .into_iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name, value.to_string())
            });
        let file = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        form.part("file", file)
    }
}

impl Recognizer for OcrSpaceClient {
    async fn recognize(&self, image: &ImagePayload) -> OcrResult<String> {
        debug!(
            "Uploading {} ({} bytes) to {}",
            image.file_name,
            image.len(),
            self.options.endpoint
        );

        let response = self
            .http
            .post(&self.options.endpoint)
            .multipart(self.form(image))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = parse_ocr_response(&body)?;
        info!("OCR returned {} characters", text.len());
        Ok(text)
    }
}
