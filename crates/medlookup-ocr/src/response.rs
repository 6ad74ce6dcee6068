//! OCR.space response parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::recognizer::{OcrError, OcrResult};

/// Top-level parse response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrResponse {
    #[serde(default)]
    pub parsed_results: Option<Vec<ParsedResult>>,
    #[serde(default)]
    pub is_errored_on_processing: bool,
    /// A string or an array of strings, depending on the failure
    #[serde(default)]
    pub error_message: Option<Value>,
}

/// Text recognized on one page of the upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedResult {
    #[serde(default)]
    pub parsed_text: Option<String>,
}

impl OcrResponse {
    /// Text of the first page, or empty when there is none.
    pub fn text(&self) -> &str {
        self.parsed_results
            .as_deref()
            .and_then(|results| results.first())
            .and_then(|r| r.parsed_text.as_deref())
            .unwrap_or("")
    }

    /// Flattened service error message, if any.
    pub fn error_text(&self) -> Option<String> {
        match self.error_message.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        }
    }
}

/// Parse a response body into the recognized text.
pub fn parse_ocr_response(json: &str) -> OcrResult<String> {
    let response: OcrResponse = serde_json::from_str(json)?;

    if response.is_errored_on_processing {
        let message = response
            .error_text()
            .unwrap_or_else(|| "processing failed".to_string());
        return Err(OcrError::Service(message));
    }

    Ok(response.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_page_text() {
        let json = r#"{
            "ParsedResults": [
                {"ParsedText": "DOLO-650\r\nParacetamol Tablets", "FileParseExitCode": 1},
                {"ParsedText": "second page"}
            ],
            "OCRExitCode": 1,
            "IsErroredOnProcessing": false
        }"#;

        assert_eq!(parse_ocr_response(json).unwrap(), "DOLO-650\r\nParacetamol Tablets");
    }

    #[test]
    fn test_missing_results_is_empty_text() {
        assert_eq!(parse_ocr_response("{}").unwrap(), "");
        assert_eq!(parse_ocr_response(r#"{"ParsedResults": null}"#).unwrap(), "");
        assert_eq!(parse_ocr_response(r#"{"ParsedResults": []}"#).unwrap(), "");
        assert_eq!(
            parse_ocr_response(r#"{"ParsedResults": [{"ParsedText": null}]}"#).unwrap(),
            ""
        );
    }

    #[test]
    fn test_errored_with_message_array() {
        let json = r#"{
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["File failed validation", "Unable to recognize the file type"]
        }"#;

        let err = parse_ocr_response(json).unwrap_err();
        assert_eq!(
            err.to_string(),
            "OCR service error: File failed validation; Unable to recognize the file type"
        );
    }

    #[test]
    fn test_errored_with_message_string() {
        let json = r#"{"IsErroredOnProcessing": true, "ErrorMessage": "Timed out waiting for results"}"#;
        let err = parse_ocr_response(json).unwrap_err();
        assert!(matches!(err, OcrError::Service(m) if m == "Timed out waiting for results"));
    }

    #[test]
    fn test_errored_without_message() {
        let err = parse_ocr_response(r#"{"IsErroredOnProcessing": true}"#).unwrap_err();
        assert!(matches!(err, OcrError::Service(m) if m == "processing failed"));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_ocr_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, OcrError::JsonParse(_)));
    }
}
