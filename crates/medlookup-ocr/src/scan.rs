//! Label scan flow: capture, recognize, extract, search.

use medlookup_core::session::LookupResult;
use medlookup_core::{CaptureSource, LookupError, LookupSession, SearchOutcome};
use tracing::info;

use crate::recognizer::Recognizer;
use crate::request::ImagePayload;

/// Recognize a label photo and open the medicine it names.
///
/// The session's capture trigger stays disabled until recognition settles.
/// Recognition failures surface as [`LookupError::OcrTransport`].
pub async fn scan_label<R: Recognizer>(
    session: &mut LookupSession,
    recognizer: &R,
    image: &ImagePayload,
) -> LookupResult<SearchOutcome> {
    let guard = session.capture_trigger().begin(CaptureSource::Ocr)?;
    info!("Scanning label image {}", image.file_name);

    let text = match recognizer.recognize(image).await {
        Ok(text) => text,
        Err(e) => {
            let reason = e.to_string();
            guard.fail(reason.clone());
            return Err(LookupError::OcrTransport(reason));
        }
    };
    guard.succeed();

    session.submit_recognized_text(&text)
}
