//! OCR collaborator for medicine label scans.
//!
//! Sends a photographed label to the OCR.space API and feeds the recognized
//! text into a [`LookupSession`](medlookup_core::LookupSession).
//!
//! The HTTP client sits behind the default `http` feature. Without it only
//! the response parser and [`MockRecognizer`] are available.

pub mod recognizer;
pub mod request;
pub mod response;
pub mod scan;

#[cfg(feature = "http")]
pub mod client;

pub use recognizer::*;
pub use request::*;
pub use response::*;
pub use scan::*;

#[cfg(feature = "http")]
pub use client::OcrSpaceClient;
