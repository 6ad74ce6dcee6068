//! Domain models for the medlookup system.

mod catalog;
mod label;
mod library;
mod resolution;

pub use catalog::*;
pub use label::*;
pub use library::*;
pub use resolution::*;
