//! blogtoc HTML Library
//!
//! Post-processing of rendered article HTML: heading anchors with a table of
//! contents block, and plain-text extraction for descriptions.

pub mod annotate;
pub mod text;

pub use annotate::{AnnotateError, Annotated, HeadingAnnotator, annotate};
pub use text::{excerpt, plain_text};
