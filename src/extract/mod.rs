//! Turns a live form back into the structured output document.

pub mod extractor;
