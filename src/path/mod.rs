//! Dotted, ordinal-suffixed paths and their resolution against a template.

pub mod form_path;
pub mod resolve;
