//! Live form instance and the tree builder that produces it.

/// Tree Builder: recursive expansion of a template (or subtree) into elements.
pub mod builder;
/// The mutable form instance, addressed by path.
pub mod form;
