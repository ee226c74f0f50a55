#![forbid(unsafe_code)]
//! Path-indexed form trees.
//!
//! A declarative JSON [`Template`] describes nested fields, groups and repeated sections. The
//! crate builds a live [`Form`] from it, applies edits and array mutations ([`MutationEngine`])
//! while keeping every element's dotted identity unique and contiguous, renders markup, and
//! extracts the filled-in values back into a JSON document ([`extract`]).

mod foundation;

pub mod extract;
pub mod instance;
pub mod mutation;
pub mod path;
pub mod render;
pub mod session;
pub mod template;

pub use extract::extractor::{ArrayRepr, ExtractOpts, extract, keyed_to_list};
pub use foundation::error::{FormError, FormResult};
pub use foundation::notice::{Notice, NoticeLevel};
pub use instance::builder::{build, build_form};
pub use instance::form::Form;
pub use mutation::engine::MutationEngine;
pub use mutation::request::{Action, Request};
pub use path::form_path::{FormPath, Segment, parse_ordinal};
pub use path::resolve::resolve;
pub use render::element::NONE_SENTINEL;
pub use render::markup::to_markup;
pub use render::view::{Element, ElementView, LeafValue};
pub use session::form_session::{FormSession, FormSessionOpts};
pub use template::model::{NodeKind, OptionDef, Template, TemplateNode};
