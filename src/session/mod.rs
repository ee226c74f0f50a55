//! One editing session over a template: build, edit, mutate, extract.

pub mod form_session;
