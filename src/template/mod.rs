//! Declarative form templates.
//!
//! [`model`] parses the template JSON grammar; [`validate`] checks structural invariants before a
//! form is built from it.

pub mod model;
pub(crate) mod validate;

use crate::foundation::error::{FormError, FormResult};

impl model::Template {
    /// Validate template structure; `mandatory_root_fields` must exist as top-level leaves.
    pub fn validate(&self, mandatory_root_fields: &[String]) -> FormResult<()> {
        validate::validate_template(self, mandatory_root_fields)
            .map_err(|e| FormError::configuration(format!("template validation failed: {e}")))
    }
}
