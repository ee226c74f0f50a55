pub type FormResult<T> = Result<T, FormError>;

#[derive(thiserror::Error, Debug)]
pub enum FormError {
    /// Malformed template, unknown node kind, or a template lookup miss.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A path that does not exist in the live form.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("path error: {0}")]
    Path(String),

    /// Expected, recoverable user input state (empty mandatory field, rejected edit).
    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FormError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn path(msg: impl Into<String>) -> Self {
        Self::Path(msg.into())
    }

    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors the UI layer recovers from with a notice.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation { .. })
    }
}
