use crate::foundation::error::FormError;
use crate::path::form_path::FormPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User action on an array or an array item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Append a blank item (targets an array).
    AddItem,
    /// Reset an array to a single blank item (targets an array).
    ClearItems,
    /// Insert a blank item before the target item.
    Add,
    Clone,
    MoveUp,
    MoveDown,
    Clear,
    Delete,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Self::AddItem,
        Self::ClearItems,
        Self::Add,
        Self::Clone,
        Self::MoveUp,
        Self::MoveDown,
        Self::Clear,
        Self::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddItem => "add-item",
            Self::ClearItems => "clear-items",
            Self::Add => "add",
            Self::Clone => "clone",
            Self::MoveUp => "move-up",
            Self::MoveDown => "move-down",
            Self::Clear => "clear",
            Self::Delete => "delete",
        }
    }

    /// True when the target is the array itself rather than one of its items.
    pub fn targets_array(self) -> bool {
        matches!(self, Self::AddItem | Self::ClearItems)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| FormError::configuration(format!("unknown action '{s}'")))
    }
}

/// One mutation request: what to do, and to which node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub action: Action,
    pub target: FormPath,
}

impl Request {
    pub fn new(action: Action, target: FormPath) -> Self {
        Self { action, target }
    }

    /// Parses the target path; convenient for UI callbacks that carry attribute strings.
    pub fn parse(action: Action, target: &str) -> Result<Self, FormError> {
        Ok(Self::new(action, FormPath::parse(target)?))
    }
}
