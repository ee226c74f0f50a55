use crate::foundation::error::{FormError, FormResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One dotted path component: a field name, optionally carrying an array-item ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    name: String,
    ordinal: Option<u32>,
}

impl Segment {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal: None,
        }
    }

    pub fn item(name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            ordinal: Some(ordinal),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.ordinal
    }

    pub(crate) fn set_ordinal(&mut self, ordinal: u32) {
        self.ordinal = Some(ordinal);
    }

    fn parse(raw: &str) -> Self {
        match split_ordinal(raw) {
            Some((name, n)) => Self::item(name, n),
            None => Self::field(raw),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ordinal {
            Some(n) => write!(f, "{}_{n}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Splits `name_N` into `(name, N)` when `N` is an integer >= 1 and `name` is non-empty.
fn split_ordinal(raw: &str) -> Option<(&str, u32)> {
    let (name, digits) = raw.rsplit_once('_')?;
    if name.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u32 = digits.parse().ok()?;
    Some((name, n))
}

/// Structured identity of a form-instance node.
///
/// Displayed (and serialized) as the dotted string the UI layer sees, e.g. `scenes.scene_2.title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormPath {
    segments: Vec<Segment>,
}

impl FormPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> FormResult<Self> {
        if raw.is_empty() {
            return Err(FormError::path("empty path"));
        }
        if raw.split('.').any(str::is_empty) {
            return Err(FormError::path(format!("'{raw}': empty path segment")));
        }
        Ok(Self {
            segments: raw.split('.').map(Segment::parse).collect(),
        })
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Ordinal of the last segment, if it denotes an array item.
    pub fn ordinal(&self) -> Option<u32> {
        self.last().and_then(Segment::ordinal)
    }

    pub fn parent(&self) -> Option<FormPath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Appends a template key. A key like `line_2` reads back as `line` + ordinal 2, the same
    /// as [`FormPath::parse`] sees it.
    pub fn child(&self, name: impl Into<String>) -> FormPath {
        self.pushed(Segment::parse(&name.into()))
    }

    pub fn item(&self, name: impl Into<String>, ordinal: u32) -> FormPath {
        self.pushed(Segment::item(name, ordinal))
    }

    fn pushed(&self, seg: Segment) -> FormPath {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(seg);
        Self { segments }
    }

    /// Same path with the last segment forced to carry `ordinal`.
    pub fn with_ordinal(&self, ordinal: u32) -> FormPath {
        let mut out = self.clone();
        if let Some(last) = out.segments.last_mut() {
            last.set_ordinal(ordinal);
        }
        out
    }

    /// Rewrites the ordinal of the segment at `depth`; paths shorter than `depth` are untouched.
    pub(crate) fn set_ordinal_at(&mut self, depth: usize, ordinal: u32) {
        if let Some(seg) = self.segments.get_mut(depth) {
            seg.set_ordinal(ordinal);
        }
    }

    pub fn starts_with(&self, prefix: &FormPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for FormPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FormPath {
    type Error = FormError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FormPath> for String {
    fn from(value: FormPath) -> Self {
        value.to_string()
    }
}

/// Extracts the trailing `_<N>` of the last segment of a dotted path.
///
/// Returns the path with that suffix removed plus `N`, or `None` for a singleton path.
pub fn parse_ordinal(path: &str) -> Option<(String, u32)> {
    let last = path.rsplit('.').next()?;
    let (name, n) = split_ordinal(last)?;
    let prefix_len = path.len() - last.len();
    Some((format!("{}{name}", &path[..prefix_len]), n))
}
