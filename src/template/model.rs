use crate::foundation::error::{FormError, FormResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

/// Keys starting with this prefix configure a node; every other key names a child field.
pub const RESERVED_PREFIX: char = '_';

pub(crate) fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Readonly,
    Text,
    Number,
    Textarea,
    Color,
    Select,
    Checkbox,
    Box,
    Object,
    Array,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Readonly => "readonly",
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Color => "color",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Box => "box",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    pub fn is_leaf(self) -> bool {
        !self.is_container()
    }

    pub fn is_container(self) -> bool {
        matches!(self, Self::Box | Self::Object | Self::Array)
    }

    /// Leaf kinds that carry an `_options` list.
    pub fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Checkbox)
    }
}

impl FromStr for NodeKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "readonly" => Self::Readonly,
            "text" => Self::Text,
            "number" => Self::Number,
            "textarea" => Self::Textarea,
            "color" => Self::Color,
            "select" => Self::Select,
            "checkbox" => Self::Checkbox,
            "box" => Self::Box,
            "object" => Self::Object,
            "array" => Self::Array,
            other => {
                return Err(FormError::configuration(format!(
                    "unknown element type '{other}'"
                )));
            }
        })
    }
}

/// One `{_value, _label}` entry of a select/checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    #[serde(rename = "_value")]
    pub value: String,
    #[serde(rename = "_label", default)]
    pub label: Option<String>,
}

impl OptionDef {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// Which reserved key supplied a container's label. The UI renders spoilers collapsible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    Spoiler,
    Title,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    kind: NodeKind,
    label: Option<String>,
    spoiler: Option<String>,
    title: Option<String>,
    important: bool,
    default: Option<Value>,
    options: Vec<OptionDef>,
    children: Vec<(String, TemplateNode)>,
}

impl TemplateNode {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn important(&self) -> bool {
        self.important
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// Declared child fields, in template order.
    pub fn children(&self) -> &[(String, TemplateNode)] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&TemplateNode> {
        self.children
            .iter()
            .find_map(|(k, node)| (k == name).then_some(node))
    }

    /// Item template of an `array` node: its single named child.
    pub fn item_template(&self) -> Option<(&str, &TemplateNode)> {
        if self.kind != NodeKind::Array {
            return None;
        }
        self.children
            .first()
            .map(|(name, node)| (name.as_str(), node))
    }

    /// Container label: `_spoiler` wins over `_title`, otherwise empty.
    pub fn container_label(&self) -> &str {
        self.spoiler
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }

    pub fn label_style(&self) -> LabelStyle {
        if self.spoiler.is_some() {
            LabelStyle::Spoiler
        } else {
            LabelStyle::Title
        }
    }

    /// Human label used in notices: `_label`, then the container label, then the key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        match self.label.as_deref() {
            Some(l) if !l.is_empty() => l,
            _ => match self.container_label() {
                "" => key,
                l => l,
            },
        }
    }

    fn from_json(key: &str, value: &Value) -> FormResult<Self> {
        let Value::Object(map) = value else {
            return Err(FormError::configuration(format!(
                "template field '{key}' must be an object"
            )));
        };

        let kind = match map.get("_type") {
            Some(Value::String(s)) => s
                .parse::<NodeKind>()
                .map_err(|e| FormError::configuration(format!("field '{key}': {e}")))?,
            Some(_) => {
                return Err(FormError::configuration(format!(
                    "field '{key}': _type must be a string"
                )));
            }
            None => {
                return Err(FormError::configuration(format!(
                    "element type is not defined for field '{key}'"
                )));
            }
        };

        let options = match map.get("_options") {
            None | Some(Value::Null) => Vec::new(),
            Some(v) => serde_json::from_value::<Vec<OptionDef>>(v.clone()).map_err(|e| {
                FormError::configuration(format!("field '{key}': malformed _options: {e}"))
            })?,
        };

        let important = match map.get("_important") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(FormError::configuration(format!(
                    "field '{key}': _important must be a boolean"
                )));
            }
        };

        Ok(Self {
            kind,
            label: string_prop(map, key, "_label")?,
            spoiler: string_prop(map, key, "_spoiler")?,
            title: string_prop(map, key, "_title")?,
            important,
            default: map.get("_default").filter(|v| !v.is_null()).cloned(),
            options,
            children: parse_children(map)?,
        })
    }
}

fn string_prop(map: &Map<String, Value>, key: &str, prop: &str) -> FormResult<Option<String>> {
    match map.get(prop) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FormError::configuration(format!(
            "field '{key}': {prop} must be a string"
        ))),
    }
}

fn parse_children(map: &Map<String, Value>) -> FormResult<Vec<(String, TemplateNode)>> {
    map.iter()
        .filter(|(k, _)| !is_reserved(k))
        .map(|(k, v)| Ok((k.clone(), TemplateNode::from_json(k, v)?)))
        .collect()
}

/// Declarative form description: an ordered set of top-level fields.
///
/// Parsed from the template JSON grammar. Child order follows key order in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    fields: Vec<(String, TemplateNode)>,
}

impl Template {
    pub fn from_value(value: &Value) -> FormResult<Self> {
        let Value::Object(map) = value else {
            return Err(FormError::configuration("template root must be an object"));
        };
        Ok(Self {
            fields: parse_children(map)?,
        })
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> FormResult<Self> {
        let value: Value = serde_json::from_reader(r)
            .map_err(|e| FormError::serde(format!("parse template JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FormError::configuration(format!("open template JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn fields(&self) -> &[(String, TemplateNode)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&TemplateNode> {
        self.fields
            .iter()
            .find_map(|(k, node)| (k == name).then_some(node))
    }
}

impl FromStr for Template {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| FormError::serde(format!("parse template JSON: {e}")))?;
        Self::from_value(&value)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
