use crate::foundation::error::{FormError, FormResult};
use crate::path::form_path::FormPath;
use crate::render::view::{ArrayView, Element, ElementView, GroupView, ItemView, LeafValue, LeafView};
use crate::template::model::{NodeKind, TemplateNode};
use serde_json::Value;

/// Select value meaning "nothing chosen"; never serialized as a literal value.
pub const NONE_SENTINEL: &str = "none";

/// What the renderer embeds into the element it produces.
#[derive(Debug, Clone, Default)]
pub enum Content {
    /// Leaf default value, or no children for a container.
    #[default]
    Default,
    Value(LeafValue),
    Children(Vec<Element>),
}

/// Turns one template node at `path` into a self-contained element.
///
/// Pure: reads only its arguments.
pub fn render(node: &TemplateNode, path: &FormPath, content: Content) -> FormResult<Element> {
    if path.is_empty() {
        return Err(FormError::path("cannot render an element at the root path"));
    }
    let kind = node.kind();

    let (path, view) = match kind {
        NodeKind::Box => (
            path.clone(),
            ElementView::Box(GroupView {
                label: node.container_label().to_owned(),
                style: node.label_style(),
                children: children_of(content, path)?,
            }),
        ),
        NodeKind::Object => {
            // Singleton item paths are item 1.
            let ordinal = path.ordinal().unwrap_or(1);
            let path = path.with_ordinal(ordinal);
            let parent = path
                .parent()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    FormError::configuration(format!(
                        "object element '{path}' has no parent array"
                    ))
                })?;
            let children = children_of(content, &path)?;
            (
                path,
                ElementView::Object(ItemView {
                    title: retitle(node.container_label(), ordinal),
                    style: node.label_style(),
                    parent,
                    children,
                }),
            )
        }
        NodeKind::Array => {
            let (item_key, _) = node.item_template().ok_or_else(|| {
                FormError::configuration(format!("array '{path}' declares no item template"))
            })?;
            (
                path.clone(),
                ElementView::Array(ArrayView {
                    label: node.container_label().to_owned(),
                    style: node.label_style(),
                    item_key: item_key.to_owned(),
                    items: children_of(content, path)?,
                }),
            )
        }
        leaf => {
            let value = match content {
                Content::Default => default_value(node),
                Content::Value(v) => coerce_value(leaf, v, path)?,
                Content::Children(_) => {
                    return Err(FormError::configuration(format!(
                        "{} element '{path}' cannot hold child content",
                        leaf.as_str()
                    )));
                }
            };
            (
                path.clone(),
                ElementView::Leaf(LeafView {
                    kind: leaf,
                    label: node.label().unwrap_or_default().to_owned(),
                    value: normalize_sentinel(leaf, value),
                    options: node.options().to_vec(),
                }),
            )
        }
    };

    Ok(Element { path, view })
}

fn children_of(content: Content, path: &FormPath) -> FormResult<Vec<Element>> {
    match content {
        Content::Default => Ok(Vec::new()),
        Content::Children(c) => Ok(c),
        Content::Value(_) => Err(FormError::configuration(format!(
            "container element '{path}' cannot hold a leaf value"
        ))),
    }
}

/// Leaf value a freshly built element starts with.
pub fn default_value(node: &TemplateNode) -> LeafValue {
    let kind = node.kind();
    match (kind, node.default_value()) {
        (NodeKind::Checkbox, Some(Value::String(s))) => LeafValue::Choices(vec![s.clone()]),
        (NodeKind::Checkbox, Some(Value::Array(items))) => LeafValue::Choices(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        ),
        (_, Some(Value::String(s))) => LeafValue::Text(s.clone()),
        (_, Some(Value::Number(n))) => LeafValue::Text(n.to_string()),
        (_, Some(Value::Bool(b))) => LeafValue::Text(b.to_string()),
        _ => LeafValue::empty_for(kind),
    }
}

fn coerce_value(kind: NodeKind, value: LeafValue, path: &FormPath) -> FormResult<LeafValue> {
    match (kind, value) {
        (NodeKind::Checkbox, LeafValue::Text(s)) if s.is_empty() => Ok(LeafValue::Choices(vec![])),
        (NodeKind::Checkbox, LeafValue::Text(s)) => Ok(LeafValue::Choices(vec![s])),
        (NodeKind::Checkbox, v @ LeafValue::Choices(_)) => Ok(v),
        (_, v @ LeafValue::Text(_)) => Ok(v),
        (k, LeafValue::Choices(_)) => Err(FormError::configuration(format!(
            "{} element '{path}' takes a single value",
            k.as_str()
        ))),
    }
}

fn normalize_sentinel(kind: NodeKind, value: LeafValue) -> LeafValue {
    match value {
        LeafValue::Text(s) if kind == NodeKind::Select && s == NONE_SENTINEL => {
            LeafValue::Text(String::new())
        }
        v => v,
    }
}

/// Replaces the trailing display index of `title` (a whitespace-separated integer) with `n`.
pub fn retitle(title: &str, n: u32) -> String {
    let trimmed = title.trim_end();
    let without_digits = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    let base = if without_digits.len() < trimmed.len()
        && (without_digits.is_empty() || without_digits.ends_with(char::is_whitespace))
    {
        without_digits.trim_end()
    } else {
        trimmed
    };
    if base.is_empty() {
        n.to_string()
    } else {
        format!("{base} {n}")
    }
}
