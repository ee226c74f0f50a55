use crate::foundation::error::{FormError, FormResult};
use crate::instance::form::Form;
use crate::path::form_path::{FormPath, parse_ordinal};
use crate::render::element::NONE_SENTINEL;
use crate::render::view::LeafValue;
use crate::template::model::{NodeKind, Template, TemplateNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How extracted arrays are shaped in the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayRepr {
    /// `{ "scene_1": {..}, "scene_2": {..} }`
    #[default]
    Keyed,
    /// `[ {..}, {..} ]` in ordinal order.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOpts {
    /// Root fields that must be present for extraction to succeed.
    pub mandatory_root_fields: Vec<String>,
    pub array_repr: ArrayRepr,
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self {
            mandatory_root_fields: vec!["version".to_owned(), "title".to_owned()],
            array_repr: ArrayRepr::Keyed,
        }
    }
}

/// Values collected for one container's children.
struct Collected {
    map: Map<String, Value>,
    has_important: bool,
    important_present: bool,
}

impl Collected {
    /// Container inclusion: something present, and an important child present if any is declared.
    fn into_value(self) -> Option<Value> {
        if self.has_important && !self.important_present {
            return None;
        }
        if self.map.is_empty() {
            return None;
        }
        Some(Value::Object(self.map))
    }
}

/// Walks `template` against the live `form` and produces the output document.
///
/// Fails with a validation error naming the field when a mandatory root field is empty or an
/// important root field is unmet.
pub fn extract(template: &Template, form: &Form, opts: &ExtractOpts) -> FormResult<Value> {
    let mut out = Map::new();
    for name in &opts.mandatory_root_fields {
        let node = template.field(name).ok_or_else(|| {
            FormError::configuration(format!("mandatory root field '{name}' is not declared"))
        })?;
        let value = leaf_value(form, &FormPath::root().child(name.as_str()), node)
            .ok_or_else(|| {
                FormError::validation(
                    name.as_str(),
                    format!("'{}' must be filled in", node.display_name(name)),
                )
            })?;
        out.insert(name.clone(), value);
    }

    let root = collect(template.fields(), &FormPath::root(), form, opts);
    // Mandatory fields are checked above and never satisfy the root gate.
    let gate = template
        .fields()
        .iter()
        .find(|(k, n)| n.important() && !opts.mandatory_root_fields.contains(k));
    if let Some((key, node)) = gate {
        let met = template.fields().iter().any(|(k, n)| {
            n.important() && !opts.mandatory_root_fields.contains(k) && root.map.contains_key(k)
        });
        if !met {
            return Err(FormError::validation(
                key.as_str(),
                format!("required field '{}' must be filled in", node.display_name(key)),
            ));
        }
    }

    for (key, value) in root.map {
        out.entry(key).or_insert(value);
    }
    tracing::debug!(fields = out.len(), "extracted document");
    Ok(Value::Object(out))
}

fn collect(
    children: &[(String, TemplateNode)],
    base: &FormPath,
    form: &Form,
    opts: &ExtractOpts,
) -> Collected {
    let mut c = Collected {
        map: Map::new(),
        has_important: children.iter().any(|(_, n)| n.important()),
        important_present: false,
    };
    for (key, node) in children {
        let path = base.child(key.as_str());
        if let Some(value) = node_value(node, &path, form, opts) {
            if node.important() {
                c.important_present = true;
            }
            c.map.insert(key.clone(), value);
        }
    }
    c
}

fn node_value(node: &TemplateNode, path: &FormPath, form: &Form, opts: &ExtractOpts) -> Option<Value> {
    match node.kind() {
        NodeKind::Box | NodeKind::Object => collect(node.children(), path, form, opts).into_value(),
        NodeKind::Array => array_value(node, path, form, opts),
        _ => leaf_value(form, path, node),
    }
}

/// Probes `item_1, item_2, ..` until an identity is missing.
fn array_value(node: &TemplateNode, path: &FormPath, form: &Form, opts: &ExtractOpts) -> Option<Value> {
    let (item_key, item) = node.item_template()?;
    let mut found = Vec::new();
    let mut n = 1u32;
    loop {
        let item_path = path.item(item_key, n);
        if !form.contains(&item_path) {
            break;
        }
        if let Some(v) = collect(item.children(), &item_path, form, opts).into_value() {
            found.push((format!("{item_key}_{n}"), v));
        }
        n += 1;
    }
    if found.is_empty() {
        return None;
    }
    Some(match opts.array_repr {
        ArrayRepr::Keyed => Value::Object(found.into_iter().collect()),
        ArrayRepr::List => Value::Array(found.into_iter().map(|(_, v)| v).collect()),
    })
}

fn leaf_value(form: &Form, path: &FormPath, node: &TemplateNode) -> Option<Value> {
    let value = form.value_at(path)?;
    match (node.kind(), value) {
        (_, LeafValue::Choices(c)) => {
            (!c.is_empty()).then(|| Value::Array(c.iter().cloned().map(Value::String).collect()))
        }
        (_, LeafValue::Text(s)) if s.is_empty() => None,
        (NodeKind::Select, LeafValue::Text(s)) if s == NONE_SENTINEL => None,
        (NodeKind::Checkbox, LeafValue::Text(s)) => Some(Value::Array(vec![Value::String(s.clone())])),
        (_, LeafValue::Text(s)) => Some(Value::String(s.clone())),
    }
}

/// Converts a keyed item collection (`{"scene_2": .., "scene_1": ..}`) into a list ordered by
/// ordinal. Keys without an ordinal sort last, in their original order.
pub fn keyed_to_list(items: &Map<String, Value>) -> Vec<Value> {
    let mut keyed: Vec<(u32, &Value)> = items
        .iter()
        .map(|(k, v)| (parse_ordinal(k).map_or(u32::MAX, |(_, n)| n), v))
        .collect();
    keyed.sort_by_key(|(n, _)| *n);
    keyed.into_iter().map(|(_, v)| v.clone()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/extract/extractor.rs"]
mod tests;
