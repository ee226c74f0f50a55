use crate::foundation::error::{FormError, FormResult};
use crate::path::form_path::FormPath;
use crate::render::element::NONE_SENTINEL;
use crate::render::markup::{to_markup, to_markup_all};
use crate::render::view::{Element, LeafValue};
use crate::template::model::NodeKind;

/// Live form instance: the rendered top-level elements and everything beneath them.
///
/// Item order inside each array is the order of its item list; identities are kept equal to
/// `<array path>.<item key>_<position>` by the mutation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    roots: Vec<Element>,
}

impl Form {
    pub(crate) fn from_roots(roots: Vec<Element>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    pub fn get(&self, path: &FormPath) -> Option<&Element> {
        let mut level: &[Element] = &self.roots;
        let mut found = None;
        for seg in path.segments() {
            let el = level.iter().find(|el| el.path.last() == Some(seg))?;
            level = el.children();
            found = Some(el);
        }
        found
    }

    pub(crate) fn get_mut(&mut self, path: &FormPath) -> Option<&mut Element> {
        let (first, rest) = path.segments().split_first()?;
        let mut el = self
            .roots
            .iter_mut()
            .find(|el| el.path.last() == Some(first))?;
        for seg in rest {
            el = el
                .children_mut()
                .iter_mut()
                .find(|c| c.path.last() == Some(seg))?;
        }
        Some(el)
    }

    pub fn contains(&self, path: &FormPath) -> bool {
        self.get(path).is_some()
    }

    /// Current value of the leaf at `path`.
    pub fn value_at(&self, path: &FormPath) -> Option<&LeafValue> {
        self.get(path)?.leaf().map(|l| l.value())
    }

    /// Replaces the user-entered value of a leaf.
    ///
    /// `readonly` fields reject edits; choice fields accept only declared option values.
    pub fn set_value(&mut self, path: &FormPath, value: LeafValue) -> FormResult<()> {
        let el = self
            .get_mut(path)
            .ok_or_else(|| FormError::not_found(format!("no element at '{path}'")))?;
        let leaf = el
            .leaf_mut()
            .ok_or_else(|| FormError::not_found(format!("'{path}' is not a field")))?;
        let field = path.to_string();

        let value = match (leaf.kind, value) {
            (NodeKind::Readonly, _) => {
                return Err(FormError::validation(field, "field is read-only"));
            }
            (NodeKind::Checkbox, v) => {
                let picked: Vec<String> = match v {
                    LeafValue::Text(s) if s.is_empty() => Vec::new(),
                    LeafValue::Text(s) => vec![s],
                    LeafValue::Choices(c) => c,
                };
                if let Some(bad) = picked
                    .iter()
                    .find(|p| !leaf.options.iter().any(|o| &o.value == *p))
                {
                    return Err(FormError::validation(
                        field,
                        format!("'{bad}' is not a declared option"),
                    ));
                }
                // Checked values follow option order, each at most once.
                LeafValue::Choices(
                    leaf.options
                        .iter()
                        .filter(|o| picked.contains(&o.value))
                        .map(|o| o.value.clone())
                        .collect(),
                )
            }
            (kind, LeafValue::Choices(_)) => {
                return Err(FormError::validation(
                    field,
                    format!("{} field takes a single value", kind.as_str()),
                ));
            }
            (NodeKind::Select, LeafValue::Text(s)) => {
                if s.is_empty() || s == NONE_SENTINEL {
                    LeafValue::Text(String::new())
                } else if leaf.options.iter().any(|o| o.value == s) {
                    LeafValue::Text(s)
                } else {
                    return Err(FormError::validation(
                        field,
                        format!("'{s}' is not a declared option"),
                    ));
                }
            }
            (NodeKind::Number, LeafValue::Text(s)) => {
                let t = s.trim();
                if !t.is_empty() && !t.parse::<f64>().is_ok_and(f64::is_finite) {
                    return Err(FormError::validation(field, format!("'{s}' is not a number")));
                }
                LeafValue::Text(t.to_owned())
            }
            (_, v) => v,
        };

        tracing::debug!(%path, "value set");
        leaf.value = value;
        Ok(())
    }

    /// Every live identity, depth first in document order.
    pub fn paths(&self) -> Vec<FormPath> {
        fn walk(el: &Element, out: &mut Vec<FormPath>) {
            out.push(el.path.clone());
            for c in el.children() {
                walk(c, out);
            }
        }
        let mut out = Vec::new();
        for el in &self.roots {
            walk(el, &mut out);
        }
        out
    }

    /// Markup for the whole form.
    pub fn markup(&self) -> String {
        to_markup_all(&self.roots)
    }

    /// Markup for the subtree at `path`.
    pub fn markup_at(&self, path: &FormPath) -> FormResult<String> {
        self.get(path)
            .map(to_markup)
            .ok_or_else(|| FormError::not_found(format!("no element at '{path}'")))
    }
}
