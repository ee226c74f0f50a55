use crate::foundation::error::{FormError, FormResult};
use crate::instance::form::Form;
use crate::path::form_path::FormPath;
use crate::path::resolve::resolve_required;
use crate::render::element::{Content, render};
use crate::render::view::Element;
use crate::template::model::{NodeKind, Template, TemplateNode};

/// Builds the subtree rooted at `path` with default values.
///
/// `path` may point anywhere in the template; item segments keep their ordinals.
pub fn build(template: &Template, path: &FormPath) -> FormResult<Element> {
    let node = resolve_required(template, path)?;
    build_node(path, node)
}

/// Recursively expands `node` at `path`. Arrays are seeded with exactly one item.
pub fn build_node(path: &FormPath, node: &TemplateNode) -> FormResult<Element> {
    match node.kind() {
        NodeKind::Box | NodeKind::Object => {
            let path = if node.kind() == NodeKind::Object {
                path.with_ordinal(path.ordinal().unwrap_or(1))
            } else {
                path.clone()
            };
            let children = node
                .children()
                .iter()
                .map(|(key, child)| build_node(&path.child(key.as_str()), child))
                .collect::<FormResult<Vec<_>>>()?;
            render(node, &path, Content::Children(children))
        }
        NodeKind::Array => {
            let (item_key, item) = node.item_template().ok_or_else(|| {
                FormError::configuration(format!("array '{path}' declares no item template"))
            })?;
            let first = build_node(&path.item(item_key, 1), item)?;
            render(node, path, Content::Children(vec![first]))
        }
        _ => render(node, path, Content::Default),
    }
}

/// Builds every top-level field of `template`.
pub fn build_form(template: &Template) -> FormResult<Form> {
    let roots = template
        .fields()
        .iter()
        .map(|(key, node)| build_node(&FormPath::root().child(key.as_str()), node))
        .collect::<FormResult<Vec<_>>>()?;
    tracing::debug!(fields = roots.len(), "built form");
    Ok(Form::from_roots(roots))
}

#[cfg(test)]
#[path = "../../tests/unit/instance/builder.rs"]
mod tests;
