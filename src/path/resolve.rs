use crate::foundation::error::{FormError, FormResult};
use crate::path::form_path::{FormPath, Segment};
use crate::template::model::{Template, TemplateNode};

/// Finds the template node addressed by `path`, ignoring item ordinals.
///
/// Returns `None` as soon as a segment is not declared at its level.
pub fn resolve<'t>(template: &'t Template, path: &FormPath) -> Option<&'t TemplateNode> {
    let mut segs = path.segments().iter();
    let first = segs.next()?;
    let mut node = lookup(first, |key| template.field(key))?;
    for seg in segs {
        let parent = node;
        node = lookup(seg, |key| parent.child(key))?;
    }
    Some(node)
}

/// Declared keys ending in `_N` are plain fields, so the exact key wins over the item name.
fn lookup<'t>(
    seg: &Segment,
    find: impl Fn(&str) -> Option<&'t TemplateNode>,
) -> Option<&'t TemplateNode> {
    if seg.ordinal().is_none() {
        return find(seg.name());
    }
    find(&seg.to_string()).or_else(|| find(seg.name()))
}

/// [`resolve`] for callers that treat a miss as a configuration error.
pub fn resolve_required<'t>(template: &'t Template, path: &FormPath) -> FormResult<&'t TemplateNode> {
    resolve(template, path).ok_or_else(|| {
        tracing::warn!(%path, "template lookup miss");
        FormError::configuration(format!("element at path '{path}' not found in template"))
    })
}

/// Parses a dotted path string and resolves it.
pub fn resolve_str<'t>(template: &'t Template, raw: &str) -> FormResult<&'t TemplateNode> {
    let path = FormPath::parse(raw)?;
    resolve_required(template, &path)
}
