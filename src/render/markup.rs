//! HTML projection of rendered elements.
//!
//! Attribute contract consumed by the UI layer:
//! - `data-path` / `id`: node identity (the dotted path);
//! - `data-id`: current ordinal of an array item, `data-parent`: identity of its array;
//! - `data-action` buttons: `add-item` / `clear-items` on arrays (`data-array` = array path,
//!   `data-target` = item template name), `add` / `clone` / `move-up` / `move-down` / `clear` /
//!   `delete` on items (`data-target` = item path).

use crate::render::element::NONE_SENTINEL;
use crate::render::view::{Element, ElementView, LeafValue, LeafView};
use crate::template::model::{LabelStyle, NodeKind};
use std::fmt::Write as _;

const ITEM_ACTIONS: [(&str, &str); 6] = [
    ("add", "Add before"),
    ("clone", "Clone"),
    ("move-up", "Move up"),
    ("move-down", "Move down"),
    ("clear", "Clear"),
    ("delete", "Delete"),
];

/// Renders one element (and its subtree) to markup.
pub fn to_markup(el: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, el);
    out
}

/// Renders a sequence of sibling elements, e.g. a whole form.
pub fn to_markup_all<'a>(elements: impl IntoIterator<Item = &'a Element>) -> String {
    let mut out = String::new();
    for el in elements {
        write_element(&mut out, el);
    }
    out
}

fn write_element(out: &mut String, el: &Element) {
    let path = escape_attr(&el.path.to_string());
    match &el.view {
        ElementView::Leaf(leaf) => write_leaf(out, &path, leaf),
        ElementView::Box(g) => {
            open_container(out, g.style, "box", &path, "");
            write_heading(out, g.style, &g.label, "");
            write_children(out, &g.children);
            close_container(out, g.style);
        }
        ElementView::Object(item) => {
            let extra = format!(
                " data-id=\"{}\" data-parent=\"{}\"",
                el.ordinal().unwrap_or(1),
                escape_attr(&item.parent.to_string())
            );
            open_container(out, item.style, "object", &path, &extra);
            let mut menu = String::new();
            let _ = write!(
                menu,
                "<button type=\"button\" data-action=\"object-menu\" data-role=\"context-menu-trigger\" data-target=\"{path}\">&#8942;</button>"
            );
            write_heading(out, item.style, &item.title, &menu);
            out.push_str("<div class=\"item-actions\" hidden>");
            for (action, label) in ITEM_ACTIONS {
                let _ = write!(
                    out,
                    "<button type=\"button\" data-action=\"{action}\" data-target=\"{path}\">{label}</button>"
                );
            }
            out.push_str("</div>");
            write_children(out, &item.children);
            close_container(out, item.style);
        }
        ElementView::Array(arr) => {
            open_container(out, arr.style, "array", &path, "");
            write_heading(out, arr.style, &arr.label, "");
            let item_key = escape_attr(&arr.item_key);
            let _ = write!(
                out,
                "<div class=\"array-actions\">\
                 <button type=\"button\" data-action=\"clear-items\" data-array=\"{path}\" data-target=\"{item_key}\">Clear all</button>\
                 <button type=\"button\" data-action=\"add-item\" data-array=\"{path}\" data-target=\"{item_key}\">Add</button>\
                 </div>"
            );
            let _ = write!(out, "<div class=\"items\" id=\"{path}.items\">");
            for item in &arr.items {
                write_element(out, item);
            }
            out.push_str("</div>");
            close_container(out, arr.style);
        }
    }
}

fn open_container(out: &mut String, style: LabelStyle, class: &str, path: &str, extra: &str) {
    let tag = container_tag(style);
    let _ = write!(
        out,
        "<{tag} class=\"{class}\" data-path=\"{path}\" id=\"{path}\"{extra}>"
    );
}

fn close_container(out: &mut String, style: LabelStyle) {
    let _ = write!(out, "</div></{}>", container_tag(style));
}

fn container_tag(style: LabelStyle) -> &'static str {
    match style {
        LabelStyle::Spoiler => "details",
        LabelStyle::Title => "section",
    }
}

fn write_heading(out: &mut String, style: LabelStyle, text: &str, trailing: &str) {
    let tag = match style {
        LabelStyle::Spoiler => "summary",
        LabelStyle::Title => "header",
    };
    let _ = write!(
        out,
        "<{tag}><span data-role=\"title\">{}</span>{trailing}</{tag}><div class=\"content\">",
        escape_text(text)
    );
}

fn write_children(out: &mut String, children: &[Element]) {
    for child in children {
        write_element(out, child);
    }
}

fn write_leaf(out: &mut String, path: &str, leaf: &LeafView) {
    let label = escape_text(&leaf.label);
    let _ = write!(
        out,
        "<div class=\"form-field\" data-type=\"{}\">",
        leaf.kind.as_str()
    );
    let text = escape_attr(leaf.value.as_text().unwrap_or_default());
    match leaf.kind {
        NodeKind::Checkbox => {
            let _ = write!(out, "<fieldset id=\"{path}\"><legend>{label}</legend>");
            let checked: &[String] = leaf.value.as_choices().unwrap_or_default();
            for (i, opt) in leaf.options.iter().enumerate() {
                let on = if checked.contains(&opt.value) { " checked" } else { "" };
                let _ = write!(
                    out,
                    "<label for=\"{path}-{i}\"><input type=\"checkbox\" id=\"{path}-{i}\" name=\"{path}\" data-path=\"{path}\" value=\"{}\"{on}> {}</label>",
                    escape_attr(&opt.value),
                    escape_text(opt.display_label())
                );
            }
            out.push_str("</fieldset>");
        }
        NodeKind::Select => {
            let _ = write!(
                out,
                "<label for=\"{path}\">{label}</label><select id=\"{path}\" name=\"{path}\" data-path=\"{path}\">"
            );
            let current = match &leaf.value {
                LeafValue::Text(s) if !s.is_empty() => s.as_str(),
                _ => NONE_SENTINEL,
            };
            for opt in &leaf.options {
                let sel = if opt.value == current { " selected" } else { "" };
                let _ = write!(
                    out,
                    "<option value=\"{}\"{sel}>{}</option>",
                    escape_attr(&opt.value),
                    escape_text(opt.display_label())
                );
            }
            out.push_str("</select>");
        }
        NodeKind::Textarea => {
            let _ = write!(
                out,
                "<label for=\"{path}\">{label}</label><textarea id=\"{path}\" name=\"{path}\" data-path=\"{path}\">{}</textarea>",
                escape_text(leaf.value.as_text().unwrap_or_default())
            );
        }
        kind => {
            let (ty, readonly) = match kind {
                NodeKind::Number => ("number", ""),
                NodeKind::Color => ("color", ""),
                NodeKind::Readonly => ("text", " readonly"),
                _ => ("text", ""),
            };
            let _ = write!(
                out,
                "<label for=\"{path}\">{label}</label><input type=\"{ty}\" id=\"{path}\" name=\"{path}\" data-path=\"{path}\" value=\"{text}\"{readonly}>"
            );
        }
    }
    out.push_str("</div>");
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
