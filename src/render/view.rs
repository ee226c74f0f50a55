use crate::path::form_path::FormPath;
use crate::template::model::{LabelStyle, NodeKind, OptionDef};
use serde::{Deserialize, Serialize};

/// Current value of a leaf field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeafValue {
    /// Single text value (every leaf kind except checkbox).
    Text(String),
    /// Checked option values of a checkbox group, in option order.
    Choices(Vec<String>),
}

impl LeafValue {
    pub fn empty_for(kind: NodeKind) -> Self {
        if kind == NodeKind::Checkbox {
            Self::Choices(Vec::new())
        } else {
            Self::Text(String::new())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Choices(_) => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::Choices(c) => Some(c),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Choices(c) => c.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafView {
    pub(crate) kind: NodeKind,
    pub(crate) label: String,
    pub(crate) value: LeafValue,
    pub(crate) options: Vec<OptionDef>,
}

impl LeafView {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }

    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }
}

/// Fixed-shape group (`box`).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub(crate) label: String,
    pub(crate) style: LabelStyle,
    pub(crate) children: Vec<Element>,
}

/// One array item (`object`).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    /// Visible title; its trailing integer is the display index.
    pub(crate) title: String,
    pub(crate) style: LabelStyle,
    /// Identity of the array holding this item.
    pub(crate) parent: FormPath,
    pub(crate) children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayView {
    pub(crate) label: String,
    pub(crate) style: LabelStyle,
    /// Name of the item template; item identities are `<array path>.<item_key>_<N>`.
    pub(crate) item_key: String,
    pub(crate) items: Vec<Element>,
}

impl GroupView {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }
}

impl ItemView {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parent(&self) -> &FormPath {
        &self.parent
    }
}

impl ArrayView {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn item_key(&self) -> &str {
        &self.item_key
    }

    pub fn items(&self) -> &[Element] {
        &self.items
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementView {
    Leaf(LeafView),
    Box(GroupView),
    Object(ItemView),
    Array(ArrayView),
}

/// A rendered form element: identity plus a typed view-model.
///
/// Containers own their rendered children, so an `Element` is a self-contained fragment that can
/// be spliced into the live form.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) path: FormPath,
    pub(crate) view: ElementView,
}

impl Element {
    pub fn path(&self) -> &FormPath {
        &self.path
    }

    pub fn view(&self) -> &ElementView {
        &self.view
    }

    pub fn kind(&self) -> NodeKind {
        match &self.view {
            ElementView::Leaf(l) => l.kind,
            ElementView::Box(_) => NodeKind::Box,
            ElementView::Object(_) => NodeKind::Object,
            ElementView::Array(_) => NodeKind::Array,
        }
    }

    /// Current ordinal for array items.
    pub fn ordinal(&self) -> Option<u32> {
        match self.view {
            ElementView::Object(_) => self.path.ordinal(),
            _ => None,
        }
    }

    pub fn leaf(&self) -> Option<&LeafView> {
        match &self.view {
            ElementView::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub(crate) fn leaf_mut(&mut self) -> Option<&mut LeafView> {
        match &mut self.view {
            ElementView::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn item(&self) -> Option<&ItemView> {
        match &self.view {
            ElementView::Object(i) => Some(i),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&ArrayView> {
        match &self.view {
            ElementView::Array(a) => Some(a),
            _ => None,
        }
    }

    pub(crate) fn array_mut(&mut self) -> Option<&mut ArrayView> {
        match &mut self.view {
            ElementView::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Rendered children: group/item fields or array items.
    pub fn children(&self) -> &[Element] {
        match &self.view {
            ElementView::Leaf(_) => &[],
            ElementView::Box(g) => &g.children,
            ElementView::Object(i) => &i.children,
            ElementView::Array(a) => &a.items,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Element] {
        match &mut self.view {
            ElementView::Leaf(_) => &mut [],
            ElementView::Box(g) => &mut g.children,
            ElementView::Object(i) => &mut i.children,
            ElementView::Array(a) => &mut a.items,
        }
    }

    /// Visible heading: leaf label, container label, or item title.
    pub fn title(&self) -> &str {
        match &self.view {
            ElementView::Leaf(l) => &l.label,
            ElementView::Box(g) => &g.label,
            ElementView::Object(i) => &i.title,
            ElementView::Array(a) => &a.label,
        }
    }
}
