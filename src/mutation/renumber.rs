use crate::render::element::retitle;
use crate::render::view::{Element, ElementView};

/// Gives array item `item` the ordinal `n`.
///
/// Rewrites the item's own identity and display index, and the same path segment in every
/// descendant. Descendant items keep their own ordinals and titles.
pub(crate) fn renumber(item: &mut Element, n: u32) {
    let Some(depth) = item.path.len().checked_sub(1) else {
        return;
    };
    item.path.set_ordinal_at(depth, n);
    if let ElementView::Object(view) = &mut item.view {
        view.title = retitle(&view.title, n);
    }
    for child in item.children_mut() {
        rewrite_segment(child, depth, n);
    }
}

fn rewrite_segment(el: &mut Element, depth: usize, n: u32) {
    el.path.set_ordinal_at(depth, n);
    if let ElementView::Object(view) = &mut el.view {
        view.parent.set_ordinal_at(depth, n);
    }
    for child in el.children_mut() {
        rewrite_segment(child, depth, n);
    }
}

/// Shifts `items[from..]` up by one ordinal, highest index first.
///
/// A leftover item already holding a destination identity is evicted before the move.
pub(crate) fn shift_up(items: &mut Vec<Element>, mut from: usize) {
    let mut k = items.len();
    while k > from {
        k -= 1;
        let cur = items[k].ordinal().unwrap_or(k as u32 + 1);
        let dest = cur + 1;
        if let Some(stale) = position_of(items, dest, k) {
            tracing::warn!(path = %items[stale].path, "evicting stale item before renumbering");
            items.remove(stale);
            if stale < k {
                k -= 1;
            }
            if stale < from {
                from -= 1;
            }
        }
        renumber(&mut items[k], dest);
    }
}

/// Shifts `items[from..]` down by one ordinal, lowest index first.
pub(crate) fn shift_down(items: &mut [Element], from: usize) {
    for k in from..items.len() {
        let cur = items[k].ordinal().unwrap_or(k as u32 + 2);
        if cur <= 1 {
            continue;
        }
        renumber(&mut items[k], cur - 1);
    }
}

fn position_of(items: &[Element], ordinal: u32, except: usize) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .find(|(j, it)| *j != except && it.ordinal() == Some(ordinal))
        .map(|(j, _)| j)
}

/// True when `items` carry ordinals `1..=len` in order.
pub(crate) fn is_contiguous(items: &[Element]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(i, it)| it.ordinal() == Some(i as u32 + 1))
}
