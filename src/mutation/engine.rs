use crate::foundation::error::{FormError, FormResult};
use crate::foundation::notice::Notice;
use crate::instance::builder::{build, build_node};
use crate::instance::form::Form;
use crate::mutation::renumber::{is_contiguous, renumber, shift_down, shift_up};
use crate::mutation::request::{Action, Request};
use crate::path::form_path::FormPath;
use crate::path::resolve::resolve_required;
use crate::render::view::{ArrayView, Element};
use crate::template::model::Template;

/// Position of an item inside its array, captured before any write.
#[derive(Debug, Clone)]
struct ItemSlot {
    array: FormPath,
    index: usize,
    len: usize,
}

/// Applies array mutations to a form, keeping item identities contiguous.
///
/// Every operation validates its target and builds any new fragment before touching the form, so
/// a failed operation leaves the form unchanged.
pub struct MutationEngine<'a> {
    template: &'a Template,
    form: &'a mut Form,
}

impl<'a> MutationEngine<'a> {
    pub fn new(template: &'a Template, form: &'a mut Form) -> Self {
        Self { template, form }
    }

    /// Runs one request to completion.
    ///
    /// A missing target is reported as an error notice; template misses and malformed input are
    /// returned as errors.
    pub fn apply(&mut self, req: &Request) -> FormResult<Notice> {
        let target = &req.target;
        let res = match req.action {
            Action::AddItem => self.add_item(target),
            Action::ClearItems => self.clear_items(target),
            Action::Add => self.add_before(target),
            Action::Clone => self.clone_item(target),
            Action::MoveUp => self.move_up(target),
            Action::MoveDown => self.move_down(target),
            Action::Clear => self.clear(target),
            Action::Delete => self.delete(target),
        };
        match res {
            Err(FormError::NotFound(msg)) => {
                tracing::warn!(action = %req.action, %target, "{msg}");
                Ok(Notice::error(msg))
            }
            other => other,
        }
    }

    /// Appends a blank item at ordinal `K + 1`.
    pub fn add_item(&mut self, array: &FormPath) -> FormResult<Notice> {
        let arr = self.array(array)?;
        let new_path = array.item(arr.item_key.as_str(), arr.items.len() as u32 + 1);
        let fresh = self.fresh(&new_path)?;

        let arr = self.array_mut(array)?;
        arr.items.push(fresh);
        debug_assert!(is_contiguous(&arr.items));
        tracing::debug!(%new_path, "item appended");
        Ok(Notice::info("item added"))
    }

    /// Rebuilds the whole array with a single default item.
    pub fn clear_items(&mut self, array: &FormPath) -> FormResult<Notice> {
        self.array(array)?;
        let fresh = build(self.template, array)?;

        let el = self.element_mut(array)?;
        *el = fresh;
        tracing::debug!(%array, "array cleared");
        Ok(Notice::info("array cleared"))
    }

    /// Inserts a blank item at the target's position, shifting it and its successors up.
    pub fn add_before(&mut self, item: &FormPath) -> FormResult<Notice> {
        let slot = self.locate_item(item)?;
        let fresh = self.fresh(item)?;

        let arr = self.array_mut(&slot.array)?;
        shift_up(&mut arr.items, slot.index);
        arr.items.insert(slot.index, fresh);
        debug_assert!(is_contiguous(&arr.items));
        tracing::debug!(%item, len = arr.items.len(), "item inserted");
        Ok(Notice::info("new item added"))
    }

    /// Inserts a deep copy of the target right after it, carrying its current values.
    pub fn clone_item(&mut self, item: &FormPath) -> FormResult<Notice> {
        let slot = self.locate_item(item)?;
        let arr = self.array(&slot.array)?;
        let mut copy = arr.items[slot.index].clone();
        let ordinal = copy.ordinal().unwrap_or(slot.index as u32 + 1);

        let arr = self.array_mut(&slot.array)?;
        shift_up(&mut arr.items, slot.index + 1);
        renumber(&mut copy, ordinal + 1);
        arr.items.insert(slot.index + 1, copy);
        debug_assert!(is_contiguous(&arr.items));
        tracing::debug!(%item, len = arr.items.len(), "item cloned");
        Ok(Notice::info("item cloned"))
    }

    pub fn move_up(&mut self, item: &FormPath) -> FormResult<Notice> {
        let slot = self.locate_item(item)?;
        if slot.index == 0 {
            return Ok(Notice::info("item is already at the top"));
        }
        self.swap(&slot.array, slot.index - 1)?;
        tracing::debug!(%item, "item moved up");
        Ok(Notice::info("moved up"))
    }

    pub fn move_down(&mut self, item: &FormPath) -> FormResult<Notice> {
        let slot = self.locate_item(item)?;
        if slot.index + 1 >= slot.len {
            return Ok(Notice::info("item is already at the bottom"));
        }
        self.swap(&slot.array, slot.index)?;
        tracing::debug!(%item, "item moved down");
        Ok(Notice::info("moved down"))
    }

    /// Rebuilds the target item in place with default values.
    pub fn clear(&mut self, item: &FormPath) -> FormResult<Notice> {
        let slot = self.locate_item(item)?;
        let fresh = self.fresh(item)?;

        let arr = self.array_mut(&slot.array)?;
        arr.items[slot.index] = fresh;
        tracing::debug!(%item, "item cleared");
        Ok(Notice::info("contents cleared"))
    }

    /// Removes the target and closes the gap; the last remaining item is cleared instead.
    pub fn delete(&mut self, item: &FormPath) -> FormResult<Notice> {
        let slot = self.locate_item(item)?;
        if slot.len == 1 {
            return self.clear(item);
        }

        let arr = self.array_mut(&slot.array)?;
        arr.items.remove(slot.index);
        shift_down(&mut arr.items, slot.index);
        debug_assert!(is_contiguous(&arr.items));
        tracing::debug!(%item, len = arr.items.len(), "item deleted");
        Ok(Notice::info("item deleted"))
    }

    /// Exchanges adjacent items `lo` and `lo + 1` and their ordinals.
    fn swap(&mut self, array: &FormPath, lo: usize) -> FormResult<()> {
        let arr = self.array_mut(array)?;
        let upper = arr.items[lo].ordinal().unwrap_or(lo as u32 + 1);
        let lower = arr.items[lo + 1].ordinal().unwrap_or(lo as u32 + 2);
        arr.items.swap(lo, lo + 1);
        renumber(&mut arr.items[lo], upper);
        renumber(&mut arr.items[lo + 1], lower);
        debug_assert!(is_contiguous(&arr.items));
        Ok(())
    }

    fn locate_item(&self, item: &FormPath) -> FormResult<ItemSlot> {
        if item.ordinal().is_none() {
            return Err(FormError::not_found(format!("'{item}' is not an array item")));
        }
        let array = item
            .parent()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| FormError::not_found(format!("'{item}' has no parent array")))?;
        let arr = self.array(&array)?;
        let index = arr
            .items
            .iter()
            .position(|it| it.path == *item)
            .ok_or_else(|| FormError::not_found(format!("item '{item}' not found")))?;
        Ok(ItemSlot {
            len: arr.items.len(),
            array,
            index,
        })
    }

    fn fresh(&self, path: &FormPath) -> FormResult<Element> {
        let node = resolve_required(self.template, path)?;
        build_node(path, node)
    }

    fn array(&self, path: &FormPath) -> FormResult<&ArrayView> {
        self.form
            .get(path)
            .ok_or_else(|| FormError::not_found(format!("array container '{path}' not found")))?
            .array()
            .ok_or_else(|| FormError::not_found(format!("'{path}' is not an array")))
    }

    fn array_mut(&mut self, path: &FormPath) -> FormResult<&mut ArrayView> {
        self.element_mut(path)?
            .array_mut()
            .ok_or_else(|| FormError::not_found(format!("'{path}' is not an array")))
    }

    fn element_mut(&mut self, path: &FormPath) -> FormResult<&mut Element> {
        self.form
            .get_mut(path)
            .ok_or_else(|| FormError::not_found(format!("no element at '{path}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutation/engine.rs"]
mod tests;
