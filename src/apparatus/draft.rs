//! Draft/commit wrapper for edit-mode fields.
//!
//! The apparatus session screen toggles an edit mode for the base fields:
//! edits accumulate in a local draft and are only adopted on save; cancel
//! reverts to the last-saved values. This models that pattern as a value
//! with pending edits instead of mutating the persisted record in place.

/// A saved value with an optional pending edit.
#[derive(Debug, Clone)]
pub struct Draft<T: Clone> {
    saved: T,
    pending: Option<T>,
}

impl<T: Clone> Draft<T> {
    /// Wrap a saved value, with no edit in progress.
    pub fn new(saved: T) -> Self {
        Self {
            saved,
            pending: None,
        }
    }

    /// Whether an edit is in progress.
    pub fn is_editing(&self) -> bool {
        self.pending.is_some()
    }

    /// The currently displayed value: the pending edit if one exists,
    /// the saved value otherwise.
    pub fn get(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.saved)
    }

    /// The last-saved value, regardless of any pending edit.
    pub fn saved(&self) -> &T {
        &self.saved
    }

    /// Enter edit mode. No-op if already editing.
    pub fn begin_edit(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(self.saved.clone());
        }
    }

    /// Mutable access to the draft, entering edit mode if needed.
    pub fn edit(&mut self) -> &mut T {
        self.pending.get_or_insert_with(|| self.saved.clone())
    }

    /// Adopt the pending edit as the saved value and leave edit mode.
    /// Returns the now-saved value.
    pub fn commit(&mut self) -> &T {
        if let Some(pending) = self.pending.take() {
            self.saved = pending;
        }
        &self.saved
    }

    /// Drop the pending edit and leave edit mode.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    /// Replace the saved value from outside (e.g. after a reload),
    /// discarding any pending edit.
    pub fn reset(&mut self, saved: T) {
        self.saved = saved;
        self.pending = None;
    }
}
