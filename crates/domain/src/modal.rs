use crate::reference::ReferenceKind;

/// An overlay that can sit on top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Record editor form.
    Editor,
    /// Search-select picker filling the named editor field.
    SearchSelect {
        /// Reference list being picked from.
        kind: ReferenceKind,
        /// Canonical name of the editor field receiving the choice.
        target_field: String,
    },
    /// Blocking confirmation prompt.
    Confirm,
}

/// Ordered stack of open overlays; the last entry is on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalStack {
    overlays: Vec<Overlay>,
}

impl ModalStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an overlay on top of the others; an overlay that is already
    /// open is moved to the top instead of being stacked twice.
    pub fn push(&mut self, overlay: Overlay) {
        self.overlays.retain(|open| *open != overlay);
        self.overlays.push(overlay);
    }

    /// Closes the top-most overlay and returns it.
    pub fn close_top(&mut self) -> Option<Overlay> {
        self.overlays.pop()
    }

    /// Closes the top-most overlay only when it matches `predicate`.
    pub fn close_if(&mut self, predicate: impl FnOnce(&Overlay) -> bool) -> Option<Overlay> {
        if self.overlays.last().is_some_and(predicate) {
            return self.overlays.pop();
        }
        None
    }

    /// Removes every occurrence of an overlay, wherever it sits.
    pub fn remove(&mut self, overlay: &Overlay) {
        self.overlays.retain(|open| open != overlay);
    }

    /// Returns the top-most overlay.
    #[must_use]
    pub fn top(&self) -> Option<&Overlay> {
        self.overlays.last()
    }

    /// Returns whether an overlay is open anywhere in the stack.
    #[must_use]
    pub fn contains(&self, overlay: &Overlay) -> bool {
        self.overlays.contains(overlay)
    }

    /// Returns whether nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Returns the number of open overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }
}
