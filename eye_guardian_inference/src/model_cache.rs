use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Holds a model that is loaded at most once and shared read-only afterwards.
pub struct LazyModel<T> {
    model: OnceCell<Arc<T>>,
}

impl<T> LazyModel<T> {
    pub const fn new() -> Self {
        Self {
            model: OnceCell::new(),
        }
    }

    /// Returns the cached model, running `load` only if nothing is cached yet.
    ///
    /// A failed load leaves the cell empty.
    pub fn get_or_load<E, F>(&self, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.model
            .get_or_try_init(|| load().map(Arc::new))
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }
}

impl<T> Default for LazyModel<T> {
    fn default() -> Self {
        Self::new()
    }
}
