use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::dataset::RecordId;
use crate::usecase::ports::view::SelectionSource;

#[derive(Debug, Default)]
struct SelectionInner {
    all_matching: bool,
    checked: BTreeSet<RecordId>,
}

/// Checkbox state owned by the rendering side. Touching a single row leaves
/// "all matching" mode.
#[derive(Debug, Default)]
pub struct SelectionState {
    inner: Mutex<SelectionInner>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, id: impl Into<RecordId>) {
        let mut inner = self.lock();
        inner.all_matching = false;
        inner.checked.insert(id.into());
    }

    pub fn check_all<I, T>(&self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<RecordId>,
    {
        let mut inner = self.lock();
        inner.all_matching = false;
        inner.checked.extend(ids.into_iter().map(Into::into));
    }

    pub fn uncheck(&self, id: &RecordId) {
        let mut inner = self.lock();
        inner.all_matching = false;
        inner.checked.remove(id);
    }

    pub fn toggle(&self, id: impl Into<RecordId>) {
        let id = id.into();
        let mut inner = self.lock();
        inner.all_matching = false;
        if !inner.checked.remove(&id) {
            inner.checked.insert(id);
        }
    }

    pub fn set_all_matching(&self, all_matching: bool) {
        self.lock().all_matching = all_matching;
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.all_matching = false;
        inner.checked.clear();
    }

    fn lock(&self) -> MutexGuard<'_, SelectionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SelectionSource for SelectionState {
    fn all_matching_selected(&self) -> bool {
        self.lock().all_matching
    }

    fn checked_ids(&self) -> BTreeSet<RecordId> {
        self.lock().checked.clone()
    }
}
