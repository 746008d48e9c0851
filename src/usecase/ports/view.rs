use std::collections::BTreeSet;

use crate::domain::entities::dataset::{FilterControls, RecordId, VariantPage};

/// Events the controller sends to the rendering collaborator.
pub trait ViewEvents: Send + Sync {
    fn on_loading_start(&self);
    fn on_loading_done(&self);
    fn on_controls_ready(&self, controls: &FilterControls);
    fn on_page_rendered(&self, page: &VariantPage);
    fn on_fetch_error(&self, message: &str);
    /// Validation and mutation failures; shown on the same surface as fetch
    /// errors.
    fn on_action_error(&self, message: &str);
    fn on_error_cleared(&self);
}

/// Selection as the rendering collaborator's checkboxes report it.
pub trait SelectionSource: Send + Sync {
    /// "Select all matching" mode; the coordinator does not compute it.
    fn all_matching_selected(&self) -> bool;
    fn checked_ids(&self) -> BTreeSet<RecordId>;
}
