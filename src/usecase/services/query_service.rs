use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::entities::dataset::{PageQuery, Paging, Scope, VariantPage};
use crate::domain::entities::view_state::{Orientation, ViewState};
use crate::error::ControllerError;
use crate::usecase::ports::api::VariantApi;
use crate::usecase::ports::location::LocationAccessor;
use crate::usecase::ports::view::ViewEvents;
use crate::usecase::services::gate_service::MaterializedViewGate;
use crate::usecase::services::loading::LoadingIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub sequence: u64,
    pub record_count: usize,
    pub total_matching_count: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    view: ViewState,
    paging: Paging,
    page: Option<VariantPage>,
}

/// Owns the view state for one session and turns it into page fetches.
///
/// Each `refresh` takes the next sequence number. A response is only applied
/// while its sequence is still the latest issued; anything older is dropped
/// without touching the renderer.
pub struct DatasetQueryController {
    scope: Scope,
    api: Arc<dyn VariantApi>,
    gate: MaterializedViewGate,
    location: Arc<dyn LocationAccessor>,
    events: Arc<dyn ViewEvents>,
    loading: LoadingIndicator,
    state: Mutex<SessionState>,
    latest_sequence: AtomicU64,
}

impl DatasetQueryController {
    pub fn new(
        scope: Scope,
        api: Arc<dyn VariantApi>,
        location: Arc<dyn LocationAccessor>,
        events: Arc<dyn ViewEvents>,
    ) -> Self {
        Self {
            scope,
            gate: MaterializedViewGate::new(api.clone()),
            api,
            location,
            loading: LoadingIndicator::new(events.clone()),
            events,
            state: Mutex::new(SessionState::default()),
            latest_sequence: AtomicU64::new(0),
        }
    }

    pub fn with_page_size(self, page_size: u32) -> Self {
        self.session().paging.page_size = page_size.max(1);
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn view_state(&self) -> ViewState {
        self.session().view.clone()
    }

    pub fn paging(&self) -> Paging {
        self.session().paging
    }

    pub fn current_page(&self) -> Option<VariantPage> {
        self.session().page.clone()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.latest_sequence.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// Loads filter and orientation from the shareable location. Called once
    /// when a session opens; the caller decides when to fetch.
    pub fn restore_from_location(&self) -> ViewState {
        let pairs = self.location.query_pairs();
        let mut session = self.session();
        session.view.apply_query_pairs(&pairs);
        tracing::debug!(
            filter = %session.view.filter_expression,
            melt = session.view.orientation.is_melted(),
            "restored view state from location"
        );
        session.view.clone()
    }

    pub async fn set_filter(
        &self,
        filter_expression: impl Into<String>,
    ) -> Result<RefreshOutcome, ControllerError> {
        let filter_expression = filter_expression.into();
        self.update(move |view, paging| {
            view.filter_expression = filter_expression;
            paging.page = 0;
        })
        .await
    }

    pub async fn set_orientation(
        &self,
        orientation: Orientation,
    ) -> Result<RefreshOutcome, ControllerError> {
        self.update(move |view, paging| {
            view.orientation = orientation;
            paging.page = 0;
        })
        .await
    }

    pub async fn set_visible_fields(
        &self,
        visible_fields: Option<Vec<String>>,
    ) -> Result<RefreshOutcome, ControllerError> {
        self.update(move |view, _| view.visible_fields = visible_fields)
            .await
    }

    pub async fn set_page(&self, page: u32) -> Result<RefreshOutcome, ControllerError> {
        self.update(move |_, paging| paging.page = page).await
    }

    /// Applies several edits at once and refreshes exactly once.
    pub async fn update<F>(&self, edit: F) -> Result<RefreshOutcome, ControllerError>
    where
        F: FnOnce(&mut ViewState, &mut Paging),
    {
        {
            let mut session = self.session();
            let SessionState { view, paging, .. } = &mut *session;
            edit(view, paging);
        }
        self.refresh().await
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, ControllerError> {
        let sequence = self.latest_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let query = {
            let session = self.session();
            PageQuery {
                scope: self.scope.clone(),
                view: session.view.clone(),
                paging: session.paging,
            }
        };

        self.location
            .replace_query_pairs(&query.view.to_query_pairs());
        self.events.on_error_cleared();
        tracing::debug!(
            sequence,
            filter = %query.view.filter_expression,
            melt = query.view.orientation.is_melted(),
            page = query.paging.page,
            "refresh requested"
        );

        let fetched = self.gate_then_fetch(sequence, &query).await;
        self.ensure_latest(sequence)?;

        match fetched {
            Ok(page) => {
                let outcome = RefreshOutcome {
                    sequence,
                    record_count: page.records.len(),
                    total_matching_count: page.total_matching_count,
                };
                self.events.on_controls_ready(&page.controls);
                self.events.on_page_rendered(&page);
                self.session().page = Some(page);
                self.loading.done();
                tracing::info!(
                    sequence,
                    records = outcome.record_count,
                    total = outcome.total_matching_count,
                    "page rendered"
                );
                Ok(outcome)
            }
            Err(err) => {
                self.loading.done();
                tracing::warn!(sequence, error = %err, "page fetch failed");
                self.events.on_fetch_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Tears the session down to its defaults. In-flight responses become
    /// stale.
    pub fn reset(&self) {
        self.latest_sequence.fetch_add(1, Ordering::SeqCst);
        let mut session = self.session();
        let page_size = session.paging.page_size;
        *session = SessionState::default();
        session.paging.page_size = page_size;
        drop(session);
        self.loading.done();
    }

    async fn gate_then_fetch(
        &self,
        sequence: u64,
        query: &PageQuery,
    ) -> Result<VariantPage, ControllerError> {
        self.gate.ensure_fresh(&query.scope, &self.loading).await?;
        self.ensure_latest(sequence)?;
        // No-op when the gate already started it.
        self.loading.start();
        Ok(self.api.fetch_page(query).await?)
    }

    fn ensure_latest(&self, sequence: u64) -> Result<(), ControllerError> {
        let latest = self.latest_sequence();
        if latest == sequence {
            return Ok(());
        }
        tracing::debug!(sequence, latest, "discarding stale response");
        Err(ControllerError::StaleResponseDiscarded { sequence, latest })
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
