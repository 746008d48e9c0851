use std::sync::Arc;

use crate::domain::entities::dataset::Scope;
use crate::usecase::ports::api::{ApiError, VariantApi};
use crate::usecase::services::loading::LoadingIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    AlreadyFresh,
    Refreshed,
}

/// Holds every fetch until the server's materialized view is current.
/// Validity is never cached between calls.
pub struct MaterializedViewGate {
    api: Arc<dyn VariantApi>,
}

impl MaterializedViewGate {
    pub fn new(api: Arc<dyn VariantApi>) -> Self {
        Self { api }
    }

    /// A stale view turns `loading` on for the rebuild and leaves it on. The
    /// caller clears it once its fetch settles.
    pub async fn ensure_fresh(
        &self,
        scope: &Scope,
        loading: &LoadingIndicator,
    ) -> Result<GateOutcome, ApiError> {
        if self.api.is_materialized_view_valid(scope).await? {
            tracing::debug!(ref_genome = %scope.staleness_key(), "materialized view is fresh");
            return Ok(GateOutcome::AlreadyFresh);
        }

        tracing::info!(ref_genome = %scope.staleness_key(), "materialized view is stale, refreshing");
        loading.start();
        match self.api.refresh_materialized_view(scope).await {
            Ok(()) => Ok(GateOutcome::Refreshed),
            Err(err) => {
                tracing::warn!(ref_genome = %scope.staleness_key(), error = %err, "materialized view refresh failed");
                Err(err)
            }
        }
    }
}
