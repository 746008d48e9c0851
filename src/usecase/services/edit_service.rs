use std::sync::Arc;

use crate::domain::entities::dataset::SetId;
use crate::domain::entities::edit::{MembershipAction, NewSetRequest, PendingMutation, Selection};
use crate::error::ControllerError;
use crate::usecase::ports::api::VariantApi;
use crate::usecase::ports::view::{SelectionSource, ViewEvents};
use crate::usecase::services::query_service::DatasetQueryController;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSet {
    pub id: SetId,
    /// False when the set was created with an empty explicit selection.
    pub populated: bool,
}

/// Turns the renderer's selection into bulk set-membership edits and
/// refreshes the view afterwards.
pub struct SelectionAndMutationCoordinator {
    api: Arc<dyn VariantApi>,
    controller: Arc<DatasetQueryController>,
    selection: Arc<dyn SelectionSource>,
    events: Arc<dyn ViewEvents>,
}

impl SelectionAndMutationCoordinator {
    pub fn new(
        api: Arc<dyn VariantApi>,
        controller: Arc<DatasetQueryController>,
        selection: Arc<dyn SelectionSource>,
        events: Arc<dyn ViewEvents>,
    ) -> Self {
        Self {
            api,
            controller,
            selection,
            events,
        }
    }

    /// Reads the filter at call time, never an earlier snapshot.
    pub fn resolve_selection(&self) -> Selection {
        if self.selection.all_matching_selected() {
            Selection::all_matching(&self.controller.view_state())
        } else {
            Selection::ExplicitIds(self.selection.checked_ids())
        }
    }

    pub async fn mutate_membership(
        &self,
        target_set_id: &SetId,
        action: MembershipAction,
    ) -> Result<(), ControllerError> {
        let selection = self.resolve_selection();
        if let Err(err) = selection.validate() {
            self.events.on_action_error(&err.to_string());
            return Err(err.into());
        }

        self.execute(PendingMutation {
            scope: self.controller.scope().clone(),
            action,
            target_set_id: target_set_id.clone(),
            selection,
        })
        .await
    }

    pub async fn create_set_and_add(&self, name: &str) -> Result<CreatedSet, ControllerError> {
        let request = match NewSetRequest::validated(self.controller.scope(), name) {
            Ok(request) => request,
            Err(err) => {
                self.events.on_action_error(&err.to_string());
                return Err(err.into());
            }
        };

        let id = match self.api.create_set(&request).await {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(name = %request.name, error = %err, "variant set creation failed");
                self.events.on_action_error(&err.to_string());
                return Err(err.into());
            }
        };
        tracing::info!(set = %id, name = %request.name, "created variant set");

        let selection = self.resolve_selection();
        if selection.validate().is_err() {
            tracing::debug!(set = %id, "nothing selected, new set stays empty");
            self.refresh_view().await;
            return Ok(CreatedSet {
                id,
                populated: false,
            });
        }

        self.execute(PendingMutation {
            scope: request.scope,
            action: MembershipAction::Add,
            target_set_id: id.clone(),
            selection,
        })
        .await?;

        Ok(CreatedSet {
            id,
            populated: true,
        })
    }

    async fn execute(&self, mutation: PendingMutation) -> Result<(), ControllerError> {
        tracing::info!(
            action = mutation.action.as_str(),
            set = %mutation.target_set_id,
            all_matching = mutation.selection.is_all_matching(),
            "submitting membership change"
        );

        if let Err(err) = self.api.mutate_membership(&mutation).await {
            tracing::warn!(set = %mutation.target_set_id, error = %err, "membership change failed");
            self.events.on_action_error(&err.to_string());
            return Err(err.into());
        }

        self.refresh_view().await;
        Ok(())
    }

    /// The membership change has already landed. A failed reload is shown as
    /// a fetch error by the controller and does not fail the mutation.
    async fn refresh_view(&self) {
        match self.controller.refresh().await {
            Ok(_) | Err(ControllerError::StaleResponseDiscarded { .. }) => {}
            Err(err) => {
                tracing::warn!(error = %err, "reload after membership change failed");
            }
        }
    }
}
