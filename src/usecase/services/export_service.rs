use std::sync::Arc;

use crate::domain::entities::edit::ExportRequest;
use crate::error::ControllerError;
use crate::usecase::ports::api::VariantApi;
use crate::usecase::ports::view::{SelectionSource, ViewEvents};
use crate::usecase::services::query_service::DatasetQueryController;

pub struct ExportService {
    api: Arc<dyn VariantApi>,
    controller: Arc<DatasetQueryController>,
    selection: Arc<dyn SelectionSource>,
    events: Arc<dyn ViewEvents>,
}

impl ExportService {
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

    pub fn build_request(&self) -> ExportRequest {
        ExportRequest {
            scope: self.controller.scope().clone(),
            filter_expression: self.controller.view_state().filter_expression,
            all_matching_filter: self.selection.all_matching_selected(),
        }
    }

    pub async fn export(&self) -> Result<(), ControllerError> {
        let request = self.build_request();
        tracing::info!(
            filter = %request.filter_expression,
            all_matching = request.all_matching_filter,
            "requesting export"
        );
        self.api.export(&request).await.map_err(|err| {
            self.events.on_action_error(&err.to_string());
            ControllerError::from(err)
        })
    }
}
