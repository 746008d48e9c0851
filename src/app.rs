use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::domain::entities::dataset::Scope;
use crate::infra::http::client::HttpVariantApi;
use crate::infra::location::url_location::UrlLocation;
use crate::ui::state::app_state::SelectionState;
use crate::usecase::ports::api::VariantApi;
use crate::usecase::ports::view::ViewEvents;
use crate::usecase::services::edit_service::SelectionAndMutationCoordinator;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::query_service::DatasetQueryController;

const VARIANTS_VIEW_PATH: &str = "variants";

/// Everything one open variant view needs, wired together.
pub struct ViewSession {
    pub controller: Arc<DatasetQueryController>,
    pub coordinator: SelectionAndMutationCoordinator,
    pub exporter: ExportService,
    pub selection: Arc<SelectionState>,
    pub location: Arc<UrlLocation>,
}

impl ViewSession {
    pub fn new(
        scope: Scope,
        api: Arc<dyn VariantApi>,
        location: Arc<UrlLocation>,
        events: Arc<dyn ViewEvents>,
        page_size: u32,
    ) -> Self {
        let selection = Arc::new(SelectionState::new());
        let controller = Arc::new(
            DatasetQueryController::new(scope, api.clone(), location.clone(), events.clone())
                .with_page_size(page_size),
        );
        let coordinator = SelectionAndMutationCoordinator::new(
            api.clone(),
            controller.clone(),
            selection.clone(),
            events.clone(),
        );
        let exporter = ExportService::new(api, controller.clone(), selection.clone(), events);

        Self {
            controller,
            coordinator,
            exporter,
            selection,
            location,
        }
    }

    /// Opens a session against the configured server. A shareable URL, when
    /// given, seeds the filter and orientation.
    pub fn open(
        config: &AppConfig,
        shareable_url: Option<&str>,
        events: Arc<dyn ViewEvents>,
    ) -> Result<Self> {
        config.validate()?;
        let api: Arc<dyn VariantApi> = Arc::new(HttpVariantApi::new(config)?);
        let location = match shareable_url {
            Some(raw) => UrlLocation::parse(raw)?,
            None => UrlLocation::new(
                config
                    .base_url()?
                    .join(VARIANTS_VIEW_PATH)
                    .context("failed to build view url")?,
            ),
        };

        let session = Self::new(
            config.scope(),
            api,
            Arc::new(location),
            events,
            config.page_size,
        );
        session.controller.restore_from_location();
        Ok(session)
    }

    pub fn shareable_url(&self) -> String {
        self.location.current().to_string()
    }
}
