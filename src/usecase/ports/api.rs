use async_trait::async_trait;

use crate::domain::entities::dataset::{PageQuery, Scope, SetId, VariantPage};
use crate::domain::entities::edit::{ExportRequest, NewSetRequest, PendingMutation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network failure, timeout, or an unreadable response.
    Transport(String),
    /// Well-formed response whose payload carries an error message.
    ServerReported(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(message) => write!(f, "transport error: {message}"),
            ApiError::ServerReported(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[async_trait]
pub trait VariantApi: Send + Sync {
    async fn is_materialized_view_valid(&self, scope: &Scope) -> Result<bool, ApiError>;
    async fn refresh_materialized_view(&self, scope: &Scope) -> Result<(), ApiError>;

    async fn fetch_page(&self, query: &PageQuery) -> Result<VariantPage, ApiError>;

    async fn mutate_membership(&self, mutation: &PendingMutation) -> Result<(), ApiError>;
    async fn create_set(&self, request: &NewSetRequest) -> Result<SetId, ApiError>;

    /// Fire-and-forget download; nothing comes back to the controller.
    async fn export(&self, request: &ExportRequest) -> Result<(), ApiError>;
}
