use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::AppConfig;
use crate::domain::entities::dataset::{PageQuery, Scope, SetId, VariantPage};
use crate::domain::entities::edit::{ExportRequest, NewSetRequest, PendingMutation};
use crate::infra::http::wire::{
    export_query_params, page_query_params, CreateSetBody, CreateSetResponse, ErrorResponse,
    FetchPageReply, MembershipBody, RefreshViewBody, ValidityResponse,
};
use crate::usecase::ports::api::{ApiError, VariantApi};

const VIEW_VALIDITY_PATH: &str = "_/variants/materialized-view/is-valid";
const VIEW_REFRESH_PATH: &str = "_/variants/materialized-view/refresh";
const VARIANTS_PATH: &str = "_/variants";
const MEMBERSHIP_PATH: &str = "_/sets/modify-membership";
const CREATE_SET_PATH: &str = "_/sets/create";
const EXPORT_PATH: &str = "_/variants/export";

pub struct HttpVariantApi {
    client: reqwest::Client,
    base_url: Url,
    export_dir: PathBuf,
}

impl HttpVariantApi {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.auth_token.as_deref().filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("auth token is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            export_dir: config.export_dir(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Transport(format!("invalid endpoint {path}: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.endpoint(path)?)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    classify(status, &body)
}

/// Maps a status and body to the decoded payload or the error the user sees.
/// An `{error}` body on a failed status is the server's own message.
pub fn classify<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        if let Ok(ErrorResponse {
            error: Some(message),
        }) = serde_json::from_str(body)
        {
            return Err(ApiError::ServerReported(message));
        }
        return Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::ServerReported(format!(
                "not signed in: the server requires a valid auth token (HTTP {status})"
            )),
            StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => ApiError::ServerReported(format!(
                "project or reference genome not found, or not owned by this account (HTTP {status})"
            )),
            _ => ApiError::Transport(format!("HTTP {status}")),
        });
    }

    serde_json::from_str(body)
        .map_err(|err| ApiError::Transport(format!("malformed response body: {err}")))
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Transport(format!("request timed out: {err}"))
    } else {
        ApiError::Transport(err.to_string())
    }
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("variants-{}.csv", now.format("%Y%m%d-%H%M%S"))
}

#[async_trait]
impl VariantApi for HttpVariantApi {
    async fn is_materialized_view_valid(&self, scope: &Scope) -> Result<bool, ApiError> {
        let response: ValidityResponse = self
            .get_json(
                VIEW_VALIDITY_PATH,
                &[("refGenomeUid", scope.ref_genome_uid.clone())],
            )
            .await?;
        Ok(response.is_valid)
    }

    async fn refresh_materialized_view(&self, scope: &Scope) -> Result<(), ApiError> {
        let response: ErrorResponse = self
            .post_json(
                VIEW_REFRESH_PATH,
                &RefreshViewBody {
                    ref_genome_uid: &scope.ref_genome_uid,
                },
            )
            .await?;
        response.into_result()
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<VariantPage, ApiError> {
        let params = page_query_params(query)?;
        let response: FetchPageReply = self.get_json(VARIANTS_PATH, &params).await?;
        response.into_page()
    }

    async fn mutate_membership(&self, mutation: &PendingMutation) -> Result<(), ApiError> {
        let response: ErrorResponse = self
            .post_json(MEMBERSHIP_PATH, &MembershipBody::from(mutation))
            .await?;
        response.into_result()
    }

    async fn create_set(&self, request: &NewSetRequest) -> Result<SetId, ApiError> {
        let response: CreateSetResponse = self
            .post_json(CREATE_SET_PATH, &CreateSetBody::from(request))
            .await?;
        response.into_set_id()
    }

    async fn export(&self, request: &ExportRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.endpoint(EXPORT_PATH)?)
            .query(&export_query_params(request))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return Err(classify::<ErrorResponse>(status, &body)
                .err()
                .unwrap_or_else(|| ApiError::Transport(format!("export failed: HTTP {status}"))));
        }
        let bytes = response.bytes().await.map_err(transport_error)?;

        let path = self.export_dir.join(export_file_name(Local::now()));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|err| ApiError::Transport(format!("failed to write {}: {err}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "export saved");
        Ok(())
    }
}
