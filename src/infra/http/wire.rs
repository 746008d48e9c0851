use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::dataset::{
    FilterControls, OwnedSet, PageQuery, SetId, VariantPage,
};
use crate::domain::entities::edit::{ExportRequest, NewSetRequest, PendingMutation, Selection};
use crate::usecase::ports::api::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityResponse {
    pub is_valid: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshViewBody<'a> {
    pub ref_genome_uid: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_result(self) -> Result<(), ApiError> {
        match self.error {
            Some(message) => Err(ApiError::ServerReported(message)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OwnedSetDto {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// Page payload. `records` and `totalMatchingCount` are required so a body
/// that is not a page fails to decode instead of rendering as empty.
/// A server-reported error carries neither, so it is decoded separately.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchPageResponse {
    #[serde(alias = "variantList")]
    pub records: Vec<Map<String, Value>>,
    #[serde(default)]
    pub field_config: Value,
    pub total_matching_count: u64,
    #[serde(default)]
    pub owned_sets: Vec<OwnedSetDto>,
    #[serde(default)]
    pub filterable_field_map: BTreeMap<String, Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Either a server-reported error or a page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FetchPageReply {
    Failed { error: String },
    Page(FetchPageResponse),
}

impl FetchPageReply {
    pub fn into_page(self) -> Result<VariantPage, ApiError> {
        match self {
            FetchPageReply::Failed { error } => Err(ApiError::ServerReported(error)),
            FetchPageReply::Page(page) => page.into_page(),
        }
    }
}

impl FetchPageResponse {
    pub fn into_page(self) -> Result<VariantPage, ApiError> {
        if let Some(message) = self.error {
            return Err(ApiError::ServerReported(message));
        }
        Ok(VariantPage {
            records: self.records,
            field_config: self.field_config,
            total_matching_count: self.total_matching_count,
            controls: FilterControls {
                owned_sets: self
                    .owned_sets
                    .into_iter()
                    .map(|set| OwnedSet {
                        id: SetId(set.id),
                        label: set.label,
                    })
                    .collect(),
                filterable_fields: self.filterable_field_map,
            },
        })
    }
}

/// Query string for the page fetch. The field list is only sent when the
/// user picked one.
pub fn page_query_params(query: &PageQuery) -> Result<Vec<(&'static str, String)>, ApiError> {
    let mut params = vec![
        ("projectUid", query.scope.project_uid.clone()),
        ("refGenomeUid", query.scope.ref_genome_uid.clone()),
        ("variantFilterString", query.view.filter_expression.clone()),
        ("melt", query.view.orientation.as_flag().to_string()),
        ("page", query.paging.page.to_string()),
        ("pageSize", query.paging.page_size.to_string()),
    ];
    if let Some(fields) = &query.view.visible_fields {
        let encoded = serde_json::to_string(fields)
            .map_err(|err| ApiError::Transport(format!("failed to encode field list: {err}")))?;
        params.push(("visibleKeyNames", encoded));
    }
    Ok(params)
}

pub fn export_query_params(request: &ExportRequest) -> Vec<(&'static str, String)> {
    vec![
        ("projectUid", request.scope.project_uid.clone()),
        ("refGenomeUid", request.scope.ref_genome_uid.clone()),
        ("variantFilterString", request.filter_expression.clone()),
        (
            "allMatchingFilter",
            if request.all_matching_filter { "1" } else { "0" }.to_string(),
        ),
    ]
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SelectionDto<'a> {
    Explicit {
        #[serde(rename = "explicitIds")]
        explicit_ids: Vec<&'a str>,
    },
    AllMatching {
        #[serde(rename = "allMatchingFilter")]
        all_matching_filter: bool,
        #[serde(rename = "filterExpression")]
        filter_expression: &'a str,
        orientation: &'static str,
    },
}

impl<'a> From<&'a Selection> for SelectionDto<'a> {
    fn from(selection: &'a Selection) -> Self {
        match selection {
            Selection::ExplicitIds(ids) => SelectionDto::Explicit {
                explicit_ids: ids.iter().map(|id| id.0.as_str()).collect(),
            },
            Selection::AllMatchingFilter {
                filter_expression,
                orientation,
            } => SelectionDto::AllMatching {
                all_matching_filter: true,
                filter_expression: filter_expression.as_str(),
                orientation: orientation.as_str(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipBody<'a> {
    pub project_uid: &'a str,
    pub ref_genome_uid: &'a str,
    pub action: &'static str,
    pub variant_set_uid: &'a str,
    pub selection: SelectionDto<'a>,
}

impl<'a> From<&'a PendingMutation> for MembershipBody<'a> {
    fn from(mutation: &'a PendingMutation) -> Self {
        Self {
            project_uid: &mutation.scope.project_uid,
            ref_genome_uid: &mutation.scope.ref_genome_uid,
            action: mutation.action.as_str(),
            variant_set_uid: &mutation.target_set_id.0,
            selection: SelectionDto::from(&mutation.selection),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetBody<'a> {
    pub project_uid: &'a str,
    pub ref_genome_uid: &'a str,
    pub name: &'a str,
}

impl<'a> From<&'a NewSetRequest> for CreateSetBody<'a> {
    fn from(request: &'a NewSetRequest) -> Self {
        Self {
            project_uid: &request.scope.project_uid,
            ref_genome_uid: &request.scope.ref_genome_uid,
            name: &request.name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSetResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CreateSetResponse {
    pub fn into_set_id(self) -> Result<SetId, ApiError> {
        if let Some(message) = self.error {
            return Err(ApiError::ServerReported(message));
        }
        self.id
            .filter(|id| !id.is_empty())
            .map(SetId)
            .ok_or_else(|| ApiError::Transport("create-set response carried no id".to_string()))
    }
}
