use std::collections::BTreeSet;

use crate::domain::entities::dataset::{RecordId, Scope, SetId};
use crate::domain::entities::view_state::{Orientation, ViewState};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Add,
    Remove,
}

impl MembershipAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipAction::Add => "add",
            MembershipAction::Remove => "remove",
        }
    }
}

/// Records a bulk operation targets. The filter variant is resolved on the
/// server and never carries ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    ExplicitIds(BTreeSet<RecordId>),
    AllMatchingFilter {
        filter_expression: String,
        orientation: Orientation,
    },
}

impl Selection {
    pub fn all_matching(view: &ViewState) -> Self {
        Selection::AllMatchingFilter {
            filter_expression: view.filter_expression.clone(),
            orientation: view.orientation,
        }
    }

    pub fn is_all_matching(&self) -> bool {
        matches!(self, Selection::AllMatchingFilter { .. })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Selection::AllMatchingFilter { .. } => Ok(()),
            Selection::ExplicitIds(ids) if ids.is_empty() => Err(ValidationError::EmptySelection),
            Selection::ExplicitIds(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub scope: Scope,
    pub action: MembershipAction,
    pub target_set_id: SetId,
    pub selection: Selection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSetRequest {
    pub scope: Scope,
    pub name: String,
}

impl NewSetRequest {
    pub fn validated(scope: &Scope, name: &str) -> Result<Self, ValidationError> {
        if scope.project_uid.trim().is_empty() {
            return Err(ValidationError::MissingField("project"));
        }
        if scope.ref_genome_uid.trim().is_empty() {
            return Err(ValidationError::MissingField("reference genome"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("set name"));
        }
        Ok(Self {
            scope: scope.clone(),
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub scope: Scope,
    pub filter_expression: String,
    pub all_matching_filter: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_explicit_selection_is_rejected() {
        let selection = Selection::ExplicitIds(BTreeSet::new());

        assert_eq!(selection.validate(), Err(ValidationError::EmptySelection));
    }

    #[test]
    fn all_matching_selection_is_valid_for_any_filter() {
        let selection = Selection::all_matching(&ViewState::default());

        assert!(selection.validate().is_ok());
        assert!(selection.is_all_matching());
    }

    #[test]
    fn new_set_request_trims_name_and_requires_scope() {
        let scope = Scope::new("p1", "rg1");
        let request = NewSetRequest::validated(&scope, "  hits  ").expect("should validate");
        assert_eq!(request.name, "hits");

        assert_eq!(
            NewSetRequest::validated(&scope, "   "),
            Err(ValidationError::MissingField("set name"))
        );
        assert_eq!(
            NewSetRequest::validated(&Scope::new("p1", ""), "hits"),
            Err(ValidationError::MissingField("reference genome"))
        );
    }
}
