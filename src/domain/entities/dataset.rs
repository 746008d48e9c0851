use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::entities::view_state::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub String);

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetId(pub String);

impl From<&str> for SetId {
    fn from(value: &str) -> Self {
        SetId(value.to_string())
    }
}

impl From<String> for SetId {
    fn from(value: String) -> Self {
        SetId(value)
    }
}

impl std::fmt::Display for SetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier space every request operates under. The reference genome uid
/// doubles as the materialized view's staleness key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub project_uid: String,
    pub ref_genome_uid: String,
}

impl Scope {
    pub fn new(project_uid: impl Into<String>, ref_genome_uid: impl Into<String>) -> Self {
        Self {
            project_uid: project_uid.into(),
            ref_genome_uid: ref_genome_uid.into(),
        }
    }

    pub fn staleness_key(&self) -> &str {
        &self.ref_genome_uid
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub scope: Scope,
    pub view: ViewState,
    pub paging: Paging,
}

/// A record is opaque to the controller; only the renderer looks inside.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedSet {
    pub id: SetId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterControls {
    pub owned_sets: Vec<OwnedSet>,
    pub filterable_fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantPage {
    pub records: Vec<Record>,
    pub field_config: Value,
    pub total_matching_count: u64,
    pub controls: FilterControls,
}

impl VariantPage {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
