//! Request/response shapes for the Open Targets retrieval layer.
//!
//! Field names serialize in the remote schema's camelCase so tool output reads
//! like the API. Nested remote objects that may be absent are `Option`s;
//! lists the schema may return as `null` decode as empty.

use serde::{Deserialize, Serialize};

use crate::graphql::null_as_empty;

// ─────────────────────────────────────────────
//  Search
// ─────────────────────────────────────────────

/// One full-text search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub name: Option<String>,
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub score: Option<f64>,
}

/// Entity families accepted by the search endpoint's `entityNames` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEntity {
    Disease,
    Drug,
}

impl SearchEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEntity::Disease => "disease",
            SearchEntity::Drug => "drug",
        }
    }
}

// ─────────────────────────────────────────────
//  Disease → target associations
// ─────────────────────────────────────────────

/// A ranked disease–target association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRecord {
    /// Ensembl gene id; empty when the upstream row had no target.
    pub target_id: String,
    /// Approved gene symbol; empty when missing upstream.
    pub approved_symbol: String,
    pub score: f64,
    pub datatype_scores: Vec<DatatypeScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatatypeScore {
    pub id: String,
    pub score: f64,
}

// ─────────────────────────────────────────────
//  Drugs
// ─────────────────────────────────────────────

/// Drug detail: identity, maximum clinical phase and mechanisms of action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugRecord {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub maximum_clinical_trial_phase: Option<f64>,
    pub mechanisms_of_action: Vec<MechanismRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanismRecord {
    pub mechanism_of_action: Option<String>,
    pub target_name: Option<String>,
    pub action_type: Option<String>,
    pub targets: Vec<TargetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSummary {
    pub id: String,
    pub approved_symbol: Option<String>,
}

// ─────────────────────────────────────────────
//  Per-target records (remote schema, verbatim)
// ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TractabilityRecord {
    pub id: String,
    pub approved_symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tractability: Vec<Tractability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tractability {
    pub modality: Option<String>,
    pub value: Option<bool>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalProbesRecord {
    pub id: String,
    pub approved_symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chemical_probes: Vec<ChemicalProbe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemicalProbe {
    pub id: Option<String>,
    pub control: Option<String>,
    pub drug_id: Option<String>,
    pub is_high_quality: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mechanism_of_action: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub origin: Vec<String>,
    pub probes_drugs_score: Option<f64>,
    pub probe_miner_score: Option<f64>,
    pub score_in_cells: Option<f64>,
    pub score_in_organisms: Option<f64>,
    pub target_from_source_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub urls: Vec<ProbeUrl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeUrl {
    pub nice_name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritisationRecord {
    pub id: String,
    pub approved_symbol: Option<String>,
    pub prioritisation: Option<Prioritisation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prioritisation {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<PrioritisationItem>,
}

/// A single prioritisation metric. Values arrive as numbers, numeric strings or "NA".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritisationItem {
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Prioritisation {
    /// Numeric value for `key`, if present and not "NA".
    pub fn score(&self, key: &str) -> Option<f64> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .and_then(|item| match &item.value {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRecord {
    pub id: String,
    pub approved_symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub safety_liabilities: Vec<SafetyLiability>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyLiability {
    pub event: Option<String>,
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub biosamples: Vec<SafetyBiosample>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub effects: Vec<SafetyEffect>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub studies: Vec<SafetyStudy>,
    pub datasource: Option<String>,
    pub literature: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyBiosample {
    pub cell_format: Option<String>,
    pub cell_label: Option<String>,
    pub tissue_label: Option<String>,
    pub tissue_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyEffect {
    pub dosing: Option<String>,
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyStudy {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub study_type: Option<String>,
    pub description: Option<String>,
}

/// Outcome for one identifier in a per-target batch.
///
/// Serializes as the record itself, `null` when the target does not exist
/// upstream, or `{"error": "..."}` when the request for that identifier failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TargetLookup<T> {
    Found(T),
    Absent,
    Failed { error: String },
}

impl<T> TargetLookup<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            TargetLookup::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TargetLookup::Failed { .. })
    }
}
