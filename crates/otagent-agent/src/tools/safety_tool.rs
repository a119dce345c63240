//! Safety agent tools: per-target tractability, chemical probes,
//! prioritisation and safety liabilities.
//!
//! All four take a list of Ensembl ids and return a map keyed by id. A target
//! unknown upstream maps to `null`; a failed lookup maps to `{"error": "..."}`.

use anyhow::Result;
use async_trait::async_trait;
use otagent_sources::OpenTargetsClient;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_params, OpenTargetsTool};

#[derive(Debug, Deserialize)]
struct TargetIdsParams {
    ensembl_ids: Vec<String>,
}

fn target_ids_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ensembl_ids": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Ensembl gene ids, e.g. [\"ENSG00000141510\"]."
            }
        },
        "required": ["ensembl_ids"]
    })
}

pub struct TractabilityTool {
    client: OpenTargetsClient,
}

impl TractabilityTool {
    pub fn new(client: OpenTargetsClient) -> Self { Self { client } }
}

#[async_trait]
impl OpenTargetsTool for TractabilityTool {
    fn name(&self) -> &str { "get_target_tractability" }

    fn description(&self) -> &str {
        "Tractability assessments per target: for each modality (small molecule, \
         antibody, PROTAC, other) the assessment labels and whether they hold."
    }

    fn parameters_schema(&self) -> Value { target_ids_schema() }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: TargetIdsParams = parse_params(self.name(), params)?;
        let results = self.client.fetch_tractability(&p.ensembl_ids).await;
        Ok(serde_json::to_value(results)?)
    }
}

pub struct ChemicalProbesTool {
    client: OpenTargetsClient,
}

impl ChemicalProbesTool {
    pub fn new(client: OpenTargetsClient) -> Self { Self { client } }
}

#[async_trait]
impl OpenTargetsTool for ChemicalProbesTool {
    fn name(&self) -> &str { "get_target_chemical_probes" }

    fn description(&self) -> &str {
        "Chemical probes per target with quality flags, Probes&Drugs and Probe Miner \
         scores, cell and organism scores, mechanism of action and source links."
    }

    fn parameters_schema(&self) -> Value { target_ids_schema() }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: TargetIdsParams = parse_params(self.name(), params)?;
        let results = self.client.fetch_chemical_probes(&p.ensembl_ids).await;
        Ok(serde_json::to_value(results)?)
    }
}

pub struct PrioritizationTool {
    client: OpenTargetsClient,
}

impl PrioritizationTool {
    pub fn new(client: OpenTargetsClient) -> Self { Self { client } }
}

#[async_trait]
impl OpenTargetsTool for PrioritizationTool {
    fn name(&self) -> &str { "get_target_prioritization" }

    fn description(&self) -> &str {
        "Target prioritisation factors per target, covering clinical precedence, \
         tractability, doability and safety, as key/value items."
    }

    fn parameters_schema(&self) -> Value { target_ids_schema() }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: TargetIdsParams = parse_params(self.name(), params)?;
        let results = self.client.fetch_prioritisation(&p.ensembl_ids).await;
        Ok(serde_json::to_value(results)?)
    }
}

pub struct SafetyInformationTool {
    client: OpenTargetsClient,
}

impl SafetyInformationTool {
    pub fn new(client: OpenTargetsClient) -> Self { Self { client } }
}

#[async_trait]
impl OpenTargetsTool for SafetyInformationTool {
    fn name(&self) -> &str { "get_target_safety_information" }

    fn description(&self) -> &str {
        "Known safety liabilities per target: adverse event, affected biosamples, \
         direction and dosing of the effect, supporting studies and data source."
    }

    fn parameters_schema(&self) -> Value { target_ids_schema() }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: TargetIdsParams = parse_params(self.name(), params)?;

        tracing::info!(
            tool = "get_target_safety_information",
            targets = p.ensembl_ids.len(),
            "Fetching safety liabilities"
        );

        let results = self.client.fetch_safety(&p.ensembl_ids).await;
        Ok(serde_json::to_value(results)?)
    }
}
