//! Data steward tools: disease resolution, disease → target associations,
//! target → drug lookups and drug detail.

use anyhow::Result;
use async_trait::async_trait;
use otagent_sources::OpenTargetsClient;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{limit_or_default, parse_params, OpenTargetsTool};

fn default_true() -> bool { true }

// ── search_disease_by_name ───────────────────────────────────────────────────

pub struct SearchDiseaseTool {
    client: OpenTargetsClient,
}

impl SearchDiseaseTool {
    pub fn new(client: OpenTargetsClient) -> Self { Self { client } }
}

#[derive(Debug, Deserialize)]
struct SearchDiseaseParams {
    disease_name: String,
}

#[async_trait]
impl OpenTargetsTool for SearchDiseaseTool {
    fn name(&self) -> &str { "search_disease_by_name" }

    fn description(&self) -> &str {
        "Resolve a free-text disease name (e.g. 'asthma') to its EFO/MONDO identifier. \
         The top search hit is returned. Fails when no disease matches."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "disease_name": {
                    "type": "string",
                    "description": "Disease name to search for, e.g. 'asthma'."
                }
            },
            "required": ["disease_name"]
        })
    }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: SearchDiseaseParams = parse_params(self.name(), params)?;
        let id = self.client.resolve_disease(&p.disease_name).await?;
        Ok(Value::String(id))
    }
}

// ── get_disease_targets ──────────────────────────────────────────────────────

pub struct DiseaseTargetsTool {
    client: OpenTargetsClient,
    default_limit: usize,
}

impl DiseaseTargetsTool {
    pub fn new(client: OpenTargetsClient, default_limit: usize) -> Self {
        Self { client, default_limit }
    }
}

#[derive(Debug, Deserialize)]
struct DiseaseTargetsParams {
    disease_id: String,
    limit: Option<usize>,
    #[serde(default = "default_true")]
    return_ensembl_ids: bool,
}

#[async_trait]
impl OpenTargetsTool for DiseaseTargetsTool {
    fn name(&self) -> &str { "get_disease_targets" }

    fn description(&self) -> &str {
        "List the targets most strongly associated with a disease, highest overall \
         association score first. Returns Ensembl gene ids, or approved gene symbols \
         when return_ensembl_ids is false."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "disease_id": {
                    "type": "string",
                    "description": "EFO/MONDO identifier, e.g. MONDO_0004979."
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of targets to return.",
                    "default": self.default_limit
                },
                "return_ensembl_ids": {
                    "type": "boolean",
                    "description": "Return Ensembl ids (true) or gene symbols (false).",
                    "default": true
                }
            },
            "required": ["disease_id"]
        })
    }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: DiseaseTargetsParams = parse_params(self.name(), params)?;
        let limit = limit_or_default(self.name(), p.limit, self.default_limit)?;

        tracing::info!(
            tool = "get_disease_targets",
            disease = %p.disease_id,
            limit,
            ensembl = p.return_ensembl_ids,
            "Fetching disease targets"
        );

        let targets = self
            .client
            .fetch_targets_for_disease(&p.disease_id, limit, !p.return_ensembl_ids)
            .await?;
        Ok(json!(targets))
    }
}

// ── get_disease_associations ─────────────────────────────────────────────────

pub struct DiseaseAssociationsTool {
    client: OpenTargetsClient,
    default_limit: usize,
}

impl DiseaseAssociationsTool {
    pub fn new(client: OpenTargetsClient, default_limit: usize) -> Self {
        Self { client, default_limit }
    }
}

#[derive(Debug, Deserialize)]
struct DiseaseAssociationsParams {
    disease_id: String,
    limit: Option<usize>,
}

#[async_trait]
impl OpenTargetsTool for DiseaseAssociationsTool {
    fn name(&self) -> &str { "get_disease_associations" }

    fn description(&self) -> &str {
        "Full disease-target association records: target id, approved symbol, overall \
         score and per-datatype evidence scores, highest overall score first."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "disease_id": {
                    "type": "string",
                    "description": "EFO/MONDO identifier, e.g. EFO_0000270."
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "default": self.default_limit
                }
            },
            "required": ["disease_id"]
        })
    }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: DiseaseAssociationsParams = parse_params(self.name(), params)?;
        let limit = limit_or_default(self.name(), p.limit, self.default_limit)?;
        let records = self.client.fetch_associations(&p.disease_id, limit).await?;
        Ok(serde_json::to_value(records)?)
    }
}

// ── get_target_drugs ─────────────────────────────────────────────────────────

pub struct TargetDrugsTool {
    client: OpenTargetsClient,
    default_limit: usize,
}

impl TargetDrugsTool {
    pub fn new(client: OpenTargetsClient, default_limit: usize) -> Self {
        Self { client, default_limit }
    }
}

#[derive(Debug, Deserialize)]
struct TargetDrugsParams {
    target_ids: Vec<String>,
    limit: Option<usize>,
}

#[async_trait]
impl OpenTargetsTool for TargetDrugsTool {
    fn name(&self) -> &str { "get_target_drugs" }

    fn description(&self) -> &str {
        "Known drugs for each Ensembl target id, as a map of target id to unique drug \
         names. Unknown targets and failed lookups map to an empty list."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "target_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Ensembl gene ids, e.g. [\"ENSG00000157764\"]."
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum known-drug rows considered per target.",
                    "default": self.default_limit
                }
            },
            "required": ["target_ids"]
        })
    }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: TargetDrugsParams = parse_params(self.name(), params)?;
        let limit = limit_or_default(self.name(), p.limit, self.default_limit)?;
        let drugs = self.client.fetch_drugs_for_targets(&p.target_ids, limit).await;
        Ok(serde_json::to_value(drugs)?)
    }
}

// ── search_drugs_by_name ─────────────────────────────────────────────────────

pub struct SearchDrugsTool {
    client: OpenTargetsClient,
    default_limit: usize,
}

impl SearchDrugsTool {
    pub fn new(client: OpenTargetsClient, default_limit: usize) -> Self {
        Self { client, default_limit }
    }
}

#[derive(Debug, Deserialize)]
struct SearchDrugsParams {
    drug_names: Vec<String>,
    limit: Option<usize>,
}

#[async_trait]
impl OpenTargetsTool for SearchDrugsTool {
    fn name(&self) -> &str { "search_drugs_by_name" }

    fn description(&self) -> &str {
        "Search drug names and return the best matching drug hits (ChEMBL id, name, \
         description, score) for each unique name."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "drug_names": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Hits kept per name.",
                    "default": self.default_limit
                }
            },
            "required": ["drug_names"]
        })
    }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: SearchDrugsParams = parse_params(self.name(), params)?;
        let limit = limit_or_default(self.name(), p.limit, self.default_limit)?;
        let hits = self.client.resolve_drugs(&p.drug_names, limit).await;
        Ok(serde_json::to_value(hits)?)
    }
}

// ── get_drugs_info ───────────────────────────────────────────────────────────

pub struct DrugsInfoTool {
    client: OpenTargetsClient,
}

impl DrugsInfoTool {
    pub fn new(client: OpenTargetsClient) -> Self { Self { client } }
}

#[derive(Debug, Deserialize)]
struct DrugsInfoParams {
    drug_ids: Vec<String>,
    #[serde(default = "default_true")]
    search_by_name: bool,
}

#[async_trait]
impl OpenTargetsTool for DrugsInfoTool {
    fn name(&self) -> &str { "get_drugs_info" }

    fn description(&self) -> &str {
        "Drug detail (name, description, maximum clinical trial phase, mechanisms of \
         action with their targets) keyed by ChEMBL id. With search_by_name the inputs \
         are drug names resolved to their best match first; otherwise they are ChEMBL ids. \
         Unknown drugs map to null."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "drug_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Drug names or ChEMBL ids, depending on search_by_name."
                },
                "search_by_name": {
                    "type": "boolean",
                    "default": true
                }
            },
            "required": ["drug_ids"]
        })
    }

    async fn invoke(&self, params: Value) -> Result<Value> {
        let p: DrugsInfoParams = parse_params(self.name(), params)?;
        let details = self
            .client
            .fetch_drug_details(&p.drug_ids, p.search_by_name)
            .await;
        Ok(serde_json::to_value(details)?)
    }
}
