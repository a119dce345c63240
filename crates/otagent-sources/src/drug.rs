//! Known drugs per target and drug detail lookups.

use std::collections::{BTreeMap, BTreeSet};

use otagent_common::Result;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::graphql::{null_as_empty, OpenTargetsClient};
use crate::models::{DrugRecord, MechanismRecord, TargetSummary};
use crate::queries::{DRUG_DETAILS, TARGET_KNOWN_DRUGS};

#[derive(Debug, Deserialize)]
struct KnownDrugsData {
    target: Option<KnownDrugsTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnownDrugsTarget {
    known_drugs: Option<KnownDrugs>,
}

#[derive(Debug, Deserialize)]
struct KnownDrugs {
    #[serde(default, deserialize_with = "null_as_empty")]
    rows: Vec<KnownDrugRow>,
}

#[derive(Debug, Deserialize)]
struct KnownDrugRow {
    drug: Option<DrugName>,
}

#[derive(Debug, Deserialize)]
struct DrugName {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DrugData {
    drug: Option<DrugNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrugNode {
    id: String,
    name: Option<String>,
    description: Option<String>,
    maximum_clinical_trial_phase: Option<f64>,
    mechanisms_of_action: Option<MechanismsOfAction>,
}

#[derive(Debug, Deserialize)]
struct MechanismsOfAction {
    #[serde(default, deserialize_with = "null_as_empty")]
    rows: Vec<MechanismRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MechanismRow {
    mechanism_of_action: Option<String>,
    action_type: Option<String>,
    target_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    targets: Vec<TargetSummary>,
}

impl From<DrugNode> for DrugRecord {
    fn from(node: DrugNode) -> Self {
        let mechanisms_of_action = node
            .mechanisms_of_action
            .map(|m| m.rows)
            .unwrap_or_default()
            .into_iter()
            .map(|row| MechanismRecord {
                mechanism_of_action: row.mechanism_of_action,
                target_name: row.target_name,
                action_type: row.action_type,
                targets: row.targets,
            })
            .collect();

        DrugRecord {
            id: node.id,
            name: node.name,
            description: node.description,
            maximum_clinical_trial_phase: node.maximum_clinical_trial_phase,
            mechanisms_of_action,
        }
    }
}

impl OpenTargetsClient {
    /// Known drug names for one target, at most `limit` rows. `Ok(None)` when
    /// the target does not exist upstream.
    #[instrument(skip(self))]
    pub async fn fetch_target_drugs(
        &self,
        target_id: &str,
        limit: usize,
    ) -> Result<Option<BTreeSet<String>>> {
        let data: KnownDrugsData = self
            .query(&TARGET_KNOWN_DRUGS, json!({ "ensemblId": target_id, "size": limit }))
            .await?;

        Ok(data.target.map(|target| {
            target
                .known_drugs
                .map(|k| k.rows)
                .unwrap_or_default()
                .into_iter()
                .take(limit)
                .filter_map(|row| row.drug.and_then(|d| d.name))
                .collect()
        }))
    }

    /// Known drug names for every requested target.
    ///
    /// Targets are processed one after another. An unknown target or a failed
    /// request yields an empty set for that key; the batch never aborts.
    #[instrument(skip(self, target_ids), fields(n = target_ids.len()))]
    pub async fn fetch_drugs_for_targets(
        &self,
        target_ids: &[String],
        limit: usize,
    ) -> BTreeMap<String, BTreeSet<String>> {
        let mut results = BTreeMap::new();

        for target_id in target_ids {
            if results.contains_key(target_id) {
                continue;
            }

            let drugs = match self.fetch_target_drugs(target_id, limit).await {
                Ok(Some(drugs)) => drugs,
                Ok(None) => {
                    warn!(target = %target_id, "Target not found");
                    BTreeSet::new()
                }
                Err(e) => {
                    warn!(target = %target_id, error = %e, "Known drugs lookup failed");
                    BTreeSet::new()
                }
            };
            debug!(target = %target_id, count = drugs.len(), "Known drugs collected");
            results.insert(target_id.clone(), drugs);
        }

        results
    }

    /// Full detail for one ChEMBL id. `Ok(None)` when the drug does not exist.
    #[instrument(skip(self))]
    pub async fn fetch_drug(&self, chembl_id: &str) -> Result<Option<DrugRecord>> {
        let data: DrugData = self
            .query(&DRUG_DETAILS, json!({ "chemblId": chembl_id }))
            .await?;
        Ok(data.drug.map(DrugRecord::from))
    }

    /// Drug detail for a batch of drugs, keyed by resolved ChEMBL id.
    ///
    /// With `by_name`, each input is a drug name resolved through
    /// [`resolve_drugs`](Self::resolve_drugs) using only its best hit; names
    /// without a hit are dropped. Otherwise inputs are ChEMBL ids. A drug that
    /// does not exist or whose lookup fails maps to `None`.
    #[instrument(skip(self, refs), fields(n = refs.len()))]
    pub async fn fetch_drug_details(
        &self,
        refs: &[String],
        by_name: bool,
    ) -> BTreeMap<String, Option<DrugRecord>> {
        let ids: Vec<String> = if by_name {
            let resolved = self.resolve_drugs(refs, 1).await;
            let mut ids = Vec::with_capacity(resolved.len());
            for name in refs {
                match resolved.get(name).and_then(|hits| hits.first()) {
                    Some(hit) => {
                        debug!(drug = %name, id = %hit.id, "Resolved drug name");
                        ids.push(hit.id.clone());
                    }
                    None => warn!(drug = %name, "Could not resolve drug name; skipping"),
                }
            }
            ids
        } else {
            refs.to_vec()
        };

        let mut results = BTreeMap::new();
        for id in ids {
            if results.contains_key(&id) {
                continue;
            }

            let record = match self.fetch_drug(&id).await {
                Ok(Some(record)) => Some(record),
                Ok(None) => {
                    warn!(drug_id = %id, "Drug not found");
                    None
                }
                Err(e) => {
                    warn!(drug_id = %id, error = %e, "Drug detail lookup failed");
                    None
                }
            };
            results.insert(id, record);
        }

        info!(count = results.len(), "Fetched drug details");
        results
    }
}
