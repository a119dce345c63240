//! Per-target safety and druggability lookups.
//!
//! Each fetcher sends one request per distinct identifier, in input order, and
//! records a [`TargetLookup`] for every identifier. A failing identifier is
//! captured as `TargetLookup::Failed`; the loop continues with the next one.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::graphql::OpenTargetsClient;
use crate::models::{
    ChemicalProbesRecord, PrioritisationRecord, SafetyRecord, TargetLookup, TractabilityRecord,
};
use crate::queries::{
    Operation, TARGET_CHEMICAL_PROBES, TARGET_PRIORITISATION, TARGET_SAFETY, TARGET_TRACTABILITY,
};

#[derive(Debug, Deserialize)]
struct TargetData<T> {
    target: Option<T>,
}

impl OpenTargetsClient {
    async fn fetch_per_target<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        target_ids: &[String],
    ) -> BTreeMap<String, TargetLookup<T>> {
        let mut results = BTreeMap::new();

        for target_id in target_ids {
            if results.contains_key(target_id) {
                continue;
            }

            let entry = match self
                .query::<TargetData<T>>(operation, json!({ "ensemblId": target_id }))
                .await
            {
                Ok(TargetData { target: Some(record) }) => TargetLookup::Found(record),
                Ok(TargetData { target: None }) => {
                    warn!(operation = operation.name, target = %target_id, "Target not found");
                    TargetLookup::Absent
                }
                Err(e) => {
                    warn!(operation = operation.name, target = %target_id, error = %e, "Target lookup failed");
                    TargetLookup::Failed { error: e.to_string() }
                }
            };
            results.insert(target_id.clone(), entry);
        }

        debug!(operation = operation.name, count = results.len(), "Per-target batch complete");
        results
    }

    /// Tractability assessments (modality, label, value) per target.
    #[instrument(skip(self, target_ids), fields(n = target_ids.len()))]
    pub async fn fetch_tractability(
        &self,
        target_ids: &[String],
    ) -> BTreeMap<String, TargetLookup<TractabilityRecord>> {
        self.fetch_per_target(&TARGET_TRACTABILITY, target_ids).await
    }

    /// Chemical probes with their quality scores per target.
    #[instrument(skip(self, target_ids), fields(n = target_ids.len()))]
    pub async fn fetch_chemical_probes(
        &self,
        target_ids: &[String],
    ) -> BTreeMap<String, TargetLookup<ChemicalProbesRecord>> {
        self.fetch_per_target(&TARGET_CHEMICAL_PROBES, target_ids).await
    }

    /// Prioritisation metrics (precedence, tractability, doability, safety) per target.
    #[instrument(skip(self, target_ids), fields(n = target_ids.len()))]
    pub async fn fetch_prioritisation(
        &self,
        target_ids: &[String],
    ) -> BTreeMap<String, TargetLookup<PrioritisationRecord>> {
        self.fetch_per_target(&TARGET_PRIORITISATION, target_ids).await
    }

    /// Safety liabilities with biosample, effect and study detail per target.
    #[instrument(skip(self, target_ids), fields(n = target_ids.len()))]
    pub async fn fetch_safety(
        &self,
        target_ids: &[String],
    ) -> BTreeMap<String, TargetLookup<SafetyRecord>> {
        self.fetch_per_target(&TARGET_SAFETY, target_ids).await
    }
}
