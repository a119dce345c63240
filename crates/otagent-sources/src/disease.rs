//! Disease → target associations.

use otagent_common::{OtError, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::graphql::{null_as_empty, OpenTargetsClient};
use crate::models::{AssociationRecord, DatatypeScore};
use crate::queries::DISEASE_ASSOCIATED_TARGETS;

#[derive(Debug, Deserialize)]
struct DiseaseData {
    disease: Option<DiseaseNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiseaseNode {
    associated_targets: Option<AssociatedTargets>,
}

#[derive(Debug, Deserialize)]
struct AssociatedTargets {
    #[serde(default, deserialize_with = "null_as_empty")]
    rows: Vec<AssociatedTargetRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssociatedTargetRow {
    target: Option<TargetRef>,
    score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    datatype_scores: Vec<DatatypeScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetRef {
    id: Option<String>,
    approved_symbol: Option<String>,
}

impl From<AssociatedTargetRow> for AssociationRecord {
    fn from(row: AssociatedTargetRow) -> Self {
        let (target_id, approved_symbol) = match row.target {
            Some(t) => (t.id.unwrap_or_default(), t.approved_symbol.unwrap_or_default()),
            None => (String::new(), String::new()),
        };
        AssociationRecord {
            target_id,
            approved_symbol,
            score: row.score.unwrap_or(0.0),
            datatype_scores: row.datatype_scores,
        }
    }
}

impl OpenTargetsClient {
    /// Up to `limit` associations for `disease_id`, highest score first.
    ///
    /// Ties keep upstream order. An unknown disease is [`OtError::NotFound`],
    /// never an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_associations(
        &self,
        disease_id: &str,
        limit: usize,
    ) -> Result<Vec<AssociationRecord>> {
        let data: DiseaseData = self
            .query(
                &DISEASE_ASSOCIATED_TARGETS,
                json!({ "efoId": disease_id, "size": limit }),
            )
            .await?;

        let disease = data
            .disease
            .ok_or_else(|| OtError::NotFound(format!("disease '{}'", disease_id)))?;

        let mut records: Vec<AssociationRecord> = disease
            .associated_targets
            .map(|a| a.rows)
            .unwrap_or_default()
            .into_iter()
            .map(AssociationRecord::from)
            .collect();

        // sort_by is stable
        records.sort_by(|a, b| b.score.total_cmp(&a.score));
        records.truncate(limit);

        info!(disease = disease_id, count = records.len(), "Fetched disease associations");
        Ok(records)
    }

    /// Target identifiers associated with `disease_id`, highest score first.
    ///
    /// With `symbol_mode` the approved gene symbols are returned instead of
    /// Ensembl ids. Missing fields come back as empty strings.
    pub async fn fetch_targets_for_disease(
        &self,
        disease_id: &str,
        limit: usize,
        symbol_mode: bool,
    ) -> Result<Vec<String>> {
        let records = self.fetch_associations(disease_id, limit).await?;
        Ok(records
            .into_iter()
            .map(|r| if symbol_mode { r.approved_symbol } else { r.target_id })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{StubReply, StubTransport};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn asthma_rows() -> StubReply {
        StubReply::Data(json!({
            "disease": {
                "id": "MONDO_0004979",
                "name": "asthma",
                "associatedTargets": {
                    "count": 4,
                    "rows": [
                        { "target": { "id": "ENSG00000113302", "approvedSymbol": "IL12B" }, "score": 0.61,
                          "datatypeScores": [{ "id": "genetic_association", "score": 0.6 }] },
                        { "target": { "id": "ENSG00000113520", "approvedSymbol": "IL4" }, "score": 0.72,
                          "datatypeScores": [] },
                        { "target": { "id": "ENSG00000169194", "approvedSymbol": "IL13" }, "score": 0.72,
                          "datatypeScores": null },
                        { "target": { "id": "ENSG00000113525", "approvedSymbol": null }, "score": 0.55,
                          "datatypeScores": [] }
                    ]
                }
            }
        }))
    }

    fn client(reply: StubReply, size: usize) -> OpenTargetsClient {
        let stub = StubTransport::new().on(
            "DiseaseAssociatedTargets",
            json!({ "efoId": "MONDO_0004979", "size": size }),
            reply,
        );
        OpenTargetsClient::with_transport(Arc::new(stub))
    }

    #[tokio::test]
    async fn test_sorted_by_score_with_stable_ties() {
        let client = client(asthma_rows(), 4);
        let ids = client.fetch_targets_for_disease("MONDO_0004979", 4, false).await.unwrap();
        assert_eq!(
            ids,
            vec!["ENSG00000113520", "ENSG00000169194", "ENSG00000113302", "ENSG00000113525"]
        );
    }

    #[tokio::test]
    async fn test_symbol_mode_maps_missing_to_empty() {
        let client = client(asthma_rows(), 4);
        let symbols = client.fetch_targets_for_disease("MONDO_0004979", 4, true).await.unwrap();
        assert_eq!(symbols, vec!["IL4", "IL13", "IL12B", ""]);
    }

    #[tokio::test]
    async fn test_limit_is_respected() {
        let client = client(asthma_rows(), 2);
        let ids = client.fetch_targets_for_disease("MONDO_0004979", 2, false).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], "ENSG00000113520");
    }

    #[tokio::test]
    async fn test_associations_keep_datatype_scores() {
        let client = client(asthma_rows(), 4);
        let records = client.fetch_associations("MONDO_0004979", 4).await.unwrap();
        let il12b = records.iter().find(|r| r.approved_symbol == "IL12B").unwrap();
        assert_eq!(il12b.datatype_scores[0].id, "genetic_association");
        assert!(records.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_unknown_disease_is_not_found() {
        let client = client(StubReply::Data(json!({ "disease": null })), 10);
        let err = client.fetch_targets_for_disease("MONDO_0004979", 10, false).await.unwrap_err();
        assert!(matches!(err, OtError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_upstream_errors_propagate() {
        let client = client(StubReply::Errors(vec!["Invalid efoId".to_string()]), 10);
        let err = client.fetch_associations("MONDO_0004979", 10).await.unwrap_err();
        assert!(matches!(err, OtError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let client = client(asthma_rows(), 4);
        let first = client.fetch_associations("MONDO_0004979", 4).await.unwrap();
        let second = client.fetch_associations("MONDO_0004979", 4).await.unwrap();
        assert_eq!(first, second);
    }
}
