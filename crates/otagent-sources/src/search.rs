//! Name → identifier resolution via the platform's full-text search.

use std::collections::{BTreeMap, HashSet};

use otagent_common::{OtError, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::graphql::{null_as_empty, OpenTargetsClient};
use crate::models::{SearchEntity, SearchHit};
use crate::queries::SEARCH_ENTITY;

#[derive(Debug, Deserialize)]
struct SearchData {
    search: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default, deserialize_with = "null_as_empty")]
    hits: Vec<SearchHit>,
}

impl OpenTargetsClient {
    /// Full-text search scoped to one entity family. Returns at most `size` hits
    /// in upstream rank order.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query_string: &str,
        entity: SearchEntity,
        size: usize,
    ) -> Result<Vec<SearchHit>> {
        let data: SearchData = self
            .query(
                &SEARCH_ENTITY,
                json!({
                    "queryString": query_string,
                    "entityNames": [entity.as_str()],
                    "size": size,
                }),
            )
            .await?;

        let mut hits = data.search.map(|s| s.hits).unwrap_or_default();
        hits.truncate(size);
        debug!(count = hits.len(), "Search returned hits");
        Ok(hits)
    }

    /// Resolve a free-text disease name to its EFO/MONDO identifier.
    ///
    /// The top search hit is trusted unconditionally. Zero hits or any upstream
    /// failure is reported as [`OtError::NotFound`].
    #[instrument(skip(self))]
    pub async fn resolve_disease(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OtError::NotFound("empty disease name".to_string()));
        }

        let hits = self
            .search(name, SearchEntity::Disease, 1)
            .await
            .map_err(|e| OtError::NotFound(format!("disease '{}': {}", name, e)))?;

        match hits.into_iter().next() {
            Some(hit) => {
                info!(disease = name, id = %hit.id, "Resolved disease");
                Ok(hit.id)
            }
            None => Err(OtError::NotFound(format!("no disease matches '{}'", name))),
        }
    }

    /// Search each unique drug name once and return up to `limit` hits per name.
    ///
    /// A failed or empty search yields an empty list for that name; the batch
    /// always carries one key per unique input name.
    #[instrument(skip(self, names), fields(n = names.len()))]
    pub async fn resolve_drugs(
        &self,
        names: &[String],
        limit: usize,
    ) -> BTreeMap<String, Vec<SearchHit>> {
        let mut results = BTreeMap::new();
        let mut seen = HashSet::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }

            let hits = match self.search(name, SearchEntity::Drug, limit).await {
                Ok(hits) if hits.is_empty() => {
                    warn!(drug = %name, "No search hits for drug name");
                    hits
                }
                Ok(hits) => hits,
                Err(e) => {
                    warn!(drug = %name, error = %e, "Drug search failed");
                    Vec::new()
                }
            };
            results.insert(name.clone(), hits);
        }

        results
    }
}
