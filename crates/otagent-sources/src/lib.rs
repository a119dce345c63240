//! otagent-sources — Open Targets Platform retrieval layer.
//!
//! Every operation is a thin mapping from a typed request to one GraphQL
//! request per item against `https://api.platform.opentargets.org/api/v4/graphql`:
//!   - search: disease / drug name resolution
//!   - disease: ranked disease–target associations
//!   - drug: known drugs per target, drug detail
//!   - target: tractability, chemical probes, prioritisation, safety liabilities
//!
//! Single-entity resolution fails fast with an [`OtError`]. Batch operations
//! never fail as a whole: each requested key maps to a value, an empty
//! collection, an absent marker or an error marker.

pub mod graphql;
pub mod queries;
pub mod models;
pub mod search;
pub mod disease;
pub mod drug;
pub mod target;

#[cfg(any(test, feature = "test-util"))]
pub mod stub;

pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse, GraphQlTransport, HttpTransport, OpenTargetsClient, OPEN_TARGETS_GRAPHQL_URL};
pub use models::*;
pub use otagent_common::{OtError, Result};
