//! GraphQL plumbing for the Open Targets Platform.
//!
//! Request body: `{"query": ..., "variables": {...}}`, sent as an HTTPS POST.
//! A response carrying an `errors` field is a failure for that request even
//! when `data` is partially populated.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use otagent_common::sandbox::SandboxClient as Client;
use otagent_common::{OtError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::queries::Operation;

pub const OPEN_TARGETS_GRAPHQL_URL: &str = "https://api.platform.opentargets.org/api/v4/graphql";

/// Longest slice of a non-success response body kept in the error message.
const MAX_ERROR_BODY: usize = 512;

/// One GraphQL operation ready to be sent.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    #[serde(skip)]
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: Value,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(operation: &'a Operation, variables: Value) -> Self {
        Self {
            operation_name: operation.name,
            query: operation.document,
            variables,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

impl GraphQlResponse {
    /// Decode `data` into `T`. Any `errors` entry turns the whole response into
    /// [`OtError::Upstream`].
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(errors) = self.errors {
            let message = if errors.is_empty() {
                "response carried an empty errors list".to_string()
            } else {
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            return Err(OtError::Upstream(message));
        }

        match self.data {
            Some(data) if !data.is_null() => Ok(serde_json::from_value(data)?),
            _ => Err(OtError::Upstream(
                "response carried neither data nor errors".to_string(),
            )),
        }
    }
}

/// Sends a single GraphQL request and returns the raw response envelope.
///
/// Implemented by [`HttpTransport`] for the real endpoint; tests substitute a
/// canned transport.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn send(&self, request: &GraphQlRequest<'_>) -> Result<GraphQlResponse>;
}

/// HTTP transport over the sandboxed reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport for `endpoint`. The endpoint host is added to the
    /// sandbox allowlist.
    pub fn new(endpoint: &str, timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let mut client = Client::with_settings(timeout, user_agent)?;
        client.allow_url(endpoint)?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn send(&self, request: &GraphQlRequest<'_>) -> Result<GraphQlResponse> {
        let resp = self.client
            .post(&self.endpoint)?
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            // Validation failures come back as 400 with a regular errors envelope.
            if let Ok(parsed) = serde_json::from_str::<GraphQlResponse>(&body) {
                if parsed.errors.is_some() {
                    return Ok(parsed);
                }
            }
            return Err(OtError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Ok(resp.json::<GraphQlResponse>().await?)
    }
}

/// Open Targets Platform client. Cheap to clone; holds no per-call state.
#[derive(Clone)]
pub struct OpenTargetsClient {
    transport: Arc<dyn GraphQlTransport>,
}

impl OpenTargetsClient {
    /// Client for the public endpoint with a 30s timeout.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(OPEN_TARGETS_GRAPHQL_URL, Duration::from_secs(30), None)
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let transport = HttpTransport::new(endpoint, timeout, user_agent)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn GraphQlTransport>) -> Self {
        Self { transport }
    }

    /// Run one operation and decode its `data` payload.
    #[instrument(skip(self, operation, variables), fields(operation = operation.name))]
    pub(crate) async fn query<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
    ) -> Result<T> {
        let request = GraphQlRequest::new(operation, variables);
        debug!(variables = %request.variables, "Sending GraphQL request");
        self.transport.send(&request).await?.into_data()
    }
}

impl std::fmt::Debug for OpenTargetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenTargetsClient").finish_non_exhaustive()
    }
}

/// Deserialize a list that the remote schema may return as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
