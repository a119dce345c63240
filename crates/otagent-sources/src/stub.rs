//! Canned [`GraphQlTransport`] for tests.
//!
//! Replies are matched on operation name plus exact variables. Every request is
//! recorded, so tests can assert how many calls an operation issued.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use otagent_common::{OtError, Result};
use serde_json::Value;

use crate::graphql::{GraphQlError, GraphQlRequest, GraphQlResponse, GraphQlTransport};

#[derive(Debug, Clone)]
pub enum StubReply {
    /// `{"data": ...}`
    Data(Value),
    /// `{"errors": [{"message": ...}, ...]}`
    Errors(Vec<String>),
    /// Transport-level failure with this HTTP status.
    HttpStatus(u16),
}

#[derive(Debug, Default)]
pub struct StubTransport {
    routes: Vec<(String, Value, StubReply)>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reply for `operation` called with exactly `variables`.
    pub fn on(mut self, operation: &str, variables: Value, reply: StubReply) -> Self {
        self.routes.push((operation.to_string(), variables, reply));
        self
    }

    /// Every request received so far, as `(operation, variables)`.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(op, _)| op == operation)
            .count()
    }
}

#[async_trait]
impl GraphQlTransport for StubTransport {
    async fn send(&self, request: &GraphQlRequest<'_>) -> Result<GraphQlResponse> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((request.operation_name.to_string(), request.variables.clone()));

        let reply = self
            .routes
            .iter()
            .find(|(op, vars, _)| op == request.operation_name && *vars == request.variables)
            .map(|(_, _, reply)| reply.clone())
            .ok_or_else(|| {
                OtError::Other(anyhow::anyhow!(
                    "no stub for {} with {}",
                    request.operation_name,
                    request.variables
                ))
            })?;

        match reply {
            StubReply::Data(data) => Ok(GraphQlResponse { data: Some(data), errors: None }),
            StubReply::Errors(messages) => Ok(GraphQlResponse {
                data: None,
                errors: Some(
                    messages
                        .into_iter()
                        .map(|message| GraphQlError { message, path: None })
                        .collect(),
                ),
            }),
            StubReply::HttpStatus(status) => Err(OtError::HttpStatus {
                status,
                body: String::new(),
            }),
        }
    }
}
