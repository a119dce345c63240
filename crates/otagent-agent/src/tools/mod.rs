//! Tool registration for the Open Targets agents.
//!
//! Every retrieval operation is wrapped in an `OpenTargetsTool` and registered
//! in a central `ToolRegistry`. The external agent runtime reads the manifest,
//! lets the model pick a tool, and calls back through `ToolRegistry::invoke`.
//!
//! Tool lifecycle:
//!   1. Implement `OpenTargetsTool` for your type.
//!   2. Register with `ToolRegistry::register`.
//!   3. The host invokes tools via `ToolRegistry::invoke(name, params)`.

pub mod data_steward_tool;
pub mod safety_tool;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use otagent_sources::OpenTargetsClient;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ToolsConfig;

// ─────────────────────────────────────────────
//  Core trait
// ─────────────────────────────────────────────

/// A callable tool exposed to the agent loop.
///
/// # Minimal contract
/// - `name()` must be unique across the registry (snake_case, e.g. `"get_target_drugs"`).
/// - `description()` is surfaced to the model as the tool docstring.
/// - `parameters_schema()` returns a JSON Schema object for the input.
/// - `invoke()` receives JSON params and returns JSON output.
#[async_trait]
pub trait OpenTargetsTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    /// Execute the tool. Batch tools report per-item failures inside the
    /// returned value; an `Err` means the whole call failed.
    async fn invoke(&self, params: Value) -> Result<Value>;

    /// Whether this tool requires human confirmation before running.
    fn requires_approval(&self) -> bool { false }

    /// Data classification of the tool's output.
    fn output_data_class(&self) -> &str { "PUBLIC" }
}

// ─────────────────────────────────────────────
//  Tool registry
// ─────────────────────────────────────────────

/// Central registry mapping tool names → trait objects.
/// Build once at startup, then share; cloning is cheap.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn OpenTargetsTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: BTreeMap::new() }
    }

    /// Register a tool. Panics if the name is already registered.
    pub fn register<T: OpenTargetsTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        assert!(
            !self.tools.contains_key(&name),
            "Duplicate tool name: {name}"
        );
        self.tools.insert(name, Arc::new(tool));
    }

    /// Invoke a registered tool by name.
    pub async fn invoke(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self.get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {name}"))?;

        tracing::info!(
            tool = name,
            requires_approval = tool.requires_approval(),
            data_class = tool.output_data_class(),
            "Invoking tool"
        );

        tool.invoke(params).await
    }

    /// JSON manifest entry for one tool.
    pub fn describe(&self, name: &str) -> Option<Value> {
        self.tools.get(name).map(|t| {
            serde_json::json!({
                "name": t.name(),
                "description": t.description(),
                "parameters": t.parameters_schema(),
                "requires_approval": t.requires_approval(),
                "output_data_class": t.output_data_class(),
            })
        })
    }

    /// All registered tools as a JSON array, sorted by name.
    pub fn manifest(&self) -> Value {
        let tools: Vec<Value> = self.tools.keys().filter_map(|name| self.describe(name)).collect();
        serde_json::json!({ "tools": tools })
    }

    pub fn len(&self) -> usize { self.tools.len() }

    pub fn contains(&self, name: &str) -> bool { self.tools.contains_key(name) }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OpenTargetsTool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}

/// Build the registry with every Open Targets tool.
pub fn build_default_registry(client: OpenTargetsClient, limits: &ToolsConfig) -> ToolRegistry {
    let mut reg = ToolRegistry::new();
    reg.register(data_steward_tool::SearchDiseaseTool::new(client.clone()));
    reg.register(data_steward_tool::DiseaseTargetsTool::new(client.clone(), limits.default_target_limit));
    reg.register(data_steward_tool::DiseaseAssociationsTool::new(client.clone(), limits.default_target_limit));
    reg.register(data_steward_tool::TargetDrugsTool::new(client.clone(), limits.default_drug_limit));
    reg.register(data_steward_tool::SearchDrugsTool::new(client.clone(), limits.drug_search_limit));
    reg.register(data_steward_tool::DrugsInfoTool::new(client.clone()));
    reg.register(safety_tool::TractabilityTool::new(client.clone()));
    reg.register(safety_tool::ChemicalProbesTool::new(client.clone()));
    reg.register(safety_tool::PrioritizationTool::new(client.clone()));
    reg.register(safety_tool::SafetyInformationTool::new(client));
    tracing::info!(
        tools = %reg.names().collect::<Vec<_>>().join(","),
        "ToolRegistry ready with {} tools",
        reg.len()
    );
    reg
}

/// Decode tool params into `T`; a missing params object counts as `{}`.
pub(crate) fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    let params = if params.is_null() { serde_json::json!({}) } else { params };
    serde_json::from_value(params)
        .map_err(|e| anyhow::anyhow!("Invalid parameters for {tool}: {e}"))
}

/// Resolve an optional `limit` param against the tool's default. Zero is rejected.
pub(crate) fn limit_or_default(tool: &str, limit: Option<usize>, default: usize) -> Result<usize> {
    match limit {
        Some(0) => anyhow::bail!("Invalid parameters for {tool}: limit must be at least 1"),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

// ─────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use otagent_sources::stub::StubTransport;

    struct EchoTool;

    #[async_trait]
    impl OpenTargetsTool for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes the input params back." }
        fn parameters_schema(&self) -> Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string" }
                },
                "required": ["message"]
            })
        }
        async fn invoke(&self, params: Value) -> Result<Value> {
            Ok(serde_json::json!({ "echo": params["message"] }))
        }
    }

    #[tokio::test]
    async fn test_registry_register_and_invoke() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool);
        assert_eq!(reg.len(), 1);

        let result = reg.invoke("echo", serde_json::json!({ "message": "hello" })).await.unwrap();
        assert_eq!(result["echo"], "hello");
    }

    #[tokio::test]
    async fn test_registry_unknown_tool_errors() {
        let reg = ToolRegistry::new();
        let err = reg.invoke("nonexistent", serde_json::json!({})).await;
        assert!(err.is_err());
        assert!(err.unwrap_err().to_string().contains("Unknown tool"));
    }

    #[test]
    #[should_panic(expected = "Duplicate tool name")]
    fn test_duplicate_registration_panics() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool);
        reg.register(EchoTool);
    }

    #[test]
    fn test_default_registry_manifest() {
        let client = OpenTargetsClient::with_transport(Arc::new(StubTransport::new()));
        let reg = build_default_registry(client, &ToolsConfig::default());

        let expected = [
            "get_disease_associations",
            "get_disease_targets",
            "get_drugs_info",
            "get_target_chemical_probes",
            "get_target_drugs",
            "get_target_prioritization",
            "get_target_safety_information",
            "get_target_tractability",
            "search_disease_by_name",
            "search_drugs_by_name",
        ];
        assert_eq!(reg.names().collect::<Vec<_>>(), expected);

        let manifest = reg.manifest();
        let tools = manifest["tools"].as_array().unwrap();
        assert_eq!(tools.len(), expected.len());
        for tool in tools {
            assert_eq!(tool["parameters"]["type"], "object", "{}", tool["name"]);
            assert!(tool["parameters"]["required"].is_array(), "{}", tool["name"]);
            assert_eq!(tool["output_data_class"], "PUBLIC");
        }
    }

    #[test]
    fn test_limit_zero_rejected() {
        assert_eq!(limit_or_default("t", None, 10).unwrap(), 10);
        assert_eq!(limit_or_default("t", Some(3), 10).unwrap(), 3);
        let err = limit_or_default("t", Some(0), 10).unwrap_err();
        assert!(err.to_string().starts_with("Invalid parameters for t"));
    }

    #[test]
    fn test_parse_params_treats_null_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct P {
            #[serde(default)]
            limit: Option<usize>,
        }
        let p: P = parse_params("t", Value::Null).unwrap();
        assert!(p.limit.is_none());
        assert!(parse_params::<P>("t", serde_json::json!({ "limit": "ten" })).is_err());
    }
}
