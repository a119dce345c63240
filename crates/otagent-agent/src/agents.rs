//! Agent roster.
//!
//! Four personas share the Open Targets tools: a PI agent that scopes the
//! question and delegates, a data steward that retrieves, a biologist that
//! interprets and a safety agent that assesses risk. The roster is exported
//! as a JSON manifest for the runtime that hosts the model loop.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::{json, Value};

use crate::tools::ToolRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct AgentSpec {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
    pub sub_agents: Vec<String>,
}

impl AgentSpec {
    fn new(name: &str, model: &str, description: &str, instruction: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            description: description.to_string(),
            instruction: instruction.trim().to_string(),
            tools: Vec::new(),
            output_key: None,
            sub_agents: Vec::new(),
        }
    }

    fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    fn with_output_key(mut self, key: &str) -> Self {
        self.output_key = Some(key.to_string());
        self
    }

    fn with_sub_agents(mut self, agents: &[&str]) -> Self {
        self.sub_agents = agents.iter().map(|a| a.to_string()).collect();
        self
    }
}

const PI_INSTRUCTION: &str = r#"
You are the principal investigator coordinating a team of agents that work with
the Open Targets Platform.

- Answer general questions about the platform directly, without a workflow.
- When a question is ambiguous, ask clarifying questions and restate your
  understanding; wait for confirmation before planning.
- For a clear question, produce: the clarified question, context and
  assumptions, a step-by-step workflow naming the sub-agent for each step, and
  the expected outputs. End with "Shall we begin?".
- Delegate retrieval to data_steward, interpretation to biologist and risk
  assessment to safety_agent. Do not retrieve data yourself.
"#;

const DATA_STEWARD_INSTRUCTION: &str = r#"
You retrieve disease, target and drug data from the Open Targets Platform.

Always convert names to identifiers before other calls:
- disease names with search_disease_by_name (returns an EFO/MONDO id);
- drug names with search_drugs_by_name, or pass them to get_drugs_info with
  search_by_name=true.

Disease questions: resolve the disease, then get_disease_targets (or
get_disease_associations for per-datatype evidence), then optionally
get_target_drugs and get_drugs_info.
Target questions: call get_target_drugs with Ensembl ids, then get_drugs_info.
Drug questions: call get_drugs_info; results include maximum clinical trial
phase and mechanisms of action with their targets.

State your plan before calling tools. Report missing data plainly.
"#;

const BIOLOGIST_INSTRUCTION: &str = r#"
You are the domain expert in molecular biology, genetics and drug discovery.
Interpret targets, diseases and drugs found by the other agents: translate
association scores into biological meaning, explain mechanisms of action and
pathways, and flag inconsistencies or gaps in the evidence.

Report with four sections: Biological Summary (3-6 sentences), Mechanistic
Insights, Relevance to Question, Caveats or Uncertainties.
"#;

const SAFETY_INSTRUCTION: &str = r#"
You assess safety and tractability of therapeutic targets. Use
get_target_safety_information for known liabilities, get_target_tractability
for modality assessments, get_target_chemical_probes for probe quality and
get_target_prioritization for the precedence, tractability, doability and
safety factors.

Connect target to therapeutic risk in the disease context. Keep reports
concise and start them with a Safety Summary section.
"#;

pub fn pi_agent(model: &str) -> AgentSpec {
    AgentSpec::new(
        "PI_agent",
        model,
        "Oversees and coordinates the sub-agents working with the Open Targets Platform.",
        PI_INSTRUCTION,
    )
    .with_sub_agents(&["data_steward", "biologist", "safety_agent"])
}

pub fn data_steward_agent(model: &str) -> AgentSpec {
    AgentSpec::new(
        "data_steward",
        model,
        "Retrieves biomedical data from the Open Targets Platform: disease search, \
         disease-target associations with evidence scores, known drugs per target \
         and drug detail including mechanisms of action and clinical phases.",
        DATA_STEWARD_INSTRUCTION,
    )
    .with_tools(&[
        "search_disease_by_name",
        "get_disease_targets",
        "get_disease_associations",
        "get_target_drugs",
        "search_drugs_by_name",
        "get_drugs_info",
    ])
    .with_output_key("data_steward_output")
}

pub fn biologist_agent(model: &str) -> AgentSpec {
    AgentSpec::new(
        "biologist",
        model,
        "Biological interpretation and reasoning for biomedical data.",
        BIOLOGIST_INSTRUCTION,
    )
    .with_output_key("biologist_report")
}

pub fn safety_agent(model: &str) -> AgentSpec {
    AgentSpec::new(
        "safety_agent",
        model,
        "Safety assessment and risk analysis for therapeutic targets.",
        SAFETY_INSTRUCTION,
    )
    .with_tools(&[
        "get_target_tractability",
        "get_target_chemical_probes",
        "get_target_prioritization",
        "get_target_safety_information",
    ])
    .with_output_key("safety_agent_report")
}

/// The agent hierarchy, root first.
#[derive(Debug, Clone)]
pub struct AgentRoster {
    agents: Vec<AgentSpec>,
}

impl AgentRoster {
    pub fn new(agents: Vec<AgentSpec>) -> Self {
        Self { agents }
    }

    pub fn default_roster(model: &str) -> Self {
        Self::new(vec![
            pi_agent(model),
            data_steward_agent(model),
            biologist_agent(model),
            safety_agent(model),
        ])
    }

    pub fn root(&self) -> Option<&AgentSpec> {
        self.agents.first()
    }

    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }

    /// Every agent name is unique, every tool is registered and every
    /// sub-agent is part of the roster.
    pub fn validate(&self, registry: &ToolRegistry) -> Result<()> {
        if self.agents.is_empty() {
            bail!("Agent roster is empty");
        }
        for (i, agent) in self.agents.iter().enumerate() {
            if self.agents[..i].iter().any(|a| a.name == agent.name) {
                bail!("Duplicate agent name: {}", agent.name);
            }
            for tool in &agent.tools {
                if !registry.contains(tool) {
                    bail!("Agent {} references unknown tool: {}", agent.name, tool);
                }
            }
            for sub in &agent.sub_agents {
                if sub == &agent.name {
                    bail!("Agent {} lists itself as a sub-agent", agent.name);
                }
                if self.get(sub).is_none() {
                    bail!("Agent {} references unknown sub-agent: {}", agent.name, sub);
                }
            }
        }
        Ok(())
    }

    /// Roster as JSON with each tool's manifest entry inlined.
    pub fn manifest(&self, registry: &ToolRegistry) -> Result<Value> {
        self.validate(registry)?;

        let agents: Vec<Value> = self
            .agents()
            .iter()
            .map(|agent| -> Result<Value> {
                let mut entry = serde_json::to_value(agent)?;
                let tools: Vec<Value> = agent
                    .tools
                    .iter()
                    .filter_map(|t| registry.describe(t))
                    .collect();
                entry["tools"] = Value::Array(tools);
                Ok(entry)
            })
            .collect::<Result<_>>()?;

        let root = self.root().map(|a| a.name.as_str());
        Ok(json!({ "root": root, "agents": agents }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolsConfig;
    use crate::tools::build_default_registry;
    use otagent_sources::stub::StubTransport;
    use otagent_sources::OpenTargetsClient;
    use std::sync::Arc;

    fn registry() -> ToolRegistry {
        let client = OpenTargetsClient::with_transport(Arc::new(StubTransport::new()));
        build_default_registry(client, &ToolsConfig::default())
    }

    #[test]
    fn test_default_roster_is_valid() {
        let roster = AgentRoster::default_roster("gemini-2.5-pro");
        roster.validate(&registry()).unwrap();
        assert_eq!(roster.root().unwrap().name, "PI_agent");
        assert_eq!(roster.agents().len(), 4);
    }

    #[test]
    fn test_every_tool_is_owned_by_an_agent() {
        let reg = registry();
        let roster = AgentRoster::default_roster("m");
        for name in reg.names() {
            assert!(
                roster.agents().iter().any(|a| a.tools.iter().any(|t| t == name)),
                "{name} has no owning agent"
            );
        }
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let roster = AgentRoster::new(vec![
            AgentSpec::new("a", "m", "d", "i").with_tools(&["not_a_tool"]),
        ]);
        let err = roster.validate(&registry()).unwrap_err();
        assert!(err.to_string().contains("not_a_tool"));
    }

    #[test]
    fn test_unknown_sub_agent_rejected() {
        let roster = AgentRoster::new(vec![
            AgentSpec::new("root", "m", "d", "i").with_sub_agents(&["ghost"]),
        ]);
        let err = roster.validate(&registry()).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let roster = AgentRoster::new(vec![biologist_agent("m"), biologist_agent("m")]);
        assert!(roster.validate(&registry()).is_err());
    }

    #[test]
    fn test_manifest_inlines_tool_schemas() {
        let manifest = AgentRoster::default_roster("gemini-2.5-pro")
            .manifest(&registry())
            .unwrap();

        assert_eq!(manifest["root"], "PI_agent");
        let steward = manifest["agents"]
            .as_array()
            .unwrap()
            .iter()
            .find(|a| a["name"] == "data_steward")
            .unwrap();
        assert_eq!(steward["model"], "gemini-2.5-pro");
        assert_eq!(steward["output_key"], "data_steward_output");
        assert_eq!(steward["tools"][0]["name"], "search_disease_by_name");
        assert_eq!(
            steward["tools"][0]["parameters"]["required"],
            json!(["disease_name"])
        );

        let pi = &manifest["agents"][0];
        assert!(pi.get("output_key").is_none());
        assert_eq!(pi["sub_agents"], json!(["data_steward", "biologist", "safety_agent"]));
    }
}
