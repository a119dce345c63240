//! Configuration loading for otagent.
//! Reads otagent.toml, or the file named by --config / OTAGENT_CONFIG.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub opentargets: OpenTargetsConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTargetsConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint()     -> String { otagent_sources::OPEN_TARGETS_GRAPHQL_URL.to_string() }
fn default_timeout_secs() -> u64    { 30 }
fn default_user_agent()   -> String { format!("otagent/{}", env!("CARGO_PKG_VERSION")) }

impl Default for OpenTargetsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl OpenTargetsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_limit")]
    pub default_target_limit: usize,
    #[serde(default = "default_limit")]
    pub default_drug_limit: usize,
    #[serde(default = "default_drug_search_limit")]
    pub drug_search_limit: usize,
}

fn default_limit()             -> usize { 10 }
fn default_drug_search_limit() -> usize { 5 }

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            default_target_limit: default_limit(),
            default_drug_limit: default_limit(),
            drug_search_limit: default_drug_search_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String { "gemini-2.5-pro".to_string() }

impl Default for AgentsConfig {
    fn default() -> Self {
        Self { model: default_model() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String { "otagent=info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

mod tests;

impl Config {
    /// Load configuration from `path`; the binary resolves it from
    /// `--config`, then OTAGENT_CONFIG, then `otagent.toml`.
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy otagent.example.toml to otagent.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.opentargets.timeout_secs == 0 {
            anyhow::bail!("opentargets.timeout_secs must be greater than zero");
        }
        if self.tools.default_target_limit == 0
            || self.tools.default_drug_limit == 0
            || self.tools.drug_search_limit == 0
        {
            anyhow::bail!("tool limits must be greater than zero");
        }
        Ok(())
    }
}
