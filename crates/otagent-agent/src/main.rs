//! otagent — Open Targets data-retrieval tools for a multi-agent assistant.
//! Entry point for the tool host binary.

mod agents;
mod config;
mod host;
mod tools;

use anyhow::Context;
use clap::{Parser, Subcommand};
use otagent_sources::OpenTargetsClient;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "otagent", version, about = "Open Targets tool host and agent manifest.")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, env = "OTAGENT_CONFIG", default_value = "otagent.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tool manifest (names, descriptions, JSON parameter schemas).
    Tools,
    /// Print the agent roster with each agent's tools inlined.
    Agents,
    /// Invoke one tool and print its JSON output.
    Call {
        tool: String,
        /// Tool parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Serve JSON-line tool requests on stdin, one response line per request on stdout.
    Serve,
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (config, config_err) = match config::Config::load_from(&cli.config) {
        Ok(c) => (c, None),
        Err(e) => (config::Config::default(), Some(e)),
    };

    // stdout carries tool output only
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    if let Some(e) = config_err {
        tracing::warn!("Could not load {}: {e:#}", cli.config);
        tracing::warn!("Using built-in defaults.");
    }

    info!("otagent {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        endpoint = %config.opentargets.endpoint,
        timeout_secs = config.opentargets.timeout_secs,
        "Open Targets client configured"
    );

    let client = OpenTargetsClient::with_endpoint(
        &config.opentargets.endpoint,
        config.opentargets.timeout(),
        Some(config.opentargets.user_agent.as_str()),
    )
    .context("Failed to build Open Targets client")?;

    let registry = tools::build_default_registry(client, &config.tools);

    match cli.command {
        Command::Tools => print_json(&registry.manifest())?,
        Command::Agents => {
            let roster = agents::AgentRoster::default_roster(&config.agents.model);
            print_json(&roster.manifest(&registry)?)?;
        }
        Command::Call { tool, params } => {
            let params: Value = serde_json::from_str(&params)
                .with_context(|| format!("--params is not valid JSON: {params}"))?;
            let output = registry.invoke(&tool, params).await?;
            print_json(&output)?;
        }
        Command::Serve => {
            agents::AgentRoster::default_roster(&config.agents.model).validate(&registry)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            host::serve(&registry, stdin, tokio::io::stdout()).await?;
        }
    }

    Ok(())
}
