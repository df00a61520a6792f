use std::time::Duration;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use relay_gateway::config::NodesConfig;
use relay_gateway::health::HealthProbe;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the relay gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Path prefix the gateway serves its API under.
    #[arg(long, default_value = "/api")]
    prefix: String,

    /// Admin bearer token, when the gateway requires one.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active node and known candidates
    Status {
        /// Run a fresh selection scan first
        #[arg(long)]
        refresh: bool,
    },
    /// Register an additional candidate node
    AddNode { node_url: String },
    /// Probe a node's status endpoint directly
    Probe {
        node_url: String,
        #[arg(long, default_value_t = 5_000)]
        timeout_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}{}", cli.url.trim_end_matches('/'), cli.prefix);

    match cli.command {
        Commands::Status { refresh } => {
            let res = client
                .get(format!("{base}/node-status"))
                .query(&[("refresh", refresh)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::AddNode { node_url } => {
            let mut headers = HeaderMap::new();
            if let Some(key) = &cli.key {
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
            }
            let res = client
                .post(format!("{base}/add-node"))
                .headers(headers)
                .json(&json!({ "nodeUrl": node_url }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Probe { node_url, timeout_ms } => {
            let probe = HealthProbe::new(
                client,
                NodesConfig::default().status_path,
                Duration::from_millis(timeout_ms),
                concat!("gateway-cli/", env!("CARGO_PKG_VERSION")),
            );
            let result = probe.check(&node_url).await;
            let report = json!({
                "node": result.address,
                "reachable": result.reachable,
                "status": result.status,
                "latencyMs": result.latency.as_millis() as u64,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
