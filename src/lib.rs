//! atxp-agent: prompt in, tool-augmented model response out.
//!
//! One sequential pass: validate the CLI prompt and the `ATXP_CONNECTION`
//! credential, open a tool session per service, merge the discovered tool
//! catalogs, run a single generation against the ATXP LLM gateway with those
//! tools attached, and print the full report as indented JSON on stdout.

pub mod account;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod generate;
pub mod mcp;
pub mod service;

use std::env;

use log::{debug, info};

use account::Account;
use catalog::ToolCatalog;
use config::Config;
use error::Result;
use gateway::GatewayClient;
use mcp::ToolSession;
use service::Service;

pub async fn run() -> Result<()> {
    let prompt = cli::parse_prompt(env::args())?;
    let config = Config::from_env()?;

    let account = Account::parse(&config.connection)?;
    let gateway = GatewayClient::new(config.connection.clone());

    // Catalogs load sequentially in fixed order; any failure fails the run.
    let mut catalog = ToolCatalog::new();
    let mut sessions = Vec::new();
    for service in Service::ALL {
        let mut session = ToolSession::connect(service.endpoint(), &account).await?;
        let tools = session.list_tools().await?;
        info!("Loaded {} tools from the {} service", tools.len(), service);
        catalog.extend(service, tools);
        sessions.push((service, session));
    }
    debug!("Merged catalog holds {} tools", catalog.len());

    let report = generate::run_generation(&gateway, &catalog, &mut sessions, &prompt).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
