use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::cli::{Command, HttpCommand};
use crate::discovery::DetectorChain;
use crate::error::{Result, SandboxError};
use crate::sandbox::NetworkFacade;

/// Outcome of one command, ready for the output writer.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub operation: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub result: serde_json::Value,
    /// Single-line or multi-line text for human output.
    #[serde(skip)]
    pub summary: String,
}

impl Report {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

fn pretty(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn parse_body(raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw)
        .map_err(|e| SandboxError::InvalidInput(format!("request body is not valid JSON: {}", e)))
}

pub async fn execute(command: &Command, facade: &dyn NetworkFacade) -> Result<Report> {
    let operation = command.operation();
    let started_at = Utc::now();
    info!(operation, "running");

    let (result, summary) = match command {
        Command::Http { request: HttpCommand::Get { url } } => {
            let response = facade.http_get(url).await?;
            let data = response.data();
            let summary = pretty(&data)?;
            (serde_json::to_value(&response)?, summary)
        }
        Command::Http { request: HttpCommand::Post { url, body } } => {
            let body = parse_body(body)?;
            let response = facade.http_post(url, body).await?;
            let data = response.data();
            let summary = pretty(&data)?;
            (serde_json::to_value(&response)?, summary)
        }
        Command::Dns { domain } => {
            let resolved = facade.dns_lookup(domain).await?;
            let summary = format!("{} → {}", resolved.domain, resolved.address);
            (serde_json::to_value(&resolved)?, summary)
        }
        Command::Geo { address } => {
            let geo = facade.geo_lookup(address).await?;
            let summary = format!("{}: {}", address, geo);
            (serde_json::to_value(&geo)?, summary)
        }
        Command::Ping { host, count } => {
            let ping = facade.ping_test(host, *count).await?;
            let value = serde_json::to_value(&ping)?;
            let summary = pretty(&value)?;
            (value, summary)
        }
        Command::Identify { port, banner } => {
            let identified = facade.identify_service(*port, banner).await?;
            let summary = format!("Port {}: {}", port, identified);
            (serde_json::to_value(&identified)?, summary)
        }
        Command::Fingerprint { port, banner } => {
            let service = DetectorChain::new().identify(*port, banner);
            let summary = format!("Port {}: {}", port, service);
            let value = serde_json::json!({"port": port, "banner": banner, "service": service});
            (value, summary)
        }
        Command::Demo { scenario, show_code } => {
            let (key, text) = if *show_code {
                ("code", scenario.reference_code().to_string())
            } else {
                ("output", scenario.run(facade).await?)
            };
            let value = serde_json::json!({"scenario": scenario, key: text});
            (value, text)
        }
    };

    Ok(Report {
        operation,
        started_at,
        finished_at: Utc::now(),
        result,
        summary,
    })
}
