//! Reconciles the deployments of one agent against the hub backend.
//!
//! Usage:
//!
//! ```text
//! agenthub-reconcile <agent-id>
//! ```
//!
//! Settings come from the environment (and a `.env` file when present); see
//! [`agenthub::config::AppConfig::from_env`]. The reconciled deployments are
//! written to stdout as a tab-separated table. A failed job listing exits
//! with an error; per-job failures are logged and summarised on stdout.

use agenthub::{
    config::AppConfig,
    deployment::{
        adapters::HttpBackendGateway,
        domain::AgentId,
        services::DeploymentReconciler,
        view::{ViewRow, failure_banner, project_report},
    },
    telemetry,
};
use mockable::DefaultClock;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

const TABLE_HEADER: &str =
    "job\tdeployment\tstatus\tbadge\tendpoint\tjob_status\tcreated_at\tfinished_at\tmethods";

fn main() -> Result<(), BoxError> {
    match dotenvy::dotenv() {
        Err(err) if !err.not_found() => return Err(err.into()),
        _ => {}
    }
    telemetry::init_tracing()?;

    let agent_id = parse_agent_id(env::args().skip(1))?;
    let config = AppConfig::from_env()?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    let gateway = HttpBackendGateway::new(
        config.api_url(),
        config.api_token(),
        config.request_timeout(),
    )?;
    let reconciler = DeploymentReconciler::new(Arc::new(gateway), Arc::new(DefaultClock))
        .with_max_in_flight(config.max_in_flight());

    let report = runtime
        .block_on(reconciler.reconcile(agent_id))
        .inspect_err(|err| tracing::error!(%agent_id, error = %err, "reconciliation failed"))?;

    let rows = project_report(&report, &config.view_options());
    let mut stdout = io::stdout().lock();
    write_table(&mut stdout, &rows).map_err(CliError::Output)?;
    if let Some(banner) = failure_banner(&report) {
        writeln!(stdout, "{banner}").map_err(CliError::Output)?;
    }
    Ok(())
}

fn parse_agent_id(mut args: impl Iterator<Item = String>) -> Result<AgentId, CliError> {
    let (Some(raw), None) = (args.next(), args.next()) else {
        return Err(CliError::InvalidArgs(
            "usage: agenthub-reconcile <agent-id>".to_owned(),
        ));
    };
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidArgs(format!("agent id '{raw}' is not a number")))?;
    AgentId::new(value).map_err(|err| CliError::InvalidArgs(err.to_string()))
}

fn write_table(out: &mut impl Write, rows: &[ViewRow]) -> io::Result<()> {
    writeln!(out, "{TABLE_HEADER}")?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.job_id,
            row.deployment_id,
            row.status,
            row.badge,
            row.endpoint,
            row.job_status.as_deref().unwrap_or("-"),
            row.created_at,
            row.finished_at,
            row.methods.join(", "),
        )?;
    }
    Ok(())
}
