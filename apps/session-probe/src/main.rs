//! `session-probe`: bootstrap a clinic session and print the access decisions.
//!
//! Usage:
//!   session-probe [-c probe.yaml] [--location /records] [--require records.view]
//!                 [--login <token>] [--logout] [--json-logs]
//!
//! The report is printed to stdout as JSON; logs go to stderr.

mod config;
mod probe;

use std::path::PathBuf;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::ProbeConfig;
use probe::ProbeRequest;

#[derive(Parser, Debug)]
#[command(name = "session-probe", version, about = "Clinic session bootstrap probe")]
struct Cli {
    /// Path to a YAML config file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Location the gates are evaluated for.
    #[arg(long, default_value = "/")]
    location: String,

    /// Permissions required by the permission gate (any of).
    #[arg(long = "require", value_delimiter = ',')]
    require: Vec<String>,

    /// Render a restricted placeholder instead of nothing on denial.
    #[arg(long)]
    has_content: bool,

    /// Log in with this credential after the bootstrap.
    #[arg(long)]
    login: Option<String>,

    /// Log out after evaluating the gates.
    #[arg(long)]
    logout: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let config = ProbeConfig::load(cli.config.as_deref())?;
    let request = ProbeRequest {
        location: cli.location,
        required: cli.require,
        has_content: cli.has_content,
        login: cli.login.map(SecretString::from),
        logout: cli.logout,
    };

    let report = probe::run(&config, request).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
