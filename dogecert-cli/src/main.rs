// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  dogecert — push a TLS certificate to DogeCloud CDN
//
//  Flow:    read cert files → signed upload → bind id to each domain
//  Config:  YAML file / DOGECERT_* env / GitHub Actions inputs / flags
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod annotate;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dogecert_core::{ConfigOverrides, DeployConfig, DeployPolicy};
use dogecert_deploy::{DeployError, RunReport, run_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "dogecert",
    version,
    about = "Upload a certificate to DogeCloud and deploy it to CDN domains"
)]
struct Cli {
    /// Optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// DogeCloud access key
    #[arg(long)]
    access_key: Option<String>,

    /// DogeCloud secret key
    #[arg(long)]
    secret_key: Option<String>,

    /// PEM full-chain certificate file
    #[arg(long)]
    fullchain_file: Option<PathBuf>,

    /// PEM private key file
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Whitespace-separated CDN domains to deploy to; omit for upload only
    #[arg(long)]
    domains: Option<String>,

    /// API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Note attached to the uploaded certificate
    #[arg(long)]
    note: Option<String>,

    /// `best-effort` or `strict` (fail the run if any domain fails)
    #[arg(long)]
    deploy_policy: Option<DeployPolicy>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            fullchain_file: self.fullchain_file.clone(),
            key_file: self.key_file.clone(),
            domains: self.domains.clone(),
            api_base: self.api_base.clone(),
            timeout_secs: self.timeout_secs,
            note: self.note.clone(),
            deploy_policy: self.deploy_policy,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // ── Tracing ──
    init_tracing(&cli.log_level, cli.log_format);

    info!(version = env!("CARGO_PKG_VERSION"), "dogecert starting");

    // One run, network-bound: a current-thread runtime is plenty.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let result = runtime.block_on(run(&cli));
    let code = exit_code(&result);
    match result {
        Ok(report) => {
            info!(
                cert_id = %report.cert_id,
                deployed = report.succeeded().len(),
                failed = report.failed().len(),
                "dogecert finished"
            );
            for outcome in report.outcomes {
                if let Err(e) = outcome.result {
                    annotate::warning(&format!(
                        "Failed to deploy certificate to domain \"{}\": {}",
                        outcome.domain,
                        error_chain(e)
                    ));
                }
            }
        }
        Err(e) => {
            let message = error_chain(e);
            error!(error = %message, "dogecert failed");
            annotate::error(&message);
        }
    }
    Ok(ExitCode::from(code))
}

/// Process exit status for a finished run. The deploy policy has already been
/// applied, so any `Err` fails the job.
fn exit_code(result: &Result<RunReport, DeployError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// The error and all of its causes on one line: `outer: inner: root`.
fn error_chain<E>(e: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:#}", anyhow::Error::new(e))
}

async fn run(cli: &Cli) -> Result<RunReport, DeployError> {
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "Loading config file");
    }
    let config = DeployConfig::load(cli.config.as_deref(), &cli.overrides())?;
    run_config(&config).await
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
