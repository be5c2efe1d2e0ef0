//! CLI entrypoint for tnm-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use tnm_application::{
    AuditLogger, NoAuditLogger, StageBatchUseCase, StageCaseUseCase, StagingConfig,
};
use tnm_domain::{OutputFormat, UnlistedAgentWeight};
use tnm_infrastructure::{ConfigLoader, FileConfig, JsonCaseLoader, JsonlAuditLogger};
use tnm_presentation::{Cli, ConsoleFormatter};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tnm-quorum");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", file_config.to_toml()?);
        return Ok(());
    }

    file_config.validate()?;
    if !file_config.output.color {
        colored::control::set_override(false);
    }

    let staging = staging_config(&cli, &file_config)?;
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(file_config.output.format)
        .unwrap_or_default();

    let mut batch_params = file_config.batch_params();
    if let Some(jobs) = cli.jobs {
        batch_params = batch_params.with_max_concurrent_cases(jobs);
    }

    // === Dependency Injection ===
    let audit: Arc<dyn AuditLogger> = match cli
        .audit_log
        .clone()
        .or_else(|| file_config.output.audit_log.as_ref().map(Into::into))
    {
        Some(path) => Arc::new(
            JsonlAuditLogger::open(&path)
                .with_context(|| format!("Could not open audit log {}", path.display()))?,
        ),
        None => Arc::new(NoAuditLogger),
    };

    let pipeline = Arc::new(staging.build_pipeline()?);
    let stage = Arc::new(StageCaseUseCase::new(pipeline).with_audit_logger(audit));

    let mut loader = JsonCaseLoader::new();
    if let Some(text) = &cli.case_text {
        loader = loader.with_fallback_case_text(text.clone());
    }

    let use_case = StageBatchUseCase::new(Arc::new(loader), stage).with_params(batch_params);

    let sources: Vec<String> = cli
        .cases
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    // Print header
    if !cli.quiet && format != OutputFormat::Json {
        println!("{}", ConsoleFormatter::banner(sources.len()));
    }

    let report = use_case.execute(&sources).await;

    // Output results
    match format {
        OutputFormat::Json => {
            let records: Vec<_> = report.succeeded().collect();
            println!("{}", ConsoleFormatter::format_json(&records));
        }
        OutputFormat::Full => {
            for record in report.succeeded() {
                println!("{}", ConsoleFormatter::format(record));
            }
        }
        OutputFormat::Summary => {
            for record in report.succeeded() {
                println!("{}", ConsoleFormatter::format_summary(record));
            }
        }
    }

    for (source, error) in report.failed() {
        eprintln!("{}", ConsoleFormatter::failure(source, error));
    }

    if report.has_failures() {
        bail!(
            "{} of {} cases failed",
            report.failure_count(),
            report.outcomes.len()
        );
    }

    Ok(())
}

/// Merge CLI weight overrides into the file configuration.
fn staging_config(cli: &Cli, file_config: &FileConfig) -> Result<StagingConfig> {
    let mut weights = file_config.voting.clone();
    if cli.by_role {
        weights = weights.with_unlisted(UnlistedAgentWeight::ByRole);
    }
    for (agent, weight) in &cli.weight {
        weights = weights.with_agent_weight(agent.clone(), *weight)?;
    }
    Ok(file_config.staging_config().with_weights(weights))
}
