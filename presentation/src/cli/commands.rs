//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tnm_domain::OutputFormat as DomainOutputFormat;

/// Output format for staging results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Decision, per-factor votes and every proposal
    Full,
    /// Label, consensus and disagreements per case
    Summary,
    /// Case records as JSON
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Summary => DomainOutputFormat::Summary,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for tnm-quorum
#[derive(Parser, Debug)]
#[command(name = "tnm-quorum")]
#[command(author, version, about = "Consensus TNM staging from multi-agent transcripts")]
#[command(long_about = r#"
tnm-quorum fuses the TNM staging proposals found in a multi-agent discussion
into one decision per case.

Each case goes through three stages:
1. Extraction: structured or free-text proposals are recovered from the transcript
2. Confidence: each proposal is scored against the case text and its peers
3. Voting: confidence-weighted majority vote per factor, with disagreement flags

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./tnm-quorum.toml      Project-level config
3. ~/.config/tnm-quorum/config.toml   Global config

Example:
  tnm-quorum cases/133166.json
  tnm-quorum -o json --by-role cases/*.json
  tnm-quorum --weight Pathologist=2.0 --case-text "3.2 cm mass" transcript.json
"#)]
pub struct Cli {
    /// Case files (JSON case object or bare transcript array)
    #[arg(value_name = "CASE_FILE", required_unless_present = "show_config")]
    pub cases: Vec<PathBuf>,

    /// Output format [default: summary]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Case text for files that carry none (e.g. bare transcripts)
    #[arg(long, value_name = "TEXT")]
    pub case_text: Option<String>,

    /// Explicit agent weight (can be specified multiple times)
    #[arg(long, value_name = "AGENT=W", value_parser = parse_weight)]
    pub weight: Vec<(String, f64)>,

    /// Give supervisor-role agents the supervisor weight
    #[arg(long)]
    pub by_role: bool,

    /// Write a JSONL audit trail to this path
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Maximum number of cases staged at once
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the header
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

/// Parse an `AGENT=WEIGHT` pair.
pub fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (agent, weight) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected AGENT=WEIGHT, got '{}'", s))?;
    let agent = agent.trim();
    if agent.is_empty() {
        return Err(format!("missing agent name in '{}'", s));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}' for {}", weight.trim(), agent))?;
    Ok((agent.to_string(), weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "tnm-quorum",
            "-o",
            "json",
            "--weight",
            "Pathologist=2",
            "--weight",
            "Radiologist = 0.5",
            "--by-role",
            "-vv",
            "a.json",
            "b.json",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(
            cli.weight,
            vec![
                ("Pathologist".to_string(), 2.0),
                ("Radiologist".to_string(), 0.5)
            ]
        );
        assert!(cli.by_role);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.cases.len(), 2);
    }

    #[test]
    fn test_case_file_required() {
        assert!(Cli::try_parse_from(["tnm-quorum"]).is_err());
        assert!(Cli::try_parse_from(["tnm-quorum", "--show-config"]).is_ok());
    }

    #[test]
    fn test_parse_weight_errors() {
        assert!(parse_weight("Pathologist").is_err());
        assert!(parse_weight("=2").is_err());
        assert!(parse_weight("A=heavy").is_err());
    }
}
