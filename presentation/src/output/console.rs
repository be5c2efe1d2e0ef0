//! Console output formatter for case records

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use tnm_application::CaseRecord;
use tnm_domain::util::truncate_chars;
use tnm_domain::{ConfidenceLevel, Factor, Proposal, ProposalSource};

const SUMMARY_RATIONALE_CHARS: usize = 200;

/// Formats case records for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete case record
    pub fn format(record: &CaseRecord) -> String {
        let result = &record.result;
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Case {}", record.case_id)));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Type:".cyan().bold(),
            record.case_type
        ));
        if let Some(name) = &record.case_name {
            output.push_str(&format!("{} {}\n", "Reference:".cyan().bold(), name));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Decision:".cyan().bold(),
            result.label.bold()
        ));
        output.push_str(&format!(
            "{} {:.3} ({} proposals)\n",
            "Consensus:".cyan().bold(),
            result.consensus_score,
            result.num_proposals
        ));

        // Per-factor breakdown
        output.push_str(&Self::section_header("Factors"));
        for factor in Factor::ALL {
            let votes = result
                .vote_distribution
                .get(factor)
                .iter()
                .map(|(value, weight)| format!("{}{}={:.2}", factor.letter(), value, weight))
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!(
                "  {}{}  consensus {:.3}  confidence {}  votes [{}]\n",
                factor.letter().to_string().bold(),
                result.value(factor),
                result.factor_consensus.get(factor),
                Self::level(*result.aggregated_confidence.get(factor)),
                votes
            ));
        }

        // Disagreements
        output.push_str(&Self::section_header("Areas of Disagreement"));
        if result.has_disagreement() {
            for entry in &result.disagreements {
                output.push_str(&format!("  * {}\n", entry.yellow()));
            }
        } else {
            output.push_str(&format!("  {}\n", "None".green()));
        }

        // Proposals
        output.push_str(&Self::section_header("Proposals"));
        for proposal in &result.proposals {
            output.push_str(&Self::proposal_line(proposal));
        }

        // Rationale
        if !record.rationale.is_empty() {
            output.push_str(&Self::section_header("Rationale"));
            output.push_str(&Self::indent(&record.rationale, "  "));
            output.push('\n');
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format records as JSON
    pub fn format_json(records: &[&CaseRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format the decision only (concise output)
    pub fn format_summary(record: &CaseRecord) -> String {
        let result = &record.result;
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}  {:.3}\n",
            format!("{}:", record.case_id).cyan().bold(),
            result.label.bold(),
            result.consensus_score
        ));

        let disagreement = if result.has_disagreement() {
            record.areas_of_disagreement.yellow()
        } else {
            record.areas_of_disagreement.green()
        };
        output.push_str(&format!("  {} {}\n", "Disagreement:".dimmed(), disagreement));

        if !record.rationale.is_empty() {
            let rationale = truncate_chars(&record.rationale, SUMMARY_RATIONALE_CHARS);
            let ellipsis = if rationale.len() < record.rationale.len() {
                "..."
            } else {
                ""
            };
            output.push_str(&format!(
                "  {} {}{}\n",
                "Rationale:".dimmed(),
                rationale.replace('\n', " "),
                ellipsis
            ));
        }

        output
    }

    /// Banner printed once before the records
    pub fn banner(cases: usize) -> String {
        format!(
            "{} {} case(s)\n",
            "=== TNM Consensus Staging ===".cyan().bold(),
            cases
        )
    }

    /// One line per failed case, for stderr
    pub fn failure(source: &str, error: &dyn std::fmt::Display) -> String {
        format!("{} {}: {}", "Error:".red().bold(), source, error)
    }

    fn proposal_line(proposal: &Proposal) -> String {
        let source = match proposal.source {
            ProposalSource::Structured => "structured",
            ProposalSource::Inferred => "inferred",
        };
        let confidence = Factor::ALL
            .iter()
            .map(|f| format!("{}:{}", f.letter(), proposal.combined(*f).as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "  #{:<3} {:<20} {}  ({}, {})  [{}]\n",
            proposal.message_index,
            truncate_chars(&proposal.agent, 20),
            proposal.label.yellow(),
            proposal.role,
            source,
            confidence
        )
    }

    fn level(level: ConfidenceLevel) -> ColoredString {
        match level {
            ConfidenceLevel::High => level.as_str().green(),
            ConfidenceLevel::Medium => level.as_str().normal(),
            ConfidenceLevel::Low => level.as_str().red(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, record: &CaseRecord) -> String {
        Self::format(record)
    }

    fn format_json(&self, records: &[&CaseRecord]) -> String {
        Self::format_json(records)
    }

    fn format_summary(&self, record: &CaseRecord) -> String {
        Self::format_summary(record)
    }
}
