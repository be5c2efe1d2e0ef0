//! Output formatter trait

use tnm_application::CaseRecord;

/// Trait for formatting staging results
pub trait OutputFormatter {
    /// Format the complete case record
    fn format(&self, record: &CaseRecord) -> String;

    /// Format records as JSON
    fn format_json(&self, records: &[&CaseRecord]) -> String;

    /// Format the decision only (concise output)
    fn format_summary(&self, record: &CaseRecord) -> String;
}
