//! JSON case file adapter.
//!
//! Accepts either a case object (with the legacy dataset key aliases) or a
//! bare transcript array.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tnm_application::{CaseLoader, CaseLoaderError, StageCaseInput};
use tnm_domain::TranscriptMessage;
use tracing::debug;

/// On-disk case object
#[derive(Debug, Deserialize)]
struct CaseFile {
    #[serde(default, alias = "Case URL", alias = "case_crl")]
    case_id: Option<Value>,
    #[serde(default, alias = "Type")]
    case_type: Option<String>,
    #[serde(default, alias = "Final Name")]
    case_name: Option<String>,
    #[serde(default, alias = "Initial Presentation", alias = "case_text")]
    presentation: Option<String>,
    #[serde(default, alias = "chat_history")]
    transcript: Option<Vec<TranscriptMessage>>,
}

impl CaseFile {
    /// True when no recognized key was present (e.g. `{}` or a dataset file).
    fn is_unrecognized(&self) -> bool {
        self.transcript.is_none()
            && self.case_id.is_none()
            && self.case_type.is_none()
            && self.case_name.is_none()
            && self.presentation.is_none()
    }
}

// Transcript first: derived structs also accept sequences.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CaseDocument {
    Transcript(Vec<TranscriptMessage>),
    Case(CaseFile),
}

/// Loads cases from JSON files on disk.
#[derive(Debug, Clone, Default)]
pub struct JsonCaseLoader {
    fallback_case_text: Option<String>,
}

impl JsonCaseLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case text used for files that carry none (e.g. bare transcripts).
    pub fn with_fallback_case_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_case_text = Some(text.into());
        self
    }

    /// Parse a case document. `source` names it in errors and supplies the
    /// default case id (its file stem).
    pub fn parse(&self, source: &str, json: &str) -> Result<StageCaseInput, CaseLoaderError> {
        let document: CaseDocument =
            serde_json::from_str(json).map_err(|e| CaseLoaderError::Parse {
                source_name: source.to_string(),
                message: e.to_string(),
            })?;

        let default_id = Path::new(source)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());

        let (mut input, case_text) = match document {
            CaseDocument::Transcript(transcript) => {
                (StageCaseInput::new(default_id, transcript), None)
            }
            CaseDocument::Case(case) if case.is_unrecognized() => {
                return Err(CaseLoaderError::Parse {
                    source_name: source.to_string(),
                    message: "no transcript or case fields found".to_string(),
                });
            }
            CaseDocument::Case(case) => {
                let case_id = case.case_id.as_ref().and_then(id_string).unwrap_or(default_id);
                let transcript = case.transcript.unwrap_or_default();
                let mut input = StageCaseInput::new(case_id, transcript);
                if let Some(case_type) = case.case_type.filter(|t| !t.trim().is_empty()) {
                    input = input.with_case_type(case_type);
                }
                if let Some(name) = case.case_name {
                    input = input.with_case_name(name);
                }
                (input, case.presentation)
            }
        };

        if let Some(text) = case_text.or_else(|| self.fallback_case_text.clone()) {
            input = input.with_case_text(text);
        }

        debug!(
            "Loaded case {} from {} ({} messages)",
            input.case_id,
            source,
            input.transcript.len()
        );
        Ok(input)
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl CaseLoader for JsonCaseLoader {
    async fn load(&self, source: &str) -> Result<StageCaseInput, CaseLoaderError> {
        let json = tokio::fs::read_to_string(source)
            .await
            .map_err(|e| CaseLoaderError::Io {
                source_name: source.to_string(),
                message: e.to_string(),
            })?;
        self.parse(source, &json)
    }
}
