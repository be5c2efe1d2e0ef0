//! Stage Batch use case
//!
//! Loads and stages many cases concurrently. A failing case never stops
//! the others.

use crate::config::BatchParams;
use crate::ports::audit_logger::AuditEvent;
use crate::ports::case_loader::{CaseLoader, CaseLoaderError};
use crate::use_cases::stage_case::{CaseRecord, StageCaseError, StageCaseUseCase};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Why a single case in a batch failed
#[derive(Error, Debug)]
pub enum CaseFailure {
    #[error(transparent)]
    Load(#[from] CaseLoaderError),

    #[error(transparent)]
    Stage(#[from] StageCaseError),

    #[error("Task join error: {0}")]
    Join(String),
}

/// Outcome for one source in a batch
#[derive(Debug)]
pub struct CaseOutcome {
    /// Source the case was loaded from
    pub source: String,
    pub result: Result<CaseRecord, CaseFailure>,
}

impl CaseOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a batch run, outcomes in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &CaseRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &CaseFailure)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.source.as_str(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

/// Use case for staging a batch of case sources
pub struct StageBatchUseCase<L: CaseLoader + 'static> {
    loader: Arc<L>,
    stage: Arc<StageCaseUseCase>,
    params: BatchParams,
}

impl<L: CaseLoader + 'static> StageBatchUseCase<L> {
    pub fn new(loader: Arc<L>, stage: Arc<StageCaseUseCase>) -> Self {
        Self {
            loader,
            stage,
            params: BatchParams::default(),
        }
    }

    pub fn with_params(mut self, params: BatchParams) -> Self {
        self.params = params;
        self
    }

    /// Execute the use case over `sources`
    pub async fn execute(&self, sources: &[String]) -> BatchReport {
        info!(
            "Staging {} cases (max {} concurrent)",
            sources.len(),
            self.params.max_concurrent_cases
        );

        let semaphore = Arc::new(Semaphore::new(self.params.max_concurrent_cases.max(1)));
        let mut join_set = JoinSet::new();

        for (index, source) in sources.iter().enumerate() {
            let loader = Arc::clone(&self.loader);
            let stage = Arc::clone(&self.stage);
            let semaphore = Arc::clone(&semaphore);
            let source = source.clone();

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = Self::process(&loader, &stage, &source).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<CaseRecord, CaseFailure>>> =
            sources.iter().map(|_| None).collect();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Task join error: {}", e),
            }
        }

        let outcomes: Vec<CaseOutcome> = sources
            .iter()
            .zip(slots)
            .map(|(source, slot)| CaseOutcome {
                source: source.clone(),
                result: slot.unwrap_or_else(|| {
                    Err(CaseFailure::Join(format!("case task for {source} did not finish")))
                }),
            })
            .collect();

        let report = BatchReport { outcomes };
        info!(
            "Batch finished: {} staged, {} failed",
            report.succeeded().count(),
            report.failure_count()
        );
        report
    }

    async fn process(
        loader: &Arc<L>,
        stage: &Arc<StageCaseUseCase>,
        source: &str,
    ) -> Result<CaseRecord, CaseFailure> {
        let input = match loader.load(source).await {
            Ok(input) => input,
            Err(e) => {
                warn!("Failed to load {}: {}", source, e);
                stage.audit_logger().log(AuditEvent::new(
                    "case_failed",
                    json!({ "source": source, "error": e.to_string() }),
                ));
                return Err(e.into());
            }
        };

        stage.audit_logger().log(AuditEvent::new(
            "case_loaded",
            json!({
                "source": source,
                "case_id": input.case_id,
                "messages": input.transcript.len(),
                "has_case_text": input.case_text.is_some(),
            }),
        ));

        Ok(stage.execute(&input)?)
    }
}
