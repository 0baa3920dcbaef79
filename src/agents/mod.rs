//! Compliance agents.
//!
//! Every agent has the same shape: OCR each assigned document, embed the texts in a
//! domain prompt, ask the model once, hand back the reply. Agents never fail
//! outward. Ingestion problems and model errors come back as a short diagnostic
//! string, so whatever the caller gets is always something to show the user.

pub mod anzenn;
pub mod asuretify;
pub mod kinetic;
pub mod prequaligy;
pub mod riskguru;
pub mod wrappotal;

use crate::ingest::IngestError;
use crate::services::Services;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Prefix for model failures surfaced as report text.
pub const ERROR_MARKER: &str = "❌";

/// Why an agent could not produce an analysis. Rendered as the agent's output.
#[derive(Debug, Error)]
pub enum AgentFailure {
    #[error("No readable pages found in the {input}.")]
    NoReadablePages { input: &'static str },
    #[error("Text extraction failed for the {input}: no readable text was found.")]
    TextExtractionFailed { input: &'static str },
    #[error("Expected {expected} document(s) but received {actual}.")]
    WrongInputCount { expected: usize, actual: usize },
    #[error("{} An error occurred during {task}: {error:#}", ERROR_MARKER)]
    Llm {
        task: &'static str,
        error: anyhow::Error,
    },
}

#[async_trait::async_trait]
pub trait ComplianceAgent: Send + Sync {
    /// Registry identifier, lower-case.
    fn id(&self) -> &'static str;

    /// One line shown to the routing model.
    fn description(&self) -> &'static str;

    /// Ordered names of the documents the agent takes; the length is its arity.
    fn inputs(&self) -> &'static [&'static str];

    /// What the agent does, as used in "an error occurred during ...".
    fn task(&self) -> &'static str;

    /// Build the analysis prompt. `texts` lines up with [`ComplianceAgent::inputs`];
    /// any other count is [`AgentFailure::WrongInputCount`].
    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure>;

    /// Run the agent. Always returns text.
    async fn run(&self, services: &Services, files: &[&[u8]]) -> String {
        match self.analyze(services, files).await {
            Ok(report) => report,
            Err(failure) => {
                warn!("Agent {} degraded to diagnostic: {}", self.id(), failure);
                failure.to_string()
            }
        }
    }

    async fn analyze(&self, services: &Services, files: &[&[u8]]) -> Result<String, AgentFailure> {
        let inputs = self.inputs();
        if files.len() != inputs.len() {
            return Err(AgentFailure::WrongInputCount {
                expected: inputs.len(),
                actual: files.len(),
            });
        }

        let mut texts = Vec::with_capacity(files.len());
        for (&input, bytes) in inputs.iter().zip(files) {
            let text = services
                .ingestor
                .extract_text(bytes)
                .await
                .map_err(|e| {
                    warn!("Agent {}: ingestion of {} failed: {}", self.id(), input, e);
                    match e {
                        IngestError::DocumentRead(_) => AgentFailure::NoReadablePages { input },
                        IngestError::OcrEmpty => AgentFailure::TextExtractionFailed { input },
                    }
                })?;
            info!("Agent {}: {} yielded {} chars", self.id(), input, text.len());
            texts.push(text);
        }

        let prompt = self.build_prompt(&texts)?;
        let reply = services
            .llm
            .generate(&prompt)
            .await
            .map_err(|error| AgentFailure::Llm {
                task: self.task(),
                error,
            })?;

        Ok(reply.trim().to_string())
    }
}

/// View `texts` as exactly `N` documents.
pub(crate) fn documents<const N: usize>(texts: &[String]) -> Result<&[String; N], AgentFailure> {
    texts
        .try_into()
        .map_err(|_| AgentFailure::WrongInputCount {
            expected: N,
            actual: texts.len(),
        })
}

/// The fixed set of agents, in the order they are presented to the router.
pub fn builtin() -> Vec<Arc<dyn ComplianceAgent>> {
    vec![
        Arc::new(asuretify::AsuretifyAgent),
        Arc::new(kinetic::KineticAgent),
        Arc::new(wrappotal::WrappotalAgent),
        Arc::new(riskguru::RiskguruAgent),
        Arc::new(prequaligy::PrequaligyAgent),
        Arc::new(anzenn::AnzennAgent),
    ]
}
