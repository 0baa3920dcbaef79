//! Validated invocation of the routed agent.

use crate::registry::AgentRegistry;
use crate::router::RoutingDecision;
use crate::schema::{ComplianceReport, UploadedFile};
use crate::services::Services;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no matching agent found for `{0}`")]
    UnknownAgent(String),
    #[error("agent `{agent}` needs {expected} file(s), but got {actual}")]
    FileCountMismatch {
        agent: String,
        expected: usize,
        actual: usize,
    },
    #[error("file index {index} out of range for {count} uploaded file(s)")]
    FileIndexOutOfRange { index: usize, count: usize },
}

pub struct Dispatcher {
    registry: Arc<AgentRegistry>,
    services: Arc<Services>,
}

impl Dispatcher {
    pub fn new(registry: Arc<AgentRegistry>, services: Arc<Services>) -> Self {
        Self { registry, services }
    }

    /// Hand the selected files, in decision order, to the chosen agent.
    pub async fn dispatch(
        &self,
        decision: &RoutingDecision,
        files: &[UploadedFile],
    ) -> Result<ComplianceReport, DispatchError> {
        let descriptor = self
            .registry
            .get(&decision.agent)
            .ok_or_else(|| DispatchError::UnknownAgent(decision.agent.clone()))?;

        if decision.file_indices.len() != descriptor.required_files {
            return Err(DispatchError::FileCountMismatch {
                agent: descriptor.id.to_string(),
                expected: descriptor.required_files,
                actual: decision.file_indices.len(),
            });
        }

        let inputs = decision
            .file_indices
            .iter()
            .map(|&index| {
                files
                    .get(index)
                    .map(|file| file.bytes.as_slice())
                    .ok_or(DispatchError::FileIndexOutOfRange {
                        index,
                        count: files.len(),
                    })
            })
            .collect::<Result<Vec<&[u8]>, _>>()?;

        info!(
            "Dispatching to agent {} with files {:?}",
            descriptor.id, decision.file_indices
        );
        let text = descriptor.handler.run(&self.services, &inputs).await;

        Ok(ComplianceReport {
            agent: descriptor.id.to_string(),
            file_indices: decision.file_indices.clone(),
            text,
        })
    }
}
