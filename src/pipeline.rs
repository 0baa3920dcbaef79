//! One analysis request end to end: route, then dispatch.

use crate::dispatch::{DispatchError, Dispatcher};
use crate::registry::AgentRegistry;
use crate::router::{AgentRouter, RoutingError};
use crate::schema::{ComplianceReport, UploadedFile};
use crate::services::Services;
use std::sync::Arc;
use thiserror::Error;

/// A structural request failure the user can fix by rewording the query or
/// changing the uploaded files.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Routing failed: {0}")]
    Routing(#[from] RoutingError),
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl PipelineError {
    /// Stable machine-readable tag for the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Routing(RoutingError::Llm(_)) => "routing_llm",
            Self::Routing(RoutingError::Parse(_)) => "routing_parse",
            Self::Routing(RoutingError::Validation(_)) => "routing_validation",
            Self::Dispatch(DispatchError::UnknownAgent(_)) => "unknown_agent",
            Self::Dispatch(DispatchError::FileCountMismatch { .. }) => "file_count_mismatch",
            Self::Dispatch(DispatchError::FileIndexOutOfRange { .. }) => {
                "file_index_out_of_range"
            }
        }
    }
}

pub struct Pipeline {
    router: AgentRouter,
    dispatcher: Dispatcher,
}

impl Pipeline {
    pub fn new(registry: Arc<AgentRegistry>, services: Arc<Services>) -> Self {
        Self {
            router: AgentRouter::new(services.llm.clone(), registry.clone()),
            dispatcher: Dispatcher::new(registry, services),
        }
    }

    pub async fn analyze(
        &self,
        query: &str,
        files: &[UploadedFile],
    ) -> Result<ComplianceReport, PipelineError> {
        let decision = self.router.route(query, files).await?;
        let report = self.dispatcher.dispatch(&decision, files).await?;
        Ok(report)
    }
}
