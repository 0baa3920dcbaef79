//! Agent registry: identifier → handler and required file count.
//!
//! Built once at start-up and shared read-only. Order is preserved so the routing
//! prompt lists agents the same way every time.

use crate::agents::{self, ComplianceAgent};
use crate::schema::AgentSummary;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate agent identifier: {0}")]
    DuplicateId(String),
    #[error("agent {0} declares no inputs")]
    NoInputs(String),
}

pub struct AgentDescriptor {
    pub id: &'static str,
    pub description: &'static str,
    pub required_files: usize,
    pub handler: Arc<dyn ComplianceAgent>,
}

impl AgentDescriptor {
    fn from_handler(handler: Arc<dyn ComplianceAgent>) -> Self {
        Self {
            id: handler.id(),
            description: handler.description(),
            required_files: handler.inputs().len(),
            handler,
        }
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            description: self.description,
            required_files: self.required_files,
            inputs: self.handler.inputs(),
        }
    }
}

pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    pub fn new(handlers: Vec<Arc<dyn ComplianceAgent>>) -> Result<Self, RegistryError> {
        let mut agents: Vec<AgentDescriptor> = Vec::with_capacity(handlers.len());

        for handler in handlers {
            let descriptor = AgentDescriptor::from_handler(handler);
            if descriptor.required_files == 0 {
                return Err(RegistryError::NoInputs(descriptor.id.to_string()));
            }
            if agents.iter().any(|a| a.id == descriptor.id) {
                return Err(RegistryError::DuplicateId(descriptor.id.to_string()));
            }
            agents.push(descriptor);
        }

        Ok(Self { agents })
    }

    /// The six built-in compliance agents.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(agents::builtin())
    }

    pub fn get(&self, id: &str) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn summaries(&self) -> Vec<AgentSummary> {
        self.agents.iter().map(AgentDescriptor::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::kinetic::KineticAgent;
    use crate::agents::AgentFailure;

    struct NoInputAgent;

    impl ComplianceAgent for NoInputAgent {
        fn id(&self) -> &'static str {
            "empty"
        }
        fn description(&self) -> &'static str {
            "takes nothing"
        }
        fn inputs(&self) -> &'static [&'static str] {
            &[]
        }
        fn task(&self) -> &'static str {
            "nothing"
        }
        fn build_prompt(&self, _texts: &[String]) -> Result<String, AgentFailure> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_builtin_file_counts() {
        let registry = AgentRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.get("asuretify").unwrap().required_files, 2);
        for id in ["kinetic", "wrappotal", "riskguru", "prequaligy", "anzenn"] {
            assert_eq!(registry.get(id).unwrap().required_files, 1, "{id}");
        }
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_builtin_order_is_stable() {
        let registry = AgentRegistry::builtin().unwrap();
        let ids: Vec<_> = registry.iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            ["asuretify", "kinetic", "wrappotal", "riskguru", "prequaligy", "anzenn"]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let handlers: Vec<Arc<dyn ComplianceAgent>> =
            vec![Arc::new(KineticAgent), Arc::new(KineticAgent)];
        let result = AgentRegistry::new(handlers);
        assert!(matches!(result, Err(RegistryError::DuplicateId(id)) if id == "kinetic"));
    }

    #[test]
    fn test_zero_arity_rejected() {
        let handlers: Vec<Arc<dyn ComplianceAgent>> = vec![Arc::new(NoInputAgent)];
        let result = AgentRegistry::new(handlers);
        assert!(matches!(result, Err(RegistryError::NoInputs(_))));
    }

    #[test]
    fn test_summaries_serialize() {
        let registry = AgentRegistry::builtin().unwrap();
        let json = serde_json::to_value(registry.summaries()).unwrap();
        assert_eq!(json[0]["id"], "asuretify");
        assert_eq!(json[0]["required_files"], 2);
        assert_eq!(json[0]["inputs"][1], "certificate of insurance");
    }
}
