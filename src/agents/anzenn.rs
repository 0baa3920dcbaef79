//! Workplace safety program and audit review.

use super::{documents, AgentFailure, ComplianceAgent};

pub struct AnzennAgent;

impl ComplianceAgent for AnzennAgent {
    fn id(&self) -> &'static str {
        "anzenn"
    }

    fn description(&self) -> &'static str {
        "Evaluate workplace safety, field safety protocols or safety audits"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["safety document"]
    }

    fn task(&self) -> &'static str {
        "safety documentation review"
    }

    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure> {
        let [document] = documents::<1>(texts)?;
        Ok(format!(
            "You are a certified workplace safety and OSHA compliance auditor. Review the safety \
             documentation below and determine whether it meets OSHA and industry safety guidelines.\n\n\
             Check the presence, completeness and adequacy of:\n\
             1. Safety training records (dates, scope, participants)\n\
             2. Written safety policies and procedures\n\
             3. Incident logs and reporting\n\
             4. Hazard communication (SDS, labeling, training)\n\
             5. Emergency action plans\n\
             6. Designated safety officer or roles\n\
             7. Regular audits or inspections\n\
             8. Procedures for common hazards (LOTO, fall protection)\n\n\
             === DOCUMENT TEXT START ===\n{}\n=== DOCUMENT TEXT END ===\n\n\
             Summarize as:\n\
             - Overall Compliance Assessment (Compliant: YES/NO)\n\
             - Observed Strengths\n\
             - Missing or Incomplete Elements\n\
             - Risks and Recommendations",
            document
        ))
    }
}
