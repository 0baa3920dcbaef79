//! Subcontractor risk rating.

use super::{documents, AgentFailure, ComplianceAgent};

pub struct RiskguruAgent;

impl ComplianceAgent for RiskguruAgent {
    fn id(&self) -> &'static str {
        "riskguru"
    }

    fn description(&self) -> &'static str {
        "Rate subcontractor risk from a company profile or supporting documents"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["subcontractor document"]
    }

    fn task(&self) -> &'static str {
        "risk assessment"
    }

    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure> {
        let [document] = documents::<1>(texts)?;
        Ok(format!(
            "You are a construction subcontractor risk assessment expert.\n\n\
             Review the documentation below and assign the subcontractor a risk rating based on:\n\
             - financial stability (balance sheet, credit rating, cash flow)\n\
             - safety performance (EMR, OSHA records, incident reports)\n\
             - insurance adequacy (limits, policy types, exclusions)\n\
             - work history and capacity (past projects, backlog, references)\n\
             - legal and compliance issues (lawsuits, terminations, citations)\n\n\
             === DOCUMENT TEXT START ===\n{}\n=== DOCUMENT TEXT END ===\n\n\
             Respond with:\n\
             1. **Overall Risk Rating**: Low / Medium / High\n\
             2. **Key Strengths**\n\
             3. **Key Risk Factors**\n\
             4. **Recommendation**: Proceed / Proceed with conditions / Do not proceed",
            document
        ))
    }
}
