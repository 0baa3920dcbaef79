//! Financial and operational prequalification.

use super::{documents, AgentFailure, ComplianceAgent};

pub struct PrequaligyAgent;

impl ComplianceAgent for PrequaligyAgent {
    fn id(&self) -> &'static str {
        "prequaligy"
    }

    fn description(&self) -> &'static str {
        "Assess financial prequalification: financials, bonding capacity, qualifications"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["prequalification packet"]
    }

    fn task(&self) -> &'static str {
        "prequalification analysis"
    }

    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure> {
        let [packet] = documents::<1>(texts)?;
        Ok(format!(
            "You are a subcontractor risk analyst reviewing a prequalification packet. Decide whether \
             the subcontractor is financially and operationally qualified for large construction or \
             government projects.\n\n\
             Focus on:\n\
             - financial stability (revenue, net worth, credit history)\n\
             - bonding capacity (single and aggregate limits, surety rating)\n\
             - insurance coverage (GL, WC, Auto, Umbrella)\n\
             - safety metrics (EMR, OSHA incident rates, safety program)\n\
             - relevant project experience\n\
             - references\n\
             - legal issues (lawsuits, terminations, regulatory violations)\n\
             - organization and staffing\n\
             - licensing and certifications\n\n\
             === DOCUMENT TEXT START ===\n{}\n=== DOCUMENT TEXT END ===\n\n\
             Respond with:\n\
             1. Overall Prequalification Status (Qualified / Conditional / Not Qualified)\n\
             2. Strengths\n\
             3. Risks or Missing Items\n\
             4. Final Recommendation",
            packet
        ))
    }
}
