//! Wrap-up insurance (OCIP/CCIP) document review.

use super::{documents, AgentFailure, ComplianceAgent};

pub struct WrappotalAgent;

impl ComplianceAgent for WrappotalAgent {
    fn id(&self) -> &'static str {
        "wrappotal"
    }

    fn description(&self) -> &'static str {
        "Analyze wrap-up (OCIP/CCIP) insurance program documents"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["wrap-up document"]
    }

    fn task(&self) -> &'static str {
        "wrap-up document analysis"
    }

    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure> {
        let [manual] = documents::<1>(texts)?;
        Ok(format!(
            "You are an insurance compliance expert specializing in wrap-up insurance (OCIP/CCIP) programs.\n\n\
             Analyze the document below and determine:\n\
             - whether it belongs to a valid wrap-up program;\n\
             - whether it includes project name, enrolled contractors, carrier details, coverage terms, \
             exclusions, effective and expiration dates, and administrative contacts;\n\
             - any compliance risks, documentation gaps or omitted sections.\n\n\
             === WRAP-UP DOCUMENT TEXT START ===\n{}\n=== WRAP-UP DOCUMENT TEXT END ===\n\n\
             Respond with:\n\
             1. **Wrap-Up Program Detected**: YES / NO\n\
             2. **Key Information Present**: what was found\n\
             3. **Missing or Risk Areas**: gaps or concerns\n\
             4. **Wrap-Up Program Document Valid**: YES / NO",
            manual
        ))
    }
}
