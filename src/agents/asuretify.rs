//! Contract insurance requirements vs. certificate of insurance (COI).

use super::{documents, AgentFailure, ComplianceAgent};

pub struct AsuretifyAgent;

impl ComplianceAgent for AsuretifyAgent {
    fn id(&self) -> &'static str {
        "asuretify"
    }

    fn description(&self) -> &'static str {
        "Compare insurance requirements in a contract against a certificate of insurance (COI)"
    }

    /// The contract comes first, the certificate second.
    fn inputs(&self) -> &'static [&'static str] {
        &["contract document", "certificate of insurance"]
    }

    fn task(&self) -> &'static str {
        "COI validation"
    }

    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure> {
        let [contract, coi] = documents::<2>(texts)?;
        Ok(format!(
            r#"You are a certified insurance compliance auditor.

Compare the Certificate of Insurance (COI) against the insurance requirements set out in the construction contract.

Evaluate:
1. Coverage match: do the listed policies (GL, Auto, WC, Umbrella) match what the contract requires?
2. Limits: do the COI limits meet or exceed the contract limits?
3. Policy period: are effective and expiration dates valid for the contract term?
4. Named insured: does the COI's named insured match the contractor in the contract?
5. Additional insured: is the client listed as additional insured where required?
6. Red flags: missing waiver of subrogation, missing primary & noncontributory wording, expired policies, wrong certificate holder, incomplete form fields.
7. Risk score from 1 (low risk) to 5 (high risk or non-compliant).
8. Final verdict: COMPLIANT or NON-COMPLIANT.

### CONTRACT INSURANCE REQUIREMENTS
{contract}

### CERTIFICATE OF INSURANCE
{coi}

Answer in this format:

**Compliance Review Report**
- Coverage Match: ...
- Limit Match: ...
- Policy Validity: ...
- Named Insured Check: ...
- Additional Insured: ...
- Red Flags: ...
- Risk Score (1-5): ...
- Final Verdict: COMPLIANT or NON-COMPLIANT"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_pdf, services, FakeOcr, ScriptedLlm};
    use std::sync::Arc;

    #[test]
    fn test_prompt_keeps_document_order() {
        let prompt = AsuretifyAgent
            .build_prompt(&["CONTRACT BODY".into(), "COI BODY".into()])
            .unwrap();
        let contract_at = prompt.find("CONTRACT BODY").unwrap();
        let coi_at = prompt.find("COI BODY").unwrap();
        assert!(contract_at < coi_at);
        assert!(prompt.find("### CONTRACT").unwrap() < contract_at);
    }

    #[tokio::test]
    async fn test_unreadable_certificate_is_named() {
        let llm = Arc::new(ScriptedLlm::new());
        let services = services(llm.clone(), FakeOcr::new().page(1, "Contract text"));
        let contract = build_pdf(1);

        let out = AsuretifyAgent
            .run(&services, &[contract.as_slice(), b"not a pdf".as_slice()])
            .await;
        assert_eq!(out, "No readable pages found in the certificate of insurance.");
        assert!(llm.prompts().is_empty());
    }
}
