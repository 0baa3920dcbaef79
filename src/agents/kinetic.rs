//! Subcontractor safety policy review against OSHA.

use super::{documents, AgentFailure, ComplianceAgent};

pub struct KineticAgent;

impl ComplianceAgent for KineticAgent {
    fn id(&self) -> &'static str {
        "kinetic"
    }

    fn description(&self) -> &'static str {
        "Evaluate a subcontractor's safety or OSHA policy"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["safety policy"]
    }

    fn task(&self) -> &'static str {
        "OSHA compliance evaluation"
    }

    fn build_prompt(&self, texts: &[String]) -> Result<String, AgentFailure> {
        let [policy] = documents::<1>(texts)?;
        Ok(format!(
            r#"You are a certified OSHA compliance auditor and workplace safety evaluator.

Assess the contractor's workplace safety policy against OSHA 29 CFR 1910 and 1926 and current industry practice.

Framework:
1. PPE requirements: task-specific, listed per job hazard?
2. Training: mandatory trainings (fall protection, LOTO, HazCom), who trains, how it is tracked.
3. Incident reporting: steps, definitions, corrective actions.
4. Hazard identification: formal inspection or hazard reporting process.
5. Inspections and audits: scheduled, documented, owned.
6. Key programs: HazCom, LOTO, confined space, fall protection, emergency action plan, fire safety, respiratory protection, first aid, recordkeeping (OSHA 300 logs, training certificates).
7. Red flags: vague or boilerplate language with no task linkage.
8. Continuous improvement: revisions and performance tracking.
9. Compliance risk score from 1 (poor) to 5 (excellent).
10. Final verdict: COMPLIANT, PARTIALLY COMPLIANT or NON-COMPLIANT.

### CONTRACTOR SAFETY POLICY
{policy}

Answer in this format:

**OSHA Compliance Evaluation**
- PPE Assessment: ...
- Training Assessment: ...
- Incident Reporting Assessment: ...
- Hazard Controls: ...
- Audit & Inspection Protocols: ...
- Program Inclusions: ...
- Vague Language / Gaps: ...
- Continuous Improvement: ...
- Risk Score (1-5): ...
- Final Verdict: ..."#
        ))
    }
}
