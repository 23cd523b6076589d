use crate::visa::domain::{Requirement, VisaQuery, VisaResult};

use super::config::EvaluationConfig;
use super::rules::RuleOutcome;

/// Apply purpose-based escalation to a rule-table outcome.
///
/// Only visa-free short-stay answers that the rule marked as escalatable are affected;
/// free movement, citizen entry, transit, heuristic and unknown outcomes pass through untouched.
pub(crate) fn apply_purpose_policy(
    outcome: RuleOutcome,
    query: &VisaQuery,
    config: &EvaluationConfig,
) -> VisaResult {
    let RuleOutcome {
        mut result,
        escalate_to,
    } = outcome;

    let Some(visa_type) = escalate_to else {
        return result;
    };

    if result.requirement != Requirement::NotRequired || !config.escalates(query.purpose) {
        return result;
    }

    result.set_requirement(Requirement::Required);
    result.visa_type = visa_type;
    result.escalated_by_purpose = true;
    result.message = format!(
        "{} Travel for {} purposes is treated as requiring a visa under the current policy; confirm the applicable category ({}) with the consulate.",
        result.message,
        query.purpose.label(),
        visa_type.display_name()
    );
    result
}
