mod config;
mod policy;
mod rules;

pub use config::EvaluationConfig;

use std::sync::Arc;

use tracing::{debug, warn};

use super::catalog::RuleCatalog;
use super::domain::{Requirement, VisaQuery, VisaResult};
use policy::apply_purpose_policy;

/// Stateless evaluator over an injected rule table.
#[derive(Debug, Clone)]
pub struct VisaEvaluator {
    catalog: Arc<RuleCatalog>,
    config: EvaluationConfig,
}

impl VisaEvaluator {
    pub fn new(catalog: Arc<RuleCatalog>, config: EvaluationConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, query: &VisaQuery) -> VisaResult {
        let outcome = rules::evaluate_rules(&self.catalog, &self.config, query);
        let result = apply_purpose_policy(outcome, query, &self.config);

        debug!(
            nationality = %query.nationality,
            destination = %query.destination,
            purpose = query.purpose.label(),
            duration = query.duration.label(),
            requirement = result.requirement.label(),
            visa_type = result.visa_type.label(),
            "visa requirement evaluated"
        );
        if result.requirement == Requirement::Unknown {
            warn!(
                nationality = %query.nationality,
                destination = %query.destination,
                "no rule covers this combination; returning unknown"
            );
        }

        result
    }
}
