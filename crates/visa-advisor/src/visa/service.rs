use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::catalog::RuleCatalog;
use super::consulate::{ConsulateError, ConsulateRecommender};
use super::domain::{
    ConsulateRecommendation, Country, EmbassyInfo, SchengenTripData, VisaQuery, VisaResult,
};
use super::evaluation::{EvaluationConfig, VisaEvaluator};
use super::itinerary::{ItineraryAssessment, ItineraryRequest};

/// Facade composing the evaluator, itinerary aggregator, and consulate recommender.
#[derive(Debug, Clone)]
pub struct VisaAdvisorService {
    evaluator: VisaEvaluator,
}

impl VisaAdvisorService {
    pub fn new(catalog: Arc<RuleCatalog>, config: EvaluationConfig) -> Self {
        info!(
            version = catalog.version(),
            effective_date = %catalog.effective_date(),
            countries = catalog.countries().len(),
            embassies = catalog.data().embassies.len(),
            "visa rule catalog loaded"
        );
        Self {
            evaluator: VisaEvaluator::new(catalog, config),
        }
    }

    pub fn evaluator(&self) -> &VisaEvaluator {
        &self.evaluator
    }

    pub fn catalog(&self) -> &RuleCatalog {
        self.evaluator.catalog()
    }

    pub fn check(&self, query: &VisaQuery) -> VisaResult {
        self.evaluator.evaluate(query)
    }

    pub fn check_itinerary(&self, request: &ItineraryRequest) -> ItineraryAssessment {
        self.evaluator.evaluate_multiple(request)
    }

    /// Pick the consulate responsible for a multi-country Schengen trip.
    pub fn recommend_consulate(
        &self,
        trip: &SchengenTripData,
    ) -> Result<ConsulateRecommendation, AdvisorServiceError> {
        Ok(ConsulateRecommender::new(self.catalog()).recommend(trip)?)
    }

    pub fn country(&self, raw: &str) -> Result<CountryProfile, AdvisorServiceError> {
        let catalog = self.catalog();
        let country = catalog
            .lookup_country(raw)
            .ok_or_else(|| AdvisorServiceError::UnknownCountry(raw.trim().to_string()))?;
        Ok(CountryProfile {
            country: country.clone(),
            embassy: catalog.embassy_info(country.code.as_str()).cloned(),
            schengen_exempt: catalog.is_schengen_exempt(&country.code),
        })
    }

    pub fn countries(&self) -> CatalogListing {
        let catalog = self.catalog();
        CatalogListing {
            version: catalog.version().to_string(),
            effective_date: catalog.effective_date(),
            countries: catalog.countries().to_vec(),
        }
    }
}

/// Country metadata with its consulate record, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CountryProfile {
    pub country: Country,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embassy: Option<EmbassyInfo>,
    /// Nationals of this country may visit the Schengen area visa-free.
    pub schengen_exempt: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub version: String,
    pub effective_date: NaiveDate,
    pub countries: Vec<Country>,
}

/// Error raised by the advisor service for caller input it cannot act on.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorServiceError {
    #[error(transparent)]
    Consulate(#[from] ConsulateError),
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
}
