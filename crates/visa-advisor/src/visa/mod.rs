//! Visa requirement lookups, multi-destination assessment, and Schengen consulate
//! selection over a shared, versioned rule catalog.

pub mod catalog;
pub mod consulate;
pub mod domain;
pub mod evaluation;
pub mod itinerary;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogData, CatalogError, RuleCatalog};
pub use consulate::{ConsulateError, ConsulateRecommender};
pub use domain::{
    Confidence, ConsulateChoice, ConsulateRecommendation, Country, CountryCode, EmbassyInfo,
    RegionalMovement, Requirement, SchengenTripData, StayDuration, TravelPurpose, VisaQuery,
    VisaResult, VisaType,
};
pub use evaluation::{EvaluationConfig, VisaEvaluator};
pub use itinerary::{
    DestinationAssessment, ItineraryAssessment, ItineraryRequest, TransitRegion, TransitWarning,
};
pub use router::visa_router;
pub use service::{AdvisorServiceError, CatalogListing, CountryProfile, VisaAdvisorService};
