use crate::cli::CatalogArgs;
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use visa_advisor::config::RulesConfig;
use visa_advisor::error::AppError;
use visa_advisor::visa::{
    CatalogError, RuleCatalog, StayDuration, TravelPurpose, VisaAdvisorService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the rule catalog, preferring CLI paths over configured ones.
pub(crate) fn load_catalog(
    rules: &RulesConfig,
    overrides: &CatalogArgs,
) -> Result<RuleCatalog, AppError> {
    let catalog_path = overrides.rules.as_ref().or(rules.catalog_path.as_ref());
    let mut catalog = match catalog_path {
        Some(path) => {
            info!(path = %path.display(), "loading visa rule table");
            RuleCatalog::from_path(path)?
        }
        None => RuleCatalog::standard(),
    };

    if let Some(path) = overrides.embassies_csv.as_ref().or(rules.embassies_csv.as_ref()) {
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        let applied = catalog.merge_embassies_csv(file)?;
        info!(path = %path.display(), applied, "embassy records merged");
    }

    Ok(catalog)
}

pub(crate) fn build_service(
    rules: &RulesConfig,
    overrides: &CatalogArgs,
) -> Result<VisaAdvisorService, AppError> {
    let catalog = load_catalog(rules, overrides)?;
    Ok(VisaAdvisorService::new(
        Arc::new(catalog),
        rules.evaluation.clone(),
    ))
}

pub(crate) fn parse_purpose(raw: &str) -> Result<TravelPurpose, String> {
    TravelPurpose::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = TravelPurpose::ALL.iter().map(|p| p.label()).collect();
        format!("unknown purpose '{raw}' (expected one of {})", known.join(", "))
    })
}

pub(crate) fn parse_duration(raw: &str) -> Result<StayDuration, String> {
    StayDuration::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = StayDuration::ALL.iter().map(|d| d.label()).collect();
        format!("unknown duration '{raw}' (expected one of {})", known.join(", "))
    })
}

/// Parse a `COUNTRY=NIGHTS` pair such as `FR=5`.
pub(crate) fn parse_stay(raw: &str) -> Result<(String, u32), String> {
    let (country, nights) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COUNTRY=NIGHTS, got '{raw}'"))?;
    let country = country.trim();
    if country.is_empty() {
        return Err(format!("missing country in '{raw}'"));
    }
    let nights = nights
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("failed to parse nights in '{raw}' ({err})"))?;
    Ok((country.to_string(), nights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_stay_accepts_country_and_nights() {
        assert_eq!(parse_stay(" france = 4 "), Ok(("france".to_string(), 4)));
        assert!(parse_stay("france").is_err());
        assert!(parse_stay("=4").is_err());
        assert!(parse_stay("FR=-1").is_err());
    }

    #[test]
    fn parse_purpose_lists_known_values() {
        assert_eq!(parse_purpose("Business"), Ok(TravelPurpose::Business));
        let err = parse_purpose("pilgrimage").expect_err("unknown purpose");
        assert!(err.contains("tourism"));
    }

    #[test]
    fn missing_rule_table_is_reported() {
        let overrides = CatalogArgs {
            rules: Some(PathBuf::from("/nonexistent/rules.json")),
            embassies_csv: None,
        };
        let err = load_catalog(&RulesConfig::default(), &overrides)
            .err()
            .expect("missing file rejected");
        assert!(err.to_string().contains("rules.json"));
    }

    #[test]
    fn builds_standard_service_without_overrides() {
        let service = build_service(&RulesConfig::default(), &CatalogArgs::default())
            .expect("standard catalog");
        assert!(service.catalog().is_schengen_member("FR"));
    }
}
