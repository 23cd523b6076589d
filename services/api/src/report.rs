use crate::cli::CatalogArgs;
use crate::infra::{build_service, parse_duration, parse_purpose, parse_stay};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use visa_advisor::config::AppConfig;
use visa_advisor::error::AppError;
use visa_advisor::visa::{
    ConsulateChoice, ConsulateRecommendation, ItineraryAssessment, ItineraryRequest,
    SchengenTripData, StayDuration, TravelPurpose, VisaAdvisorService, VisaQuery, VisaResult,
};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Traveller nationality (ISO code, slug, or name)
    #[arg(long)]
    pub(crate) nationality: String,
    /// Destination country (ISO code, slug, or name)
    #[arg(long)]
    pub(crate) destination: String,
    #[arg(long, value_parser = parse_purpose, default_value = "tourism")]
    pub(crate) purpose: TravelPurpose,
    #[arg(long, value_parser = parse_duration, default_value = "single-short")]
    pub(crate) duration: StayDuration,
    /// Print the raw JSON result
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ItineraryArgs {
    #[arg(long)]
    pub(crate) nationality: String,
    /// Destination in travel order; repeat for each stop
    #[arg(long = "destination", required = true)]
    pub(crate) destinations: Vec<String>,
    /// Purpose per destination; the last one repeats for remaining stops
    #[arg(long = "purpose", value_parser = parse_purpose)]
    pub(crate) purposes: Vec<TravelPurpose>,
    #[arg(long, value_parser = parse_duration, default_value = "single-short")]
    pub(crate) duration: StayDuration,
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ConsulateArgs {
    /// Nights per country as COUNTRY=NIGHTS; repeat for each country
    #[arg(long = "stay", value_parser = parse_stay)]
    pub(crate) stays: Vec<(String, u32)>,
    /// Additional countries visited without overnight stays
    #[arg(long = "country")]
    pub(crate) countries: Vec<String>,
    /// First Schengen country of entry
    #[arg(long)]
    pub(crate) entry_point: Option<String>,
    /// Country where business or conference activities take place
    #[arg(long)]
    pub(crate) business_location: Option<String>,
    #[arg(long, value_parser = parse_purpose, default_value = "tourism")]
    pub(crate) purpose: TravelPurpose,
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CountriesArgs {
    /// Only list Schengen members
    #[arg(long)]
    pub(crate) schengen: bool,
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

pub(crate) fn service(catalog: &CatalogArgs) -> Result<VisaAdvisorService, AppError> {
    let config = AppConfig::load()?;
    build_service(&config.rules, catalog)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let service = service(&args.catalog)?;
    let result = service.check(&VisaQuery {
        nationality: args.nationality,
        destination: args.destination,
        purpose: args.purpose,
        duration: args.duration,
    });

    if args.json {
        return print_json(&result);
    }
    render_visa_result(&result, "");
    Ok(())
}

pub(crate) fn run_itinerary(args: ItineraryArgs) -> Result<(), AppError> {
    let service = service(&args.catalog)?;
    let assessment = service.check_itinerary(&ItineraryRequest {
        nationality: args.nationality,
        destinations: args.destinations,
        purposes: args.purposes,
        duration: args.duration,
    });

    if args.json {
        return print_json(&assessment);
    }
    render_itinerary(&assessment);
    Ok(())
}

pub(crate) fn run_consulate(args: ConsulateArgs) -> Result<(), AppError> {
    let service = service(&args.catalog)?;
    let trip = trip_from_args(
        args.stays,
        args.countries,
        args.entry_point,
        args.business_location,
        args.purpose,
    );

    let recommendation = service.recommend_consulate(&trip)?;

    if args.json {
        return print_json(&recommendation);
    }
    render_recommendation(&recommendation);
    Ok(())
}

pub(crate) fn run_countries(args: CountriesArgs) -> Result<(), AppError> {
    let service = service(&args.catalog)?;
    let mut listing = service.countries();
    if args.schengen {
        listing.countries.retain(|country| country.is_schengen);
    }

    if args.json {
        return print_json(&listing);
    }

    println!(
        "Rule catalog {} (effective {}) - {} countries",
        listing.version,
        listing.effective_date,
        listing.countries.len()
    );
    for country in &listing.countries {
        let marker = if country.is_schengen { " [Schengen]" } else { "" };
        println!("  {} {} {}{}", country.code, country.flag, country.name, marker);
    }
    Ok(())
}

pub(crate) fn trip_from_args(
    stays: Vec<(String, u32)>,
    countries: Vec<String>,
    entry_point: Option<String>,
    business_location: Option<String>,
    purpose: TravelPurpose,
) -> SchengenTripData {
    let mut selected_countries: Vec<String> =
        stays.iter().map(|(country, _)| country.clone()).collect();
    for country in countries {
        if !selected_countries.contains(&country) {
            selected_countries.push(country);
        }
    }
    let entry_point = entry_point
        .or_else(|| selected_countries.first().cloned())
        .unwrap_or_default();

    let mut nights_distribution = BTreeMap::new();
    for (country, nights) in stays {
        *nights_distribution.entry(country).or_insert(0) += nights;
    }

    SchengenTripData {
        selected_countries,
        nights_distribution,
        business_location,
        entry_point,
        purpose,
    }
}

pub(crate) fn render_visa_result(result: &VisaResult, indent: &str) {
    println!(
        "{indent}{} -> {}: {}",
        result.nationality,
        result.destination,
        result.requirement.label()
    );
    println!(
        "{indent}  Visa type: {} | confidence {:?}{}",
        result.visa_type.display_name(),
        result.confidence,
        if result.is_schengen { " | Schengen area" } else { "" }
    );
    println!("{indent}  {}", result.message);
    if let Some(days) = result.max_stay_days {
        println!("{indent}  Maximum stay: {days} days");
    }
    if let Some(processing) = &result.processing_time {
        println!("{indent}  Processing time: {processing}");
    }
    if let Some(categories) = &result.national_visa_categories {
        println!("{indent}  Visa categories: {}", categories.join(", "));
    }
    if let Some(documents) = &result.documents {
        println!("{indent}  Documents:");
        for document in documents {
            println!("{indent}    - {document}");
        }
    }
}

pub(crate) fn render_itinerary(assessment: &ItineraryAssessment) {
    println!("Itinerary for citizens of {}", assessment.nationality);
    for entry in &assessment.destinations {
        println!("- {} {}", entry.flag, entry.destination_name);
        render_visa_result(&entry.result, "  ");
    }
    if !assessment.transit_warnings.is_empty() {
        println!("Transit advisories:");
        for warning in &assessment.transit_warnings {
            println!("  ! {}", warning.message);
        }
    }
    println!(
        "Summary: visa required {} | all visa-free {} | Schengen stops {} | needs manual check {}",
        yes_no(assessment.has_visa_required),
        yes_no(assessment.all_visa_free),
        yes_no(assessment.has_schengen_countries),
        yes_no(assessment.has_unknown)
    );
}

pub(crate) fn render_recommendation(recommendation: &ConsulateRecommendation) {
    println!("Recommended consulate");
    render_choice(&recommendation.primary_consulate);
    if !recommendation.alternatives.is_empty() {
        println!("Alternatives:");
        for choice in &recommendation.alternatives {
            render_choice(choice);
        }
    }
    if recommendation.expert_consultation_needed {
        println!("An expert consultation is recommended before applying.");
    }
}

fn render_choice(choice: &ConsulateChoice) {
    println!("- {} ({})", choice.country_name, choice.country);
    println!("  {}", choice.reasoning);
    if choice.booking_url.is_empty() {
        println!("  Booking: no embassy record on file");
    } else {
        println!("  Booking: {}", choice.booking_url);
    }
    println!("  Processing time: {}", choice.processing_time);
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use visa_advisor::visa::{AdvisorServiceError, ConsulateError};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn consulate_args(countries: &[&str]) -> ConsulateArgs {
        ConsulateArgs {
            stays: Vec::new(),
            countries: countries.iter().map(|country| country.to_string()).collect(),
            entry_point: None,
            business_location: None,
            purpose: TravelPurpose::Tourism,
            json: true,
            catalog: CatalogArgs::default(),
        }
    }

    #[test]
    fn trip_from_args_defaults_entry_point_to_first_stay() {
        let trip = trip_from_args(
            vec![("FR".to_string(), 5), ("DE".to_string(), 3)],
            vec!["DE".to_string(), "AT".to_string()],
            None,
            None,
            TravelPurpose::Tourism,
        );

        assert_eq!(trip.selected_countries, vec!["FR", "DE", "AT"]);
        assert_eq!(trip.entry_point, "FR");
        assert_eq!(trip.nights_distribution.get("DE"), Some(&3));
        assert!(!trip.nights_distribution.contains_key("AT"));
    }

    #[test]
    fn trip_from_args_keeps_explicit_entry_point() {
        let trip = trip_from_args(
            vec![("FR".to_string(), 5)],
            Vec::new(),
            Some("IT".to_string()),
            Some("FR".to_string()),
            TravelPurpose::Business,
        );

        assert_eq!(trip.entry_point, "IT");
        assert_eq!(trip.business_location.as_deref(), Some("FR"));
    }

    #[test]
    fn trip_from_args_sums_repeated_stays() {
        let trip = trip_from_args(
            vec![
                ("FR".to_string(), 2),
                ("DE".to_string(), 4),
                ("FR".to_string(), 3),
            ],
            Vec::new(),
            None,
            None,
            TravelPurpose::Tourism,
        );

        assert_eq!(trip.selected_countries, vec!["FR", "DE"]);
        assert_eq!(trip.nights_distribution.get("FR"), Some(&5));
        assert_eq!(trip.nights_distribution.get("DE"), Some(&4));
    }

    #[test]
    fn run_consulate_fails_when_no_schengen_country_is_selected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");

        let err = run_consulate(consulate_args(&["US"])).expect_err("trip must be rejected");

        assert!(matches!(
            err,
            AppError::Advisor(AdvisorServiceError::Consulate(
                ConsulateError::EmptyItinerary
            ))
        ));
    }

    #[test]
    fn run_consulate_succeeds_for_a_single_schengen_country() {
        let _lock = env_guard().lock().expect("env mutex poisoned");

        run_consulate(consulate_args(&["FR"])).expect("recommendation printed");
    }

    #[test]
    fn service_applies_configured_purpose_escalation() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::set_var("VISA_ESCALATE_PURPOSES", "business");

        let loaded = service(&CatalogArgs::default());
        env::remove_var("VISA_ESCALATE_PURPOSES");

        let service = loaded.expect("service builds");
        assert!(service
            .evaluator()
            .config()
            .escalated_purposes
            .contains(&TravelPurpose::Business));
    }
}
