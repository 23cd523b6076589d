use crate::cli::CatalogArgs;
use crate::report::{render_itinerary, render_recommendation, render_visa_result, service};
use clap::Args;
use visa_advisor::error::AppError;
use visa_advisor::visa::{
    ItineraryRequest, SchengenTripData, StayDuration, TravelPurpose, VisaQuery,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the multi-destination itinerary portion of the demo.
    #[arg(long)]
    pub(crate) skip_itinerary: bool,
    /// Skip the consulate recommendation portion of the demo.
    #[arg(long)]
    pub(crate) skip_consulate: bool,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_itinerary,
        skip_consulate,
        catalog,
    } = args;

    let service = service(&catalog)?;
    let rules = service.catalog();
    println!(
        "Visa advisor demo (rule catalog {}, effective {})",
        rules.version(),
        rules.effective_date()
    );

    println!("\nSingle lookups");
    for (nationality, destination, purpose, duration) in demo_queries() {
        let result = service.check(&VisaQuery {
            nationality: nationality.to_string(),
            destination: destination.to_string(),
            purpose,
            duration,
        });
        render_visa_result(&result, "  ");
    }

    if !skip_itinerary {
        println!("\nMulti-destination itinerary");
        let assessment = service.check_itinerary(&ItineraryRequest {
            nationality: "India".to_string(),
            destinations: vec![
                "Canada".to_string(),
                "France".to_string(),
                "United Kingdom".to_string(),
            ],
            purposes: vec![TravelPurpose::Tourism],
            duration: StayDuration::SingleShort,
        });
        render_itinerary(&assessment);
    }

    if skip_consulate {
        return Ok(());
    }

    println!("\nSchengen consulate selection");
    for (label, trip) in demo_trips() {
        println!("\n{label}");
        match service.recommend_consulate(&trip) {
            Ok(recommendation) => render_recommendation(&recommendation),
            Err(err) => println!("  Unable to recommend a consulate: {err}"),
        }
    }

    Ok(())
}

fn demo_queries() -> Vec<(&'static str, &'static str, TravelPurpose, StayDuration)> {
    vec![
        ("United States", "France", TravelPurpose::Tourism, StayDuration::SingleShort),
        ("Nigeria", "Germany", TravelPurpose::Tourism, StayDuration::SingleShort),
        ("Germany", "Spain", TravelPurpose::Business, StayDuration::LongStay),
        ("Ghana", "Nigeria", TravelPurpose::Family, StayDuration::SingleShort),
        ("India", "United Kingdom", TravelPurpose::Transit, StayDuration::Transit),
        ("India", "Thailand", TravelPurpose::Tourism, StayDuration::SingleShort),
    ]
}

fn demo_trips() -> Vec<(&'static str, SchengenTripData)> {
    vec![
        (
            "Equal nights in France and Germany, entering through Paris",
            SchengenTripData {
                selected_countries: vec!["france".to_string(), "germany".to_string()],
                nights_distribution: [("france".to_string(), 5), ("germany".to_string(), 5)]
                    .into_iter()
                    .collect(),
                business_location: None,
                entry_point: "france".to_string(),
                purpose: TravelPurpose::Tourism,
            },
        ),
        (
            "Conference in Amsterdam with a longer holiday in Italy",
            SchengenTripData {
                selected_countries: vec!["italy".to_string(), "netherlands".to_string()],
                nights_distribution: [("italy".to_string(), 8), ("netherlands".to_string(), 3)]
                    .into_iter()
                    .collect(),
                business_location: Some("netherlands".to_string()),
                entry_point: "italy".to_string(),
                purpose: TravelPurpose::Conference,
            },
        ),
        (
            "Round trip without a nights plan",
            SchengenTripData {
                selected_countries: vec!["austria".to_string(), "greece".to_string()],
                nights_distribution: Default::default(),
                business_location: None,
                entry_point: "austria".to_string(),
                purpose: TravelPurpose::Tourism,
            },
        ),
    ]
}
