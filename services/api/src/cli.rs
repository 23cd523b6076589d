use crate::demo::{run_demo, DemoArgs};
use crate::report::{
    run_check, run_consulate, run_countries, run_itinerary, CheckArgs, ConsulateArgs,
    CountriesArgs, ItineraryArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use visa_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Visa Advisor",
    about = "Check visa requirements and Schengen consulate responsibility from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check the visa requirement for one nationality and destination
    Check(CheckArgs),
    /// Assess a multi-destination itinerary, including transit advisories
    Itinerary(ItineraryArgs),
    /// Recommend the consulate responsible for a multi-country Schengen trip
    Consulate(ConsulateArgs),
    /// List the countries known to the rule catalog
    Countries(CountriesArgs),
    /// Walk through representative lookups against the built-in catalog
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
}

/// Rule-table overrides shared by every command that evaluates requests.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CatalogArgs {
    /// JSON rule table to use instead of the built-in catalog
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Embassy CSV overlaid on the loaded catalog
    #[arg(long)]
    pub(crate) embassies_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
        Command::Itinerary(args) => run_itinerary(args),
        Command::Consulate(args) => run_consulate(args),
        Command::Countries(args) => run_countries(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["visa-advisor"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "visa-advisor",
            "check",
            "--nationality",
            "Nigeria",
            "--destination",
            "germany",
            "--purpose",
            "business",
            "--duration",
            "multiple-short",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.nationality, "Nigeria");
                assert_eq!(args.destination, "germany");
                assert!(args.json);
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn parses_consulate_stays() {
        let cli = Cli::try_parse_from([
            "visa-advisor",
            "consulate",
            "--stay",
            "FR=5",
            "--stay",
            "DE=5",
            "--entry-point",
            "FR",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Consulate(args)) => {
                assert_eq!(
                    args.stays,
                    vec![("FR".to_string(), 5), ("DE".to_string(), 5)]
                );
                assert_eq!(args.entry_point.as_deref(), Some("FR"));
            }
            other => panic!("expected consulate command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_stay() {
        let result = Cli::try_parse_from(["visa-advisor", "consulate", "--stay", "FR:5"]);
        assert!(result.is_err());
    }
}
