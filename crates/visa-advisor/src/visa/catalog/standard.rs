use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::{
    CatalogData, DestinationRule, FreeMovementBloc, SchengenTables, TransitRiskLists, TransitRule,
};
use crate::visa::domain::{Country, CountryCode, EmbassyInfo, TravelPurpose, VisaType};

const SCHENGEN_MEMBERS: &[&str] = &[
    "AT", "BE", "BG", "HR", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IS", "IT", "LV",
    "LI", "LT", "LU", "MT", "NL", "NO", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "CH",
];

/// EU members outside Schengen; their nationals still move freely.
const EEA_OUTSIDE_SCHENGEN: &[&str] = &["IE", "CY"];

const SCHENGEN_EXEMPT: &[&str] = &[
    "AL", "AD", "AR", "AU", "BA", "BR", "BN", "CA", "CL", "CO", "CR", "GE", "HK", "IL", "JP",
    "MY", "MX", "MD", "MC", "ME", "NZ", "MK", "PA", "PY", "PE", "SM", "RS", "SG", "KR", "TW",
    "UA", "AE", "GB", "US", "UY",
];

const SCHENGEN_AIRPORT_TRANSIT: &[&str] = &[
    "AF", "BD", "CD", "ER", "ET", "GH", "IR", "IQ", "NG", "PK", "SO", "LK",
];

const NORTH_AMERICA_TRANSIT: &[&str] = &[
    "AF", "BD", "CN", "EG", "ET", "GH", "ID", "IN", "IR", "IQ", "KE", "LK", "MA", "NG", "PH",
    "PK", "VN",
];

const US_VISA_WAIVER: &[&str] = &[
    "AD", "AU", "AT", "BE", "BN", "CL", "HR", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU",
    "IS", "IE", "IL", "IT", "JP", "KR", "LV", "LI", "LT", "LU", "MT", "MC", "NL", "NZ", "NO",
    "PL", "PT", "QA", "RO", "SM", "SG", "SK", "SI", "ES", "SE", "CH", "TW", "GB", "CA",
];

const UK_NON_VISA_NATIONALS: &[&str] = &[
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IS", "IE",
    "IT", "LV", "LI", "LT", "LU", "MT", "NL", "NO", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
    "CH", "US", "CA", "AU", "NZ", "JP", "KR", "SG", "MY", "BR", "AR", "CL", "MX", "IL", "AE",
    "TW", "HK", "UY", "PA", "CR", "PY", "AD", "MC", "SM", "BN", "QA",
];

const UK_DIRECT_AIRSIDE_TRANSIT: &[&str] = &[
    "AF", "BD", "CN", "CD", "ER", "ET", "GH", "IN", "IR", "IQ", "NG", "PK", "SO", "LK", "VN",
];

const ECOWAS_MEMBERS: &[&str] = &[
    "BJ", "CV", "CI", "GM", "GH", "GN", "GW", "LR", "NG", "SN", "SL", "TG",
];

const STRONG_PASSPORTS: &[&str] = &[
    "US", "GB", "CA", "AU", "NZ", "JP", "KR", "SG", "DE", "FR", "IT", "ES", "NL", "SE", "CH",
    "NO", "DK", "FI", "IE", "AT", "BE", "PT", "LU",
];

const COMMON_VISA_FREE_DESTINATIONS: &[&str] = &[
    "MX", "TH", "JP", "KR", "SG", "MY", "BR", "AR", "CL", "PE", "CO", "CR", "MA", "GE", "RS",
    "AL", "PH", "PA", "UY", "ZA", "TR", "ME", "MK", "BA", "IL", "AE", "TW", "HK", "CA",
];

/// Built-in, versioned rule table.
pub fn standard_catalog_data() -> CatalogData {
    CatalogData {
        version: "2025.2".to_string(),
        effective_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap_or_default(),
        countries: standard_countries(),
        schengen_exempt: codes(SCHENGEN_EXEMPT),
        embassies: standard_embassies(),
        destination_rules: vec![united_states_rule(), united_kingdom_rule(), nigeria_rule()],
        strong_passports: codes(STRONG_PASSPORTS),
        common_visa_free_destinations: codes(COMMON_VISA_FREE_DESTINATIONS),
        transit_risk: TransitRiskLists {
            schengen_airport_transit: codes(SCHENGEN_AIRPORT_TRANSIT),
            north_america: codes(NORTH_AMERICA_TRANSIT),
        },
        schengen: schengen_tables(),
    }
}

fn codes(values: &[&str]) -> BTreeSet<CountryCode> {
    values.iter().copied().map(CountryCode::new).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn standard_countries() -> Vec<Country> {
    let rows: &[(&str, &str, &str, &[&str])] = &[
        // Schengen members
        ("AT", "Austria", "🇦🇹", &[]),
        ("BE", "Belgium", "🇧🇪", &[]),
        ("BG", "Bulgaria", "🇧🇬", &[]),
        ("HR", "Croatia", "🇭🇷", &[]),
        ("CZ", "Czechia", "🇨🇿", &["Czech Republic"]),
        ("DK", "Denmark", "🇩🇰", &[]),
        ("EE", "Estonia", "🇪🇪", &[]),
        ("FI", "Finland", "🇫🇮", &[]),
        ("FR", "France", "🇫🇷", &[]),
        ("DE", "Germany", "🇩🇪", &["Deutschland"]),
        ("GR", "Greece", "🇬🇷", &[]),
        ("HU", "Hungary", "🇭🇺", &[]),
        ("IS", "Iceland", "🇮🇸", &[]),
        ("IT", "Italy", "🇮🇹", &[]),
        ("LV", "Latvia", "🇱🇻", &[]),
        ("LI", "Liechtenstein", "🇱🇮", &[]),
        ("LT", "Lithuania", "🇱🇹", &[]),
        ("LU", "Luxembourg", "🇱🇺", &[]),
        ("MT", "Malta", "🇲🇹", &[]),
        ("NL", "Netherlands", "🇳🇱", &["Holland", "The Netherlands"]),
        ("NO", "Norway", "🇳🇴", &[]),
        ("PL", "Poland", "🇵🇱", &[]),
        ("PT", "Portugal", "🇵🇹", &[]),
        ("RO", "Romania", "🇷🇴", &[]),
        ("SK", "Slovakia", "🇸🇰", &[]),
        ("SI", "Slovenia", "🇸🇮", &[]),
        ("ES", "Spain", "🇪🇸", &[]),
        ("SE", "Sweden", "🇸🇪", &[]),
        ("CH", "Switzerland", "🇨🇭", &[]),
        // EU outside Schengen
        ("IE", "Ireland", "🇮🇪", &[]),
        ("CY", "Cyprus", "🇨🇾", &[]),
        // Europe, non-EU
        ("GB", "United Kingdom", "🇬🇧", &["UK", "Great Britain", "Britain"]),
        ("AL", "Albania", "🇦🇱", &[]),
        ("AD", "Andorra", "🇦🇩", &[]),
        ("BA", "Bosnia and Herzegovina", "🇧🇦", &["Bosnia"]),
        ("GE", "Georgia", "🇬🇪", &[]),
        ("MD", "Moldova", "🇲🇩", &[]),
        ("MC", "Monaco", "🇲🇨", &[]),
        ("ME", "Montenegro", "🇲🇪", &[]),
        ("MK", "North Macedonia", "🇲🇰", &["Macedonia"]),
        ("SM", "San Marino", "🇸🇲", &[]),
        ("RS", "Serbia", "🇷🇸", &[]),
        ("UA", "Ukraine", "🇺🇦", &[]),
        ("RU", "Russia", "🇷🇺", &["Russian Federation"]),
        ("TR", "Turkey", "🇹🇷", &["Türkiye", "Turkiye"]),
        // Americas
        ("US", "United States", "🇺🇸", &["USA", "United States of America", "America"]),
        ("CA", "Canada", "🇨🇦", &[]),
        ("MX", "Mexico", "🇲🇽", &[]),
        ("AR", "Argentina", "🇦🇷", &[]),
        ("BR", "Brazil", "🇧🇷", &["Brasil"]),
        ("CL", "Chile", "🇨🇱", &[]),
        ("CO", "Colombia", "🇨🇴", &[]),
        ("CR", "Costa Rica", "🇨🇷", &[]),
        ("PA", "Panama", "🇵🇦", &[]),
        ("PY", "Paraguay", "🇵🇾", &[]),
        ("PE", "Peru", "🇵🇪", &[]),
        ("UY", "Uruguay", "🇺🇾", &[]),
        ("JM", "Jamaica", "🇯🇲", &[]),
        // Asia-Pacific
        ("AU", "Australia", "🇦🇺", &[]),
        ("NZ", "New Zealand", "🇳🇿", &[]),
        ("JP", "Japan", "🇯🇵", &[]),
        ("KR", "South Korea", "🇰🇷", &["Korea", "Republic of Korea"]),
        ("SG", "Singapore", "🇸🇬", &[]),
        ("MY", "Malaysia", "🇲🇾", &[]),
        ("BN", "Brunei", "🇧🇳", &["Brunei Darussalam"]),
        ("TW", "Taiwan", "🇹🇼", &[]),
        ("HK", "Hong Kong", "🇭🇰", &[]),
        ("CN", "China", "🇨🇳", &["People's Republic of China"]),
        ("IN", "India", "🇮🇳", &[]),
        ("PK", "Pakistan", "🇵🇰", &[]),
        ("BD", "Bangladesh", "🇧🇩", &[]),
        ("LK", "Sri Lanka", "🇱🇰", &[]),
        ("AF", "Afghanistan", "🇦🇫", &[]),
        ("PH", "Philippines", "🇵🇭", &[]),
        ("ID", "Indonesia", "🇮🇩", &[]),
        ("TH", "Thailand", "🇹🇭", &[]),
        ("VN", "Vietnam", "🇻🇳", &["Viet Nam"]),
        // Middle East
        ("IL", "Israel", "🇮🇱", &[]),
        ("AE", "United Arab Emirates", "🇦🇪", &["UAE"]),
        ("QA", "Qatar", "🇶🇦", &[]),
        ("SA", "Saudi Arabia", "🇸🇦", &[]),
        ("IR", "Iran", "🇮🇷", &[]),
        ("IQ", "Iraq", "🇮🇶", &[]),
        // Africa
        ("NG", "Nigeria", "🇳🇬", &[]),
        ("GH", "Ghana", "🇬🇭", &[]),
        ("BJ", "Benin", "🇧🇯", &[]),
        ("CV", "Cabo Verde", "🇨🇻", &["Cape Verde"]),
        ("CI", "Côte d'Ivoire", "🇨🇮", &["Ivory Coast", "Cote d'Ivoire"]),
        ("GM", "Gambia", "🇬🇲", &["The Gambia"]),
        ("GN", "Guinea", "🇬🇳", &[]),
        ("GW", "Guinea-Bissau", "🇬🇼", &[]),
        ("LR", "Liberia", "🇱🇷", &[]),
        ("SN", "Senegal", "🇸🇳", &[]),
        ("SL", "Sierra Leone", "🇸🇱", &[]),
        ("TG", "Togo", "🇹🇬", &[]),
        ("CD", "DR Congo", "🇨🇩", &["Democratic Republic of the Congo", "Congo-Kinshasa"]),
        ("ER", "Eritrea", "🇪🇷", &[]),
        ("ET", "Ethiopia", "🇪🇹", &[]),
        ("SO", "Somalia", "🇸🇴", &[]),
        ("EG", "Egypt", "🇪🇬", &[]),
        ("KE", "Kenya", "🇰🇪", &[]),
        ("MA", "Morocco", "🇲🇦", &[]),
        ("ZA", "South Africa", "🇿🇦", &[]),
    ];

    rows.iter()
        .map(|(code, name, flag, aliases)| {
            let is_schengen = SCHENGEN_MEMBERS.contains(code);
            Country {
                code: CountryCode::new(code),
                name: name.to_string(),
                slug: String::new(),
                flag: flag.to_string(),
                is_schengen,
                is_eea: is_schengen || EEA_OUTSIDE_SCHENGEN.contains(code),
                aliases: strings(aliases),
            }
        })
        .collect()
}

fn standard_embassies() -> Vec<EmbassyInfo> {
    let rows: &[(&str, &[&str], &str, &str)] = &[
        (
            "FR",
            &["Paris", "Lyon", "Marseille"],
            "https://france-visas.gouv.fr",
            "10-15 business days",
        ),
        (
            "DE",
            &["Berlin", "Munich", "Frankfurt"],
            "https://digital.diplo.de/visa",
            "10-15 business days",
        ),
        (
            "IT",
            &["Rome", "Milan"],
            "https://vistoperitalia.esteri.it",
            "15 business days",
        ),
        (
            "ES",
            &["Madrid", "Barcelona"],
            "https://www.exteriores.gob.es/en/ServiciosAlCiudadano/Paginas/Visados.aspx",
            "15 business days",
        ),
        (
            "NL",
            &["Amsterdam", "The Hague"],
            "https://www.netherlandsworldwide.nl/visa-the-netherlands",
            "15 business days",
        ),
        (
            "GR",
            &["Athens", "Thessaloniki"],
            "https://www.mfa.gr/en/visas/",
            "15-20 business days",
        ),
    ];

    rows.iter()
        .map(|(code, consulates, url, processing)| EmbassyInfo {
            country_code: CountryCode::new(code),
            major_consulates: strings(consulates),
            booking_url: url.to_string(),
            processing_time: processing.to_string(),
        })
        .collect()
}

fn schengen_tables() -> SchengenTables {
    let mut national_visa_categories = BTreeMap::new();
    national_visa_categories.insert(
        TravelPurpose::Study,
        strings(&["Student visa", "Researcher visa", "Language course visa"]),
    );
    national_visa_categories.insert(
        TravelPurpose::Business,
        strings(&["Work permit visa", "EU Blue Card", "Self-employment visa"]),
    );
    national_visa_categories.insert(
        TravelPurpose::Conference,
        strings(&["Work permit visa", "Intra-corporate transfer visa"]),
    );
    national_visa_categories.insert(
        TravelPurpose::Family,
        strings(&["Family reunification visa", "Spouse visa"]),
    );
    national_visa_categories.insert(
        TravelPurpose::Tourism,
        strings(&["Long-stay visitor visa", "Digital nomad visa"]),
    );
    national_visa_categories.insert(
        TravelPurpose::Medical,
        strings(&["Long-stay medical treatment visa"]),
    );

    SchengenTables {
        short_stay_max_days: 90,
        short_stay_processing_time: "15 calendar days (up to 45 in exceptional cases)".to_string(),
        long_stay_processing_time: "4-12 weeks depending on the member state".to_string(),
        default_consulate_processing_time: "15-20 business days".to_string(),
        short_stay_documents: strings(&[
            "Completed Schengen visa application form",
            "Passport valid for 3 months beyond departure with two blank pages",
            "Two recent passport photographs",
            "Travel medical insurance covering at least EUR 30,000",
            "Round-trip flight reservation",
            "Proof of accommodation",
            "Proof of sufficient financial means",
        ]),
        long_stay_documents: strings(&[
            "Completed national visa application form",
            "Passport valid for the full intended stay",
            "Two recent passport photographs",
            "Proof of purpose (admission letter, employment contract, or family documents)",
            "Proof of accommodation for the first months of stay",
            "Health insurance valid in the destination country",
            "Proof of sufficient financial means",
        ]),
        transit_documents: strings(&[
            "Passport valid for 3 months beyond departure",
            "Onward ticket to the final destination",
            "Visa for the final destination, if required",
        ]),
        national_visa_categories,
    }
}

fn united_states_rule() -> DestinationRule {
    DestinationRule {
        destination: CountryCode::new("US"),
        exempt_nationalities: codes(US_VISA_WAIVER),
        exempt_visa_type: VisaType::Esta,
        exempt_max_stay_days: 90,
        exempt_note: Some(
            "Apply for ESTA online at least 72 hours before departure (Canadian citizens are exempt from ESTA)."
                .to_string(),
        ),
        visitor_visa_type: VisaType::UsVisitorVisa,
        visitor_processing_time: "Interview wait times vary by consulate; allow several months"
            .to_string(),
        visitor_documents: strings(&[
            "DS-160 confirmation page",
            "Passport valid for 6 months beyond the intended stay",
            "Visa fee payment receipt",
            "Interview appointment confirmation",
            "Proof of ties to home country",
        ]),
        transit: Some(TransitRule {
            visa_type: VisaType::UsTransitVisa,
            required_nationalities: None,
        }),
        long_stay_visa_type: VisaType::UsNonimmigrantVisa,
        long_stay_processing_time: "2-6 months including petition or school approval".to_string(),
        long_stay_categories: strings(&[
            "F-1 student visa",
            "J-1 exchange visitor visa",
            "H-1B specialty occupation visa",
            "L-1 intracompany transferee visa",
        ]),
        free_movement: None,
    }
}

fn united_kingdom_rule() -> DestinationRule {
    DestinationRule {
        destination: CountryCode::new("GB"),
        exempt_nationalities: codes(UK_NON_VISA_NATIONALS),
        exempt_visa_type: VisaType::UkVisitorExempt,
        exempt_max_stay_days: 180,
        exempt_note: Some(
            "An Electronic Travel Authorisation (ETA) is required before travel.".to_string(),
        ),
        visitor_visa_type: VisaType::UkStandardVisitor,
        visitor_processing_time: "3 weeks (priority services available)".to_string(),
        visitor_documents: strings(&[
            "Online visa application confirmation",
            "Valid passport",
            "Biometric appointment confirmation",
            "Bank statements for the last 6 months",
            "Proof of accommodation and travel plans",
        ]),
        transit: Some(TransitRule {
            visa_type: VisaType::UkDirectAirsideTransit,
            required_nationalities: Some(codes(UK_DIRECT_AIRSIDE_TRANSIT)),
        }),
        long_stay_visa_type: VisaType::UkLongStayVisa,
        long_stay_processing_time: "3-8 weeks".to_string(),
        long_stay_categories: strings(&[
            "Student visa",
            "Skilled Worker visa",
            "Family visa",
            "Global Talent visa",
        ]),
        free_movement: None,
    }
}

fn nigeria_rule() -> DestinationRule {
    DestinationRule {
        destination: CountryCode::new("NG"),
        exempt_nationalities: BTreeSet::new(),
        exempt_visa_type: VisaType::VisaFree,
        exempt_max_stay_days: 90,
        exempt_note: None,
        visitor_visa_type: VisaType::NigeriaEVisa,
        visitor_processing_time: "48 hours to 5 business days".to_string(),
        visitor_documents: strings(&[
            "Online e-Visa application",
            "Passport valid for 6 months with two blank pages",
            "Return ticket",
            "Hotel booking or invitation letter",
            "Proof of funds",
        ]),
        transit: None,
        long_stay_visa_type: VisaType::NigeriaResidenceVisa,
        long_stay_processing_time: "2-4 weeks".to_string(),
        long_stay_categories: strings(&[
            "Subject to Regularization (STR) visa",
            "Temporary Work Permit",
            "Combined Expatriate Residence Permit and Aliens Card (CERPAC)",
        ]),
        free_movement: Some(FreeMovementBloc {
            bloc: "ECOWAS".to_string(),
            visa_type: VisaType::EcowasFreeMovement,
            members: codes(ECOWAS_MEMBERS),
            max_stay_days: 90,
            note: "ECOWAS citizens may enter Nigeria with a valid passport or ECOWAS travel certificate."
                .to_string(),
        }),
    }
}
