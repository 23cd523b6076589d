use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized ISO 3166-1 alpha-2 country key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CountryCode(pub String);

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl CountryCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Static country metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: CountryCode,
    pub name: String,
    pub slug: String,
    pub flag: String,
    #[serde(default)]
    pub is_schengen: bool,
    /// EU/EEA/Swiss nationals enjoy free movement across the Schengen area.
    #[serde(default)]
    pub is_eea: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Consulate booking metadata. Only present for Schengen members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbassyInfo {
    pub country_code: CountryCode,
    pub major_consulates: Vec<String>,
    pub booking_url: String,
    pub processing_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TravelPurpose {
    Tourism,
    Business,
    Study,
    Family,
    Conference,
    Transit,
    Medical,
}

impl TravelPurpose {
    pub const ALL: [TravelPurpose; 7] = [
        TravelPurpose::Tourism,
        TravelPurpose::Business,
        TravelPurpose::Study,
        TravelPurpose::Family,
        TravelPurpose::Conference,
        TravelPurpose::Transit,
        TravelPurpose::Medical,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            TravelPurpose::Tourism => "tourism",
            TravelPurpose::Business => "business",
            TravelPurpose::Study => "study",
            TravelPurpose::Family => "family",
            TravelPurpose::Conference => "conference",
            TravelPurpose::Transit => "transit",
            TravelPurpose::Medical => "medical",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.label() == needle)
    }

    pub const fn is_business(self) -> bool {
        matches!(self, TravelPurpose::Business | TravelPurpose::Conference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StayDuration {
    SingleShort,
    SingleMedium,
    MultipleShort,
    MultipleLong,
    LongStay,
    Transit,
}

impl StayDuration {
    pub const ALL: [StayDuration; 6] = [
        StayDuration::SingleShort,
        StayDuration::SingleMedium,
        StayDuration::MultipleShort,
        StayDuration::MultipleLong,
        StayDuration::LongStay,
        StayDuration::Transit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            StayDuration::SingleShort => "single-short",
            StayDuration::SingleMedium => "single-medium",
            StayDuration::MultipleShort => "multiple-short",
            StayDuration::MultipleLong => "multiple-long",
            StayDuration::LongStay => "long-stay",
            StayDuration::Transit => "transit",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|duration| duration.label() == needle)
    }

    pub const fn category(self) -> StayCategory {
        match self {
            StayDuration::Transit => StayCategory::Transit,
            StayDuration::LongStay => StayCategory::LongStay,
            _ => StayCategory::ShortStay,
        }
    }

    pub const fn multiple_entries(self) -> bool {
        matches!(self, StayDuration::MultipleShort | StayDuration::MultipleLong)
    }
}

/// Evaluation path selected from the requested duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayCategory {
    ShortStay,
    LongStay,
    Transit,
}

/// One visa lookup as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaQuery {
    pub nationality: String,
    pub destination: String,
    pub purpose: TravelPurpose,
    pub duration: StayDuration,
}

/// Tri-state outcome so callers can tell a confident answer from a data gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    Required,
    NotRequired,
    Unknown,
}

impl Requirement {
    pub const fn label(self) -> &'static str {
        match self {
            Requirement::Required => "required",
            Requirement::NotRequired => "not-required",
            Requirement::Unknown => "unknown-verify-manually",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    High,
    Low,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisaType {
    FreeMovement,
    VisaFree,
    SchengenVisa,
    NationalVisa,
    AirportTransitVisa,
    Esta,
    UsVisitorVisa,
    UsTransitVisa,
    UsNonimmigrantVisa,
    UkVisitorExempt,
    UkStandardVisitor,
    UkDirectAirsideTransit,
    UkLongStayVisa,
    EcowasFreeMovement,
    NigeriaEVisa,
    NigeriaResidenceVisa,
    Unknown,
}

impl VisaType {
    pub const fn label(self) -> &'static str {
        match self {
            VisaType::FreeMovement => "free-movement",
            VisaType::VisaFree => "visa-free",
            VisaType::SchengenVisa => "schengen-visa",
            VisaType::NationalVisa => "national-visa",
            VisaType::AirportTransitVisa => "airport-transit-visa",
            VisaType::Esta => "esta",
            VisaType::UsVisitorVisa => "us-visitor-visa",
            VisaType::UsTransitVisa => "us-transit-visa",
            VisaType::UsNonimmigrantVisa => "us-nonimmigrant-visa",
            VisaType::UkVisitorExempt => "uk-visitor-exempt",
            VisaType::UkStandardVisitor => "uk-standard-visitor",
            VisaType::UkDirectAirsideTransit => "uk-direct-airside-transit",
            VisaType::UkLongStayVisa => "uk-long-stay-visa",
            VisaType::EcowasFreeMovement => "ecowas-free-movement",
            VisaType::NigeriaEVisa => "nigeria-e-visa",
            VisaType::NigeriaResidenceVisa => "nigeria-residence-visa",
            VisaType::Unknown => "unknown",
        }
    }

    /// Human-facing name used in messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            VisaType::FreeMovement => "EU/EEA free movement",
            VisaType::VisaFree => "Visa-free entry",
            VisaType::SchengenVisa => "Schengen visa (Type C)",
            VisaType::NationalVisa => "National visa (Type D)",
            VisaType::AirportTransitVisa => "Airport transit visa (Type A)",
            VisaType::Esta => "ESTA (Visa Waiver Program)",
            VisaType::UsVisitorVisa => "B-1/B-2 visitor visa",
            VisaType::UsTransitVisa => "C-1 transit visa",
            VisaType::UsNonimmigrantVisa => "Nonimmigrant visa (F/J/H/L categories)",
            VisaType::UkVisitorExempt => "UK visitor (visa-exempt, ETA)",
            VisaType::UkStandardVisitor => "UK Standard Visitor visa",
            VisaType::UkDirectAirsideTransit => "UK Direct Airside Transit visa",
            VisaType::UkLongStayVisa => "UK long-stay visa (Student, Skilled Worker or Family)",
            VisaType::EcowasFreeMovement => "ECOWAS free movement",
            VisaType::NigeriaEVisa => "Nigeria e-Visa",
            VisaType::NigeriaResidenceVisa => "Nigeria Subject to Regularization (STR) visa",
            VisaType::Unknown => "Unknown",
        }
    }
}

/// Result of a single evaluation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaResult {
    pub nationality: String,
    pub destination: String,
    pub required: bool,
    pub requirement: Requirement,
    pub confidence: Confidence,
    #[serde(rename = "type")]
    pub visa_type: VisaType,
    pub is_schengen: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stay_days: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_visa_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_movement: Option<RegionalMovement>,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default)]
    pub escalated_by_purpose: bool,
}

impl VisaResult {
    pub(crate) fn new(
        nationality: impl Into<String>,
        destination: impl Into<String>,
        requirement: Requirement,
        visa_type: VisaType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            nationality: nationality.into(),
            destination: destination.into(),
            required: requirement == Requirement::Required,
            requirement,
            confidence: match requirement {
                Requirement::Unknown => Confidence::None,
                _ => Confidence::High,
            },
            visa_type,
            is_schengen: false,
            message: message.into(),
            max_stay_days: None,
            processing_time: None,
            documents: None,
            national_visa_categories: None,
            regional_movement: None,
            fallback: false,
            escalated_by_purpose: false,
        }
    }

    pub(crate) fn set_requirement(&mut self, requirement: Requirement) {
        self.requirement = requirement;
        self.required = requirement == Requirement::Required;
    }

    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: {} ({})",
            self.nationality,
            self.destination,
            self.requirement.label(),
            self.visa_type.display_name()
        )
    }
}

/// Bloc-level movement rights attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalMovement {
    pub bloc: String,
    pub unrestricted: bool,
    pub note: String,
}

/// Multi-country Schengen itinerary submitted for consulate selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchengenTripData {
    pub selected_countries: Vec<String>,
    #[serde(default)]
    pub nights_distribution: BTreeMap<String, u32>,
    #[serde(default)]
    pub business_location: Option<String>,
    pub entry_point: String,
    pub purpose: TravelPurpose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsulateChoice {
    pub country: CountryCode,
    pub country_name: String,
    pub reasoning: String,
    pub booking_url: String,
    pub processing_time: String,
    #[serde(default)]
    pub embassy_data_missing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsulateRecommendation {
    pub primary_consulate: ConsulateChoice,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<ConsulateChoice>,
    pub expert_consultation_needed: bool,
}
