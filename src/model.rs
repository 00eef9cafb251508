// Core structs: Candidate, BusinessRecord, classification tiers and error enums
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog a candidate or external reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Yelp,
    GooglePlaces,
    MiamiBeachApi,
    Foursquare,
    Manual,
}

impl Source {
    pub const ALL: [Source; 5] = [
        Source::Yelp,
        Source::GooglePlaces,
        Source::MiamiBeachApi,
        Source::Foursquare,
        Source::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Yelp => "yelp",
            Source::GooglePlaces => "google_places",
            Source::MiamiBeachApi => "miami_beach_api",
            Source::Foursquare => "foursquare",
            Source::Manual => "manual",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| format!("unknown source '{}'", s))
    }
}

/// Controlled cuisine / venue-type vocabulary. `Delete` marks rows that should be purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    American,
    Italian,
    Pizza,
    Japanese,
    Chinese,
    Thai,
    Vietnamese,
    Korean,
    #[serde(rename = "Asian Fusion")]
    AsianFusion,
    Indian,
    Mexican,
    Cuban,
    Latin,
    Peruvian,
    Argentinian,
    Brazilian,
    Venezuelan,
    Colombian,
    Caribbean,
    Spanish,
    French,
    Mediterranean,
    Greek,
    #[serde(rename = "Middle Eastern")]
    MiddleEastern,
    Seafood,
    Steakhouse,
    Burgers,
    #[serde(rename = "BBQ")]
    Bbq,
    Deli,
    Cafe,
    Bakery,
    Dessert,
    #[serde(rename = "Breakfast & Brunch")]
    Breakfast,
    Vegan,
    #[serde(rename = "Fast Food")]
    FastFood,
    Bar,
    Other,
    Delete,
}

impl Cuisine {
    pub const ALL: [Cuisine; 38] = [
        Cuisine::American,
        Cuisine::Italian,
        Cuisine::Pizza,
        Cuisine::Japanese,
        Cuisine::Chinese,
        Cuisine::Thai,
        Cuisine::Vietnamese,
        Cuisine::Korean,
        Cuisine::AsianFusion,
        Cuisine::Indian,
        Cuisine::Mexican,
        Cuisine::Cuban,
        Cuisine::Latin,
        Cuisine::Peruvian,
        Cuisine::Argentinian,
        Cuisine::Brazilian,
        Cuisine::Venezuelan,
        Cuisine::Colombian,
        Cuisine::Caribbean,
        Cuisine::Spanish,
        Cuisine::French,
        Cuisine::Mediterranean,
        Cuisine::Greek,
        Cuisine::MiddleEastern,
        Cuisine::Seafood,
        Cuisine::Steakhouse,
        Cuisine::Burgers,
        Cuisine::Bbq,
        Cuisine::Deli,
        Cuisine::Cafe,
        Cuisine::Bakery,
        Cuisine::Dessert,
        Cuisine::Breakfast,
        Cuisine::Vegan,
        Cuisine::FastFood,
        Cuisine::Bar,
        Cuisine::Other,
        Cuisine::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cuisine::American => "American",
            Cuisine::Italian => "Italian",
            Cuisine::Pizza => "Pizza",
            Cuisine::Japanese => "Japanese",
            Cuisine::Chinese => "Chinese",
            Cuisine::Thai => "Thai",
            Cuisine::Vietnamese => "Vietnamese",
            Cuisine::Korean => "Korean",
            Cuisine::AsianFusion => "Asian Fusion",
            Cuisine::Indian => "Indian",
            Cuisine::Mexican => "Mexican",
            Cuisine::Cuban => "Cuban",
            Cuisine::Latin => "Latin",
            Cuisine::Peruvian => "Peruvian",
            Cuisine::Argentinian => "Argentinian",
            Cuisine::Brazilian => "Brazilian",
            Cuisine::Venezuelan => "Venezuelan",
            Cuisine::Colombian => "Colombian",
            Cuisine::Caribbean => "Caribbean",
            Cuisine::Spanish => "Spanish",
            Cuisine::French => "French",
            Cuisine::Mediterranean => "Mediterranean",
            Cuisine::Greek => "Greek",
            Cuisine::MiddleEastern => "Middle Eastern",
            Cuisine::Seafood => "Seafood",
            Cuisine::Steakhouse => "Steakhouse",
            Cuisine::Burgers => "Burgers",
            Cuisine::Bbq => "BBQ",
            Cuisine::Deli => "Deli",
            Cuisine::Cafe => "Cafe",
            Cuisine::Bakery => "Bakery",
            Cuisine::Dessert => "Dessert",
            Cuisine::Breakfast => "Breakfast & Brunch",
            Cuisine::Vegan => "Vegan",
            Cuisine::FastFood => "Fast Food",
            Cuisine::Bar => "Bar",
            Cuisine::Other => "Other",
            Cuisine::Delete => "Delete",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

fn vocabulary_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Cuisine {
    type Err = String;

    /// Accepts the display form in any case and spacing ("asian fusion", "Fast-Food").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = vocabulary_key(s);
        Cuisine::ALL
            .into_iter()
            .find(|cuisine| vocabulary_key(cuisine.as_str()) == wanted)
            .ok_or_else(|| format!("unknown cuisine '{}'", s))
    }
}

/// Five-level ordinal price scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    One,
    #[serde(rename = "$$")]
    Two,
    #[serde(rename = "$$$")]
    Three,
    #[serde(rename = "$$$$")]
    Four,
    #[serde(rename = "$$$$$")]
    Five,
}

impl PriceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::One => "$",
            PriceTier::Two => "$$",
            PriceTier::Three => "$$$",
            PriceTier::Four => "$$$$",
            PriceTier::Five => "$$$$$",
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            PriceTier::One => 1,
            PriceTier::Two => 2,
            PriceTier::Three => 3,
            PriceTier::Four => 4,
            PriceTier::Five => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(PriceTier::One),
            2 => Some(PriceTier::Two),
            3 => Some(PriceTier::Three),
            4 => Some(PriceTier::Four),
            5 => Some(PriceTier::Five),
            _ => None,
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c == '$') {
            return Err(format!("invalid price tier '{}'", s));
        }
        u8::try_from(trimmed.len())
            .ok()
            .and_then(PriceTier::from_level)
            .ok_or_else(|| format!("invalid price tier '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Price as reported by a provider, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceSignal {
    /// Dollar-sign scale, e.g. Yelp's "$$".
    Symbols(String),
    /// Numeric scale, e.g. Google's 0–4 `price_level`.
    Level(i64),
}

/// An incoming record from a catalog provider, not yet normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub source: Source,
    pub external_ref: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub categories: Vec<String>,
    pub price: Option<PriceSignal>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
}

impl Candidate {
    pub fn new(source: Source, name: impl Into<String>) -> Self {
        Self {
            source,
            external_ref: None,
            name: name.into(),
            description: None,
            categories: Vec::new(),
            price: None,
            address: None,
            phone: None,
            website: None,
            coordinates: None,
            rating: None,
            review_count: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Contact and popularity fields shared by drafts and stored records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
}

/// Classification written by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub primary_cuisine: Cuisine,
    pub secondary_cuisine: Option<Cuisine>,
    pub price_tier: Option<PriceTier>,
    pub neighborhood: String,
}

/// Classification written by the review step. Set fields win over the inferred tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOverride {
    pub primary_cuisine: Option<Cuisine>,
    pub secondary_cuisine: Option<Cuisine>,
    pub price_tier: Option<PriceTier>,
    pub neighborhood: Option<String>,
}

impl ClassificationOverride {
    pub fn is_empty(&self) -> bool {
        self.primary_cuisine.is_none()
            && self.secondary_cuisine.is_none()
            && self.price_tier.is_none()
            && self.neighborhood.is_none()
    }
}

/// A record ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub details: VenueDetails,
    pub inferred: Classification,
    pub external_refs: BTreeMap<Source, String>,
    pub review_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub id: RecordId,
    pub details: VenueDetails,
    pub inferred: Classification,
    pub overrides: ClassificationOverride,
    pub external_refs: BTreeMap<Source, String>,
    pub needs_review: bool,
    pub review_reason: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl BusinessRecord {
    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn primary_cuisine(&self) -> Cuisine {
        self.overrides
            .primary_cuisine
            .unwrap_or(self.inferred.primary_cuisine)
    }

    pub fn secondary_cuisine(&self) -> Option<Cuisine> {
        self.overrides
            .secondary_cuisine
            .or(self.inferred.secondary_cuisine)
    }

    pub fn price_tier(&self) -> Option<PriceTier> {
        self.overrides.price_tier.or(self.inferred.price_tier)
    }

    pub fn neighborhood(&self) -> &str {
        self.overrides
            .neighborhood
            .as_deref()
            .unwrap_or(&self.inferred.neighborhood)
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("provider responded with status {0}")]
    InvalidResponse(u16),
    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParserError),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("external reference {provider}:{external_ref} already belongs to another record")]
    DuplicateExternalRef { provider: Source, external_ref: String },
    #[error("record {0} not found")]
    NotFound(RecordId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("failed to read overrides: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse overrides: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("record {id}: '{name}' is not a known neighborhood")]
    UnknownNeighborhood { id: RecordId, name: String },
    #[error("record {0}: override sets nothing")]
    EmptyOverride(RecordId),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
