use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Clothing category of a wardrobe item
///
/// Wardrobe payloads are normalized upstream, so deserialization is strict:
/// an unknown category is a request error, not something scoring has to
/// tolerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Socks,
    Accessory,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Top => "TOP",
            Category::Bottom => "BOTTOM",
            Category::Dress => "DRESS",
            Category::Outerwear => "OUTERWEAR",
            Category::Shoes => "SHOES",
            Category::Socks => "SOCKS",
            Category::Accessory => "ACCESSORY",
        };
        write!(f, "{}", name)
    }
}

/// Season tag carried by a wardrobe item, or the target season derived
/// from weather for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    AllSeasons,
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Season::Spring => "SPRING",
            Season::Summer => "SUMMER",
            Season::Autumn => "AUTUMN",
            Season::Winter => "WINTER",
            Season::AllSeasons => "ALL_SEASONS",
        };
        write!(f, "{}", name)
    }
}

/// Formality tag carried by a wardrobe item, or the desired formality
/// derived from the requested scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Formality {
    Casual,
    Office,
    Sport,
    Special,
}

impl Display for Formality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Formality::Casual => "CASUAL",
            Formality::Office => "OFFICE",
            Formality::Sport => "SPORT",
            Formality::Special => "SPECIAL",
        };
        write!(f, "{}", name)
    }
}

/// Functional slot an item occupies within one outfit
///
/// Unlike the wardrobe enums, roles also arrive from the untrusted external
/// generator as free-form strings; [`OutfitRole::from_raw`] maps anything
/// unrecognized to `Other` so malformed input never propagates as a raw
/// string through the selection logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutfitRole {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Socks,
    Accessory,
    Other,
}

impl OutfitRole {
    /// Lenient parse for generator-supplied role strings
    pub fn from_raw(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "TOP" => OutfitRole::Top,
            "BOTTOM" => OutfitRole::Bottom,
            "DRESS" => OutfitRole::Dress,
            "OUTERWEAR" => OutfitRole::Outerwear,
            "SHOES" => OutfitRole::Shoes,
            "SOCKS" => OutfitRole::Socks,
            "ACCESSORY" => OutfitRole::Accessory,
            _ => OutfitRole::Other,
        }
    }
}

/// A single owned clothing piece from the profile's wardrobe snapshot
///
/// Snapshots are read-only for the recommendation core; items are never
/// mutated, only scored and referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: String,
    pub category: Category,
    pub color: String,
    pub season: Season,
    pub formality: Formality,
    pub image_url: String,
}

/// Forecast for one calendar day at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub date: NaiveDate,
    pub summary: String,
    pub temperature_min_c: f64,
    pub temperature_max_c: f64,
    /// Probability in 0.0..=1.0
    pub precipitation_chance: f64,
    pub wind_speed_kph: f64,
}

/// Profile details forwarded to the external generator and used to pick
/// the weather location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub style_preferences: Vec<String>,
    #[serde(default)]
    pub location_city: Option<String>,
}

/// One role assignment within a day's outfit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitItem {
    pub cloth_item_id: String,
    pub role: OutfitRole,
}

/// One day's final recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub date: NaiveDate,
    pub items: Vec<OutfitItem>,
    pub notes: String,
    pub weather: WeatherConditions,
}

/// Request to generate outfit suggestions for a date range
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionRequest {
    pub profile: ProfileSnapshot,
    pub wardrobe: Vec<WardrobeItem>,
    pub scenario: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Response with one suggestion per requested date, ascending
#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<OutfitSuggestion>,
}

// ============================================================================
// External Generator Wire Types
// ============================================================================

/// One untrusted role/item proposal from the external generator
///
/// The role stays a raw string until the merger parses it; ids may reference
/// items that do not exist in the wardrobe.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedItem {
    #[serde(default)]
    pub cloth_item_id: String,
    #[serde(default)]
    pub role: String,
}

/// One day of generator output after boundary parsing (date validated,
/// everything else still untrusted)
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDay {
    pub date: NaiveDate,
    pub notes: String,
    pub items: Vec<ProposedItem>,
}
