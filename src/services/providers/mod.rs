use std::collections::BTreeMap;

use chrono::NaiveDate;

/// External collaborator abstractions
///
/// The orchestrator only ever talks to the outside world through these two
/// traits, so tests can substitute deterministic fakes without touching
/// process-wide state.
use crate::{
    error::AppResult,
    models::{GeneratedDay, ProfileSnapshot, WardrobeItem, WeatherConditions},
};

pub mod open_meteo;
pub mod openai;

/// Per-day weather lookup for a location
///
/// Expected to be deterministic per (location, date) within one
/// orchestration call; real forecasts drifting between calls is fine.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn weather_for_date(&self, location: &str, date: NaiveDate)
        -> AppResult<WeatherConditions>;
}

/// One request to the external outfit generator, covering the whole
/// date range of an orchestration call
#[derive(Debug, Clone)]
pub struct GeneratorRequest {
    pub profile: ProfileSnapshot,
    pub wardrobe: Vec<WardrobeItem>,
    pub scenario: String,
    pub weather_by_date: BTreeMap<NaiveDate, WeatherConditions>,
}

/// Failures of the external generator call
///
/// These are never surfaced to API callers; the orchestrator recovers every
/// variant by falling back to rule-based outfits.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("generator request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("generator returned an empty completion")]
    EmptyCompletion,

    #[error("generator output could not be parsed: {0}")]
    Malformed(String),
}

/// Untrusted external outfit generator
///
/// Implementations return raw per-day proposals; validation against the
/// wardrobe snapshot is the merger's job, not theirs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OutfitGenerator: Send + Sync {
    async fn generate_outfits(
        &self,
        request: &GeneratorRequest,
    ) -> Result<Vec<GeneratedDay>, GeneratorError>;
}
