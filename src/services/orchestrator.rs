use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{GeneratedDay, OutfitSuggestion, SuggestionRequest, WeatherConditions},
    services::{
        builder::{self, BuildContext, BuildOptions},
        merge, scoring,
        providers::{GeneratorRequest, OutfitGenerator, WeatherProvider},
    },
};

/// Weather location used when the profile has none configured
const DEFAULT_LOCATION: &str = "Istanbul";

/// Drives outfit generation across a date range
///
/// Collaborators are injected so tests can run against deterministic fakes.
/// The external generator is optional; without one, every day is served by
/// the rule-based builder directly.
pub struct OutfitOrchestrator {
    weather: Arc<dyn WeatherProvider>,
    generator: Option<Arc<dyn OutfitGenerator>>,
}

impl OutfitOrchestrator {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        generator: Option<Arc<dyn OutfitGenerator>>,
    ) -> Self {
        Self { weather, generator }
    }

    /// Produces one suggestion per date in the inclusive requested range,
    /// ascending
    ///
    /// Weather lookup failures are fatal and propagate to the caller; a
    /// failing or unavailable generator is recovered by falling back to
    /// rule-based outfits for the whole range.
    pub async fn generate(&self, request: &SuggestionRequest) -> AppResult<Vec<OutfitSuggestion>> {
        let start = request.start_date;
        let end = request.end_date.unwrap_or(start);
        if end < start {
            return Err(AppError::InvalidInput(format!(
                "end_date {} precedes start_date {}",
                end, start
            )));
        }

        let location = request
            .profile
            .location_city
            .as_deref()
            .unwrap_or(DEFAULT_LOCATION);

        // One fetch per day, ascending; each suggestion later reuses the
        // value fetched for its date so a day's output stays internally
        // consistent even if the forecast changes mid-request.
        let mut weather_by_date = BTreeMap::new();
        let mut cursor = start;
        while cursor <= end {
            let conditions = self.weather.weather_for_date(location, cursor).await?;
            weather_by_date.insert(cursor, conditions);
            cursor = cursor
                .succ_opt()
                .ok_or_else(|| AppError::Internal("date range overflow".to_string()))?;
        }

        tracing::info!(
            days = weather_by_date.len(),
            location = %location,
            scenario = %request.scenario,
            "Weather fetched for suggestion range"
        );

        let generated = self.call_generator(request, &weather_by_date).await;

        let formality = scoring::scenario_formality(&request.scenario);
        let options = BuildOptions {
            enforce_outerwear: false,
            encourage_accessories: scoring::encourage_accessories(&request.scenario),
        };

        let mut suggestions = Vec::with_capacity(weather_by_date.len());
        for (date, weather) in &weather_by_date {
            let season = scoring::infer_season(Some(weather), *date);
            let ctx = BuildContext {
                wardrobe: &request.wardrobe,
                season,
                formality,
                weather: Some(weather),
            };

            let day = generated.as_ref().and_then(|days| days.get(date));
            let items = match day {
                Some(day) => merge::merge_with_baseline(&day.items, &ctx, &options),
                None => builder::build_outfit(&ctx, &options),
            };

            let notes = day
                .map(|day| day.notes.trim())
                .filter(|notes| !notes.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| scoring::compose_note(Some(weather), formality, season));

            suggestions.push(OutfitSuggestion {
                date: *date,
                items,
                notes,
                weather: weather.clone(),
            });
        }

        Ok(suggestions)
    }

    /// Calls the external generator once for the whole range, if configured
    ///
    /// Returns the generated days keyed by date, or `None` when no generator
    /// is available or the call failed; the caller branches to the
    /// rule-based path in both cases.
    async fn call_generator(
        &self,
        request: &SuggestionRequest,
        weather_by_date: &BTreeMap<NaiveDate, WeatherConditions>,
    ) -> Option<BTreeMap<NaiveDate, GeneratedDay>> {
        let generator = self.generator.as_ref()?;

        let generator_request = GeneratorRequest {
            profile: request.profile.clone(),
            wardrobe: request.wardrobe.clone(),
            scenario: request.scenario.clone(),
            weather_by_date: weather_by_date.clone(),
        };

        match generator.generate_outfits(&generator_request).await {
            Ok(days) => {
                tracing::info!(days = days.len(), "External generator returned proposals");
                Some(days.into_iter().map(|day| (day.date, day)).collect())
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "External generator unavailable, serving rule-based outfits"
                );
                None
            }
        }
    }
}
