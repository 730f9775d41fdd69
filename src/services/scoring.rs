use chrono::{Datelike, NaiveDate};

use crate::models::{Formality, Season, WeatherConditions};

/// Scores how well an item's season tag fits the target season
///
/// All-season items are always a decent pick, exact matches win, adjacent
/// seasons are tolerable, and off-season items are penalized hard enough
/// that anything else in the wardrobe beats them.
pub fn season_score(item: Season, target: Season) -> i32 {
    if item == Season::AllSeasons {
        return 3;
    }
    if item == target {
        return 5;
    }
    if is_adjacent(item, target) {
        2
    } else {
        -4
    }
}

/// Seasons adjacent to the target on the calendar wheel
fn is_adjacent(item: Season, target: Season) -> bool {
    match target {
        Season::Spring => matches!(item, Season::Summer | Season::Winter),
        Season::Summer => matches!(item, Season::Spring | Season::Autumn),
        Season::Autumn => matches!(item, Season::Summer | Season::Winter),
        Season::Winter => matches!(item, Season::Autumn | Season::Spring),
        Season::AllSeasons => true,
    }
}

/// Scores how well an item's formality tag fits the desired formality
///
/// Fixed compatibility table; any pairing not listed is a mismatch worth -3.
pub fn formality_score(item: Formality, desired: Formality) -> i32 {
    use Formality::*;

    match (desired, item) {
        (Casual, Casual) => 6,
        (Casual, Sport) => 4,
        (Casual, Office) => 2,
        (Casual, Special) => 1,
        (Office, Office) => 6,
        (Office, Special) => 4,
        (Office, Casual) => 3,
        (Sport, Sport) => 6,
        (Sport, Casual) => 4,
        (Special, Special) => 6,
        (Special, Office) => 3,
        (Special, Casual) => 2,
        _ => -3,
    }
}

/// Derives the target season for one day
///
/// Prefers the forecast (average of min/max temperature); falls back to the
/// calendar month when no weather is available.
pub fn infer_season(weather: Option<&WeatherConditions>, date: NaiveDate) -> Season {
    let Some(weather) = weather else {
        return season_for_month(date.month());
    };

    let avg = (weather.temperature_min_c + weather.temperature_max_c) / 2.0;
    if avg <= 6.0 {
        Season::Winter
    } else if avg <= 15.0 {
        Season::Autumn
    } else if avg >= 24.0 {
        Season::Summer
    } else {
        Season::Spring
    }
}

fn season_for_month(month: u32) -> Season {
    match month {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => Season::Winter,
    }
}

/// Maps the caller-supplied scenario tag to a desired formality
///
/// Unrecognized scenarios default to casual rather than failing the request.
pub fn scenario_formality(scenario: &str) -> Formality {
    match scenario.to_ascii_lowercase().as_str() {
        "office" => Formality::Office,
        "special" => Formality::Special,
        "daily" | "travel" => Formality::Casual,
        _ => Formality::Casual,
    }
}

/// Accessories are only actively suggested for special occasions
pub fn encourage_accessories(scenario: &str) -> bool {
    scenario.eq_ignore_ascii_case("special")
}

/// Builds the human-readable note attached to a suggestion when the external
/// generator supplied no usable one
pub fn compose_note(
    weather: Option<&WeatherConditions>,
    formality: Formality,
    season: Season,
) -> String {
    let mut parts = vec![format!("Style: {}", formality.to_string().to_lowercase())];
    if let Some(weather) = weather {
        parts.push(format!(
            "Temperature {}-{}°C, precipitation {}%",
            weather.temperature_min_c.round() as i64,
            weather.temperature_max_c.round() as i64,
            (weather.precipitation_chance * 100.0).round() as i64,
        ));
    }
    parts.push(format!("Suggested season: {}", season.to_string().to_lowercase()));
    parts.join(" · ")
}
