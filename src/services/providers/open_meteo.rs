/// Open-Meteo weather provider
///
/// Two-step lookup: the free geocoding endpoint resolves a city name to
/// coordinates once per process, then the forecast endpoint is queried for
/// the single requested day. Daily aggregates map directly onto
/// [`WeatherConditions`]; WMO weather codes are collapsed into a short
/// human-readable summary.
use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::WeatherConditions,
    services::providers::WeatherProvider,
};

pub struct OpenMeteoProvider {
    http_client: HttpClient,
    api_url: String,
    geocoding_url: String,
    /// City name (lowercased) to coordinates, resolved lazily
    coordinates: RwLock<HashMap<String, (f64, f64)>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyForecast,
}

#[derive(Debug, Deserialize)]
struct DailyForecast {
    time: Vec<NaiveDate>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<f64>,
}

impl OpenMeteoProvider {
    pub fn new(api_url: String, geocoding_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            geocoding_url,
            coordinates: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves a city name to coordinates, memoizing the answer
    async fn resolve_coordinates(&self, location: &str) -> AppResult<(f64, f64)> {
        let key = location.to_lowercase();

        if let Some(&coords) = self.coordinates.read().await.get(&key) {
            return Ok(coords);
        }

        let url = format!("{}/v1/search", self.geocoding_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("name", location), ("count", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Geocoding API returned status {}: {}",
                status, body
            )));
        }

        let geocoding: GeocodingResponse = response.json().await?;
        let result = geocoding
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Location '{}' not found", location)))?;

        let coords = (result.latitude, result.longitude);
        self.coordinates.write().await.insert(key, coords);

        tracing::debug!(
            location = %location,
            latitude = coords.0,
            longitude = coords.1,
            "Resolved location coordinates"
        );

        Ok(coords)
    }

    /// Converts the daily-aggregate arrays into conditions for one day
    fn convert_forecast(
        &self,
        date: NaiveDate,
        forecast: ForecastResponse,
    ) -> AppResult<WeatherConditions> {
        let daily = forecast.daily;
        let index = daily
            .time
            .iter()
            .position(|d| *d == date)
            .ok_or_else(|| {
                AppError::ExternalApi(format!("Forecast response missing requested date {}", date))
            })?;

        let code = daily.weather_code.get(index).copied().ok_or_else(|| {
            AppError::ExternalApi("Forecast response missing weather code".to_string())
        })?;
        let max = daily.temperature_2m_max.get(index).copied().ok_or_else(|| {
            AppError::ExternalApi("Forecast response missing max temperature".to_string())
        })?;
        let min = daily.temperature_2m_min.get(index).copied().ok_or_else(|| {
            AppError::ExternalApi("Forecast response missing min temperature".to_string())
        })?;
        let wind = daily.wind_speed_10m_max.get(index).copied().ok_or_else(|| {
            AppError::ExternalApi("Forecast response missing wind speed".to_string())
        })?;

        // probability arrives as a percentage and may be null far out in
        // the forecast horizon
        let precipitation_chance = daily
            .precipitation_probability_max
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(0.0)
            / 100.0;

        Ok(WeatherConditions {
            date,
            summary: describe_weather_code(code).to_string(),
            temperature_min_c: min,
            temperature_max_c: max,
            precipitation_chance,
            wind_speed_kph: wind,
        })
    }
}

/// Human-readable summary for a WMO weather interpretation code
fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 | 2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51..=57 => "Drizzle",
        61..=67 => "Rain",
        71..=77 => "Snow",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95..=99 => "Thunderstorm",
        _ => "Changeable",
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn weather_for_date(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> AppResult<WeatherConditions> {
        let (latitude, longitude) = self.resolve_coordinates(location).await?;

        let date_param = date.format("%Y-%m-%d").to_string();
        let url = format!("{}/v1/forecast", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string().as_str()),
                ("longitude", longitude.to_string().as_str()),
                (
                    "daily",
                    "weather_code,temperature_2m_max,temperature_2m_min,\
                     precipitation_probability_max,wind_speed_10m_max",
                ),
                ("timezone", "UTC"),
                ("start_date", date_param.as_str()),
                ("end_date", date_param.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                location = %location,
                date = %date,
                status = %status,
                body = %body,
                "Weather API request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "Weather API returned status {}: {}",
                status, body
            )));
        }

        let forecast: ForecastResponse = response.json().await?;
        let conditions = self.convert_forecast(date, forecast)?;

        tracing::debug!(
            location = %location,
            date = %date,
            summary = %conditions.summary,
            min_c = conditions.temperature_min_c,
            max_c = conditions.temperature_max_c,
            "Weather fetched"
        );

        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> OpenMeteoProvider {
        OpenMeteoProvider::new(
            "http://test.local".to_string(),
            "http://geo.test.local".to_string(),
        )
    }

    fn forecast_for(date: NaiveDate) -> ForecastResponse {
        ForecastResponse {
            daily: DailyForecast {
                time: vec![date],
                weather_code: vec![61],
                temperature_2m_max: vec![17.5],
                temperature_2m_min: vec![9.0],
                precipitation_probability_max: vec![Some(55.0)],
                wind_speed_10m_max: vec![22.0],
            },
        }
    }

    #[test]
    fn test_convert_forecast_success() {
        let provider = create_test_provider();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let conditions = provider.convert_forecast(date, forecast_for(date)).unwrap();

        assert_eq!(conditions.date, date);
        assert_eq!(conditions.summary, "Rain");
        assert_eq!(conditions.temperature_min_c, 9.0);
        assert_eq!(conditions.temperature_max_c, 17.5);
        assert_eq!(conditions.precipitation_chance, 0.55);
        assert_eq!(conditions.wind_speed_kph, 22.0);
    }

    #[test]
    fn test_convert_forecast_missing_date_fails() {
        let provider = create_test_provider();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();

        let result = provider.convert_forecast(other, forecast_for(date));
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_forecast_null_precipitation_defaults_to_zero() {
        let provider = create_test_provider();
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut forecast = forecast_for(date);
        forecast.daily.precipitation_probability_max = vec![None];

        let conditions = provider.convert_forecast(date, forecast).unwrap();
        assert_eq!(conditions.precipitation_chance, 0.0);
    }

    #[test]
    fn test_describe_weather_code() {
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(2), "Partly cloudy");
        assert_eq!(describe_weather_code(3), "Overcast");
        assert_eq!(describe_weather_code(45), "Foggy");
        assert_eq!(describe_weather_code(53), "Drizzle");
        assert_eq!(describe_weather_code(65), "Rain");
        assert_eq!(describe_weather_code(73), "Snow");
        assert_eq!(describe_weather_code(81), "Rain showers");
        assert_eq!(describe_weather_code(96), "Thunderstorm");
        assert_eq!(describe_weather_code(42), "Changeable");
    }

    #[test]
    fn test_geocoding_response_deserialization() {
        let json = r#"{
            "results": [
                {"latitude": 41.0082, "longitude": 28.9784, "name": "Istanbul"}
            ]
        }"#;

        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let first = &response.results.unwrap()[0];
        assert_eq!(first.latitude, 41.0082);
        assert_eq!(first.longitude, 28.9784);
    }

    #[test]
    fn test_geocoding_response_no_results() {
        let response: GeocodingResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_none());
    }
}
