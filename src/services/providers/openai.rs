/// OpenAI outfit generator
///
/// Sends one chat-completion request per orchestration call describing the
/// profile, the wardrobe (with item ids), the scenario and the per-day
/// forecast, and asks for a JSON document with one outfit per day. The
/// response is untrusted end to end: days with unparseable dates are
/// dropped here, and everything else is sanitized later by the merger.
use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{GeneratedDay, ProposedItem, WeatherConditions},
    services::providers::{GeneratorError, GeneratorRequest, OutfitGenerator},
};

const ROLE_OPTIONS: [&str; 8] = [
    "TOP",
    "BOTTOM",
    "DRESS",
    "OUTERWEAR",
    "SHOES",
    "ACCESSORY",
    "SOCKS",
    "OTHER",
];

const SYSTEM_PROMPT: &str = "You are a personal stylist. Build outfits that cover \
    the top, bottom, shoes and socks categories whenever possible, and follow the \
    requested output format exactly.";

pub struct OpenAiGenerator {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutfitsPayload {
    #[serde(default)]
    outfits: Vec<OutfitDay>,
}

#[derive(Debug, Deserialize)]
struct OutfitDay {
    #[serde(default)]
    date: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    items: Vec<ProposedItem>,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn response_schema() -> serde_json::Value {
        json!({
            "name": "OutfitSuggestions",
            "schema": {
                "type": "object",
                "properties": {
                    "outfits": {
                        "type": "array",
                        "minItems": 1,
                        "items": {
                            "type": "object",
                            "properties": {
                                "date": { "type": "string", "format": "date" },
                                "notes": { "type": "string" },
                                "items": {
                                    "type": "array",
                                    "minItems": 1,
                                    "items": {
                                        "type": "object",
                                        "properties": {
                                            "clothItemId": { "type": "string" },
                                            "role": { "type": "string", "enum": ROLE_OPTIONS }
                                        },
                                        "required": ["clothItemId", "role"]
                                    }
                                }
                            },
                            "required": ["date", "notes", "items"]
                        }
                    }
                },
                "required": ["outfits"]
            }
        })
    }
}

/// Renders the natural-language request for the model
fn build_prompt(request: &GeneratorRequest) -> String {
    let profile = &request.profile;

    let wardrobe_listing = request
        .wardrobe
        .iter()
        .map(|item| {
            format!(
                "- id: {}, category: {}, color: {}, formality: {}, season: {}",
                item.id, item.category, item.color, item.formality, item.season
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let weather_listing = request
        .weather_by_date
        .iter()
        .map(|(date, weather)| format_weather_line(*date, weather))
        .collect::<Vec<_>>()
        .join("\n");

    let start = request.weather_by_date.keys().next();
    let end = request.weather_by_date.keys().next_back();
    let date_range = match (start, end) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        _ => String::new(),
    };

    format!(
        "Act as a personal stylist. User profile:\n\
         Name: {name}\n\
         Age range: {age}\n\
         Gender: {gender}\n\
         Style preferences: {styles}\n\n\
         Wardrobe:\n{wardrobe}\n\n\
         Scenario: {scenario}.\n\
         Date range: {range}\n\
         Weather:\n{weather}\n\n\
         Produce JSON output for every day. The output must match this schema exactly:\n\
         {{\"outfits\":[{{\"date\":\"YYYY-MM-DD\",\"notes\":\"short note\",\
         \"items\":[{{\"clothItemId\":\"id\",\"role\":\"ROLE\"}}]}}]}}\n\
         The role field may only take these values: {roles}. \
         Cover the top, bottom, shoes and socks categories whenever possible.",
        name = profile.name,
        age = profile.age_range.as_deref().unwrap_or("not specified"),
        gender = profile.gender.as_deref().unwrap_or("not specified"),
        styles = if profile.style_preferences.is_empty() {
            "none".to_string()
        } else {
            profile.style_preferences.join(", ")
        },
        wardrobe = wardrobe_listing,
        scenario = request.scenario,
        range = date_range,
        weather = weather_listing,
        roles = ROLE_OPTIONS.join(","),
    )
}

fn format_weather_line(date: NaiveDate, weather: &WeatherConditions) -> String {
    format!(
        "{}: {}, {}-{}°C, precipitation {}%",
        date.format("%Y-%m-%d"),
        weather.summary,
        weather.temperature_min_c.round() as i64,
        weather.temperature_max_c.round() as i64,
        (weather.precipitation_chance * 100.0).round() as i64,
    )
}

/// Parses the model's JSON document into per-day proposals
///
/// Days with an unparseable date cannot be matched to a requested day and
/// are dropped; everything else stays raw for the merger to vet.
fn parse_completion(content: &str) -> Result<Vec<GeneratedDay>, GeneratorError> {
    let payload: OutfitsPayload =
        serde_json::from_str(content).map_err(|e| GeneratorError::Malformed(e.to_string()))?;

    let mut days = Vec::with_capacity(payload.outfits.len());
    for day in payload.outfits {
        match NaiveDate::parse_from_str(&day.date, "%Y-%m-%d") {
            Ok(date) => days.push(GeneratedDay {
                date,
                notes: day.notes,
                items: day.items,
            }),
            Err(_) => {
                tracing::debug!(date = %day.date, "Dropping generator day with unparseable date");
            }
        }
    }

    Ok(days)
}

#[async_trait::async_trait]
impl OutfitGenerator for OpenAiGenerator {
    async fn generate_outfits(
        &self,
        request: &GeneratorRequest,
    ) -> Result<Vec<GeneratedDay>, GeneratorError> {
        let prompt = build_prompt(request);

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": Self::response_schema(),
            },
        });

        let url = format!("{}/chat/completions", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Outfit generator request failed"
            );
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GeneratorError::EmptyCompletion)?;

        let days = parse_completion(&content)?;

        tracing::info!(
            days = days.len(),
            model = %self.model,
            "Outfit generator returned proposals"
        );

        Ok(days)
    }
}
