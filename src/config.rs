use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Open-Meteo forecast API base URL
    #[serde(default = "default_weather_api_url")]
    pub weather_api_url: String,

    /// Open-Meteo geocoding API base URL
    #[serde(default = "default_geocoding_api_url")]
    pub geocoding_api_url: String,

    /// OpenAI API key; outfit generation falls back to the rule-based
    /// builder when unset
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// OpenAI API base URL
    #[serde(default = "default_ai_api_url")]
    pub ai_api_url: String,

    /// Model used for outfit generation
    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_weather_api_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocoding_api_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_ai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
