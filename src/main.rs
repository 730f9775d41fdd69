use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fitcast_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        orchestrator::OutfitOrchestrator,
        providers::{open_meteo::OpenMeteoProvider, openai::OpenAiGenerator, OutfitGenerator, WeatherProvider},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitcast_api=debug,tower_http=info,info".into()),
        )
        .init();

    let weather: Arc<dyn WeatherProvider> = Arc::new(OpenMeteoProvider::new(
        config.weather_api_url.clone(),
        config.geocoding_api_url.clone(),
    ));

    let generator: Option<Arc<dyn OutfitGenerator>> = match &config.ai_api_key {
        Some(api_key) => {
            tracing::info!(model = %config.ai_model, "External outfit generator enabled");
            Some(Arc::new(OpenAiGenerator::new(
                api_key.clone(),
                config.ai_api_url.clone(),
                config.ai_model.clone(),
            )))
        }
        None => {
            tracing::warn!("AI_API_KEY not set, serving rule-based outfits only");
            None
        }
    };

    let orchestrator = OutfitOrchestrator::new(weather, generator);
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
