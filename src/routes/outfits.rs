use axum::{extract::State, Extension, Json};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{SuggestionRequest, SuggestionResponse},
    routes::AppState,
};

/// Handler for outfit suggestion generation
pub async fn suggest(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SuggestionRequest>,
) -> AppResult<Json<SuggestionResponse>> {
    tracing::info!(
        request_id = %request_id,
        profile_id = %request.profile.id,
        wardrobe_items = request.wardrobe.len(),
        scenario = %request.scenario,
        start_date = %request.start_date,
        "Processing outfit suggestion request"
    );

    let suggestions = state.orchestrator.generate(&request).await?;

    tracing::info!(
        request_id = %request_id,
        suggestions = suggestions.len(),
        "Outfit suggestions generated"
    );

    Ok(Json(SuggestionResponse { suggestions }))
}
