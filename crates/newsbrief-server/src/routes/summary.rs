use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use newsbrief::models::summary::SummaryOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    #[serde(default)]
    topic: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

async fn get_news_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let topic = request
        .topic
        .filter(|topic| !topic.trim().is_empty())
        .unwrap_or_else(|| state.default_topic.clone());

    // Held for the whole orchestration: one run per thread at a time.
    let mut session = state.session.lock().await;
    if !state.reuse_thread {
        session.clear_thread();
    }

    match state
        .orchestrator
        .summarize_topic(&mut session, &topic)
        .await
    {
        Ok(outcome) => Ok(Json(outcome)),
        Err(err) => {
            tracing::error!(topic = %topic, "news summary orchestration failed: {}", err);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/get_news_summary", post(get_news_summary))
        .with_state(state)
}
