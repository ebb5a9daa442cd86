// Engagement analysis handlers.
//
// POST /api/v1/analyze       analyze posts, store the result best-effort
// GET  /api/v1/analyze/{id}  a stored analysis, owner only

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;
use tracing::{info, warn};

use crate::db::models::{EngagementAnalysisRecord, SocialAccount};
use crate::engagement::models::{AnalysisRequest, AnalysisResult};
use crate::engagement::validate;
use crate::web::{api_error, internal_error, validation_error, AppState, AuthUser};

#[derive(Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Absent when the analysis could not be stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
}

/// POST /api/v1/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    if let Err(e) = validate::validate_request(&request) {
        return validation_error(&e);
    }

    let result = state.analyzer.analyze(&request);

    // Storage is best-effort: the caller still gets their numbers
    let analysis_id = match store_analysis(&state, &user.user_id, &request, &result).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(user = %user.user_id, error = %e, "Failed to store analysis");
            None
        }
    };

    info!(
        user = %user.user_id,
        handle = %request.handle,
        rate = result.engagement_rate,
        quality = %result.engagement_quality,
        "Engagement analysis completed"
    );

    Json(AnalyzeResponse {
        result,
        analysis_id,
    })
    .into_response()
}

/// GET /api/v1/analyze/{id}
pub async fn get_analysis(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Response {
    match state.db.get_engagement_analysis(&id).await {
        Ok(Some(record)) if record.user_id == user.user_id => Json(record).into_response(),
        Ok(Some(_)) => api_error(StatusCode::FORBIDDEN, "Access denied"),
        Ok(None) => api_error(StatusCode::NOT_FOUND, "Analysis not found"),
        Err(e) => internal_error(&e, "Failed to fetch analysis"),
    }
}

async fn store_analysis(
    state: &AppState,
    user_id: &str,
    request: &AnalysisRequest,
    result: &AnalysisResult,
) -> anyhow::Result<String> {
    let account = SocialAccount::new(user_id, request.platform, &request.handle, request.followers);
    state.db.create_social_account(&account).await?;

    let record = EngagementAnalysisRecord::from_result(user_id, &account.id, request, result);
    state.db.create_engagement_analysis(&record).await?;
    Ok(record.id)
}
