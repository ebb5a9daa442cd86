// POST /api/v1/brand-readiness-score
//
// Runs the analysis, then scores readiness from the reported engagement
// rate. Profile completeness comes from the caller's stored profile when
// there is one.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;
use tracing::{info, warn};

use crate::engagement::models::{AnalysisRequest, AnalysisResult, ReadinessScore};
use crate::engagement::validate;
use crate::engagement::ProfileCompleteness;
use crate::web::{validation_error, AppState, AuthUser};

#[derive(Serialize)]
pub struct BrandReadinessResponse {
    pub engagement_analysis: AnalysisResult,
    pub brand_readiness: ReadinessScore,
}

pub async fn brand_readiness_score(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AnalysisRequest>,
) -> Response {
    if let Err(e) = validate::validate_request(&request) {
        return validation_error(&e);
    }

    let analysis = state.analyzer.analyze(&request);

    let completeness = match state.db.get_profile(&user.user_id).await {
        Ok(Some(profile)) => profile.completeness(),
        Ok(None) => ProfileCompleteness::default(),
        Err(e) => {
            warn!(user = %user.user_id, error = %e, "Profile lookup failed, using default completeness");
            ProfileCompleteness::default()
        }
    };

    let readiness = state.analyzer.score_readiness(
        analysis.engagement_rate,
        request.followers,
        request.platform,
        completeness,
    );

    info!(
        user = %user.user_id,
        score = readiness.score,
        completeness = completeness.value(),
        "Brand readiness scored"
    );

    Json(BrandReadinessResponse {
        engagement_analysis: analysis,
        brand_readiness: readiness,
    })
    .into_response()
}
