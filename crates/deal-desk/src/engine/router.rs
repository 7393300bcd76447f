use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DealInput, OptimizationOutcome};
use super::optimizer::ProfitOptimizer;

/// Request payload: the deal itself plus an optional evaluation-year override
/// so callers can pin vehicle-age math for reproducible quotes.
#[derive(Debug, Deserialize)]
pub struct DealRequest {
    #[serde(flatten)]
    pub deal: DealInput,
    #[serde(default)]
    pub evaluation_year: Option<i32>,
}

/// Router builder exposing the engine's two operations over HTTP.
pub fn deal_router(service: Arc<ProfitOptimizer>) -> Router {
    Router::new()
        .route("/api/v1/deals/analyze", post(analyze_handler))
        .route("/api/v1/deals/optimize", post(optimize_handler))
        .with_state(service)
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<ProfitOptimizer>>,
    axum::Json(request): axum::Json<DealRequest>,
) -> Response {
    let analyzer = service.analyzer();
    let year = request
        .evaluation_year
        .unwrap_or_else(|| analyzer.evaluation_year());
    let results = analyzer.analyze_as_of(&request.deal, year);
    (StatusCode::OK, axum::Json(results)).into_response()
}

pub(crate) async fn optimize_handler(
    State(service): State<Arc<ProfitOptimizer>>,
    axum::Json(request): axum::Json<DealRequest>,
) -> Response {
    let year = request
        .evaluation_year
        .unwrap_or_else(|| service.analyzer().evaluation_year());

    match service.optimize_as_of(&request.deal, year) {
        OptimizationOutcome::Optimized(result) => {
            (StatusCode::OK, axum::Json(result)).into_response()
        }
        OptimizationOutcome::NoEligibleLender => {
            let payload = json!({
                "error": "no eligible lenders found",
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
