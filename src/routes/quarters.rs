use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::db::{company_queries, quarter_ai_queries, quarter_queries, system_analysis_queries};
use crate::errors::AppError;
use crate::models::{CreateQuarter, Quarter, QuarterAiAnalysis, QuarterDetail, UpdateQuarter};
use crate::services::{analysis_service, quarter_ai_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quarter))
        .route("/:id", get(get_quarter).put(update_quarter).delete(delete_quarter))
        .route("/:id/ai", get(get_quarter_ai))
        .route("/:id/ai/generate", post(generate_quarter_ai))
}

/// Creates a quarter and synchronously computes its system analysis. AI
/// narratives are never generated implicitly here.
pub async fn create_quarter(
    State(state): State<AppState>,
    Json(input): Json<CreateQuarter>,
) -> Result<Json<Quarter>, AppError> {
    info!("POST /api/quarters - Creating quarter {} for company {}", input.quarter, input.company_id);
    input.validate()?;
    company_queries::fetch_one(&state.pool, input.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", input.company_id)))?;
    if quarter_queries::find_by_period(&state.pool, input.company_id, &input.quarter)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(format!(
            "Quarter {} already exists for company {}",
            input.quarter, input.company_id
        )));
    }

    let quarter = quarter_queries::create(&state.pool, &input).await.map_err(|e| {
        error!("Failed to create quarter {}: {}", input.quarter, e);
        AppError::Db(e)
    })?;
    analysis_service::recompute_for_quarter(&state.pool, &state.settings, &quarter).await?;
    Ok(Json(quarter))
}

pub async fn get_quarter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuarterDetail>, AppError> {
    info!("GET /api/quarters/{} - Fetching quarter detail", id);
    let quarter = quarter_queries::fetch_one(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quarter {} not found", id)))?;
    let system_analysis = system_analysis_queries::fetch_for_quarter(&state.pool, id).await?;
    let ai_analysis = quarter_ai_queries::fetch_for_quarter(&state.pool, id).await?;
    Ok(Json(QuarterDetail { quarter, system_analysis, ai_analysis }))
}

/// Partial update with explicit per-field presence, then synchronous
/// reanalysis of the updated quarter.
pub async fn update_quarter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateQuarter>,
) -> Result<Json<Quarter>, AppError> {
    info!("PUT /api/quarters/{} - Updating quarter", id);
    patch.validate()?;
    let mut quarter = quarter_queries::fetch_one(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quarter {} not found", id)))?;

    if let Some(period) = &patch.quarter {
        if *period != quarter.quarter {
            if quarter_queries::find_by_period(&state.pool, quarter.company_id, period)
                .await?
                .is_some()
            {
                return Err(AppError::Validation(format!(
                    "Quarter {} already exists for company {}",
                    period, quarter.company_id
                )));
            }
        }
    }

    patch.apply_to(&mut quarter);
    let quarter = quarter_queries::update(&state.pool, &quarter).await.map_err(|e| {
        error!("Failed to update quarter {}: {}", id, e);
        AppError::Db(e)
    })?;
    analysis_service::recompute_for_quarter(&state.pool, &state.settings, &quarter).await?;
    Ok(Json(quarter))
}

pub async fn delete_quarter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    info!("DELETE /api/quarters/{} - Deleting quarter", id);
    let deleted = quarter_queries::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Quarter {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "message": "Quarter deleted" })))
}

pub async fn get_quarter_ai(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuarterAiAnalysis>, AppError> {
    info!("GET /api/quarters/{}/ai", id);
    let record = quarter_ai_queries::fetch_for_quarter(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No AI analysis for quarter {}", id)))?;
    Ok(Json(record))
}

pub async fn generate_quarter_ai(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuarterAiAnalysis>, AppError> {
    info!("POST /api/quarters/{}/ai/generate", id);
    let record = quarter_ai_service::generate(&state, id).await.map_err(|e| {
        error!("Quarter AI generation failed for quarter {}: {}", id, e);
        e
    })?;
    Ok(Json(record))
}
