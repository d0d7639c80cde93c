use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::db::{company_queries, comprehensive_ai_queries, quarter_ai_queries, quarter_queries, system_analysis_queries};
use crate::errors::AppError;
use crate::models::{
    Company, CompanyCard, CompanyComprehensiveAi, CompanyDetail, CreateCompany, QuarterDetail,
    UpdateCompany,
};
use crate::services::comprehensive_ai_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/:id", get(get_company).put(update_company).delete(delete_company))
        .route("/:id/comprehensive-ai", get(get_comprehensive_ai))
        .route("/:id/comprehensive-ai/generate", post(generate_comprehensive_ai))
}

/// Listing cards: identity plus latest-quarter ROIC/WACC, valuation score and
/// labels, and the comprehensive narrative if one exists.
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanyCard>>, AppError> {
    info!("GET /api/companies - Listing companies with summaries");
    let companies = company_queries::fetch_all(&state.pool).await?;

    let mut cards = Vec::with_capacity(companies.len());
    for company in companies {
        let latest_quarter = quarter_queries::fetch_latest(&state.pool, company.id).await?;
        let comprehensive_ai =
            comprehensive_ai_queries::fetch_for_company(&state.pool, company.id).await?;

        let mut latest_valuation_score = None;
        let mut latest_labels = None;
        if let Some(quarter) = &latest_quarter {
            if let Some(analysis) =
                system_analysis_queries::fetch_for_quarter(&state.pool, quarter.id).await?
            {
                latest_valuation_score = analysis.valuation_score;
                latest_labels = Some(analysis.labels);
            }
        }

        cards.push(CompanyCard {
            id: company.id,
            ticker: company.ticker,
            company_name: company.company_name,
            company_type: company.company_type,
            latest_quarter: latest_quarter.as_ref().map(|q| q.quarter.clone()),
            latest_roic: latest_quarter.as_ref().and_then(|q| q.roic),
            latest_wacc: latest_quarter.as_ref().and_then(|q| q.wacc),
            latest_valuation_score,
            latest_labels,
            comprehensive_ai,
        });
    }
    Ok(Json(cards))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> Result<Json<Company>, AppError> {
    info!("POST /api/companies - Creating company {}", input.ticker);
    if input.ticker.trim().is_empty() {
        return Err(AppError::Validation("Ticker must not be empty".to_string()));
    }
    if input.company_name.trim().is_empty() {
        return Err(AppError::Validation("Company name must not be empty".to_string()));
    }
    if company_queries::find_by_ticker(&state.pool, &input.ticker)
        .await?
        .is_some()
    {
        return Err(AppError::Validation(format!(
            "Ticker '{}' already exists",
            input.ticker
        )));
    }
    let company = company_queries::create(&state.pool, &input).await.map_err(|e| {
        error!("Failed to create company {}: {}", input.ticker, e);
        AppError::Db(e)
    })?;
    Ok(Json(company))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompanyDetail>, AppError> {
    info!("GET /api/companies/{} - Fetching company detail", id);
    let company = company_queries::fetch_one(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))?;

    let quarters = quarter_queries::fetch_for_company(&state.pool, id).await?;
    let mut details = Vec::with_capacity(quarters.len());
    for quarter in quarters {
        let system_analysis =
            system_analysis_queries::fetch_for_quarter(&state.pool, quarter.id).await?;
        let ai_analysis = quarter_ai_queries::fetch_for_quarter(&state.pool, quarter.id).await?;
        details.push(QuarterDetail { quarter, system_analysis, ai_analysis });
    }

    let comprehensive_ai = comprehensive_ai_queries::fetch_for_company(&state.pool, id).await?;
    Ok(Json(CompanyDetail::new(company, details, comprehensive_ai)))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCompany>,
) -> Result<Json<Company>, AppError> {
    info!("PUT /api/companies/{} - Updating company", id);
    if let Some(ticker) = &input.ticker {
        if ticker.trim().is_empty() {
            return Err(AppError::Validation("Ticker must not be empty".to_string()));
        }
        if let Some(existing) = company_queries::find_by_ticker(&state.pool, ticker).await? {
            if existing.id != id {
                return Err(AppError::Validation(format!(
                    "Ticker '{}' already exists",
                    ticker
                )));
            }
        }
    }
    let company = company_queries::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", id)))?;
    Ok(Json(company))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    info!("DELETE /api/companies/{} - Deleting company", id);
    let deleted = company_queries::delete(&state.pool, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Company {} not found", id)));
    }
    Ok(Json(serde_json::json!({ "message": "Company deleted" })))
}

pub async fn get_comprehensive_ai(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompanyComprehensiveAi>, AppError> {
    info!("GET /api/companies/{}/comprehensive-ai", id);
    let record = comprehensive_ai_queries::fetch_for_company(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No comprehensive AI analysis for company {}", id))
        })?;
    Ok(Json(record))
}

pub async fn generate_comprehensive_ai(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CompanyComprehensiveAi>, AppError> {
    info!("POST /api/companies/{}/comprehensive-ai/generate", id);
    let record = comprehensive_ai_service::generate(&state, id).await.map_err(|e| {
        error!("Comprehensive AI generation failed for company {}: {}", id, e);
        e
    })?;
    Ok(Json(record))
}
