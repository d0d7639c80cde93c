use sqlx::PgPool;
use tracing::info;

use crate::db::{company_queries, quarter_queries, system_analysis_queries};
use crate::errors::AppError;
use crate::models::{MetricSet, Quarter, SystemAnalysis};
use crate::services::score_engine;
use crate::state::EngineSettings;

/// Synchronously rescores a quarter against its historical window and
/// replaces its stored analysis. Runs on every quarter create/update.
pub async fn recompute_for_quarter(
    pool: &PgPool,
    settings: &EngineSettings,
    quarter: &Quarter,
) -> Result<SystemAnalysis, AppError> {
    let company = company_queries::fetch_one(pool, quarter.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", quarter.company_id)))?;

    let prior = quarter_queries::fetch_prior(
        pool,
        quarter.company_id,
        &quarter.quarter,
        settings.trend_window as i64,
    )
    .await?;
    let history: Vec<MetricSet> = prior.iter().map(MetricSet::from).collect();

    let assessment =
        score_engine::analyze(company.company_type, &MetricSet::from(quarter), &history);

    info!(
        "Recomputed analysis for {} {} (quality: {:?}, valuation: {:?}, trend: {:?})",
        company.ticker, quarter.quarter, assessment.quality_score,
        assessment.valuation_score, assessment.trend_score
    );

    let stored = system_analysis_queries::upsert(
        pool,
        quarter.id,
        assessment.quality_score,
        assessment.valuation_score,
        assessment.trend_score,
        &assessment.labels,
        &assessment.summary,
    )
    .await?;

    Ok(stored)
}
