use sqlx::PgPool;

use crate::models::SystemAnalysis;

const ANALYSIS_COLUMNS: &str = "id, quarter_id, quality_score, valuation_score, trend_score, \
     labels, system_summary, created_at";

pub async fn fetch_for_quarter(
    pool: &PgPool,
    quarter_id: i64,
) -> Result<Option<SystemAnalysis>, sqlx::Error> {
    sqlx::query_as::<_, SystemAnalysis>(&format!(
        "SELECT {ANALYSIS_COLUMNS} FROM system_analyses WHERE quarter_id = $1"
    ))
    .bind(quarter_id)
    .fetch_optional(pool)
    .await
}

/// Replaces the quarter's analysis in place — one row per quarter, enforced
/// by the unique key.
pub async fn upsert(
    pool: &PgPool,
    quarter_id: i64,
    quality_score: Option<f64>,
    valuation_score: Option<f64>,
    trend_score: Option<f64>,
    labels: &[String],
    system_summary: &str,
) -> Result<SystemAnalysis, sqlx::Error> {
    sqlx::query_as::<_, SystemAnalysis>(&format!(
        "INSERT INTO system_analyses
             (quarter_id, quality_score, valuation_score, trend_score, labels, system_summary)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (quarter_id)
         DO UPDATE SET
             quality_score = EXCLUDED.quality_score,
             valuation_score = EXCLUDED.valuation_score,
             trend_score = EXCLUDED.trend_score,
             labels = EXCLUDED.labels,
             system_summary = EXCLUDED.system_summary,
             created_at = now()
         RETURNING {ANALYSIS_COLUMNS}"
    ))
    .bind(quarter_id)
    .bind(quality_score)
    .bind(valuation_score)
    .bind(trend_score)
    .bind(labels)
    .bind(system_summary)
    .fetch_one(pool)
    .await
}
