use sqlx::PgPool;

use crate::models::QuarterAiAnalysis;

const AI_COLUMNS: &str = "id, quarter_id, analysis_text, created_at";

pub async fn fetch_for_quarter(
    pool: &PgPool,
    quarter_id: i64,
) -> Result<Option<QuarterAiAnalysis>, sqlx::Error> {
    sqlx::query_as::<_, QuarterAiAnalysis>(&format!(
        "SELECT {AI_COLUMNS} FROM quarter_ai_analyses WHERE quarter_id = $1"
    ))
    .bind(quarter_id)
    .fetch_optional(pool)
    .await
}

/// Replace-not-append: regenerate overwrites the quarter's single row.
pub async fn upsert(
    pool: &PgPool,
    quarter_id: i64,
    analysis_text: &str,
) -> Result<QuarterAiAnalysis, sqlx::Error> {
    sqlx::query_as::<_, QuarterAiAnalysis>(&format!(
        "INSERT INTO quarter_ai_analyses (quarter_id, analysis_text)
         VALUES ($1, $2)
         ON CONFLICT (quarter_id)
         DO UPDATE SET analysis_text = EXCLUDED.analysis_text, created_at = now()
         RETURNING {AI_COLUMNS}"
    ))
    .bind(quarter_id)
    .bind(analysis_text)
    .fetch_one(pool)
    .await
}
