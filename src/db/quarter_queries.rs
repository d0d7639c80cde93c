use sqlx::PgPool;

use crate::models::{CreateQuarter, Quarter};

const QUARTER_COLUMNS: &str = "id, company_id, quarter, pe, pb, ps, roe, roic, wacc, \
     revenue_yoy, gross_margin, fcf_margin, capex_ratio, created_at";

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<Quarter>, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "SELECT {QUARTER_COLUMNS} FROM quarters WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// All of a company's quarters, most recent period first. The YYYY-QN label
/// sorts chronologically as text.
pub async fn fetch_for_company(pool: &PgPool, company_id: i64) -> Result<Vec<Quarter>, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "SELECT {QUARTER_COLUMNS} FROM quarters
         WHERE company_id = $1
         ORDER BY quarter DESC"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_latest(pool: &PgPool, company_id: i64) -> Result<Option<Quarter>, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "SELECT {QUARTER_COLUMNS} FROM quarters
         WHERE company_id = $1
         ORDER BY quarter DESC
         LIMIT 1"
    ))
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

/// Quarters strictly before `period`, most recent first, bounded by `limit` —
/// the historical window for trend computation.
pub async fn fetch_prior(
    pool: &PgPool,
    company_id: i64,
    period: &str,
    limit: i64,
) -> Result<Vec<Quarter>, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "SELECT {QUARTER_COLUMNS} FROM quarters
         WHERE company_id = $1 AND quarter < $2
         ORDER BY quarter DESC
         LIMIT $3"
    ))
    .bind(company_id)
    .bind(period)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn find_by_period(
    pool: &PgPool,
    company_id: i64,
    period: &str,
) -> Result<Option<Quarter>, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "SELECT {QUARTER_COLUMNS} FROM quarters
         WHERE company_id = $1 AND quarter = $2"
    ))
    .bind(company_id)
    .bind(period)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, input: &CreateQuarter) -> Result<Quarter, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "INSERT INTO quarters (company_id, quarter, pe, pb, ps, roe, roic, wacc,
                               revenue_yoy, gross_margin, fcf_margin, capex_ratio)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING {QUARTER_COLUMNS}"
    ))
    .bind(input.company_id)
    .bind(&input.quarter)
    .bind(input.pe)
    .bind(input.pb)
    .bind(input.ps)
    .bind(input.roe)
    .bind(input.roic)
    .bind(input.wacc)
    .bind(input.revenue_yoy)
    .bind(input.gross_margin)
    .bind(input.fcf_margin)
    .bind(input.capex_ratio)
    .fetch_one(pool)
    .await
}

/// Writes back a fully merged quarter (the handler applies the patch first).
pub async fn update(pool: &PgPool, quarter: &Quarter) -> Result<Quarter, sqlx::Error> {
    sqlx::query_as::<_, Quarter>(&format!(
        "UPDATE quarters
         SET quarter = $2, pe = $3, pb = $4, ps = $5, roe = $6, roic = $7, wacc = $8,
             revenue_yoy = $9, gross_margin = $10, fcf_margin = $11, capex_ratio = $12
         WHERE id = $1
         RETURNING {QUARTER_COLUMNS}"
    ))
    .bind(quarter.id)
    .bind(&quarter.quarter)
    .bind(quarter.pe)
    .bind(quarter.pb)
    .bind(quarter.ps)
    .bind(quarter.roe)
    .bind(quarter.roic)
    .bind(quarter.wacc)
    .bind(quarter.revenue_yoy)
    .bind(quarter.gross_margin)
    .bind(quarter.fcf_margin)
    .bind(quarter.capex_ratio)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quarters WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
