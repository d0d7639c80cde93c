use sqlx::PgPool;

use crate::models::{Company, CreateCompany, UpdateCompany};

const COMPANY_COLUMNS: &str =
    "id, ticker, company_name, company_type, created_at, updated_at";

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY ticker"
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: i64) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_ticker(pool: &PgPool, ticker: &str) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies WHERE ticker = $1"
    ))
    .bind(ticker)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "INSERT INTO companies (ticker, company_name, company_type)
         VALUES ($1, $2, $3)
         RETURNING {COMPANY_COLUMNS}"
    ))
    .bind(&input.ticker)
    .bind(&input.company_name)
    .bind(input.company_type)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &UpdateCompany,
) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as::<_, Company>(&format!(
        "UPDATE companies
         SET ticker = COALESCE($2, ticker),
             company_name = COALESCE($3, company_name),
             company_type = COALESCE($4, company_type),
             updated_at = now()
         WHERE id = $1
         RETURNING {COMPANY_COLUMNS}"
    ))
    .bind(id)
    .bind(&input.ticker)
    .bind(&input.company_name)
    .bind(input.company_type)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
