use sqlx::PgPool;

use crate::models::CompanyComprehensiveAi;

const AI_COLUMNS: &str =
    "id, company_id, analysis_text, main_label, risk_label, based_quarters, updated_at";

pub async fn fetch_for_company(
    pool: &PgPool,
    company_id: i64,
) -> Result<Option<CompanyComprehensiveAi>, sqlx::Error> {
    sqlx::query_as::<_, CompanyComprehensiveAi>(&format!(
        "SELECT {AI_COLUMNS} FROM company_comprehensive_ai WHERE company_id = $1"
    ))
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

/// Replace-not-append: the company's single comprehensive row is overwritten
/// wholesale, `based_quarters` snapshot included.
pub async fn upsert(
    pool: &PgPool,
    company_id: i64,
    analysis_text: &str,
    main_label: Option<&str>,
    risk_label: Option<&str>,
    based_quarters: &[String],
) -> Result<CompanyComprehensiveAi, sqlx::Error> {
    sqlx::query_as::<_, CompanyComprehensiveAi>(&format!(
        "INSERT INTO company_comprehensive_ai
             (company_id, analysis_text, main_label, risk_label, based_quarters)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (company_id)
         DO UPDATE SET
             analysis_text = EXCLUDED.analysis_text,
             main_label = EXCLUDED.main_label,
             risk_label = EXCLUDED.risk_label,
             based_quarters = EXCLUDED.based_quarters,
             updated_at = now()
         RETURNING {AI_COLUMNS}"
    ))
    .bind(company_id)
    .bind(analysis_text)
    .bind(main_label)
    .bind(risk_label)
    .bind(based_quarters)
    .fetch_one(pool)
    .await
}
