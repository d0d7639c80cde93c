use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::company::{Company, CompanyType};
use super::quarter::Quarter;

/// Deterministic per-quarter scoring result. Replaced in place whenever the
/// owning quarter's metrics change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemAnalysis {
    pub id: i64,
    pub quarter_id: i64,
    pub quality_score: Option<f64>,
    pub valuation_score: Option<f64>,
    pub trend_score: Option<f64>,
    pub labels: Vec<String>,
    pub system_summary: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuarterAiAnalysis {
    pub id: i64,
    pub quarter_id: i64,
    pub analysis_text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Company-level narrative generated from a window of quarters.
/// `based_quarters` snapshots the period labels it was built from,
/// most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyComprehensiveAi {
    pub id: i64,
    pub company_id: i64,
    pub analysis_text: String,
    pub main_label: Option<String>,
    pub risk_label: Option<String>,
    pub based_quarters: Vec<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct QuarterDetail {
    #[serde(flatten)]
    pub quarter: Quarter,
    pub system_analysis: Option<SystemAnalysis>,
    pub ai_analysis: Option<QuarterAiAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    pub id: i64,
    pub ticker: String,
    pub company_name: String,
    pub company_type: CompanyType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub quarters: Vec<QuarterDetail>,
    pub comprehensive_ai: Option<CompanyComprehensiveAi>,
}

impl CompanyDetail {
    pub fn new(
        company: Company,
        quarters: Vec<QuarterDetail>,
        comprehensive_ai: Option<CompanyComprehensiveAi>,
    ) -> Self {
        Self {
            id: company.id,
            ticker: company.ticker,
            company_name: company.company_name,
            company_type: company.company_type,
            created_at: company.created_at,
            updated_at: company.updated_at,
            quarters,
            comprehensive_ai,
        }
    }
}
