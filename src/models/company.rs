use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::analysis::CompanyComprehensiveAi;

/// Fixed classification that selects the scoring profile for a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "company_type", rename_all = "kebab-case")]
pub enum CompanyType {
    TechPlatform,
    TechMature,
    PharmaInnovation,
    PharmaMature,
    Financial,
    Manufacturing,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub ticker: String,
    pub company_name: String,
    pub company_type: CompanyType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub ticker: String,
    pub company_name: String,
    pub company_type: CompanyType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub ticker: Option<String>,
    pub company_name: Option<String>,
    pub company_type: Option<CompanyType>,
}

/// Listing-card view: company identity plus its latest-quarter highlights.
#[derive(Debug, Serialize)]
pub struct CompanyCard {
    pub id: i64,
    pub ticker: String,
    pub company_name: String,
    pub company_type: CompanyType,
    pub latest_quarter: Option<String>,
    pub latest_roic: Option<f64>,
    pub latest_wacc: Option<f64>,
    pub latest_valuation_score: Option<f64>,
    pub latest_labels: Option<Vec<String>>,
    pub comprehensive_ai: Option<CompanyComprehensiveAi>,
}
