mod analysis;
mod company;
mod quarter;

pub use analysis::{CompanyComprehensiveAi, CompanyDetail, QuarterAiAnalysis, QuarterDetail, SystemAnalysis};
pub use company::{Company, CompanyCard, CompanyType, CreateCompany, UpdateCompany};
pub use quarter::{
    validate_period, CreateQuarter, Metric, MetricSet, Quarter, UpdateQuarter,
};
