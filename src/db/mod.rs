pub mod company_queries;
pub mod comprehensive_ai_queries;
pub mod quarter_ai_queries;
pub mod quarter_queries;
pub mod system_analysis_queries;
