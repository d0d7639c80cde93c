use tracing::info;

use crate::db::{company_queries, quarter_ai_queries, quarter_queries, system_analysis_queries};
use crate::errors::AppError;
use crate::models::{MetricSet, QuarterAiAnalysis};
use crate::services::generation_guard::GenerationKey;
use crate::services::prompt_builder;
use crate::state::AppState;

/// Generates (or regenerates) the narrative for one quarter. Single-flight
/// per quarter: a call arriving while one is mid-generation fails fast with
/// `ConcurrentGeneration`. The quarter's single AI row is replaced wholesale;
/// nothing is written when the external call fails.
pub async fn generate(state: &AppState, quarter_id: i64) -> Result<QuarterAiAnalysis, AppError> {
    let quarter = quarter_queries::fetch_one(&state.pool, quarter_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quarter {} not found", quarter_id)))?;
    let company = company_queries::fetch_one(&state.pool, quarter.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", quarter.company_id)))?;

    // Held until the result is persisted (or the attempt fails).
    let _permit = state.generation_guard.acquire(GenerationKey::Quarter(quarter_id))?;

    let analysis = system_analysis_queries::fetch_for_quarter(&state.pool, quarter_id)
        .await?
        .ok_or_else(|| {
            AppError::InsufficientData(format!(
                "Quarter {} has no system analysis to build a prompt from",
                quarter.quarter
            ))
        })?;

    let prompt = prompt_builder::quarter_prompt(
        &company.company_name,
        company.company_type,
        &quarter.quarter,
        &MetricSet::from(&quarter),
        &analysis.labels,
    );

    info!("Generating quarter AI analysis for {} {}", company.ticker, quarter.quarter);
    let text = state.llm.generate(prompt).await?;

    let stored = quarter_ai_queries::upsert(&state.pool, quarter_id, &text).await?;
    info!("Stored quarter AI analysis for {} {}", company.ticker, quarter.quarter);

    Ok(stored)
}
