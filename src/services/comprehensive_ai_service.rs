use regex::RegexBuilder;
use tracing::info;

use crate::db::{
    company_queries, comprehensive_ai_queries, quarter_ai_queries, quarter_queries,
    system_analysis_queries,
};
use crate::errors::AppError;
use crate::models::CompanyComprehensiveAi;
use crate::services::generation_guard::GenerationKey;
use crate::services::prompt_builder::{self, QuarterDigest};
use crate::state::AppState;

/// Generates (or regenerates) the company-level narrative from the most
/// recent window of analyzed quarters. Single-flight per company; the single
/// comprehensive row is replaced wholesale, with `based_quarters` snapshotting
/// the periods the narrative was built from (most recent first).
pub async fn generate(state: &AppState, company_id: i64) -> Result<CompanyComprehensiveAi, AppError> {
    let company = company_queries::fetch_one(&state.pool, company_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {} not found", company_id)))?;

    // Held until the result is persisted (or the attempt fails).
    let _permit = state.generation_guard.acquire(GenerationKey::Company(company_id))?;

    let quarters = quarter_queries::fetch_for_company(&state.pool, company_id).await?;

    let mut digests = Vec::new();
    for quarter in &quarters {
        if digests.len() >= state.settings.comprehensive_window {
            break;
        }
        let Some(analysis) =
            system_analysis_queries::fetch_for_quarter(&state.pool, quarter.id).await?
        else {
            continue;
        };
        let ai = quarter_ai_queries::fetch_for_quarter(&state.pool, quarter.id).await?;
        digests.push(QuarterDigest {
            period: quarter.quarter.clone(),
            system_summary: analysis.system_summary,
            ai_analysis: ai.map(|a| a.analysis_text),
        });
    }

    if digests.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "Company {} has no analyzed quarters to aggregate",
            company.ticker
        )));
    }

    let based_quarters: Vec<String> = digests.iter().map(|d| d.period.clone()).collect();
    let prompt = prompt_builder::comprehensive_prompt(
        &company.ticker,
        &company.company_name,
        company.company_type,
        &digests,
    );

    info!(
        "Generating comprehensive AI analysis for {} from {} quarters",
        company.ticker,
        based_quarters.len()
    );
    let response = state.llm.generate(prompt).await?;
    let parsed = parse_comprehensive(&response);

    let stored = comprehensive_ai_queries::upsert(
        &state.pool,
        company_id,
        &parsed.analysis_text,
        parsed.main_label.as_deref(),
        parsed.risk_label.as_deref(),
        &based_quarters,
    )
    .await?;
    info!("Stored comprehensive AI analysis for {}", company.ticker);

    Ok(stored)
}

#[derive(Debug, PartialEq)]
pub struct ParsedComprehensive {
    pub analysis_text: String,
    pub main_label: Option<String>,
    pub risk_label: Option<String>,
}

/// Best-effort extraction of the structured response sections. When the
/// markers are missing the whole text becomes the analysis and the labels
/// stay empty — a formatting miss never discards generated content.
pub fn parse_comprehensive(text: &str) -> ParsedComprehensive {
    let section = |pattern: &str| -> Option<String> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .ok()?;
        let captured = re.captures(text)?.get(1)?.as_str().trim();
        if captured.is_empty() {
            None
        } else {
            Some(captured.to_string())
        }
    };

    // The regex crate has no lookahead; an optional tail group swallows the
    // following section instead.
    let analysis_text =
        section(r"analysis\s*[:：]\s*(.*?)\s*(?:(?:main|risk)\s+label\s*[:：].*)?$");
    let main_label = section(r"main\s+label\s*[:：]\s*(.*?)\s*(?:risk\s+label\s*[:：].*)?$");
    let risk_label = section(r"risk\s+label\s*[:：]\s*(.*?)\s*$");

    ParsedComprehensive {
        analysis_text: analysis_text.unwrap_or_else(|| text.trim().to_string()),
        main_label,
        risk_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fully_structured_response() {
        let text = "Analysis: The company is in a stable mature phase.\n\
                    Main label: stable maturity\n\
                    Risk label: valuation pressure";
        let parsed = parse_comprehensive(text);
        assert_eq!(parsed.analysis_text, "The company is in a stable mature phase.");
        assert_eq!(parsed.main_label.as_deref(), Some("stable maturity"));
        assert_eq!(parsed.risk_label.as_deref(), Some("valuation pressure"));
    }

    #[test]
    fn markers_are_case_insensitive_and_multiline() {
        let text = "ANALYSIS: Quality has held up\nacross several quarters.\n\
                    MAIN LABEL: high-quality growth\n\
                    RISK LABEL: growth deceleration risk";
        let parsed = parse_comprehensive(text);
        assert!(parsed.analysis_text.contains("across several quarters"));
        assert_eq!(parsed.main_label.as_deref(), Some("high-quality growth"));
        assert_eq!(parsed.risk_label.as_deref(), Some("growth deceleration risk"));
    }

    #[test]
    fn missing_markers_degrade_to_full_text_with_empty_labels() {
        let text = "The model ignored the format and wrote free prose instead.";
        let parsed = parse_comprehensive(text);
        assert_eq!(parsed.analysis_text, text);
        assert_eq!(parsed.main_label, None);
        assert_eq!(parsed.risk_label, None);
    }

    #[test]
    fn partial_markers_keep_whatever_was_found() {
        let text = "Analysis: Solid fundamentals, rich multiple.\nRisk label: valuation pressure";
        let parsed = parse_comprehensive(text);
        assert_eq!(parsed.analysis_text, "Solid fundamentals, rich multiple.");
        assert_eq!(parsed.main_label, None);
        assert_eq!(parsed.risk_label.as_deref(), Some("valuation pressure"));
    }

    #[test]
    fn parsing_never_fails_on_empty_input() {
        let parsed = parse_comprehensive("");
        assert_eq!(parsed.analysis_text, "");
        assert_eq!(parsed.main_label, None);
        assert_eq!(parsed.risk_label, None);
    }
}
