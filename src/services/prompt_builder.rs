use crate::models::{CompanyType, MetricSet};

pub fn company_type_name(company_type: CompanyType) -> &'static str {
    match company_type {
        CompanyType::TechPlatform => "tech platform",
        CompanyType::TechMature => "mature tech",
        CompanyType::PharmaInnovation => "innovative pharma",
        CompanyType::PharmaMature => "mature pharma",
        CompanyType::Financial => "financial",
        CompanyType::Manufacturing => "manufacturing",
    }
}

fn fmt(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v))
}

fn spread(metrics: &MetricSet) -> String {
    match (metrics.roic, metrics.wacc) {
        (Some(r), Some(w)) => format!("{:.2}pp", r - w),
        _ => "N/A".to_string(),
    }
}

fn metrics_block(metrics: &MetricSet) -> String {
    format!(
        "PE={}  PB={}  PS={}\n\
         ROE={}  ROIC={}  WACC={}  ROIC-WACC={}\n\
         Revenue YoY={}  Gross margin={}  FCF margin={}  CapEx/revenue={}",
        fmt(metrics.pe),
        fmt(metrics.pb),
        fmt(metrics.ps),
        fmt_pct(metrics.roe),
        fmt_pct(metrics.roic),
        fmt_pct(metrics.wacc),
        spread(metrics),
        fmt_pct(metrics.revenue_yoy),
        fmt_pct(metrics.gross_margin),
        fmt_pct(metrics.fcf_margin),
        fmt_pct(metrics.capex_ratio),
    )
}

fn focus_questions(company_type: CompanyType) -> &'static str {
    match company_type {
        CompanyType::TechPlatform => {
            "1. The company's current stage (rapid expansion / growth delivery / maturing slowdown)\n\
             2. Whether the rich valuation is still supported by fundamentals\n\
             3. The 2 most important forward indicators to watch\n\
             4. One main medium-to-long-term risk"
        }
        CompanyType::TechMature => {
            "1. Whether the competitive moat is holding\n\
             2. Cash flow quality and buyback/dividend capacity\n\
             3. Whether growth has entered a plateau\n\
             4. The main long-term risk"
        }
        CompanyType::PharmaInnovation => {
            "1. Whether the current PB multiple is still justified given ROIC and growth\n\
             2. Whether the innovation-pipeline premium still has a basis\n\
             3. The key variable for growth delivery\n\
             4. One medium-to-long-term risk (patent cliff, competition)"
        }
        CompanyType::PharmaMature => {
            "1. Whether the company is in a stable mature phase\n\
             2. Cash flow and dividend capacity\n\
             3. Main risks (patent expiry, competition)\n\
             4. Ability to sustain long-term value"
        }
        CompanyType::Financial => {
            "1. Earnings power and the quality of ROE\n\
             2. Valuation reasonableness from a PB perspective\n\
             3. Main risks (credit risk, rate risk)\n\
             4. Long-term value-creation capacity"
        }
        CompanyType::Manufacturing => {
            "1. Where the company sits in the cycle\n\
             2. Profitability and cash flow quality\n\
             3. Whether the valuation reflects the cycle position\n\
             4. Main risks (cyclical swings, competition)"
        }
    }
}

/// Single-quarter analysis prompt, built from that quarter's metrics and the
/// labels its deterministic analysis produced.
pub fn quarter_prompt(
    company_name: &str,
    company_type: CompanyType,
    period: &str,
    metrics: &MetricSet,
    labels: &[String],
) -> String {
    let labels_line = if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    };

    format!(
        "You are a long-term value investing analyst covering {type_name} companies.\n\
         \n\
         Company: {company_name}\n\
         Quarter: {period}\n\
         Key data:\n\
         {metrics}\n\
         \n\
         System labels: {labels_line}\n\
         \n\
         Please analyze from a long-term perspective:\n\
         {questions}\n\
         \n\
         Requirements:\n\
         - No buy/sell recommendations or price targets\n\
         - Do not repeat the system labels\n\
         - Objective, rigorous language, at most 200 words",
        type_name = company_type_name(company_type),
        company_name = company_name,
        period = period,
        metrics = metrics_block(metrics),
        labels_line = labels_line,
        questions = focus_questions(company_type),
    )
}

pub struct QuarterDigest {
    pub period: String,
    pub system_summary: String,
    pub ai_analysis: Option<String>,
}

/// Company-level prompt aggregating recent quarter digests. The response
/// format it requests is what the comprehensive parser looks for.
pub fn comprehensive_prompt(
    ticker: &str,
    company_name: &str,
    company_type: CompanyType,
    digests: &[QuarterDigest],
) -> String {
    let mut summaries = String::new();
    let mut quarter_ai = String::new();
    for digest in digests {
        summaries.push_str(&format!("{}: {}\n", digest.period, digest.system_summary));
        if let Some(ai) = &digest.ai_analysis {
            quarter_ai.push_str(&format!("{} AI analysis: {}\n", digest.period, ai));
        }
    }
    if quarter_ai.is_empty() {
        quarter_ai.push_str("none\n");
    }

    format!(
        "You are a long-term value investing analyst.\n\
         Company: {ticker} {company_name} ({type_name})\n\
         \n\
         System summaries for the most recent quarters:\n\
         {summaries}\n\
         Corresponding per-quarter AI analyses:\n\
         {quarter_ai}\n\
         Please provide:\n\
         1. A 120-150 word comprehensive long-term judgement (current stage, quality trend, valuation reasonableness)\n\
         2. One main label (e.g. \"high-quality growth\", \"stable maturity\", \"cyclical recovery\")\n\
         3. One risk label (e.g. \"growth deceleration risk\", \"valuation pressure\")\n\
         \n\
         Strict requirements:\n\
         - No buy/sell recommendations or price targets\n\
         - Objective, neutral language\n\
         \n\
         Output exactly in this format:\n\
         Analysis: [your analysis]\n\
         Main label: [main label]\n\
         Risk label: [risk label]",
        ticker = ticker,
        company_name = company_name,
        type_name = company_type_name(company_type),
        summaries = summaries,
        quarter_ai = quarter_ai,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_prompt_shows_na_for_missing_metrics() {
        let metrics = MetricSet { roic: Some(15.0), wacc: Some(7.0), ..Default::default() };
        let prompt = quarter_prompt("Acme", CompanyType::TechPlatform, "2025-Q1", &metrics, &[]);
        assert!(prompt.contains("ROIC=15.00%"));
        assert!(prompt.contains("ROIC-WACC=8.00pp"));
        assert!(prompt.contains("PE=N/A"));
        assert!(prompt.contains("System labels: none"));
    }

    #[test]
    fn comprehensive_prompt_requests_the_parse_format() {
        let digests = [QuarterDigest {
            period: "2025-Q1".to_string(),
            system_summary: "Quality score 80.0/100 (high quality).".to_string(),
            ai_analysis: None,
        }];
        let prompt = comprehensive_prompt("ACME", "Acme Corp", CompanyType::Financial, &digests);
        assert!(prompt.contains("2025-Q1: Quality score"));
        assert!(prompt.contains("Analysis: [your analysis]"));
        assert!(prompt.contains("Main label:"));
        assert!(prompt.contains("Risk label:"));
    }
}
