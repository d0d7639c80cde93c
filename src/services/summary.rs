use crate::services::label_classifier::{classify, ScoreKind};

/// Deterministic synopsis of one quarter's scores. One sentence per defined
/// score; absent scores omit their sentence entirely (no placeholders), so an
/// all-null quarter renders as the empty string.
pub fn render(
    quality: Option<f64>,
    valuation: Option<f64>,
    trend: Option<f64>,
    roic_wacc_spread: Option<f64>,
) -> String {
    let mut lines = Vec::new();
    if let Some(q) = quality {
        lines.push(format!(
            "Quality score {:.1}/100 ({}).",
            q,
            classify(ScoreKind::Quality, q)
        ));
    }
    if let Some(v) = valuation {
        lines.push(format!(
            "Valuation score {:.1}/100, higher is cheaper ({}).",
            v,
            classify(ScoreKind::Valuation, v)
        ));
    }
    if let Some(t) = trend {
        lines.push(format!(
            "Trend score {:.1}/100 ({}).",
            t,
            classify(ScoreKind::Trend, t)
        ));
    }
    if let Some(s) = roic_wacc_spread {
        lines.push(format!(
            "ROIC-WACC spread {:.1}pp: {}.",
            s,
            classify(ScoreKind::RoicWacc, s)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_sentence_per_defined_score() {
        let summary = render(Some(82.0), Some(45.5), Some(61.0), Some(8.0));
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Quality score 82.0/100 (high quality).");
        assert_eq!(lines[1], "Valuation score 45.5/100, higher is cheaper (moderately valued).");
        assert_eq!(lines[2], "Trend score 61.0/100 (neutral).");
        assert_eq!(lines[3], "ROIC-WACC spread 8.0pp: strong value creation.");
    }

    #[test]
    fn absent_scores_omit_their_sentence() {
        let summary = render(Some(55.0), None, None, None);
        assert_eq!(summary, "Quality score 55.0/100 (moderate).");
        assert!(!summary.contains("Valuation"));
        assert!(!summary.contains("Trend"));
    }

    #[test]
    fn all_absent_renders_empty() {
        assert_eq!(render(None, None, None, None), "");
    }

    #[test]
    fn identical_inputs_render_identically() {
        let a = render(Some(70.0), Some(70.0), Some(30.0), Some(-5.0));
        let b = render(Some(70.0), Some(70.0), Some(30.0), Some(-5.0));
        assert_eq!(a, b);
    }
}
