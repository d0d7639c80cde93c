/// Which band table a value is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Quality,
    Valuation,
    Trend,
    RoicWacc,
}

/// Ordered (inclusive lower bound, label) pairs, scanned top-down. The final
/// `None` bound is the catch-all, so classification is total.
type BandTable = &'static [(Option<f64>, &'static str)];

const ROIC_WACC_BANDS: BandTable = &[
    (Some(8.0), "strong value creation"),
    (Some(3.0), "value creation"),
    (Some(0.0), "weak value creation"),
    (Some(-5.0), "normal expansion phase"),
    (None, "high capital burn"),
];

const VALUATION_BANDS: BandTable = &[
    (Some(70.0), "reasonably valued"),
    (Some(40.0), "moderately valued"),
    (None, "richly valued"),
];

const QUALITY_BANDS: BandTable = &[
    (Some(80.0), "high quality"),
    (Some(50.0), "moderate"),
    (None, "low quality"),
];

const TREND_BANDS: BandTable = &[
    (Some(70.0), "positive trend"),
    (Some(30.0), "neutral"),
    (None, "weakening"),
];

fn bands(kind: ScoreKind) -> BandTable {
    match kind {
        ScoreKind::Quality => QUALITY_BANDS,
        ScoreKind::Valuation => VALUATION_BANDS,
        ScoreKind::Trend => TREND_BANDS,
        ScoreKind::RoicWacc => ROIC_WACC_BANDS,
    }
}

/// Maps a score (or the ROIC−WACC spread) to exactly one label.
pub fn classify(kind: ScoreKind, value: f64) -> &'static str {
    bands(kind)
        .iter()
        .find(|(bound, _)| bound.map_or(true, |b| value >= b))
        .map(|(_, label)| *label)
        .unwrap_or("unclassified")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roic_wacc_band_boundaries() {
        assert_eq!(classify(ScoreKind::RoicWacc, 8.0), "strong value creation");
        assert_eq!(classify(ScoreKind::RoicWacc, 7.99), "value creation");
        assert_eq!(classify(ScoreKind::RoicWacc, 3.0), "value creation");
        assert_eq!(classify(ScoreKind::RoicWacc, 0.0), "weak value creation");
        assert_eq!(classify(ScoreKind::RoicWacc, -0.01), "normal expansion phase");
        assert_eq!(classify(ScoreKind::RoicWacc, -5.0), "normal expansion phase");
        assert_eq!(classify(ScoreKind::RoicWacc, -5.01), "high capital burn");
    }

    #[test]
    fn roic_wacc_classification_is_monotonic() {
        // Decreasing spread must never produce a higher-ranked label.
        let rank = |label: &str| {
            ROIC_WACC_BANDS
                .iter()
                .position(|(_, l)| *l == label)
                .unwrap()
        };
        let mut spread = 12.0;
        let mut last_rank = rank(classify(ScoreKind::RoicWacc, spread));
        while spread >= -10.0 {
            let r = rank(classify(ScoreKind::RoicWacc, spread));
            assert!(r >= last_rank, "rank regressed at spread {}", spread);
            last_rank = r;
            spread -= 0.25;
        }
    }

    #[test]
    fn score_band_tables_are_exhaustive() {
        for kind in [
            ScoreKind::Quality,
            ScoreKind::Valuation,
            ScoreKind::Trend,
            ScoreKind::RoicWacc,
        ] {
            assert_eq!(bands(kind).last().unwrap().0, None);
            // Far below any bound still classifies.
            assert_ne!(classify(kind, -1e9), "unclassified");
        }
    }

    #[test]
    fn score_bands_match_canonical_thresholds() {
        assert_eq!(classify(ScoreKind::Quality, 80.0), "high quality");
        assert_eq!(classify(ScoreKind::Quality, 79.9), "moderate");
        assert_eq!(classify(ScoreKind::Quality, 49.9), "low quality");
        assert_eq!(classify(ScoreKind::Valuation, 70.0), "reasonably valued");
        assert_eq!(classify(ScoreKind::Valuation, 40.0), "moderately valued");
        assert_eq!(classify(ScoreKind::Valuation, 39.9), "richly valued");
        assert_eq!(classify(ScoreKind::Trend, 70.0), "positive trend");
        assert_eq!(classify(ScoreKind::Trend, 30.0), "neutral");
        assert_eq!(classify(ScoreKind::Trend, 29.9), "weakening");
    }
}
