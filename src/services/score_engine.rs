use crate::models::{CompanyType, Metric, MetricSet};
use crate::services::label_classifier::{classify, ScoreKind};
use crate::services::summary;
use crate::services::trend_analyzer;

/// Full scoring outcome for one quarter.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemAssessment {
    pub quality_score: Option<f64>,
    pub valuation_score: Option<f64>,
    pub trend_score: Option<f64>,
    pub labels: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy)]
pub enum QualitySource {
    Metric(Metric),
    /// max(ROIC − WACC, 0); contributes only when both inputs are present.
    RoicWaccSpread,
}

/// One quality contributor: normalized through its reference band, then
/// weighted.
#[derive(Debug, Clone, Copy)]
pub struct QualityFactor {
    pub source: QualitySource,
    pub band: (f64, f64, f64),
    pub weight: f64,
}

/// Reference band for one valuation multiple. Richer multiples normalize
/// higher, which lowers the valuation score.
#[derive(Debug, Clone, Copy)]
pub struct ValuationBand {
    pub metric: Metric,
    pub band: (f64, f64, f64),
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct TrendWeight {
    pub metric: Metric,
    pub weight: f64,
    /// A falling value is the positive signal (capex intensity).
    pub inverted: bool,
}

/// Per-company-type scoring tables. The sole source of weighting/band truth.
#[derive(Debug, Clone, Copy)]
pub struct ScoreProfile {
    pub quality: &'static [QualityFactor],
    pub valuation: &'static [ValuationBand],
    pub trend: &'static [TrendWeight],
}

// Shared quality reference bands (percentage-point scale).
const ROIC_BAND: (f64, f64, f64) = (0.0, 10.0, 25.0);
const ROE_BAND: (f64, f64, f64) = (0.0, 12.0, 25.0);
const GROSS_MARGIN_BAND: (f64, f64, f64) = (10.0, 40.0, 70.0);
const FCF_MARGIN_BAND: (f64, f64, f64) = (0.0, 12.0, 25.0);
const SPREAD_BAND: (f64, f64, f64) = (-5.0, 3.0, 10.0);

const TECH_PLATFORM: ScoreProfile = ScoreProfile {
    quality: &[
        QualityFactor { source: QualitySource::Metric(Metric::Roic), band: ROIC_BAND, weight: 0.35 },
        QualityFactor { source: QualitySource::RoicWaccSpread, band: SPREAD_BAND, weight: 0.35 },
        QualityFactor { source: QualitySource::Metric(Metric::GrossMargin), band: GROSS_MARGIN_BAND, weight: 0.15 },
        QualityFactor { source: QualitySource::Metric(Metric::FcfMargin), band: FCF_MARGIN_BAND, weight: 0.15 },
    ],
    valuation: &[
        ValuationBand { metric: Metric::Ps, band: (5.0, 15.0, 30.0), weight: 0.40 },
        ValuationBand { metric: Metric::Pe, band: (20.0, 50.0, 100.0), weight: 0.30 },
        ValuationBand { metric: Metric::Pb, band: (5.0, 15.0, 30.0), weight: 0.30 },
    ],
    trend: &[
        TrendWeight { metric: Metric::Roic, weight: 0.40, inverted: false },
        TrendWeight { metric: Metric::GrossMargin, weight: 0.30, inverted: false },
        TrendWeight { metric: Metric::CapexRatio, weight: 0.30, inverted: true },
    ],
};

const TECH_MATURE: ScoreProfile = ScoreProfile {
    quality: &[
        QualityFactor { source: QualitySource::Metric(Metric::Roic), band: ROIC_BAND, weight: 0.45 },
        QualityFactor { source: QualitySource::Metric(Metric::FcfMargin), band: FCF_MARGIN_BAND, weight: 0.30 },
        QualityFactor { source: QualitySource::Metric(Metric::Roe), band: ROE_BAND, weight: 0.25 },
    ],
    valuation: &[
        ValuationBand { metric: Metric::Pe, band: (15.0, 25.0, 40.0), weight: 0.50 },
        ValuationBand { metric: Metric::Pb, band: (4.0, 8.0, 15.0), weight: 0.30 },
        ValuationBand { metric: Metric::Ps, band: (4.0, 8.0, 15.0), weight: 0.20 },
    ],
    trend: &[
        TrendWeight { metric: Metric::Roic, weight: 0.50, inverted: false },
        TrendWeight { metric: Metric::RevenueYoy, weight: 0.50, inverted: false },
    ],
};

const PHARMA_INNOVATION: ScoreProfile = ScoreProfile {
    quality: &[
        QualityFactor { source: QualitySource::Metric(Metric::Roic), band: ROIC_BAND, weight: 0.40 },
        QualityFactor { source: QualitySource::RoicWaccSpread, band: SPREAD_BAND, weight: 0.30 },
        QualityFactor { source: QualitySource::Metric(Metric::FcfMargin), band: FCF_MARGIN_BAND, weight: 0.20 },
        QualityFactor { source: QualitySource::Metric(Metric::Roe), band: ROE_BAND, weight: 0.10 },
    ],
    valuation: &[
        ValuationBand { metric: Metric::Pb, band: (8.0, 20.0, 40.0), weight: 0.45 },
        ValuationBand { metric: Metric::Pe, band: (20.0, 50.0, 100.0), weight: 0.35 },
        ValuationBand { metric: Metric::Ps, band: (8.0, 20.0, 40.0), weight: 0.20 },
    ],
    trend: &[
        TrendWeight { metric: Metric::Roic, weight: 0.40, inverted: false },
        TrendWeight { metric: Metric::FcfMargin, weight: 0.30, inverted: false },
        TrendWeight { metric: Metric::GrossMargin, weight: 0.30, inverted: false },
    ],
};

const PHARMA_MATURE: ScoreProfile = ScoreProfile {
    quality: &[
        QualityFactor { source: QualitySource::Metric(Metric::Roe), band: ROE_BAND, weight: 0.50 },
        QualityFactor { source: QualitySource::Metric(Metric::FcfMargin), band: FCF_MARGIN_BAND, weight: 0.30 },
        QualityFactor { source: QualitySource::Metric(Metric::GrossMargin), band: GROSS_MARGIN_BAND, weight: 0.20 },
    ],
    valuation: &[
        ValuationBand { metric: Metric::Pb, band: (1.0, 3.0, 6.0), weight: 0.60 },
        ValuationBand { metric: Metric::Pe, band: (10.0, 18.0, 30.0), weight: 0.40 },
    ],
    trend: &[
        TrendWeight { metric: Metric::Roe, weight: 0.60, inverted: false },
        TrendWeight { metric: Metric::FcfMargin, weight: 0.40, inverted: false },
    ],
};

const FINANCIAL: ScoreProfile = ScoreProfile {
    quality: &[
        QualityFactor { source: QualitySource::Metric(Metric::Roe), band: ROE_BAND, weight: 0.60 },
        QualityFactor { source: QualitySource::Metric(Metric::FcfMargin), band: FCF_MARGIN_BAND, weight: 0.40 },
    ],
    valuation: &[
        ValuationBand { metric: Metric::Pb, band: (1.0, 2.5, 4.0), weight: 0.60 },
        ValuationBand { metric: Metric::Pe, band: (10.0, 25.0, 40.0), weight: 0.40 },
    ],
    trend: &[TrendWeight { metric: Metric::Roe, weight: 1.0, inverted: false }],
};

const MANUFACTURING: ScoreProfile = ScoreProfile {
    quality: &[
        QualityFactor { source: QualitySource::Metric(Metric::Roic), band: ROIC_BAND, weight: 0.40 },
        QualityFactor { source: QualitySource::Metric(Metric::GrossMargin), band: GROSS_MARGIN_BAND, weight: 0.30 },
        QualityFactor { source: QualitySource::Metric(Metric::FcfMargin), band: FCF_MARGIN_BAND, weight: 0.30 },
    ],
    valuation: &[
        ValuationBand { metric: Metric::Pb, band: (1.0, 2.5, 5.0), weight: 0.50 },
        ValuationBand { metric: Metric::Ps, band: (0.5, 1.5, 3.0), weight: 0.50 },
    ],
    trend: &[
        TrendWeight { metric: Metric::Roic, weight: 0.40, inverted: false },
        TrendWeight { metric: Metric::GrossMargin, weight: 0.40, inverted: false },
        TrendWeight { metric: Metric::RevenueYoy, weight: 0.20, inverted: false },
    ],
};

pub fn profile(company_type: CompanyType) -> &'static ScoreProfile {
    match company_type {
        CompanyType::TechPlatform => &TECH_PLATFORM,
        CompanyType::TechMature => &TECH_MATURE,
        CompanyType::PharmaInnovation => &PHARMA_INNOVATION,
        CompanyType::PharmaMature => &PHARMA_MATURE,
        CompanyType::Financial => &FINANCIAL,
        CompanyType::Manufacturing => &MANUFACTURING,
    }
}

/// Piecewise-linear mapping onto [0, 100]:
/// value ≤ low → 0, low..mid → 0..50, mid..high → 50..100, > high → 100.
pub fn normalize(value: f64, low: f64, mid: f64, high: f64) -> f64 {
    if value <= low {
        0.0
    } else if value <= mid {
        (value - low) / (mid - low) * 50.0
    } else if value <= high {
        50.0 + (value - mid) / (high - mid) * 50.0
    } else {
        100.0
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn roic_wacc_spread(metrics: &MetricSet) -> Option<f64> {
    Some(metrics.roic? - metrics.wacc?)
}

/// Weighted quality of the present contributors; None when every contributor
/// is missing. A missing contributor drops out of both numerator and the
/// weight denominator.
pub fn quality_score(profile: &ScoreProfile, metrics: &MetricSet) -> Option<f64> {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for factor in profile.quality {
        let value = match factor.source {
            QualitySource::Metric(metric) => metrics.get(metric),
            QualitySource::RoicWaccSpread => roic_wacc_spread(metrics).map(|s| s.max(0.0)),
        };
        if let Some(value) = value {
            let (low, mid, high) = factor.band;
            weighted += normalize(value, low, mid, high) * factor.weight;
            weight_sum += factor.weight;
        }
    }
    if weight_sum == 0.0 {
        None
    } else {
        Some(round2(clamp_score(weighted / weight_sum)))
    }
}

/// 100 minus the weighted richness of the present multiples (higher score =
/// cheaper). None when no multiple is present.
pub fn valuation_score(profile: &ScoreProfile, metrics: &MetricSet) -> Option<f64> {
    let mut richness = 0.0;
    let mut weight_sum = 0.0;
    for band in profile.valuation {
        if let Some(value) = metrics.get(band.metric) {
            let (low, mid, high) = band.band;
            richness += normalize(value, low, mid, high) * band.weight;
            weight_sum += band.weight;
        }
    }
    if weight_sum == 0.0 {
        None
    } else {
        Some(round2(clamp_score(100.0 - richness / weight_sum)))
    }
}

/// Scores one quarter against its history (most recent first) and derives
/// labels and the deterministic summary.
pub fn analyze(
    company_type: CompanyType,
    current: &MetricSet,
    history: &[MetricSet],
) -> SystemAssessment {
    let profile = profile(company_type);

    let quality = quality_score(profile, current);
    let valuation = valuation_score(profile, current);
    let trend = trend_analyzer::trend_score(profile.trend, current, history).map(round2);
    let spread = roic_wacc_spread(current);

    let mut labels = Vec::new();
    if let Some(q) = quality {
        labels.push(classify(ScoreKind::Quality, q).to_string());
    }
    if let Some(v) = valuation {
        labels.push(classify(ScoreKind::Valuation, v).to_string());
    }
    if let Some(t) = trend {
        labels.push(classify(ScoreKind::Trend, t).to_string());
    }
    if let Some(s) = spread {
        labels.push(classify(ScoreKind::RoicWacc, s).to_string());
    }

    let summary = summary::render(quality, valuation, trend, spread);

    SystemAssessment {
        quality_score: quality,
        valuation_score: valuation,
        trend_score: trend,
        labels,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_piecewise_linear() {
        assert_eq!(normalize(-3.0, 0.0, 10.0, 25.0), 0.0);
        assert_eq!(normalize(0.0, 0.0, 10.0, 25.0), 0.0);
        assert_eq!(normalize(5.0, 0.0, 10.0, 25.0), 25.0);
        assert_eq!(normalize(10.0, 0.0, 10.0, 25.0), 50.0);
        assert_eq!(normalize(17.5, 0.0, 10.0, 25.0), 75.0);
        assert_eq!(normalize(25.0, 0.0, 10.0, 25.0), 100.0);
        assert_eq!(normalize(40.0, 0.0, 10.0, 25.0), 100.0);
    }

    #[test]
    fn empty_metric_set_yields_all_null_scores_and_empty_summary() {
        let assessment = analyze(CompanyType::TechPlatform, &MetricSet::default(), &[]);
        assert_eq!(assessment.quality_score, None);
        assert_eq!(assessment.valuation_score, None);
        assert_eq!(assessment.trend_score, None);
        assert!(assessment.labels.is_empty());
        assert!(assessment.summary.is_empty());
    }

    #[test]
    fn missing_factor_renormalizes_instead_of_defaulting_to_zero() {
        // Only ROIC present: quality must equal the normalized ROIC alone.
        let metrics = MetricSet { roic: Some(10.0), ..Default::default() };
        let quality = quality_score(profile(CompanyType::TechPlatform), &metrics).unwrap();
        assert_eq!(quality, 50.0);
    }

    #[test]
    fn spread_requires_both_roic_and_wacc() {
        let metrics = MetricSet { roic: Some(20.0), ..Default::default() };
        assert_eq!(roic_wacc_spread(&metrics), None);
        let metrics = MetricSet { roic: Some(15.0), wacc: Some(7.0), ..Default::default() };
        assert_eq!(roic_wacc_spread(&metrics), Some(8.0));
    }

    #[test]
    fn spread_of_eight_labels_strong_value_creation() {
        let metrics = MetricSet { roic: Some(15.0), wacc: Some(7.0), ..Default::default() };
        let assessment = analyze(CompanyType::TechPlatform, &metrics, &[]);
        assert!(assessment
            .labels
            .iter()
            .any(|l| l == "strong value creation"));
    }

    #[test]
    fn financial_reference_bands_classify_cheap_bank_as_reasonably_valued() {
        let metrics = MetricSet { pe: Some(12.0), pb: Some(1.5), ..Default::default() };
        let assessment = analyze(CompanyType::Financial, &metrics, &[]);
        let valuation = assessment.valuation_score.unwrap();
        assert!(valuation >= 70.0, "valuation_score {} should be >= 70", valuation);
        assert!(assessment.labels.iter().any(|l| l == "reasonably valued"));
    }

    #[test]
    fn valuation_none_without_any_multiple() {
        let metrics = MetricSet { roe: Some(18.0), ..Default::default() };
        assert_eq!(valuation_score(profile(CompanyType::Financial), &metrics), None);
    }

    #[test]
    fn scores_are_clamped_to_the_unit_range() {
        let metrics = MetricSet {
            pe: Some(500.0),
            pb: Some(80.0),
            ps: Some(90.0),
            roic: Some(60.0),
            wacc: Some(5.0),
            gross_margin: Some(95.0),
            fcf_margin: Some(50.0),
            ..Default::default()
        };
        let assessment = analyze(CompanyType::TechPlatform, &metrics, &[]);
        let q = assessment.quality_score.unwrap();
        let v = assessment.valuation_score.unwrap();
        assert!((0.0..=100.0).contains(&q));
        assert!((0.0..=100.0).contains(&v));
        assert_eq!(v, 0.0, "multiples far above the bands bottom out");
        assert_eq!(q, 100.0, "fundamentals far above the bands saturate");
    }

    #[test]
    fn every_company_type_has_a_profile() {
        for company_type in [
            CompanyType::TechPlatform,
            CompanyType::TechMature,
            CompanyType::PharmaInnovation,
            CompanyType::PharmaMature,
            CompanyType::Financial,
            CompanyType::Manufacturing,
        ] {
            let p = profile(company_type);
            assert!(!p.quality.is_empty());
            assert!(!p.valuation.is_empty());
            assert!(!p.trend.is_empty());
        }
    }
}
