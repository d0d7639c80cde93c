use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

/// Fiscal-quarter fundamentals for one company. Every metric is independently
/// optional; percentages use the 12.5-means-12.5% scale.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quarter {
    pub id: i64,
    pub company_id: i64,
    pub quarter: String,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub ps: Option<f64>,
    pub roe: Option<f64>,
    pub roic: Option<f64>,
    pub wacc: Option<f64>,
    pub revenue_yoy: Option<f64>,
    pub gross_margin: Option<f64>,
    pub fcf_margin: Option<f64>,
    pub capex_ratio: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuarter {
    pub company_id: i64,
    pub quarter: String,
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub ps: Option<f64>,
    pub roe: Option<f64>,
    pub roic: Option<f64>,
    pub wacc: Option<f64>,
    pub revenue_yoy: Option<f64>,
    pub gross_margin: Option<f64>,
    pub fcf_margin: Option<f64>,
    pub capex_ratio: Option<f64>,
}

/// Partial update with explicit per-field presence: an absent field is left
/// untouched, an explicit `null` clears the metric, a number sets it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuarter {
    pub quarter: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub pe: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pb: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ps: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub roe: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub roic: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub wacc: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub revenue_yoy: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gross_margin: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fcf_margin: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub capex_ratio: Option<Option<f64>>,
}

/// Wraps a present JSON value (including `null`) in `Some`, so that a missing
/// field and an explicit `null` stay distinguishable after deserialization.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Nullable-aware view of one quarter's raw metrics. Pure data carrier
/// consumed by the scoring core.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSet {
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub ps: Option<f64>,
    pub roe: Option<f64>,
    pub roic: Option<f64>,
    pub wacc: Option<f64>,
    pub revenue_yoy: Option<f64>,
    pub gross_margin: Option<f64>,
    pub fcf_margin: Option<f64>,
    pub capex_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Pe,
    Pb,
    Ps,
    Roe,
    Roic,
    Wacc,
    RevenueYoy,
    GrossMargin,
    FcfMargin,
    CapexRatio,
}

impl MetricSet {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Pe => self.pe,
            Metric::Pb => self.pb,
            Metric::Ps => self.ps,
            Metric::Roe => self.roe,
            Metric::Roic => self.roic,
            Metric::Wacc => self.wacc,
            Metric::RevenueYoy => self.revenue_yoy,
            Metric::GrossMargin => self.gross_margin,
            Metric::FcfMargin => self.fcf_margin,
            Metric::CapexRatio => self.capex_ratio,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pe.is_none()
            && self.pb.is_none()
            && self.ps.is_none()
            && self.roe.is_none()
            && self.roic.is_none()
            && self.wacc.is_none()
            && self.revenue_yoy.is_none()
            && self.gross_margin.is_none()
            && self.fcf_margin.is_none()
            && self.capex_ratio.is_none()
    }
}

impl From<&Quarter> for MetricSet {
    fn from(q: &Quarter) -> Self {
        Self {
            pe: q.pe,
            pb: q.pb,
            ps: q.ps,
            roe: q.roe,
            roic: q.roic,
            wacc: q.wacc,
            revenue_yoy: q.revenue_yoy,
            gross_margin: q.gross_margin,
            fcf_margin: q.fcf_margin,
            capex_ratio: q.capex_ratio,
        }
    }
}

pub fn validate_period(period: &str) -> Result<(), AppError> {
    let re = Regex::new(r"^\d{4}-Q[1-4]$").unwrap();
    if re.is_match(period) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid quarter label '{}': expected YYYY-Q[1-4]",
            period
        )))
    }
}

/// Rejects non-finite values, and negative valuation multiples.
pub fn validate_metric(name: &str, value: Option<f64>) -> Result<(), AppError> {
    let Some(v) = value else { return Ok(()) };
    if !v.is_finite() {
        return Err(AppError::Validation(format!(
            "Metric '{}' must be a finite number",
            name
        )));
    }
    if matches!(name, "pe" | "pb" | "ps") && v < 0.0 {
        return Err(AppError::Validation(format!(
            "Metric '{}' must be non-negative",
            name
        )));
    }
    Ok(())
}

impl CreateQuarter {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_period(&self.quarter)?;
        self.metric_fields().into_iter().try_for_each(|(name, v)| validate_metric(name, v))
    }

    fn metric_fields(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("pe", self.pe),
            ("pb", self.pb),
            ("ps", self.ps),
            ("roe", self.roe),
            ("roic", self.roic),
            ("wacc", self.wacc),
            ("revenue_yoy", self.revenue_yoy),
            ("gross_margin", self.gross_margin),
            ("fcf_margin", self.fcf_margin),
            ("capex_ratio", self.capex_ratio),
        ]
    }
}

impl UpdateQuarter {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(period) = &self.quarter {
            validate_period(period)?;
        }
        for (name, patch) in [
            ("pe", self.pe),
            ("pb", self.pb),
            ("ps", self.ps),
            ("roe", self.roe),
            ("roic", self.roic),
            ("wacc", self.wacc),
            ("revenue_yoy", self.revenue_yoy),
            ("gross_margin", self.gross_margin),
            ("fcf_margin", self.fcf_margin),
            ("capex_ratio", self.capex_ratio),
        ] {
            if let Some(value) = patch {
                validate_metric(name, value)?;
            }
        }
        Ok(())
    }

    /// Folds this patch into an existing quarter, honoring tri-state fields.
    pub fn apply_to(&self, quarter: &mut Quarter) {
        if let Some(period) = &self.quarter {
            quarter.quarter = period.clone();
        }
        for (patch, field) in [
            (self.pe, &mut quarter.pe),
            (self.pb, &mut quarter.pb),
            (self.ps, &mut quarter.ps),
            (self.roe, &mut quarter.roe),
            (self.roic, &mut quarter.roic),
            (self.wacc, &mut quarter.wacc),
            (self.revenue_yoy, &mut quarter.revenue_yoy),
            (self.gross_margin, &mut quarter.gross_margin),
            (self.fcf_margin, &mut quarter.fcf_margin),
            (self.capex_ratio, &mut quarter.capex_ratio),
        ] {
            if let Some(value) = patch {
                *field = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_fixture() -> Quarter {
        Quarter {
            id: 1,
            company_id: 1,
            quarter: "2025-Q1".to_string(),
            pe: Some(20.0),
            pb: None,
            ps: None,
            roe: Some(14.0),
            roic: Some(11.0),
            wacc: Some(8.0),
            revenue_yoy: None,
            gross_margin: Some(42.0),
            fcf_margin: None,
            capex_ratio: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn period_pattern_accepts_valid_labels() {
        assert!(validate_period("2024-Q1").is_ok());
        assert!(validate_period("1999-Q4").is_ok());
    }

    #[test]
    fn period_pattern_rejects_malformed_labels() {
        for bad in ["2024-Q5", "2024Q1", "24-Q1", "2024-q1", "2024-Q1 ", "Q1-2024"] {
            assert!(validate_period(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn metric_validation_rejects_non_finite_and_negative_multiples() {
        assert!(validate_metric("roe", Some(f64::NAN)).is_err());
        assert!(validate_metric("roic", Some(f64::INFINITY)).is_err());
        assert!(validate_metric("pe", Some(-3.0)).is_err());
        assert!(validate_metric("revenue_yoy", Some(-12.5)).is_ok());
        assert!(validate_metric("pe", None).is_ok());
    }

    #[test]
    fn patch_distinguishes_absent_null_and_value() {
        let patch: UpdateQuarter =
            serde_json::from_str(r#"{"roe": null, "roic": 13.5}"#).unwrap();
        assert_eq!(patch.roe, Some(None));
        assert_eq!(patch.roic, Some(Some(13.5)));
        assert_eq!(patch.pe, None);

        let mut quarter = quarter_fixture();
        patch.apply_to(&mut quarter);
        assert_eq!(quarter.roe, None, "explicit null clears the metric");
        assert_eq!(quarter.roic, Some(13.5), "value overwrites the metric");
        assert_eq!(quarter.pe, Some(20.0), "absent field is left untouched");
    }

    #[test]
    fn metric_set_reflects_quarter_fields() {
        let quarter = quarter_fixture();
        let metrics = MetricSet::from(&quarter);
        assert_eq!(metrics.get(Metric::Roic), Some(11.0));
        assert_eq!(metrics.get(Metric::Ps), None);
        assert!(!metrics.is_empty());
        assert!(MetricSet::default().is_empty());
    }
}
