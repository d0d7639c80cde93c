use crate::models::MetricSet;
use crate::services::score_engine::TrendWeight;

/// A move of this many percentage points against the trailing average is a
/// full-strength directional signal.
const FULL_SIGNAL_DELTA: f64 = 5.0;

/// Minimum distinct prior quarters that must contribute a comparable value.
const MIN_PRIOR_QUARTERS: usize = 2;

/// Directional trend on [0, 100], 50 = neutral. Compares each tracked metric
/// on the current quarter against the trailing average of its available prior
/// values; metrics absent on either side are skipped and the weights are
/// renormalized over the contributors.
///
/// Returns None when fewer than two distinct prior quarters contribute — the
/// insufficient-data case, distinct from a computed-but-neutral 50.
pub fn trend_score(
    tracked: &[TrendWeight],
    current: &MetricSet,
    history: &[MetricSet],
) -> Option<f64> {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    let mut contributing_quarters = vec![false; history.len()];

    for track in tracked {
        let Some(current_value) = current.get(track.metric) else {
            continue;
        };

        let mut prior_sum = 0.0;
        let mut prior_count = 0usize;
        for (idx, prior) in history.iter().enumerate() {
            if let Some(value) = prior.get(track.metric) {
                prior_sum += value;
                prior_count += 1;
                contributing_quarters[idx] = true;
            }
        }
        if prior_count == 0 {
            continue;
        }

        let delta = current_value - prior_sum / prior_count as f64;
        let delta = if track.inverted { -delta } else { delta };
        let normalized = (delta / FULL_SIGNAL_DELTA).clamp(-1.0, 1.0);

        weighted += normalized * track.weight;
        weight_sum += track.weight;
    }

    let usable_quarters = contributing_quarters.iter().filter(|&&c| c).count();
    if weight_sum == 0.0 || usable_quarters < MIN_PRIOR_QUARTERS {
        return None;
    }

    Some((50.0 + 50.0 * weighted / weight_sum).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyType, MetricSet};
    use crate::services::score_engine::profile;

    fn tracked() -> &'static [TrendWeight] {
        profile(CompanyType::TechPlatform).trend
    }

    fn with_fundamentals(roic: f64, gross_margin: f64, capex_ratio: f64) -> MetricSet {
        MetricSet {
            roic: Some(roic),
            gross_margin: Some(gross_margin),
            capex_ratio: Some(capex_ratio),
            ..Default::default()
        }
    }

    #[test]
    fn insufficient_history_returns_none() {
        let current = with_fundamentals(18.0, 55.0, 10.0);
        assert_eq!(trend_score(tracked(), &current, &[]), None);
        // One prior quarter is still insufficient, however complete it is.
        let prior = with_fundamentals(15.0, 50.0, 12.0);
        assert_eq!(trend_score(tracked(), &current, &[prior]), None);
    }

    #[test]
    fn two_prior_quarters_enable_the_score() {
        let current = with_fundamentals(18.0, 55.0, 10.0);
        let history = [
            with_fundamentals(15.0, 50.0, 12.0),
            with_fundamentals(14.0, 49.0, 13.0),
        ];
        let score = trend_score(tracked(), &current, &history).unwrap();
        assert!(score > 50.0, "improving fundamentals should score above neutral");
    }

    #[test]
    fn deteriorating_fundamentals_score_below_neutral() {
        let current = with_fundamentals(9.0, 42.0, 18.0);
        let history = [
            with_fundamentals(15.0, 50.0, 12.0),
            with_fundamentals(16.0, 52.0, 11.0),
        ];
        let score = trend_score(tracked(), &current, &history).unwrap();
        assert!(score < 50.0);
    }

    #[test]
    fn capex_ratio_contributes_inverted() {
        // Only capex tracked data present: a falling capex ratio is positive.
        let current = MetricSet { capex_ratio: Some(8.0), ..Default::default() };
        let history = [
            MetricSet { capex_ratio: Some(14.0), ..Default::default() },
            MetricSet { capex_ratio: Some(16.0), ..Default::default() },
        ];
        let score = trend_score(tracked(), &current, &history).unwrap();
        assert!(score > 50.0);
    }

    #[test]
    fn metrics_missing_on_either_side_are_skipped() {
        // Gross margin missing on current, capex missing in history: only
        // ROIC contributes, unchanged, so the trend is exactly neutral.
        let current = MetricSet {
            roic: Some(15.0),
            capex_ratio: Some(10.0),
            ..Default::default()
        };
        let history = [
            MetricSet { roic: Some(15.0), gross_margin: Some(50.0), ..Default::default() },
            MetricSet { roic: Some(15.0), gross_margin: Some(51.0), ..Default::default() },
        ];
        let score = trend_score(tracked(), &current, &history).unwrap();
        assert_eq!(score, 50.0);
    }

    #[test]
    fn extreme_moves_saturate_at_the_bounds() {
        let current = with_fundamentals(60.0, 90.0, 0.0);
        let history = [
            with_fundamentals(5.0, 30.0, 30.0),
            with_fundamentals(6.0, 31.0, 29.0),
        ];
        assert_eq!(trend_score(tracked(), &current, &history), Some(100.0));
    }

    #[test]
    fn no_overlapping_metrics_returns_none() {
        let current = MetricSet { pe: Some(20.0), ..Default::default() };
        let history = [
            with_fundamentals(15.0, 50.0, 12.0),
            with_fundamentals(16.0, 52.0, 11.0),
        ];
        assert_eq!(trend_score(tracked(), &current, &history), None);
    }
}
