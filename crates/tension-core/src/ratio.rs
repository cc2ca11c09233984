// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Ratio Windows
// ─────────────────────────────────────────────────────────────────────
//! Ratio-window triggers and the ratio-threshold detector.
//!
//! The windows are rational bands, compared with rational arithmetic —
//! no floats. The single place a double may be formed is the threshold
//! detector's transient snapshot; that value is never written back
//! into state.

use tension_num::Rational;
use tension_types::{Config, RatioTriggerMode};

use crate::state::SimState;

/// The configured window as (lower, upper) exclusive rational bounds.
fn ratio_band(config: &Config) -> Option<(Rational, Rational)> {
    match config.ratio_trigger_mode {
        RatioTriggerMode::None => None,
        RatioTriggerMode::Golden => Some((Rational::new(3, 2), Rational::new(17, 10))),
        RatioTriggerMode::Sqrt2 => Some((Rational::new(13, 10), Rational::new(3, 2))),
        RatioTriggerMode::Plastic => Some((Rational::new(6, 5), Rational::new(7, 5))),
        RatioTriggerMode::Custom => Some((
            config.ratio_custom_lower.clone(),
            config.ratio_custom_upper.clone(),
        )),
    }
}

/// True when lower < υ/β < upper under rational comparison.
///
/// False when β is zero or no window is configured.
pub fn ratio_in_range(config: &Config, state: &SimState) -> bool {
    let Some((lower, upper)) = ratio_band(config) else {
        return false;
    };
    if state.beta.is_zero() {
        return false;
    }
    let Some(ratio) = state.upsilon.div(&state.beta) else {
        return false;
    };
    if config.ratio_snapshot_logging {
        log::debug!(
            "ratio window check: upsilon/beta = {} (~{})",
            ratio,
            ratio.to_f64_snapshot()
        );
    }
    lower.cmp_value(&ratio).is_lt() && ratio.cmp_value(&upper).is_lt()
}

/// True when |υ/β| < 0.5 or |υ/β| > 2, judged on a transient double.
///
/// This is the simulator's only float formation; the snapshot is
/// dropped after the comparison. False when the detector is disabled
/// or β is zero.
pub fn ratio_threshold_outside(config: &Config, state: &SimState) -> bool {
    if !config.ratio_threshold_psi {
        return false;
    }
    if state.beta.is_zero() {
        return false;
    }
    let Some(ratio) = state.upsilon.div(&state.beta) else {
        return false;
    };
    let snapshot = ratio.to_f64_snapshot();
    if config.ratio_snapshot_logging {
        log::debug!("ratio threshold snapshot: {snapshot}");
    }
    snapshot.abs() < 0.5 || snapshot.abs() > 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(upsilon: Rational, beta: Rational) -> SimState {
        let mut state = SimState::new(&Config::default());
        state.upsilon = upsilon;
        state.beta = beta;
        state
    }

    #[test]
    fn test_golden_window_membership() {
        let state = state_with(Rational::new(8, 5), Rational::new(1, 1));
        let golden = Config {
            ratio_trigger_mode: RatioTriggerMode::Golden,
            ..Config::default()
        };
        let plastic = Config {
            ratio_trigger_mode: RatioTriggerMode::Plastic,
            ..Config::default()
        };
        assert!(ratio_in_range(&golden, &state));
        assert!(!ratio_in_range(&plastic, &state));
    }

    #[test]
    fn test_window_bounds_are_exclusive() {
        // υ/β = 3/2 sits exactly on the golden lower bound.
        let state = state_with(Rational::new(3, 2), Rational::new(1, 1));
        let config = Config {
            ratio_trigger_mode: RatioTriggerMode::Golden,
            ..Config::default()
        };
        assert!(!ratio_in_range(&config, &state));
    }

    #[test]
    fn test_window_uses_rational_comparison_on_raw_components() {
        // 16/10 equals 8/5 as a value; membership must not depend on
        // the representation.
        let state = state_with(Rational::new(16, 10), Rational::new(2, 2));
        let config = Config {
            ratio_trigger_mode: RatioTriggerMode::Golden,
            ..Config::default()
        };
        assert!(ratio_in_range(&config, &state));
    }

    #[test]
    fn test_none_mode_and_zero_beta() {
        let state = state_with(Rational::new(8, 5), Rational::zero());
        let config = Config {
            ratio_trigger_mode: RatioTriggerMode::Golden,
            ..Config::default()
        };
        assert!(!ratio_in_range(&config, &state));
        assert!(!ratio_in_range(&Config::default(), &state));
    }

    #[test]
    fn test_custom_window() {
        let config = Config {
            ratio_trigger_mode: RatioTriggerMode::Custom,
            ratio_custom_range: true,
            ratio_custom_lower: Rational::new(2, 1),
            ratio_custom_upper: Rational::new(3, 1),
            ..Config::default()
        };
        let inside = state_with(Rational::new(5, 2), Rational::new(1, 1));
        let outside = state_with(Rational::new(7, 2), Rational::new(1, 1));
        assert!(ratio_in_range(&config, &inside));
        assert!(!ratio_in_range(&config, &outside));
    }

    #[test]
    fn test_threshold_detector() {
        let config = Config {
            ratio_threshold_psi: true,
            ..Config::default()
        };
        let low = state_with(Rational::new(1, 4), Rational::new(1, 1));
        let high = state_with(Rational::new(-9, 2), Rational::new(2, 1));
        let mid = state_with(Rational::new(3, 2), Rational::new(1, 1));
        assert!(ratio_threshold_outside(&config, &low));
        assert!(ratio_threshold_outside(&config, &high));
        assert!(!ratio_threshold_outside(&config, &mid));
    }

    #[test]
    fn test_threshold_disabled_or_zero_beta() {
        let low = state_with(Rational::new(1, 4), Rational::new(1, 1));
        assert!(!ratio_threshold_outside(&Config::default(), &low));

        let config = Config {
            ratio_threshold_psi: true,
            ..Config::default()
        };
        let degenerate = state_with(Rational::new(1, 4), Rational::zero());
        assert!(!ratio_threshold_outside(&config, &degenerate));
    }

    #[test]
    fn test_threshold_leaves_state_untouched() {
        let config = Config {
            ratio_threshold_psi: true,
            ..Config::default()
        };
        let state = state_with(Rational::new(1, 4), Rational::new(1, 1));
        let before = state.clone();
        let _ = ratio_threshold_outside(&config, &state);
        assert_eq!(state.upsilon, before.upsilon);
        assert_eq!(state.beta, before.beta);
    }
}
