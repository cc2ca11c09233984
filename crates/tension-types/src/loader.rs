// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — JSON Configuration Loader
// ─────────────────────────────────────────────────────────────────────
//! JSON → [`Config`].
//!
//! Every key is optional and applied over [`Config::default`]. Enum
//! keys carry the integer codes the configuration tooling writes;
//! seeds and custom ratio bounds are `"num/den"` strings. Unknown enum
//! codes and unparseable rationals are configuration errors — the
//! simulator core is never entered with a half-applied document.

use std::path::Path;

use num_bigint::BigInt;
use serde::Deserialize;

use tension_num::Rational;

use crate::config::{
    Config, EngineMode, KoppaMode, KoppaTrigger, Mt10Behavior, PrimeTarget, PsiMode,
    RatioTriggerMode, SignFlipMode, TrackMode,
};
use crate::error::{TensionError, TensionResult};

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    psi_mode: Option<i64>,
    koppa_mode: Option<i64>,
    engine_mode: Option<i64>,
    upsilon_track: Option<i64>,
    beta_track: Option<i64>,
    koppa_trigger: Option<i64>,
    prime_target: Option<i64>,
    mt10_behavior: Option<i64>,
    ratio_trigger_mode: Option<i64>,
    sign_flip_mode: Option<i64>,

    dual_track_symmetry: Option<bool>,
    triple_psi: Option<bool>,
    multi_level_koppa: Option<bool>,
    asymmetric_cascade: Option<bool>,
    conditional_triple_psi: Option<bool>,
    koppa_gated_engine: Option<bool>,
    delta_cross_propagation: Option<bool>,
    delta_koppa_offset: Option<bool>,
    ratio_threshold_psi: Option<bool>,
    stack_depth_modes: Option<bool>,
    epsilon_phi_triangle: Option<bool>,
    modular_wrap: Option<bool>,
    psi_strength_parameter: Option<bool>,
    ratio_snapshot_logging: Option<bool>,
    feedback_oscillator: Option<bool>,
    fibonacci_gate: Option<bool>,
    ratio_custom_range: Option<bool>,
    twin_prime_trigger: Option<bool>,
    fibonacci_trigger: Option<bool>,
    perfect_power_trigger: Option<bool>,

    tick_count: Option<i64>,
    koppa_wrap_threshold: Option<u64>,
    modulus_bound: Option<i64>,
    upsilon_seed: Option<String>,
    beta_seed: Option<String>,
    koppa_seed: Option<String>,
    ratio_custom_lower: Option<String>,
    ratio_custom_upper: Option<String>,
}

fn enum_error(key: &str, code: i64) -> TensionError {
    TensionError::Config(format!("unknown {key} value: {code}"))
}

fn parse_seed(key: &str, text: &str) -> TensionResult<Rational> {
    text.parse()
        .map_err(|e| TensionError::Config(format!("invalid {key}: {e}")))
}

/// Load a [`Config`] from a JSON document.
pub fn load_config(json: &str) -> TensionResult<Config> {
    let raw: RawConfig = serde_json::from_str(json)
        .map_err(|e| TensionError::Config(format!("JSON parse error: {e}")))?;

    let mut config = Config::default();

    if let Some(code) = raw.psi_mode {
        config.psi_mode = PsiMode::from_code(code).ok_or_else(|| enum_error("psi_mode", code))?;
    }
    if let Some(code) = raw.koppa_mode {
        config.koppa_mode =
            KoppaMode::from_code(code).ok_or_else(|| enum_error("koppa_mode", code))?;
    }
    if let Some(code) = raw.engine_mode {
        config.engine_mode =
            EngineMode::from_code(code).ok_or_else(|| enum_error("engine_mode", code))?;
    }
    if let Some(code) = raw.upsilon_track {
        config.engine_upsilon =
            TrackMode::from_code(code).ok_or_else(|| enum_error("upsilon_track", code))?;
    }
    if let Some(code) = raw.beta_track {
        config.engine_beta =
            TrackMode::from_code(code).ok_or_else(|| enum_error("beta_track", code))?;
    }
    if let Some(code) = raw.koppa_trigger {
        config.koppa_trigger =
            KoppaTrigger::from_code(code).ok_or_else(|| enum_error("koppa_trigger", code))?;
    }
    if let Some(code) = raw.prime_target {
        config.prime_target =
            PrimeTarget::from_code(code).ok_or_else(|| enum_error("prime_target", code))?;
    }
    if let Some(code) = raw.mt10_behavior {
        config.mt10_behavior =
            Mt10Behavior::from_code(code).ok_or_else(|| enum_error("mt10_behavior", code))?;
    }
    if let Some(code) = raw.ratio_trigger_mode {
        config.ratio_trigger_mode = RatioTriggerMode::from_code(code)
            .ok_or_else(|| enum_error("ratio_trigger_mode", code))?;
    }
    if let Some(code) = raw.sign_flip_mode {
        config.sign_flip_mode =
            SignFlipMode::from_code(code).ok_or_else(|| enum_error("sign_flip_mode", code))?;
    }

    if let Some(value) = raw.dual_track_symmetry {
        config.dual_track = value;
    }
    if let Some(value) = raw.triple_psi {
        config.triple_psi = value;
    }
    if let Some(value) = raw.multi_level_koppa {
        config.multi_level_koppa = value;
    }
    if let Some(value) = raw.asymmetric_cascade {
        config.asymmetric_cascade = value;
    }
    if let Some(value) = raw.conditional_triple_psi {
        config.conditional_triple_psi = value;
    }
    if let Some(value) = raw.koppa_gated_engine {
        config.koppa_gated_engine = value;
    }
    if let Some(value) = raw.delta_cross_propagation {
        config.delta_cross_propagation = value;
    }
    if let Some(value) = raw.delta_koppa_offset {
        config.delta_koppa_offset = value;
    }
    if let Some(value) = raw.ratio_threshold_psi {
        config.ratio_threshold_psi = value;
    }
    if let Some(value) = raw.stack_depth_modes {
        config.stack_depth_modes = value;
    }
    if let Some(value) = raw.epsilon_phi_triangle {
        config.epsilon_phi_triangle = value;
    }
    if let Some(value) = raw.modular_wrap {
        config.modular_wrap = value;
    }
    if let Some(value) = raw.psi_strength_parameter {
        config.psi_strength_parameter = value;
    }
    if let Some(value) = raw.ratio_snapshot_logging {
        config.ratio_snapshot_logging = value;
    }
    if let Some(value) = raw.feedback_oscillator {
        config.feedback_oscillator = value;
    }
    if let Some(value) = raw.fibonacci_gate {
        config.fibonacci_gate = value;
    }
    if let Some(value) = raw.ratio_custom_range {
        config.ratio_custom_range = value;
    }
    if let Some(value) = raw.twin_prime_trigger {
        config.twin_prime_trigger = value;
    }
    if let Some(value) = raw.fibonacci_trigger {
        config.fibonacci_trigger = value;
    }
    if let Some(value) = raw.perfect_power_trigger {
        config.perfect_power_trigger = value;
    }

    if let Some(ticks) = raw.tick_count {
        if ticks > 0 {
            config.ticks = ticks as u64;
        }
    }
    if let Some(threshold) = raw.koppa_wrap_threshold {
        config.koppa_wrap_threshold = threshold;
    }
    if let Some(bound) = raw.modulus_bound {
        config.modulus_bound = BigInt::from(bound);
    }

    if let Some(text) = raw.upsilon_seed.as_deref() {
        config.initial_upsilon = parse_seed("upsilon_seed", text)?;
    }
    if let Some(text) = raw.beta_seed.as_deref() {
        config.initial_beta = parse_seed("beta_seed", text)?;
    }
    if let Some(text) = raw.koppa_seed.as_deref() {
        config.initial_koppa = parse_seed("koppa_seed", text)?;
    }
    if let Some(text) = raw.ratio_custom_lower.as_deref() {
        config.ratio_custom_lower = parse_seed("ratio_custom_lower", text)?;
    }
    if let Some(text) = raw.ratio_custom_upper.as_deref() {
        config.ratio_custom_upper = parse_seed("ratio_custom_upper", text)?;
    }

    config.validate()?;
    Ok(config)
}

/// Load a [`Config`] from a JSON file.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> TensionResult<Config> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        log::error!("failed to read config {}: {e}", path.as_ref().display());
        TensionError::Io(e)
    })?;
    load_config(&text)
}
