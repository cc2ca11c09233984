// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Engine Step
// ─────────────────────────────────────────────────────────────────────
//! The E-phase update of (υ, β).
//!
//! Mode selection pipeline, in order:
//!   1. base modes (single-track map or dual-track pair)
//!   2. asymmetric cascade override by microtick
//!   3. stack-depth override from the ϙ-stack size
//!   4. ϙ magnitude gate from |num(ϙ)|
//!
//! Everything is computed from the pre-step values and committed
//! together. In plain single-track operation only υ advances; the β
//! track participates under dual-track or the asymmetric cascade (and
//! always under delta-add, delta-cross, and sign flip). A SLIDE
//! against a zero-numerator ϙ fails the whole step: the state is left
//! fully unchanged and the simulation continues.

use num_bigint::BigInt;

use tension_num::Rational;
use tension_types::{Config, EngineMode, SignFlipMode, TrackMode};

use crate::state::SimState;

/// Apply one track mode to a component.
///
/// `None` signals the modeled division-by-zero of SLIDE.
fn apply_track(
    mode: TrackMode,
    current: &Rational,
    counterpart: &Rational,
    koppa: &Rational,
) -> Option<Rational> {
    match mode {
        TrackMode::Add => Some(current.add(counterpart).add(koppa)),
        TrackMode::Multi => Some(current.mul(&counterpart.add(koppa))),
        TrackMode::Slide => {
            if koppa.is_zero() {
                None
            } else {
                current.add(counterpart).div(koppa)
            }
        }
    }
}

/// Resolve the (υ, β) track modes for this step.
fn resolve_modes(config: &Config, state: &SimState, microtick: u8) -> (TrackMode, TrackMode) {
    let (mut ups_mode, mut beta_mode) = if config.dual_track {
        (config.engine_upsilon, config.engine_beta)
    } else {
        let mapped = match config.engine_mode {
            EngineMode::Add | EngineMode::DeltaAdd => TrackMode::Add,
            EngineMode::Multi => TrackMode::Multi,
            EngineMode::Slide => TrackMode::Slide,
        };
        (mapped, mapped)
    };

    if config.asymmetric_cascade {
        (ups_mode, beta_mode) = match microtick {
            1 => (TrackMode::Multi, TrackMode::Add),
            4 => (TrackMode::Add, TrackMode::Slide),
            7 => (TrackMode::Slide, TrackMode::Multi),
            10 => (TrackMode::Add, TrackMode::Add),
            _ => (ups_mode, beta_mode),
        };
    }

    if config.stack_depth_modes {
        let depth_mode = match state.koppa_stack_size {
            0 | 1 => TrackMode::Add,
            2 | 3 => TrackMode::Multi,
            4 => TrackMode::Slide,
            _ => TrackMode::Add,
        };
        ups_mode = depth_mode;
        beta_mode = depth_mode;
    }

    if config.koppa_gated_engine {
        let magnitude = state.koppa.abs_num();
        let gated = if magnitude < BigInt::from(10) {
            TrackMode::Slide
        } else if magnitude < BigInt::from(100) {
            TrackMode::Multi
        } else {
            TrackMode::Add
        };
        ups_mode = gated;
        beta_mode = gated;
    }

    (ups_mode, beta_mode)
}

/// Triangle ratio helper: raw division, 0/1 when the divisor is zero.
fn triangle_ratio(numerator: &Rational, divisor: &Rational) -> Rational {
    numerator.div(divisor).unwrap_or_else(Rational::zero)
}

/// Run one engine step. Returns false (and changes nothing) when a
/// SLIDE meets a zero-numerator ϙ.
pub fn engine_step(config: &Config, state: &mut SimState, microtick: u8) -> bool {
    let pre_upsilon = state.upsilon.clone();
    let pre_beta = state.beta.clone();

    let delta_add = config.engine_mode == EngineMode::DeltaAdd && !config.dual_track;

    let (mut new_upsilon, mut new_beta) = if delta_add {
        let delta_u = pre_upsilon.delta(&state.previous_upsilon);
        let delta_b = pre_beta.delta(&state.previous_beta);
        (pre_upsilon.add(&delta_u), pre_beta.add(&delta_b))
    } else {
        let (ups_mode, beta_mode) = resolve_modes(config, state, microtick);
        let Some(next_upsilon) = apply_track(ups_mode, &pre_upsilon, &pre_beta, &state.koppa)
        else {
            return false;
        };
        let next_beta = if config.dual_track || config.asymmetric_cascade {
            let Some(next_beta) = apply_track(beta_mode, &pre_beta, &pre_upsilon, &state.koppa)
            else {
                return false;
            };
            next_beta
        } else {
            pre_beta.clone()
        };
        (next_upsilon, next_beta)
    };

    if config.delta_cross_propagation {
        let delta_u = pre_upsilon.delta(&state.previous_upsilon);
        let delta_b = pre_beta.delta(&state.previous_beta);
        new_upsilon = new_upsilon.add(&delta_b);
        new_beta = new_beta.add(&delta_u);
        if config.delta_koppa_offset {
            new_upsilon = new_upsilon.add(&state.koppa);
            new_beta = new_beta.add(&state.koppa);
        }
    }

    match config.sign_flip_mode {
        SignFlipMode::Always => {
            new_upsilon = new_upsilon.negate();
            new_beta = new_beta.negate();
        }
        SignFlipMode::Alternate => {
            if !state.sign_flip_polarity {
                new_upsilon = new_upsilon.negate();
                new_beta = new_beta.negate();
            }
            state.sign_flip_polarity = !state.sign_flip_polarity;
        }
        SignFlipMode::None => {
            state.sign_flip_polarity = false;
        }
    }

    if config.epsilon_phi_triangle {
        state.triangle_phi_over_epsilon = triangle_ratio(&state.phi, &state.epsilon);
        state.triangle_prev_over_phi = triangle_ratio(&state.previous_upsilon, &state.phi);
        state.triangle_epsilon_over_prev =
            triangle_ratio(&state.epsilon, &state.previous_upsilon);
    }

    if config.modular_wrap
        && !pre_beta.is_zero()
        && state.koppa.abs_num() > BigInt::from(config.koppa_wrap_threshold)
    {
        if let Some(wrapped) = state.koppa.modulo(&pre_beta) {
            state.koppa = wrapped;
        }
    }

    state.previous_upsilon = pre_upsilon.clone();
    state.previous_beta = pre_beta.clone();
    state.delta_upsilon = new_upsilon.delta(&pre_upsilon);
    state.delta_beta = new_beta.delta(&pre_beta);
    state.upsilon = new_upsilon;
    state.beta = new_beta;
    state.dual_engine_last_step = config.dual_track;

    true
}
