// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Simulation State
// ─────────────────────────────────────────────────────────────────────
//! Per-simulation state container.
//!
//! One simulation owns its `SimState` exclusively for the duration of
//! the run; observers receive it by shared reference and must not
//! retain it across microticks.

use tension_num::Rational;
use tension_types::Config;

/// Capacity of the ϙ stack ring.
pub const KOPPA_STACK_DEPTH: usize = 4;

/// Full mutable state of one simulation.
#[derive(Debug, Clone)]
pub struct SimState {
    /// Primary tracked quantities.
    pub upsilon: Rational,
    pub beta: Rational,
    pub koppa: Rational,

    /// Snapshot of υ taken at the start of every E phase.
    pub epsilon: Rational,
    /// Snapshot of υ taken immediately before ψ.
    pub phi: Rational,

    /// Pre-engine-step values retained across one tick.
    pub previous_upsilon: Rational,
    pub previous_beta: Rational,

    /// Most recent applied differences current − previous.
    pub delta_upsilon: Rational,
    pub delta_beta: Rational,

    /// ε–φ triangle ratios (0/1 when the divisor is zero).
    pub triangle_phi_over_epsilon: Rational,
    pub triangle_prev_over_phi: Rational,
    pub triangle_epsilon_over_prev: Rational,

    /// Bounded ring of pushed ϙ values; only the first
    /// `koppa_stack_size` slots are meaningful.
    pub koppa_stack: [Rational; KOPPA_STACK_DEPTH],
    pub koppa_stack_size: usize,

    /// Stack element (or current ϙ) sampled this microtick, with its
    /// index; −1 when the sample is the live ϙ.
    pub koppa_sample: Rational,
    pub koppa_sample_index: i32,

    /// ρ latched, awaiting the next M phase.
    pub rho_pending: bool,
    /// ρ seen this tick; cleared at the end of every M and R phase.
    pub rho_latched: bool,
    /// A ψ fired on the most recent M phase.
    pub psi_recent: bool,
    pub ratio_triggered_recent: bool,
    pub psi_triple_recent: bool,
    pub dual_engine_last_step: bool,
    pub ratio_threshold_recent: bool,
    pub psi_strength_applied: bool,
    /// Alternating sign-flip polarity.
    pub sign_flip_polarity: bool,

    /// Current tick number (1-based), for Fibonacci-tick gating.
    pub tick: u64,
}

impl SimState {
    /// Seed a fresh state from the configured initial values.
    pub fn new(config: &Config) -> Self {
        Self {
            upsilon: config.initial_upsilon.clone(),
            beta: config.initial_beta.clone(),
            koppa: config.initial_koppa.clone(),
            epsilon: config.initial_upsilon.clone(),
            phi: config.initial_beta.clone(),
            previous_upsilon: config.initial_upsilon.clone(),
            previous_beta: config.initial_beta.clone(),
            delta_upsilon: Rational::zero(),
            delta_beta: Rational::zero(),
            triangle_phi_over_epsilon: Rational::zero(),
            triangle_prev_over_phi: Rational::zero(),
            triangle_epsilon_over_prev: Rational::zero(),
            koppa_stack: [
                Rational::zero(),
                Rational::zero(),
                Rational::zero(),
                Rational::zero(),
            ],
            koppa_stack_size: 0,
            koppa_sample: config.initial_koppa.clone(),
            koppa_sample_index: -1,
            rho_pending: false,
            rho_latched: false,
            psi_recent: false,
            ratio_triggered_recent: false,
            psi_triple_recent: false,
            dual_engine_last_step: false,
            ratio_threshold_recent: false,
            psi_strength_applied: false,
            sign_flip_polarity: false,
            tick: 0,
        }
    }

    /// Clear the per-microtick recency flags and re-sample the live ϙ.
    ///
    /// Runs at the top of each microtick, before any phase work.
    pub fn begin_microtick(&mut self) {
        self.ratio_triggered_recent = false;
        self.psi_triple_recent = false;
        self.dual_engine_last_step = false;
        self.ratio_threshold_recent = false;
        self.psi_strength_applied = false;
        self.koppa_sample = self.koppa.clone();
        self.koppa_sample_index = -1;
    }
}
