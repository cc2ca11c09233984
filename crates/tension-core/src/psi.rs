// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — ψ Transform
// ─────────────────────────────────────────────────────────────────────
//! The ψ inversion transform and its firing gates.
//!
//! The standard 2-way transform rearranges (υ, β) by raw component
//! cross-multiplication; the triple 3-way transform rearranges
//! (υ, β, ϙ). Neither takes a GCD. A zero numerator among the involved
//! components makes the transform a no-op: psi_fired stays false and
//! the simulation continues.

use tension_num::{is_prime, Rational};
use tension_types::{Config, PsiMode};

use crate::state::SimState;

/// Tick numbers at which the Fibonacci gate admits a ρ-driven ψ.
const FIBONACCI_TICKS: [u64; 11] = [
    5, 13, 89, 233, 1597, 4181, 10946, 28657, 75025, 196418, 514229,
];

/// Membership in the fixed Fibonacci tick set.
pub fn is_fibonacci_tick(tick: u64) -> bool {
    FIBONACCI_TICKS.contains(&tick)
}

/// Stack-depth gate: with stack-depth modes on, ψ is permitted only at
/// stack sizes 2 and 4.
pub fn stack_allows_psi(config: &Config, state: &SimState) -> bool {
    !config.stack_depth_modes || matches!(state.koppa_stack_size, 2 | 4)
}

/// Mode-driven firing condition for an M step, including the
/// Fibonacci-tick gate.
pub fn should_fire_psi(config: &Config, state: &SimState) -> bool {
    let base = match config.psi_mode {
        PsiMode::Mstep | PsiMode::MstepRho => true,
        PsiMode::RhoOnly => state.rho_pending,
        PsiMode::InhibitRho => !state.rho_pending,
    };
    if config.fibonacci_gate
        && matches!(config.psi_mode, PsiMode::RhoOnly | PsiMode::MstepRho)
    {
        return base && state.rho_pending && is_fibonacci_tick(state.tick);
    }
    base
}

/// Standard 2-way inversion on non-zero numerators of υ and β.
///
///   φ ← υ,  υ ← (βₙ·υ_d)/(β_d·υₙ),  β ← (υₙ·β_d)/(υ_d·βₙ)
fn standard_transform(state: &mut SimState) -> bool {
    if state.upsilon.is_zero() || state.beta.is_zero() {
        return false;
    }
    let new_upsilon = Rational::from_parts(
        state.beta.num() * state.upsilon.den(),
        state.beta.den() * state.upsilon.num(),
    );
    let new_beta = Rational::from_parts(
        state.upsilon.num() * state.beta.den(),
        state.upsilon.den() * state.beta.num(),
    );
    state.phi = state.upsilon.clone();
    state.upsilon = new_upsilon;
    state.beta = new_beta;
    true
}

/// Triple 3-way inversion; requires υ, β, ϙ all non-zero.
///
///   (υ, β, ϙ) ← (β/ϙ, ϙ/υ, ϙ/β), each as a raw cross-multiply.
fn triple_transform(state: &mut SimState) -> bool {
    if state.upsilon.is_zero() || state.beta.is_zero() || state.koppa.is_zero() {
        return false;
    }
    let new_upsilon = Rational::from_parts(
        state.beta.num() * state.koppa.den(),
        state.beta.den() * state.koppa.num(),
    );
    let new_beta = Rational::from_parts(
        state.koppa.num() * state.upsilon.den(),
        state.koppa.den() * state.upsilon.num(),
    );
    let new_koppa = Rational::from_parts(
        state.koppa.num() * state.beta.den(),
        state.koppa.den() * state.beta.num(),
    );
    state.phi = state.upsilon.clone();
    state.upsilon = new_upsilon;
    state.beta = new_beta;
    state.koppa = new_koppa;
    true
}

fn all_numerators_prime(state: &SimState) -> bool {
    is_prime(state.upsilon.num()) && is_prime(state.beta.num()) && is_prime(state.koppa.num())
}

fn prime_numerator_count(state: &SimState) -> usize {
    [state.upsilon.num(), state.beta.num(), state.koppa.num()]
        .into_iter()
        .filter(|&n| is_prime(n))
        .count()
}

/// Execute ψ with strength amplification and triple selection.
///
/// Returns whether at least one transform fired. A failed iteration
/// (zero numerators) aborts the amplification loop.
pub fn fire_psi(config: &Config, state: &mut SimState) -> bool {
    let strength = if config.psi_strength_parameter && state.rho_pending {
        prime_numerator_count(state).max(1)
    } else {
        1
    };

    let mut fired = false;
    for iteration in 0..strength {
        let triple = config.triple_psi
            || (config.conditional_triple_psi && all_numerators_prime(state))
            || (strength >= 3 && iteration == strength - 3);
        let ok = if triple {
            triple_transform(state)
        } else {
            standard_transform(state)
        };
        if !ok {
            break;
        }
        fired = true;
        if triple {
            state.psi_triple_recent = true;
        }
        state.rho_pending = false;
    }

    if fired {
        state.psi_recent = true;
        state.rho_pending = false;
        state.rho_latched = false;
        if strength > 1 {
            state.psi_strength_applied = true;
        }
    }
    fired
}
