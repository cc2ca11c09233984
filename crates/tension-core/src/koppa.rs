// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — ϙ Accumulator
// ─────────────────────────────────────────────────────────────────────
//! The ϙ accumulator: trigger decision, multi-level stack ring, base
//! reset (dump/pop/accumulate), the (υ + β) accrual term, and the
//! observation-only sampling schedule.

use tension_num::Rational;
use tension_types::{Config, KoppaMode, KoppaTrigger};

use crate::state::{SimState, KOPPA_STACK_DEPTH};

/// Push the current ϙ onto the stack ring. A full ring shifts left and
/// discards the oldest value.
fn stack_push(state: &mut SimState) {
    let value = state.koppa.clone();
    if state.koppa_stack_size == KOPPA_STACK_DEPTH {
        state.koppa_stack.rotate_left(1);
        state.koppa_stack[KOPPA_STACK_DEPTH - 1] = value;
    } else {
        state.koppa_stack[state.koppa_stack_size] = value;
        state.koppa_stack_size += 1;
    }
}

/// Refresh the observation sample. With the multi-level stack active,
/// microtick 11 samples slot 0 and microtick 5 samples slot 2 (when
/// deep enough); otherwise the live ϙ is sampled with index −1.
fn update_sample(state: &mut SimState, microtick: u8, multi_level: bool) {
    state.koppa_sample_index = -1;
    state.koppa_sample = state.koppa.clone();

    if !multi_level {
        return;
    }

    if microtick == 11 && state.koppa_stack_size > 0 {
        state.koppa_sample = state.koppa_stack[0].clone();
        state.koppa_sample_index = 0;
    } else if microtick == 5 && state.koppa_stack_size > 2 {
        state.koppa_sample = state.koppa_stack[2].clone();
        state.koppa_sample_index = 2;
    }
}

/// Run the ϙ accrual for one M or R microtick.
pub fn koppa_accrue(
    config: &Config,
    state: &mut SimState,
    psi_fired: bool,
    is_memory_step: bool,
    microtick: u8,
) {
    let trigger = match config.koppa_trigger {
        KoppaTrigger::OnPsi => psi_fired,
        KoppaTrigger::OnMuAfterPsi => is_memory_step && !psi_fired && state.psi_recent,
        KoppaTrigger::OnAllMu => is_memory_step,
    };

    if !trigger {
        if !psi_fired && config.koppa_trigger != KoppaTrigger::OnAllMu {
            state.psi_recent =
                state.psi_recent && config.koppa_trigger == KoppaTrigger::OnMuAfterPsi;
        }
        update_sample(state, microtick, config.multi_level_koppa);
        return;
    }

    if config.multi_level_koppa {
        stack_push(state);
    }

    match config.koppa_mode {
        KoppaMode::Dump => state.koppa = Rational::zero(),
        KoppaMode::Pop => state.koppa = state.epsilon.clone(),
        KoppaMode::Accumulate => state.koppa = state.koppa.add(&state.epsilon),
    }

    let addition = state.upsilon.add(&state.beta);
    state.koppa = state.koppa.add(&addition);

    state.psi_recent = if config.koppa_trigger == KoppaTrigger::OnMuAfterPsi {
        false
    } else {
        psi_fired
    };

    update_sample(state, microtick, config.multi_level_koppa);
}
