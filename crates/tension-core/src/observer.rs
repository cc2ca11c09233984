// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Observation Stream
// ─────────────────────────────────────────────────────────────────────
//! The per-microtick observation contract.
//!
//! The observer is invoked synchronously on the simulating thread,
//! exactly once per microtick, in microtick order. It must not mutate
//! the state it is shown and must return before the next microtick
//! executes.

use crate::state::SimState;

/// Phase kind of a microtick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Emission,
    Memory,
    Reset,
}

impl Phase {
    /// E at mt ∈ {1, 4, 7, 10}; M at mt ∈ {2, 5, 8, 11}; R otherwise.
    pub fn for_microtick(microtick: u8) -> Self {
        match microtick {
            1 | 4 | 7 | 10 => Self::Emission,
            2 | 5 | 8 | 11 => Self::Memory,
            _ => Self::Reset,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Emission => 'E',
            Self::Memory => 'M',
            Self::Reset => 'R',
        }
    }
}

/// One microtick's worth of observable facts.
#[derive(Debug)]
pub struct Observation<'a> {
    /// 1-based tick.
    pub tick: u64,
    /// Microtick index, 1..=11.
    pub microtick: u8,
    pub phase: Phase,
    /// Immutable view of the state after this microtick's phase work.
    pub state: &'a SimState,
    pub rho_event: bool,
    pub psi_fired: bool,
    pub mu_zero: bool,
    pub forced_emission: bool,
}

/// Per-microtick sink capability.
pub trait MicrotickObserver {
    fn observe(&mut self, observation: &Observation<'_>);
}
