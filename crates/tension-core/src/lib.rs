// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Simulator Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Deterministic symbolic-dynamics simulator over unreduced rationals.
//!
//! Three primary rationals — υ (upsilon), β (beta), ϙ (koppa) — advance
//! through a repeating 11-step micro-cycle per tick, interleaving three
//! phase kinds (Emission, Memory, Reset). Emission steps run the engine
//! and detect number-theoretic ρ events; Memory steps may fire the ψ
//! inversion transform and accrue the ϙ accumulator; Reset steps clear
//! the latches. Every microtick emits exactly one observation.
//!
//! Architecture:
//!   - `state`: the per-simulation state container
//!   - `engine`: the E-phase (υ, β) update with its mode pipeline
//!   - `psi`: the 2-way/3-way inversion transform and its gates
//!   - `koppa`: the ϙ accumulator, stack ring, and sampling schedule
//!   - `ratio`: ratio windows and the ratio-threshold detector
//!   - `simulate`: the 11-microtick loop and observer dispatch
//!   - `output`: the CSV-writing entry point

pub mod engine;
pub mod koppa;
pub mod observer;
pub mod output;
pub mod psi;
pub mod ratio;
pub mod simulate;
pub mod state;

pub use engine::engine_step;
pub use koppa::koppa_accrue;
pub use observer::{MicrotickObserver, Observation, Phase};
pub use output::simulate;
pub use psi::{fire_psi, is_fibonacci_tick, should_fire_psi, stack_allows_psi};
pub use ratio::{ratio_in_range, ratio_threshold_outside};
pub use simulate::simulate_stream;
pub use state::SimState;
