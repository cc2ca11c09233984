// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Simulation Loop
// ─────────────────────────────────────────────────────────────────────
//! The 11-microtick phase schedule and observer dispatch.
//!
//! Per tick, per microtick:
//!   - top of microtick: clear recency flags, re-sample the live ϙ
//!   - E (mt 1/4/7/10): snapshot ε, run the engine, detect ρ; mt 10
//!     surfaces forced_emission and latches ρ for the following M
//!   - M (mt 2/5/8/11): ψ request pipeline (mode gate, ratio window,
//!     ratio threshold, stack gate), ϙ accrual, latch clear
//!   - R (mt 3/6/9): ϙ accrual without ψ, latch clears
//!
//! Exactly one observation is emitted per microtick, synchronously.

use tension_num::{has_pattern_component, PatternFlags};
use tension_types::{Config, Mt10Behavior, PrimeTarget};

use crate::engine::engine_step;
use crate::koppa::koppa_accrue;
use crate::observer::{MicrotickObserver, Observation, Phase};
use crate::psi::{fire_psi, should_fire_psi, stack_allows_psi};
use crate::ratio::{ratio_in_range, ratio_threshold_outside};
use crate::state::SimState;

fn pattern_flags(config: &Config) -> PatternFlags {
    PatternFlags {
        twin_prime: config.twin_prime_trigger,
        fibonacci: config.fibonacci_trigger,
        perfect_power: config.perfect_power_trigger,
    }
}

/// Run the simulation, invoking `observer` once per microtick.
///
/// The observer is called on the simulating thread and must return
/// before the next microtick executes. No files are written.
pub fn simulate_stream(config: &Config, observer: &mut dyn MicrotickObserver) {
    let flags = pattern_flags(config);
    let mut state = SimState::new(config);

    for tick in 1..=config.ticks {
        state.tick = tick;
        for microtick in 1..=11u8 {
            let phase = Phase::for_microtick(microtick);
            let mut rho_event = false;
            let mut psi_fired = false;
            let mut mu_zero = false;
            let mut forced_emission = false;

            state.begin_microtick();

            match phase {
                Phase::Emission => {
                    state.epsilon = state.upsilon.clone();
                    if !engine_step(config, &mut state, microtick) {
                        log::debug!(
                            "engine step no-op (zero ϙ divisor) at tick {tick} mt {microtick}"
                        );
                    }

                    let target = match config.prime_target {
                        PrimeTarget::OnMemory => &state.epsilon,
                        PrimeTarget::OnNewUpsilon => &state.upsilon,
                    };
                    if has_pattern_component(target, flags) {
                        state.rho_pending = true;
                        state.rho_latched = true;
                        rho_event = true;
                    } else {
                        state.rho_pending = false;
                        state.rho_latched = false;
                    }

                    // mt 10 surfaces a forced emission; the ψ itself is
                    // deferred to the following M microtick.
                    if microtick == 10 {
                        forced_emission = true;
                        if rho_event || config.mt10_behavior == Mt10Behavior::ForcedPsi {
                            state.rho_pending = true;
                            state.rho_latched = true;
                        }
                    }
                }
                Phase::Memory => {
                    mu_zero = state.beta.is_zero();
                    let allow_stack = stack_allows_psi(config, &state);
                    let mut request_psi = should_fire_psi(config, &state);
                    if ratio_in_range(config, &state) {
                        request_psi = true;
                        state.ratio_triggered_recent = true;
                    }
                    if ratio_threshold_outside(config, &state) {
                        request_psi = true;
                        state.ratio_threshold_recent = true;
                    }

                    if request_psi && allow_stack {
                        psi_fired = fire_psi(config, &mut state);
                    } else {
                        state.psi_recent = false;
                    }

                    koppa_accrue(config, &mut state, psi_fired, true, microtick);
                    state.rho_latched = false;
                }
                Phase::Reset => {
                    koppa_accrue(config, &mut state, false, false, microtick);
                    state.psi_recent = false;
                    state.rho_latched = false;
                }
            }

            observer.observe(&Observation {
                tick,
                microtick,
                phase,
                state: &state,
                rho_event,
                psi_fired,
                mu_zero,
                forced_emission,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tension_num::Rational;
    use tension_types::{KoppaTrigger, PsiMode};

    /// Records every observation for assertions.
    #[derive(Default)]
    struct Recorder {
        rows: Vec<RecordedRow>,
    }

    struct RecordedRow {
        tick: u64,
        microtick: u8,
        phase: Phase,
        upsilon: Rational,
        beta: Rational,
        koppa: Rational,
        stack_size: usize,
        rho_event: bool,
        psi_fired: bool,
        mu_zero: bool,
        forced_emission: bool,
        psi_triple_recent: bool,
    }

    impl MicrotickObserver for Recorder {
        fn observe(&mut self, observation: &Observation<'_>) {
            self.rows.push(RecordedRow {
                tick: observation.tick,
                microtick: observation.microtick,
                phase: observation.phase,
                upsilon: observation.state.upsilon.clone(),
                beta: observation.state.beta.clone(),
                koppa: observation.state.koppa.clone(),
                stack_size: observation.state.koppa_stack_size,
                rho_event: observation.rho_event,
                psi_fired: observation.psi_fired,
                mu_zero: observation.mu_zero,
                forced_emission: observation.forced_emission,
                psi_triple_recent: observation.state.psi_triple_recent,
            });
        }
    }

    fn run(config: &Config) -> Recorder {
        let mut recorder = Recorder::default();
        simulate_stream(config, &mut recorder);
        recorder
    }

    fn base_config() -> Config {
        Config {
            initial_upsilon: Rational::new(3, 5),
            initial_beta: Rational::new(5, 7),
            initial_koppa: Rational::new(1, 1),
            ticks: 1,
            ..Config::default()
        }
    }

    #[test]
    fn test_one_observation_per_microtick() {
        let config = Config {
            ticks: 3,
            ..base_config()
        };
        let recorder = run(&config);
        assert_eq!(recorder.rows.len(), 33);
        for (index, row) in recorder.rows.iter().enumerate() {
            assert_eq!(row.tick as usize, index / 11 + 1);
            assert_eq!(row.microtick as usize, index % 11 + 1);
            assert_eq!(row.phase, Phase::for_microtick(row.microtick));
        }
    }

    #[test]
    fn test_plain_add_mstep_dump_scenario() {
        // Seeds υ=3/5, β=5/7, ϙ=1/1; plain ADD, MSTEP ψ, DUMP ϙ,
        // KOPPA_ON_PSI, one tick.
        let recorder = run(&base_config());

        // mt 1 (E): υ = 3/5 + 5/7 + 1/1 = 81/35.
        let mt1 = &recorder.rows[0];
        assert_eq!(mt1.phase, Phase::Emission);
        assert_eq!(mt1.upsilon, Rational::new(81, 35));
        assert!(!mt1.psi_fired);

        // Single-track ADD leaves β at its seed.
        assert_eq!(mt1.beta, Rational::new(5, 7));

        // mt 2 (M): MSTEP ψ fires on (81/35, 5/7):
        // υ = (5·35)/(7·81) = 175/567, β = (81·7)/(35·5) = 567/175.
        // The ON_PSI trigger then dumps ϙ and adds υ + β.
        let mt2 = &recorder.rows[1];
        assert!(mt2.psi_fired);
        assert_eq!(mt2.upsilon, Rational::new(175, 567));
        assert_eq!(mt2.beta, Rational::new(567, 175));
        let expected_koppa =
            Rational::zero().add(&Rational::new(175, 567).add(&Rational::new(567, 175)));
        assert_eq!(mt2.koppa, expected_koppa);

        // mt 3 (R): ON_PSI trigger cannot fire, ϙ unchanged.
        let mt3 = &recorder.rows[2];
        assert_eq!(mt3.koppa, mt2.koppa);
    }

    #[test]
    fn test_slide_with_zero_koppa_continues() {
        let config = Config {
            engine_mode: tension_types::EngineMode::Slide,
            initial_koppa: Rational::zero(),
            ..base_config()
        };
        let recorder = run(&config);
        // mt 1: engine no-op, state unchanged.
        let mt1 = &recorder.rows[0];
        assert_eq!(mt1.upsilon, Rational::new(3, 5));
        assert_eq!(mt1.beta, Rational::new(5, 7));
        assert!(!mt1.psi_fired);
        // mt 2 proceeds normally (MSTEP ψ still fires).
        assert!(recorder.rows[1].psi_fired);
    }

    #[test]
    fn test_prime_on_memory_rho_event() {
        let config = Config {
            prime_target: PrimeTarget::OnMemory,
            initial_upsilon: Rational::new(7, 2),
            ..base_config()
        };
        let recorder = run(&config);
        let mt1 = &recorder.rows[0];
        assert!(mt1.rho_event, "ε = 7/2 has a prime numerator");
    }

    #[test]
    fn test_conditional_triple_fires_triple() {
        let config = Config {
            conditional_triple_psi: true,
            initial_upsilon: Rational::new(2, 1),
            initial_beta: Rational::new(3, 1),
            initial_koppa: Rational::new(5, 1),
            engine_mode: tension_types::EngineMode::Slide,
            psi_mode: PsiMode::Mstep,
            ..base_config()
        };
        // SLIDE at mt 1: υ = (2/1 + 3/1)/(5/1) = (5/1)/(5/1) = 5/5; β
        // and ϙ are untouched, so the first M sees numerators
        // (5, 3, 5) — all prime — and the ψ must be triple.
        let recorder = run(&config);
        let mt2 = &recorder.rows[1];
        assert!(mt2.psi_fired);
        assert!(mt2.psi_triple_recent);
    }

    #[test]
    fn test_stack_depth_gating_invariant() {
        let config = Config {
            stack_depth_modes: true,
            multi_level_koppa: true,
            koppa_trigger: KoppaTrigger::OnAllMu,
            ticks: 6,
            ..base_config()
        };
        let recorder = run(&config);
        // The stack size at firing time is the size recorded by the
        // preceding microtick: the accrual that follows ψ in the same
        // microtick may push and change it.
        let mut fired = 0;
        for (index, row) in recorder.rows.iter().enumerate() {
            if row.psi_fired {
                let size_at_firing = if index == 0 {
                    0
                } else {
                    recorder.rows[index - 1].stack_size
                };
                assert!(
                    size_at_firing == 2 || size_at_firing == 4,
                    "ψ fired at stack depth {size_at_firing} (tick {} mt {})",
                    row.tick,
                    row.microtick
                );
                fired += 1;
            }
        }
        assert!(fired > 0, "gating never admitted a ψ in 6 ticks");
        // Tick 1 fills the stack (depths 0–3 at the M steps), so its
        // first three M microticks must stay silent.
        assert!(!recorder.rows[1].psi_fired);
        assert!(!recorder.rows[4].psi_fired);
    }

    #[test]
    fn test_mu_zero_flag() {
        let config = Config {
            initial_upsilon: Rational::zero(),
            initial_beta: Rational::zero(),
            initial_koppa: Rational::zero(),
            ..base_config()
        };
        let recorder = run(&config);
        let mt2 = &recorder.rows[1];
        assert!(mt2.mu_zero);
        assert!(!mt2.psi_fired, "ψ cannot fire on zero numerators");
    }

    #[test]
    fn test_forced_emission_at_mt10() {
        let recorder = run(&base_config());
        for row in &recorder.rows {
            assert_eq!(row.forced_emission, row.microtick == 10);
        }
    }

    #[test]
    fn test_fibonacci_gate_blocks_until_fibonacci_tick() {
        // FORCED_PSI latches ρ at every mt 10, so mt 11 carries a
        // pending ρ on every tick; the gate must still restrict firing
        // to the Fibonacci ticks 5 and 13.
        let config = Config {
            psi_mode: PsiMode::RhoOnly,
            fibonacci_gate: true,
            mt10_behavior: Mt10Behavior::ForcedPsi,
            ticks: 13,
            ..base_config()
        };
        let recorder = run(&config);
        for row in &recorder.rows {
            if row.psi_fired {
                assert!(
                    row.tick == 5 || row.tick == 13,
                    "ψ fired at non-Fibonacci tick {}",
                    row.tick
                );
            }
        }
        let fired_mt11_ticks: Vec<u64> = recorder
            .rows
            .iter()
            .filter(|r| r.psi_fired && r.microtick == 11)
            .map(|r| r.tick)
            .collect();
        assert!(fired_mt11_ticks.contains(&5));
        assert!(fired_mt11_ticks.contains(&13));
    }
}
