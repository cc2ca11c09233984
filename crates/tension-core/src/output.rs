// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — CSV Entry Point
// ─────────────────────────────────────────────────────────────────────
//! The file-writing simulation entry point.
//!
//! `simulate` runs the loop and writes `events.csv` and `values.csv`
//! in the working directory, one row per microtick plus a header.
//! Booleans are "0"/"1"; the ϙ sample index is a signed decimal with a
//! −1 sentinel; every rational is a (num, den) column pair in decimal.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tension_num::Rational;
use tension_types::{Config, TensionResult};

use crate::observer::{MicrotickObserver, Observation};
use crate::simulate::simulate_stream;

pub const EVENTS_FILE: &str = "events.csv";
pub const VALUES_FILE: &str = "values.csv";

const EVENTS_HEADER: &str = "tick,mt,phase,rho_event,psi_fired,mu_zero,forced_emission,\
ratio_triggered,triple_psi,dual_engine,koppa_sample_index,ratio_threshold,psi_strength,sign_flip";

const VALUES_HEADER: &str = "tick,mt,upsilon_num,upsilon_den,beta_num,beta_den,\
koppa_num,koppa_den,koppa_sample_num,koppa_sample_den,prev_upsilon_num,prev_upsilon_den,\
prev_beta_num,prev_beta_den,koppa_stack0_num,koppa_stack0_den,koppa_stack1_num,\
koppa_stack1_den,koppa_stack2_num,koppa_stack2_den,koppa_stack3_num,koppa_stack3_den,\
koppa_stack_size,delta_upsilon_num,delta_upsilon_den,delta_beta_num,delta_beta_den,\
triangle_phi_over_epsilon_num,triangle_phi_over_epsilon_den,triangle_prev_over_phi_num,\
triangle_prev_over_phi_den,triangle_epsilon_over_prev_num,triangle_epsilon_over_prev_den";

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// CSV sink; the first write failure is retained and reported when the
/// run finishes.
struct CsvObserver {
    events: BufWriter<File>,
    values: BufWriter<File>,
    error: Option<io::Error>,
}

impl CsvObserver {
    fn create(events_path: &Path, values_path: &Path) -> TensionResult<Self> {
        let events = File::create(events_path).map_err(|e| {
            log::error!("cannot create {}: {e}", events_path.display());
            e
        })?;
        let values = File::create(values_path).map_err(|e| {
            log::error!("cannot create {}: {e}", values_path.display());
            e
        })?;
        let mut observer = Self {
            events: BufWriter::new(events),
            values: BufWriter::new(values),
            error: None,
        };
        observer.try_write(|this| {
            writeln!(this.events, "{EVENTS_HEADER}")?;
            writeln!(this.values, "{VALUES_HEADER}")
        });
        Ok(observer)
    }

    fn try_write(&mut self, write: impl FnOnce(&mut Self) -> io::Result<()>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = write(self) {
            log::error!("CSV write failed: {e}");
            self.error = Some(e);
        }
    }

    fn finish(mut self) -> TensionResult<()> {
        self.try_write(|this| {
            this.events.flush()?;
            this.values.flush()
        });
        match self.error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

fn write_pair(out: &mut impl Write, value: &Rational) -> io::Result<()> {
    write!(out, ",{},{}", value.num(), value.den())
}

impl MicrotickObserver for CsvObserver {
    fn observe(&mut self, observation: &Observation<'_>) {
        self.try_write(|this| {
            let state = observation.state;
            writeln!(
                this.events,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                observation.tick,
                observation.microtick,
                observation.phase.as_char(),
                flag(observation.rho_event),
                flag(observation.psi_fired),
                flag(observation.mu_zero),
                flag(observation.forced_emission),
                flag(state.ratio_triggered_recent),
                flag(state.psi_triple_recent),
                flag(state.dual_engine_last_step),
                state.koppa_sample_index,
                flag(state.ratio_threshold_recent),
                flag(state.psi_strength_applied),
                flag(state.sign_flip_polarity),
            )?;

            write!(this.values, "{},{}", observation.tick, observation.microtick)?;
            write_pair(&mut this.values, &state.upsilon)?;
            write_pair(&mut this.values, &state.beta)?;
            write_pair(&mut this.values, &state.koppa)?;
            write_pair(&mut this.values, &state.koppa_sample)?;
            write_pair(&mut this.values, &state.previous_upsilon)?;
            write_pair(&mut this.values, &state.previous_beta)?;
            for slot in &state.koppa_stack {
                write_pair(&mut this.values, slot)?;
            }
            write!(this.values, ",{}", state.koppa_stack_size)?;
            write_pair(&mut this.values, &state.delta_upsilon)?;
            write_pair(&mut this.values, &state.delta_beta)?;
            write_pair(&mut this.values, &state.triangle_phi_over_epsilon)?;
            write_pair(&mut this.values, &state.triangle_prev_over_phi)?;
            write_pair(&mut this.values, &state.triangle_epsilon_over_prev)?;
            writeln!(this.values)
        });
    }
}

/// Run the simulation and write `events.csv` and `values.csv` in the
/// working directory.
pub fn simulate(config: &Config) -> TensionResult<()> {
    simulate_to(config, Path::new(EVENTS_FILE), Path::new(VALUES_FILE))
}

/// Run the simulation and write the two CSVs at explicit paths.
pub fn simulate_to(config: &Config, events_path: &Path, values_path: &Path) -> TensionResult<()> {
    let mut observer = CsvObserver::create(events_path, values_path)?;
    simulate_stream(config, &mut observer);
    observer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_have_matching_column_counts() {
        assert_eq!(EVENTS_HEADER.split(',').count(), 14);
        // tick, mt, 15 rational pairs, and the stack size.
        assert_eq!(VALUES_HEADER.split(',').count(), 2 + 15 * 2 + 1);
    }
}
