// ─────────────────────────────────────────────────────────────────────
// Tension Kernel — Command-Line Driver
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Loads a JSON configuration and runs one simulation.
//!
//! Default mode streams one semicolon-separated line per microtick to
//! stdout (the live protocol the front-end panels consume); with
//! `--write-csv` the run instead produces `events.csv` and
//! `values.csv` in the working directory.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tension_core::{simulate, simulate_stream, MicrotickObserver, Observation};
use tension_types::{load_config_file, Config};

#[derive(Parser, Debug)]
#[command(
    name = "tension-cli",
    version,
    about = "Tension Kernel — deterministic symbolic dynamics over unreduced rationals"
)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long)]
    config: String,

    /// Write events.csv and values.csv instead of streaming to stdout
    #[arg(long)]
    write_csv: bool,

    /// Diagnostic log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

/// Streams the live line protocol:
///
/// `tick;mt;υ;β;ϙ;psi;rho;stack_size;events;psi_mode;color`
struct StreamPrinter {
    psi_mode: &'static str,
    out: std::io::Stdout,
}

impl StreamPrinter {
    fn new(config: &Config) -> Self {
        Self {
            psi_mode: config.psi_mode.label(),
            out: std::io::stdout(),
        }
    }
}

impl MicrotickObserver for StreamPrinter {
    fn observe(&mut self, observation: &Observation<'_>) {
        let state = observation.state;

        let psi_label = if observation.psi_fired {
            if state.psi_triple_recent {
                "PSI_FIRE_TRIPLE"
            } else {
                "PSI_FIRE"
            }
        } else {
            "PSI_IDLE"
        };

        let rho_label = if observation.rho_event {
            "RHO_EVENT"
        } else if state.rho_pending || state.rho_latched {
            "RHO_PENDING"
        } else {
            "RHO_IDLE"
        };

        let mut events = vec![observation.phase.as_char().to_string()];
        if observation.mu_zero {
            events.push("mu=0".to_string());
        }
        if observation.forced_emission {
            events.push("forced".to_string());
        }
        if state.ratio_triggered_recent {
            events.push("ratio".to_string());
        }
        if state.ratio_threshold_recent {
            events.push("threshold".to_string());
        }
        if state.dual_engine_last_step {
            events.push("dual".to_string());
        }
        if state.psi_strength_applied {
            events.push("psi_strength".to_string());
        }
        if state.koppa_sample_index >= 0 {
            events.push(format!("sample={}", state.koppa_sample_index));
        }
        let events = events.join("|");

        let color = if state.psi_triple_recent {
            "#ff006e"
        } else if state.ratio_triggered_recent {
            "#00b894"
        } else if state.ratio_threshold_recent {
            "#8338ec"
        } else if observation.psi_fired {
            "#ff6f3c"
        } else {
            "#3a86ff"
        };

        let mut handle = self.out.lock();
        let _ = writeln!(
            handle,
            "{};{};{};{};{};{};{};{};{};{};{}",
            observation.tick,
            observation.microtick,
            state.upsilon,
            state.beta,
            state.koppa,
            psi_label,
            rho_label,
            state.koppa_stack_size,
            events,
            self.psi_mode,
            color
        );
        let _ = handle.flush();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<Level>().unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config_file(&cli.config)?;

    if cli.write_csv {
        simulate(&config)?;
        info!("simulation complete: events.csv and values.csv written");
    } else {
        let mut printer = StreamPrinter::new(&config);
        simulate_stream(&config, &mut printer);
    }

    Ok(())
}
