//! city — a small synthetic town for the energy-agents simulation.
//!
//! Every dwelling houses a few people whose daily rhythm (home, asleep, away)
//! follows a time-dependent Markov chain; every third person works from home
//! and follows a second one.  Dwellings are heated on presence
//! and every fifth one runs a constant thermostat.  Results land in
//! `output/city` unless the config says otherwise.
//!
//! ```text
//! cargo run -p city                     # built-in defaults
//! cargo run -p city -- town.json        # SimConfig + town size from JSON
//! RUST_LOG=ea_sim=debug cargo run -p city
//! ```

mod behavior;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ea_actor::{ExecutionPool, PoolConfig};
use ea_core::{ChainId, DwellingId, PersonId, SimConfig, Tick};
use ea_model::{Activity, DwellingParams, HeatingStrategy, PersonParams};
use ea_output::OutputWriter;
use ea_sim::{Conductor, DwellingSpec, LogSelection, PersonSpec, ScenarioBuilder, SimObserver};

use behavior::{activity_chain, outdoor_temperature};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TownConfig {
    sim:                 SimConfig,
    dwellings:           u32,
    people_per_dwelling: u32,
    output_dir:          PathBuf,
    log:                 LogFlags,
}

/// Data points to record; all on by default.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct LogFlags {
    temperature:   bool,
    thermal_power: bool,
    activity:      bool,
}

impl Default for LogFlags {
    fn default() -> Self {
        Self { temperature: true, thermal_power: true, activity: true }
    }
}

impl From<&LogFlags> for LogSelection {
    fn from(flags: &LogFlags) -> Self {
        Self {
            temperature:   flags.temperature,
            thermal_power: flags.thermal_power,
            activity:      flags.activity,
        }
    }
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            sim:                 SimConfig::default(),
            dwellings:           40,
            people_per_dwelling: 3,
            output_dir:          PathBuf::from("output/city"),
            log:                 LogFlags::default(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<TownConfig> {
    let Some(path) = path else {
        return Ok(TownConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Town layout ───────────────────────────────────────────────────────────────

const COMMUTER: ChainId = ChainId::DEFAULT;
const HOME_WORKER: ChainId = ChainId(1);

fn dwellings(count: u32) -> impl Iterator<Item = DwellingSpec> {
    (0..count).map(|i| {
        let area = 60.0 + f64::from(i * 37 % 90);
        let strategy = if i % 5 == 4 {
            HeatingStrategy::Constant(20.0)
        } else {
            HeatingStrategy::PresenceBased { active: 21.0, asleep: 17.0 }
        };
        DwellingSpec {
            id:     DwellingId(i),
            params: DwellingParams {
                heat_mass_capacity:     165_000.0 * area,
                heat_transmission:      2.0 * area,
                max_heating_power:      100.0 * area,
                conditioned_floor_area: area,
                initial_temperature:    19.0,
                strategy,
            },
        }
    })
}

fn people(dwellings: u32, per_dwelling: u32) -> impl Iterator<Item = PersonSpec> {
    (0..dwellings).flat_map(move |d| {
        (0..per_dwelling).map(move |j| {
            let id = d * per_dwelling + j;
            PersonSpec {
                id:     PersonId(id),
                home:   DwellingId(d),
                chain:  if id % 3 == 2 { HOME_WORKER } else { COMMUTER },
                params: PersonParams {
                    initial_activity: Activity::SleepAtHome,
                    ..PersonParams::default()
                },
            }
        })
    })
}

fn writer(dir: &Path) -> Result<Box<dyn OutputWriter>> {
    #[cfg(feature = "sqlite")]
    let writer: Box<dyn OutputWriter> = Box::new(ea_output::SqliteWriter::new(dir)?);
    #[cfg(not(feature = "sqlite"))]
    let writer: Box<dyn OutputWriter> = Box::new(ea_output::CsvWriter::new(dir)?);
    Ok(writer)
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Logs once per simulated day.
struct DailyProgress {
    ticks_per_day: u64,
}

impl SimObserver for DailyProgress {
    fn on_tick_end(&mut self, tick: Tick, unix_secs: i64) {
        if (tick.0 + 1) % self.ticks_per_day == 0 {
            let day = DateTime::from_timestamp(unix_secs, 0)
                .map(|t| t.format("%a %Y-%m-%d").to_string())
                .unwrap_or_default();
            info!(tick = tick.0 + 1, %day, "day complete");
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        info!(%final_tick, "writing results");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let town = load_config(path.as_deref())?;
    let config = town.sim.clone();
    info!(
        dwellings = town.dwellings,
        people = town.dwellings * town.people_per_dwelling,
        ticks = config.total_ticks,
        step_secs = config.tick_duration_secs,
        "town configured"
    );

    // 1. Inputs.
    let chains = [
        (COMMUTER, activity_chain(config.tick_duration_secs, true)?),
        (HOME_WORKER, activity_chain(config.tick_duration_secs, false)?),
    ];
    let weather = outdoor_temperature(&config);

    // 2. Execution pool sized from the config.
    let pool = ExecutionPool::new(PoolConfig::from_sim_config(&config))?;

    // 3. Entities.
    std::fs::create_dir_all(&town.output_dir)
        .with_context(|| format!("creating {}", town.output_dir.display()))?;
    let sim = ScenarioBuilder::new(config.clone())
        .markov_chains(chains)
        .outdoor_temperature(weather)
        .dwellings(dwellings(town.dwellings))
        .people(people(town.dwellings, town.people_per_dwelling))
        .writer(writer(&town.output_dir)?)
        .log(LogSelection::from(&town.log))
        .build(&pool)?;

    // 4. Run.
    let mut progress = DailyProgress {
        ticks_per_day: (86_400 / u64::from(config.tick_duration_secs)).max(1),
    };
    let summary = Conductor::new(sim, pool).run_with(&mut progress)?;

    // 5. Summary.
    println!();
    println!("Simulation complete in {:.3} s", summary.wall_secs);
    println!("  ticks      : {}", summary.ticks);
    println!(
        "  reached    : {}",
        DateTime::from_timestamp(summary.unix_secs, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| summary.unix_secs.to_string())
    );
    println!("  output dir : {}", town.output_dir.display());
    Ok(())
}
