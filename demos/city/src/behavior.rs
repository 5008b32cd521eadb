//! Synthetic inputs: a daily activity rhythm and a winter week of weather.

use ea_core::SimConfig;
use ea_model::{Activity, DayKind, HeterogeneousMarkovChain, MarkovChain, ModelResult, TimeSeries};

/// Probability of keeping the current activity for one more step.
const INERTIA: f64 = 0.85;

/// Where people tend to be at a given hour, as (home, asleep, away).
fn target_mix(day: DayKind, hour: u32) -> [f64; 3] {
    match (day, hour) {
        (_, 0..=5) | (_, 23) => [0.05, 0.90, 0.05],
        (DayKind::Weekday, 6) => [0.50, 0.45, 0.05],
        (DayKind::Weekday, 7..=8) => [0.45, 0.05, 0.50],
        (DayKind::Weekday, 9..=16) => [0.25, 0.00, 0.75],
        (DayKind::Weekend, 6..=8) => [0.35, 0.60, 0.05],
        (DayKind::Weekend, 9..=16) => [0.55, 0.00, 0.45],
        (_, 17..=21) => [0.80, 0.00, 0.20],
        _ => [0.55, 0.40, 0.05],
    }
}

/// One chain per time slot of `step_secs`: keep the current activity with
/// probability [`INERTIA`], otherwise draw from the hour's target mix.
///
/// People who do not commute spend every day like a weekend.
pub fn activity_chain(step_secs: u32, commuter: bool) -> ModelResult<HeterogeneousMarkovChain<Activity>> {
    HeterogeneousMarkovChain::from_fn(step_secs, |day, secs| {
        let day = if commuter { day } else { DayKind::Weekend };
        let mix = target_mix(day, secs / 3_600);
        MarkovChain::new(Activity::ALL.into_iter().flat_map(|from| {
            Activity::ALL.into_iter().zip(mix).map(move |(to, share)| {
                let stay = if from == to { INERTIA } else { 0.0 };
                (from, to, stay + (1.0 - INERTIA) * share)
            })
        }))
    })
}

/// Outdoor temperature covering the whole run: a daily swing around a slowly
/// falling mean, coldest at 05:00.
pub fn outdoor_temperature(config: &SimConfig) -> TimeSeries<f64> {
    let step = config.tick_duration_secs;
    let values = (0..=config.total_ticks)
        .map(|k| {
            let t = config.start_unix_secs + (k * step as u64) as i64;
            let day = (t - config.start_unix_secs) as f64 / 86_400.0;
            let phase = ((t.rem_euclid(86_400) - 5 * 3_600) as f64 / 86_400.0) * std::f64::consts::TAU;
            4.0 - 0.3 * day - 5.0 * phase.cos()
        })
        .collect();
    TimeSeries::from_values(config.start_unix_secs, step, values)
}
