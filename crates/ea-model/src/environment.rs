//! The city-wide outdoor climate.

use std::future::Future;

use ea_actor::{Actor, Pending, PoolHandle};
use ea_core::EntityKey;

use crate::{ModelError, ModelResult, TimeSeries};

/// Outdoor temperature, valid for every dwelling at once.
#[derive(Debug)]
pub struct Environment {
    temperature: TimeSeries<f64>,
    index:       usize,
}

impl Environment {
    /// Fails unless `temperature` has a constant step of `step_secs`.
    pub fn new(temperature: TimeSeries<f64>, step_secs: u32) -> ModelResult<Self> {
        match temperature.constant_step() {
            Some(step) if step == step_secs as i64 => Ok(Self { temperature, index: 0 }),
            Some(step) => Err(ModelError::InvalidSeries(format!(
                "temperature step is {step}s, simulation step is {step_secs}s"
            ))),
            None => Err(ModelError::InvalidSeries(
                "temperature series needs a constant time step".into(),
            )),
        }
    }

    /// Outdoor temperature of the current step [℃].
    pub fn current_temperature(&self) -> f64 {
        self.temperature.values()[self.index]
    }

    /// Timestamp of the current step.
    pub fn current_unix_secs(&self) -> i64 {
        self.temperature.index()[self.index]
    }

    /// Move on to the next entry of the series.
    pub fn step(&mut self) -> ModelResult<()> {
        if self.index + 1 >= self.temperature.len() {
            return Err(ModelError::SeriesExhausted(self.temperature.len()));
        }
        self.index += 1;
        Ok(())
    }
}

/// The only way to reach the [`Environment`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnvironmentHandle {
    actor: Actor<Environment>,
}

impl EnvironmentHandle {
    pub fn spawn(pool: &PoolHandle, environment: Environment) -> Self {
        Self { actor: Actor::spawn(pool, EntityKey::Environment, environment) }
    }

    pub fn actor(&self) -> &Actor<Environment> {
        &self.actor
    }

    pub fn step(&self) -> impl Future<Output = ModelResult<()>> + Send + 'static {
        self.actor.try_call(Environment::step)
    }

    pub fn outdoor_temperature(&self) -> Pending<f64> {
        self.actor.call(|e: &mut Environment| e.current_temperature())
    }

    pub fn current_unix_secs(&self) -> Pending<i64> {
        self.actor.call(|e: &mut Environment| e.current_unix_secs())
    }
}
