//! Configuration types for a simulation run.
//!
//! Defaults reproduce the reference network's behaviour: transports of
//! 5 to 15 hours at 70 to 100 units/h, a failure every 10 to 30 hours that
//! drops flow to 20 to 50 units/h for 5 to 10 hours.

use rand::Rng;

use crate::error::ConfigError;
use crate::sim::Time;

/// Closed interval `[low, high]` sampled uniformly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformRange {
    pub low: f64,
    pub high: f64,
}

impl UniformRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// A range that always yields `value`.
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.low..=self.high)
    }

    /// Sample a duration in hours.
    pub fn sample_time<R: Rng>(&self, rng: &mut R) -> Time {
        Time::hours(self.sample(rng))
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let valid = self.low.is_finite()
            && self.high.is_finite()
            && self.low >= 0.
            && self.low <= self.high;
        if valid { Ok(()) } else { Err(self.invalid(name)) }
    }

    /// A suspension range: every sample must advance the clock by at least
    /// one quantum, and stay within [`Time::MAX_HOURS`].
    fn validate_duration(&self, name: &'static str) -> Result<(), ConfigError> {
        self.validate(name)?;
        if Time::hours(self.low).is_zero() || self.high > Time::MAX_HOURS {
            return Err(self.invalid(name));
        }
        Ok(())
    }

    fn invalid(&self, name: &'static str) -> ConfigError {
        ConfigError::InvalidRange {
            name,
            low: self.low,
            high: self.high,
        }
    }
}

/// Parameters of a transport process.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportConfig {
    /// Hours a single transport takes.
    pub duration: UniformRange,

    /// Nominal flow rate while transporting.
    pub flow_rate: UniformRange,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            duration: UniformRange::new(5., 15.),
            flow_rate: UniformRange::new(70., 100.),
        }
    }
}

impl TransportConfig {
    pub fn with_duration(mut self, duration: UniformRange) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_flow_rate(mut self, flow_rate: UniformRange) -> Self {
        self.flow_rate = flow_rate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.duration.validate_duration("transport duration")?;
        self.flow_rate.validate("transport flow rate")
    }
}

/// Parameters of a failure/recovery process.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureConfig {
    /// Hours of normal operation before the next failure.
    pub inter_arrival: UniformRange,

    /// Hours until flow is restored after a failure.
    pub recovery: UniformRange,

    /// Flow rate recorded when a failure is detected.
    pub degraded_flow: UniformRange,

    /// Flow rate recorded once recovered.
    pub restored_flow: UniformRange,
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self {
            inter_arrival: UniformRange::new(10., 30.),
            recovery: UniformRange::new(5., 10.),
            degraded_flow: UniformRange::new(20., 50.),
            restored_flow: UniformRange::new(70., 100.),
        }
    }
}

impl FailureConfig {
    pub fn with_inter_arrival(mut self, inter_arrival: UniformRange) -> Self {
        self.inter_arrival = inter_arrival;
        self
    }

    pub fn with_recovery(mut self, recovery: UniformRange) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_degraded_flow(mut self, degraded_flow: UniformRange) -> Self {
        self.degraded_flow = degraded_flow;
        self
    }

    pub fn with_restored_flow(mut self, restored_flow: UniformRange) -> Self {
        self.restored_flow = restored_flow;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.inter_arrival.validate_duration("failure inter-arrival")?;
        self.recovery.validate_duration("recovery duration")?;
        self.degraded_flow.validate("degraded flow rate")?;
        self.restored_flow.validate("restored flow rate")
    }
}

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Logical hours to simulate.
    pub until: f64,

    pub transport: TransportConfig,

    pub failure: FailureConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            until: 100.,
            transport: TransportConfig::default(),
            failure: FailureConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the run bound, in hours.
    pub fn with_until(mut self, until: f64) -> Self {
        self.until = until;
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_failure(mut self, failure: FailureConfig) -> Self {
        self.failure = failure;
        self
    }

    pub fn until_time(&self) -> Time {
        Time::hours(self.until)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bound = UniformRange::fixed(self.until);
        bound.validate("run bound")?;
        if self.until > Time::MAX_HOURS {
            return Err(bound.invalid("run bound"));
        }
        self.transport.validate()?;
        self.failure.validate()
    }
}
