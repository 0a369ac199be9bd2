use rand::Rng;
use tracing::{info, warn};

use super::Leg;
use crate::config::FailureConfig;
use crate::error::{ConfigError, ProcessError};
use crate::history::SampleKind;
use crate::sim::{Context, Process, Step};

enum State {
    /// Not resumed yet.
    Idle,
    /// Flowing normally until the next failure.
    Operating,
    /// A failure was detected; waiting for recovery.
    Degraded,
}

/// Intermittent failures on a leg, each followed by a recovery.
///
/// Cycle: operate for an inter-arrival time, then record a degraded flow
/// sample and the failure instant, stay degraded for a recovery time, then
/// record a restored flow sample and start operating again.
pub struct FailureProcess {
    name: String,
    leg: Leg,
    config: FailureConfig,
    state: State,
}

impl FailureProcess {
    pub fn new(leg: Leg, config: FailureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: format!("failures {} -> {}", leg.origin, leg.destination),
            leg,
            config,
            state: State::Idle,
        })
    }
}

impl<R: Rng> Process<R> for FailureProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, ctx: &mut Context<'_, R>) -> Result<Step, ProcessError> {
        match self.state {
            State::Idle => {}
            State::Operating => {
                let flow = self.config.degraded_flow.sample(ctx.rng());
                ctx.record_sample(SampleKind::Degraded, flow);
                ctx.record_failure();
                warn!(
                    at = %ctx.now(),
                    origin = %self.leg.origin,
                    destination = %self.leg.destination,
                    flow,
                    "Failure detected, attempting recovery"
                );

                self.state = State::Degraded;
                return Ok(Step::SuspendFor(self.config.recovery.sample_time(ctx.rng())));
            }
            State::Degraded => {
                let flow = self.config.restored_flow.sample(ctx.rng());
                ctx.record_sample(SampleKind::Restored, flow);
                info!(
                    at = %ctx.now(),
                    origin = %self.leg.origin,
                    destination = %self.leg.destination,
                    flow,
                    "Transport restored"
                );
            }
        }

        self.state = State::Operating;
        Ok(Step::SuspendFor(self.config.inter_arrival.sample_time(ctx.rng())))
    }
}
