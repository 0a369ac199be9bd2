use rand::Rng;
use tracing::info;

use super::Leg;
use crate::config::TransportConfig;
use crate::error::{ConfigError, ProcessError};
use crate::history::SampleKind;
use crate::sim::{Context, Process, Step};

/// Ships product along a leg back to back, forever.
///
/// Every segment starts a new transport: it draws the trip duration and the
/// nominal flow rate, records the flow at the current instant and sleeps for
/// the trip. Only the scheduler's run bound stops it.
pub struct TransportProcess {
    name: String,
    leg: Leg,
    config: TransportConfig,
    in_transit: bool,
}

impl TransportProcess {
    pub fn new(leg: Leg, config: TransportConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            name: format!("transport {} -> {}", leg.origin, leg.destination),
            leg,
            config,
            in_transit: false,
        })
    }
}

impl<R: Rng> Process<R> for TransportProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, ctx: &mut Context<'_, R>) -> Result<Step, ProcessError> {
        if self.in_transit {
            info!(at = %ctx.now(), "Transport completed");
        }

        let duration = self.config.duration.sample_time(ctx.rng());
        let flow = self.config.flow_rate.sample(ctx.rng());
        ctx.record_sample(SampleKind::Nominal, flow);
        self.in_transit = true;

        info!(
            at = %ctx.now(),
            origin = %self.leg.origin,
            destination = %self.leg.destination,
            flow,
            %duration,
            "Starting transport"
        );
        Ok(Step::SuspendFor(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UniformRange;
    use crate::sim::{Scheduler, Time};

    fn leg() -> Leg {
        Leg::new("Refinery", "Distributor")
    }

    #[test]
    fn records_one_sample_per_trip() {
        let config = TransportConfig::default()
            .with_duration(UniformRange::fixed(5.))
            .with_flow_rate(UniformRange::fixed(80.));
        let mut sim = Scheduler::seeded(3);
        sim.register(TransportProcess::new(leg(), config).unwrap());
        sim.run(Time::whole_hours(12)).unwrap();

        let times: Vec<f64> = sim.history().samples().iter().map(|s| s.time.as_hours()).collect();
        assert_eq!(times, vec![0., 5., 10.]);
        assert!(sim.history().samples().iter().all(|s| s.flow_rate == 80.));
        assert!(sim.history().failures().is_empty());
    }

    #[test]
    fn samples_within_configured_ranges() {
        let config = TransportConfig::default();
        let mut sim = Scheduler::seeded(11);
        sim.register(TransportProcess::new(leg(), config.clone()).unwrap());
        sim.run(Time::whole_hours(500)).unwrap();

        let samples = sim.history().samples();
        assert!(samples.len() > 30);
        for pair in samples.windows(2) {
            let gap = (pair[1].time - pair[0].time).as_hours();
            assert!(config.duration.contains(gap), "gap {gap}");
        }
        assert!(samples.iter().all(|s| config.flow_rate.contains(s.flow_rate)));
        assert!(samples.iter().all(|s| s.kind == SampleKind::Nominal));
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TransportConfig::default().with_flow_rate(UniformRange::new(100., 70.));
        assert!(TransportProcess::new(leg(), config).is_err());
    }
}
