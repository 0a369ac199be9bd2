//! Transport and failure processes of a distribution leg.

pub mod transport;
pub mod failure;

pub use transport::*;
pub use failure::*;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::history::FlowHistory;
use crate::route::Route;
use crate::sim::Scheduler;

/// Origin and destination of the flow being simulated, used to label logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leg {
    pub origin: String,
    pub destination: String,
}

impl Leg {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    pub fn from_route(route: &Route) -> Self {
        Self::new(route.start(), route.goal())
    }
}

/// Run one transport process and one failure process over `leg` for
/// `config.until` hours, and return what they recorded.
pub fn simulate(config: &SimulationConfig, leg: &Leg) -> Result<FlowHistory, SimError> {
    config.validate()?;
    let mut sim = Scheduler::seeded(config.seed);
    sim.register(TransportProcess::new(leg.clone(), config.transport.clone())?);
    sim.register(FailureProcess::new(leg.clone(), config.failure.clone())?);
    sim.run(config.until_time())?;
    Ok(sim.into_history())
}
