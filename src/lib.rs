//! Petroleum distribution over a small logistics network.
//!
//! - [`graph`]: capacity-weighted network of refineries, ports and distributors.
//! - [`route`]: A* route search under a selectable criterion.
//! - [`sim`]: logical-time cooperative scheduler.
//! - [`flow`]: transport and failure processes run by the scheduler.
//! - [`history`]: what those processes recorded.

pub mod config;
pub mod error;
pub mod flow;
pub mod graph;
pub mod history;
pub mod route;
pub mod sim;

pub use config::{FailureConfig, SimulationConfig, TransportConfig, UniformRange};
pub use error::{ConfigError, GraphError, ProcessError, RouteError, SimError};
pub use flow::{FailureProcess, Leg, TransportProcess, simulate};
pub use graph::{Edge, EdgePolicy, NodeId, WeightedGraph};
pub use history::{FlowHistory, FlowSample, FlowSummary, LabelledSample, SampleKind};
pub use route::{Criterion, Route, RouteOptimizer};
pub use sim::{Scheduler, Time};
