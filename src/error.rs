//! Error types for graph construction, routing, configuration and runs.

use thiserror::Error;

/// Errors raised while building a [`WeightedGraph`](crate::graph::WeightedGraph).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// An edge endpoint was never registered with `add_node`.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Negative cost or distance, or a capacity that is not strictly positive.
    #[error("invalid {attribute}: {value}")]
    InvalidAttribute {
        attribute: &'static str,
        value: f64,
    },
}

/// Errors raised by route queries.
///
/// An unreachable goal is not an error: `find_route` returns `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unsupported criterion: {0:?} (expected cost, distance or capacity)")]
    UnsupportedCriterion(String),

    #[error("unknown start node: {0}")]
    UnknownNode(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid range for {name}: [{low}, {high}]")]
    InvalidRange {
        name: &'static str,
        low: f64,
        high: f64,
    },
}

/// Error raised by a process during one of its segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ProcessError(pub String);

/// Errors that halt a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A process failed during a segment. The run stops; nothing is retried.
    #[error("process {process} failed at {at}: {source}")]
    ProcessFailed {
        process: String,
        at: crate::sim::Time,
        #[source]
        source: ProcessError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
