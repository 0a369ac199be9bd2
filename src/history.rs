//! Append-only record of one simulation run.

use crate::sim::Time;

/// What produced a flow sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// Normal transport flow.
    Nominal,
    /// Reduced flow at the moment a failure is detected.
    Degraded,
    /// Flow once a failure has been recovered from.
    Restored,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowSample {
    pub time: Time,
    pub flow_rate: f64,
    pub kind: SampleKind,
}

/// A sample tagged with whether a failure was recorded at its timestamp.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LabelledSample {
    pub time: Time,
    pub flow_rate: f64,
    pub failure: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowSummary {
    pub samples: usize,
    pub failures: usize,
    pub min_flow: f64,
    pub mean_flow: f64,
    pub max_flow: f64,
}

/// Flow samples and failure timestamps, in append order.
///
/// Entries are never removed or modified once written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowHistory {
    samples: Vec<FlowSample>,
    failures: Vec<Time>,
}

impl FlowHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a nominal flow sample.
    pub fn record_sample(&mut self, time: Time, flow_rate: f64) {
        self.record(FlowSample { time, flow_rate, kind: SampleKind::Nominal });
    }

    pub fn record(&mut self, sample: FlowSample) {
        self.samples.push(sample);
    }

    pub fn record_failure(&mut self, time: Time) {
        self.failures.push(time);
    }

    pub fn samples(&self) -> &[FlowSample] {
        &self.samples
    }

    pub fn failures(&self) -> &[Time] {
        &self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.failures.is_empty()
    }

    /// Samples of a single kind, in append order.
    pub fn samples_of(&self, kind: SampleKind) -> impl Iterator<Item = &FlowSample> + '_ {
        self.samples.iter().filter(move |s| s.kind == kind)
    }

    /// Every sample labelled with whether a failure happened at that
    /// instant, as plain rows for a failure predictor.
    pub fn labelled_samples(&self) -> Vec<LabelledSample> {
        self.samples
            .iter()
            .map(|s| LabelledSample {
                time: s.time,
                flow_rate: s.flow_rate,
                failure: self.failures.contains(&s.time),
            })
            .collect()
    }

    /// `None` when no sample has been recorded.
    pub fn summary(&self) -> Option<FlowSummary> {
        if self.samples.is_empty() {
            return None;
        }
        let flows = self.samples.iter().map(|s| s.flow_rate);
        let min_flow = flows.clone().fold(f64::INFINITY, f64::min);
        let max_flow = flows.clone().fold(f64::NEG_INFINITY, f64::max);
        let mean_flow = flows.sum::<f64>() / self.samples.len() as f64;
        Some(FlowSummary {
            samples: self.samples.len(),
            failures: self.failures.len(),
            min_flow,
            mean_flow,
            max_flow,
        })
    }
}
