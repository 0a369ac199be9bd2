use rand::Rng;

use super::{ProcessId, Time};
use crate::error::ProcessError;
use crate::history::{FlowHistory, FlowSample, SampleKind};

/// What a process asks of the scheduler at the end of a segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Resume this process after the given logical duration. A zero
    /// duration fails the process, as would a resumption past the clock's
    /// range.
    SuspendFor(Time),
    /// The process is done and is never resumed again.
    Exit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// Due now, or currently running its segment.
    Runnable,
    WaitingUntil(Time),
    Finished,
}

/// Everything a segment may touch: the clock (read-only), the run's
/// random source and the flow history.
pub struct Context<'a, R> {
    pub(super) now: Time,
    pub(super) pid: ProcessId,
    pub(super) rng: &'a mut R,
    pub(super) history: &'a mut FlowHistory,
}

impl<'a, R: Rng> Context<'a, R> {
    pub fn now(&self) -> Time {
        self.now
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn rng(&mut self) -> &mut R {
        self.rng
    }

    pub fn history(&self) -> &FlowHistory {
        self.history
    }

    /// Append a flow sample stamped with the current time.
    pub fn record_sample(&mut self, kind: SampleKind, flow_rate: f64) {
        self.history.record(FlowSample { time: self.now, flow_rate, kind });
    }

    /// Record a failure at the current time.
    pub fn record_failure(&mut self) {
        self.history.record_failure(self.now);
    }
}

/// A logical process driven by the [`Scheduler`](super::Scheduler).
///
/// The process is an explicit state machine: each call to `resume` runs one
/// segment to completion, with no interleaving, and returns the next
/// suspension. The first segment runs at the time the process was registered.
pub trait Process<R: Rng> {
    /// Label used in logs and errors.
    fn name(&self) -> &str;

    fn resume(&mut self, ctx: &mut Context<'_, R>) -> Result<Step, ProcessError>;
}
