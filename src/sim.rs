//! Single-threaded, cooperative, logical-time scheduler.
//!
//! Processes are state machines that run one segment at a time and then ask
//! to be resumed after a logical duration. The scheduler always resumes the
//! earliest-due process, advancing its clock to that instant. Only one
//! segment ever runs at a time, so the shared [`FlowHistory`] needs no
//! synchronization.

pub mod time;
mod event;
mod process;

pub use time::Time;
pub use event::*;
pub use process::*;

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;
use tracing::{debug, debug_span, info, trace, warn};

use crate::error::{ProcessError, SimError};
use crate::history::FlowHistory;

/// Statistics collected during simulation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Segments executed since the scheduler was created.
    pub segments_run: u64,
    /// Resumptions still queued when the last run stopped.
    pub pending: usize,
}

struct Slot<R: Rng> {
    process: Box<dyn Process<R>>,
    state: ProcessState,
}

pub struct Scheduler<R: Rng = Xoshiro256PlusPlus> {
    now: Time,
    queue: ResumptionQueue,
    processes: Vec<Slot<R>>,
    rng: R,
    history: FlowHistory,
    stats: RunStats,
}

impl Scheduler<Xoshiro256PlusPlus> {
    /// A scheduler with a deterministic random source.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: Rng> Scheduler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            now: Time::zero(),
            queue: ResumptionQueue::new(),
            processes: Vec::new(),
            rng,
            history: FlowHistory::new(),
            stats: RunStats::default(),
        }
    }

    /// Register a process. Its first segment is due at the current time;
    /// equal-time resumptions run in the order they were scheduled.
    pub fn register(&mut self, process: impl Process<R> + 'static) -> ProcessId {
        let pid = ProcessId(self.processes.len());
        debug!(process = process.name(), pid = pid.0, at = %self.now, "Process registered");
        self.processes.push(Slot {
            process: Box::new(process),
            state: ProcessState::Runnable,
        });
        self.queue.schedule(pid, self.now);
        pid
    }

    /// Run every resumption due at or before `until`.
    ///
    /// A segment that starts before the bound always runs to completion;
    /// the resumption it schedules past `until` stays pending for a later
    /// call. On return the clock reads `until` (or later, if a previous run
    /// already went further).
    pub fn run(&mut self, until: Time) -> Result<RunStats, SimError> {
        info!(from = %self.now, %until, processes = self.processes.len(), "Running simulation");
        self.advance(Some(until))?;
        if until > self.now {
            self.now = until;
        }
        Ok(self.stats.clone())
    }

    /// Run until no resumption is pending. Never returns if a registered
    /// process never exits.
    pub fn run_until_idle(&mut self) -> Result<RunStats, SimError> {
        info!(from = %self.now, processes = self.processes.len(), "Running simulation until idle");
        self.advance(None)?;
        Ok(self.stats.clone())
    }

    fn advance(&mut self, until: Option<Time>) -> Result<(), SimError> {
        while let Some(due) = self.queue.next_due() {
            if until.is_some_and(|until| due > until) {
                break;
            }
            let Some(Resumption { when, pid, .. }) = self.queue.pop() else {
                break;
            };
            self.now = when;
            self.step(pid)?;
        }
        self.stats.pending = self.queue.len();
        info!(now = %self.now, pending = self.stats.pending, segments = self.stats.segments_run, "Simulation stopped");
        Ok(())
    }

    fn step(&mut self, pid: ProcessId) -> Result<(), SimError> {
        let slot = &mut self.processes[pid.0];
        let span = debug_span!("segment", process = slot.process.name(), at = %self.now);
        let _guard = span.enter();

        slot.state = ProcessState::Runnable;
        let mut ctx = Context {
            now: self.now,
            pid,
            rng: &mut self.rng,
            history: &mut self.history,
        };
        let now = self.now;
        let result = slot.process.resume(&mut ctx).and_then(|step| match step {
            Step::SuspendFor(duration) if duration.is_zero() => {
                Err(ProcessError("suspended for zero time".into()))
            }
            Step::SuspendFor(duration) => now
                .checked_add(duration)
                .map(Some)
                .ok_or_else(|| ProcessError(format!("resuming {duration} after {now} overflows the clock"))),
            Step::Exit => Ok(None),
        });
        self.stats.segments_run += 1;

        match result {
            Ok(Some(wake)) => {
                slot.state = ProcessState::WaitingUntil(wake);
                self.queue.schedule(pid, wake);
                trace!(%wake, "Suspended");
            }
            Ok(None) => {
                slot.state = ProcessState::Finished;
                debug!("Process finished");
            }
            Err(source) => {
                slot.state = ProcessState::Finished;
                warn!(error = %source, "Process failed, halting run");
                return Err(SimError::ProcessFailed {
                    process: slot.process.name().to_owned(),
                    at: now,
                    source,
                });
            }
        }
        Ok(())
    }

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn state(&self, pid: ProcessId) -> Option<ProcessState> {
        self.processes.get(pid.0).map(|slot| slot.state)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn history(&self) -> &FlowHistory {
        &self.history
    }

    pub fn into_history(self) -> FlowHistory {
        self.history
    }
}
