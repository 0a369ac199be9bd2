use std::cmp::Ordering;
use std::collections::BinaryHeap;
use super::Time;

/// Handle of a process registered with a [`Scheduler`](super::Scheduler),
/// in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub usize);

/// A pending resumption of process `pid` at `when`.
///
/// Sorted by `when`, then by `seq` (the order in which resumptions were
/// scheduled), so equal-time resumptions run first-in first-out.
/// Since `BinaryHeap` is a max-heap, and we want a min-heap, the comparison `Ord` is reversed.
#[derive(Copy, Clone, Debug)]
pub struct Resumption {
    pub when: Time,
    pub seq: u64,
    pub pid: ProcessId,
}

impl Ord for Resumption {
    fn cmp(&self, other: &Self) -> Ordering {
        other.when.cmp(&self.when)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Resumption {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Resumption {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Resumption {}

/// Time-ordered queue of pending resumptions.
#[derive(Default)]
pub struct ResumptionQueue {
    heap: BinaryHeap<Resumption>,
    next_seq: u64,
}

impl ResumptionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, pid: ProcessId, when: Time) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Resumption { when, seq, pid });
    }

    /// Time of the earliest pending resumption.
    pub fn next_due(&self) -> Option<Time> {
        self.heap.peek().map(|r| r.when)
    }

    pub fn pop(&mut self) -> Option<Resumption> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earliest_first() {
        let mut q = ResumptionQueue::new();
        q.schedule(ProcessId(0), Time::whole_hours(5));
        q.schedule(ProcessId(1), Time::whole_hours(1));
        q.schedule(ProcessId(2), Time::whole_hours(3));
        assert_eq!(q.next_due(), Some(Time::whole_hours(1)));

        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|r| r.pid.0).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn ties_are_fifo() {
        let mut q = ResumptionQueue::new();
        q.schedule(ProcessId(2), Time::whole_hours(1));
        q.schedule(ProcessId(0), Time::whole_hours(1));
        q.schedule(ProcessId(1), Time::whole_hours(1));

        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|r| r.pid.0).collect();
        assert_eq!(order, vec![2, 0, 1]);
        assert!(q.is_empty());
    }
}
