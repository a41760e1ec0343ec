//! `EventQueue` — the network-wide pending spike deliveries.
//!
//! A min-heap keyed on `(delivery_time, insertion sequence)`.  Entries with
//! equal delivery times come out in the order they were pushed, so a run is
//! replayed identically for the same seed.
//!
//! The queue is owned by the scheduler and lent to units as `&mut` while
//! they integrate; units never hold on to it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pnn_core::NeuronId;

/// Address of one inlet event port: the synapse slot on the target neuron
/// and the port index within that synapse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InletPort {
    pub synapse: usize,
    pub port:    usize,
}

/// One pending spike delivery.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QueueEntry {
    pub time:   f64,
    pub port:   InletPort,
    pub target: NeuronId,
}

/// Outcome of [`EventQueue::pop_due`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Drain {
    /// The earliest entry is due at or before the limit and was removed.
    Due(QueueEntry),
    /// The earliest entry (delivery time attached) lies beyond the limit.
    NotYet(f64),
    Empty,
}

struct Slot {
    entry: QueueEntry,
    seq:   u64,
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Slot {}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .entry
            .time
            .total_cmp(&self.entry.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
pub struct EventQueue {
    heap:     BinaryHeap<Slot>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: QueueEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Slot { entry, seq });
    }

    /// Remove the earliest entry if its delivery time is `<= limit`.
    pub fn pop_due(&mut self, limit: f64) -> Drain {
        match self.heap.peek() {
            None => Drain::Empty,
            Some(slot) if slot.entry.time > limit => Drain::NotYet(slot.entry.time),
            Some(_) => match self.heap.pop() {
                Some(slot) => Drain::Due(slot.entry),
                None => Drain::Empty,
            },
        }
    }

    /// Delivery time of the earliest entry.
    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|s| s.entry.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries ever pushed.
    pub fn total_pushed(&self) -> u64 {
        self.next_seq
    }
}
