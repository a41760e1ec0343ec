//! Lazy connection generators.
//!
//! Every generator is an `Iterator<Item = ConnectResult<Connection>>` that
//! yields each connection exactly once.  Algorithmic generators enumerate
//! the rectangular [`Mask`] they were given; the explicit list ignores the
//! mask and leaves range checking to the network assembler, which knows the
//! real population sizes.

use std::ops::Range;

use pnn_core::SimRng;

use crate::{Connection, ConnectResult};

// ── Mask ──────────────────────────────────────────────────────────────────────

/// Rectangular source × target index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub sources: Range<usize>,
    pub targets: Range<usize>,
}

impl Mask {
    pub fn new(sources: Range<usize>, targets: Range<usize>) -> Self {
        Self { sources, targets }
    }

    /// The full mask for populations of the given sizes.
    pub fn full(source_size: usize, target_size: usize) -> Self {
        Self::new(0..source_size, 0..target_size)
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// A lazy, finite, single-pass producer of connections.
pub trait ConnectionGenerator: Iterator<Item = ConnectResult<Connection>> {
    /// Number of value fields carried per connection beyond
    /// `(source, target)`: 1 = weight, 2 = weight + delay, 3+ = extras.
    fn arity(&self) -> usize;
}

impl<G: ConnectionGenerator + ?Sized> ConnectionGenerator for Box<G> {
    fn arity(&self) -> usize {
        (**self).arity()
    }
}

// ── DelayTracked ──────────────────────────────────────────────────────────────

/// Adapter that records the smallest delay seen while consuming `G`.
pub struct DelayTracked<G> {
    inner:         G,
    minimal_delay: f64,
    yielded:       usize,
}

impl<G: ConnectionGenerator> DelayTracked<G> {
    pub fn new(inner: G) -> Self {
        Self { inner, minimal_delay: f64::INFINITY, yielded: 0 }
    }

    /// Smallest delay over the connections consumed so far, or `None` if no
    /// connection has been yielded yet.
    pub fn minimal_delay(&self) -> Option<f64> {
        (self.yielded > 0).then_some(self.minimal_delay)
    }

    /// Number of valid connections consumed so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }
}

impl<G: ConnectionGenerator> Iterator for DelayTracked<G> {
    type Item = ConnectResult<Connection>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if let Ok(conn) = &item {
            self.yielded += 1;
            if conn.delay < self.minimal_delay {
                self.minimal_delay = conn.delay;
            }
        }
        Some(item)
    }
}

// ── ExplicitList ──────────────────────────────────────────────────────────────

/// Enumerated list of raw connection rows.
pub struct ExplicitList {
    rows: std::vec::IntoIter<Vec<f64>>,
    next_row: usize,
    arity: usize,
}

impl ExplicitList {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        let arity = rows.first().map_or(0, |r| r.len().saturating_sub(2));
        Self { rows: rows.into_iter(), next_row: 0, arity }
    }
}

impl Iterator for ExplicitList {
    type Item = ConnectResult<Connection>;

    fn next(&mut self) -> Option<Self::Item> {
        let fields = self.rows.next()?;
        let row = self.next_row;
        self.next_row += 1;
        Some(Connection::from_fields(row, &fields))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ConnectionGenerator for ExplicitList {
    fn arity(&self) -> usize {
        self.arity
    }
}

// ── AllToAll ──────────────────────────────────────────────────────────────────

/// Every source in the mask connects to every target in the mask.
pub struct AllToAll {
    mask:      Mask,
    weight:    f64,
    delay:     f64,
    autapses:  bool,
    source:    usize,
    target:    usize,
}

impl AllToAll {
    /// `autapses = false` skips `source == target` pairs (meaningful when a
    /// projection connects a population to itself).
    pub fn new(mask: Mask, weight: f64, delay: f64, autapses: bool) -> Self {
        let source = mask.sources.start;
        let target = mask.targets.start;
        Self { mask, weight, delay, autapses, source, target }
    }
}

impl Iterator for AllToAll {
    type Item = ConnectResult<Connection>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.mask.targets.is_empty() || self.source >= self.mask.sources.end {
                return None;
            }
            let (s, t) = (self.source, self.target);
            self.target += 1;
            if self.target >= self.mask.targets.end {
                self.target = self.mask.targets.start;
                self.source += 1;
            }
            if self.autapses || s != t {
                return Some(Ok(Connection::new(s, t, self.weight, self.delay)));
            }
        }
    }
}

impl ConnectionGenerator for AllToAll {
    fn arity(&self) -> usize {
        2
    }
}

// ── OneToOne ──────────────────────────────────────────────────────────────────

/// Source `i` connects to target `i` for every `i` inside both ranges.
pub struct OneToOne {
    indices: Range<usize>,
    weight:  f64,
    delay:   f64,
}

impl OneToOne {
    pub fn new(mask: Mask, weight: f64, delay: f64) -> Self {
        let start = mask.sources.start.max(mask.targets.start);
        let end   = mask.sources.end.min(mask.targets.end).max(start);
        Self { indices: start..end, weight, delay }
    }
}

impl Iterator for OneToOne {
    type Item = ConnectResult<Connection>;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.indices.next()?;
        Some(Ok(Connection::new(i, i, self.weight, self.delay)))
    }
}

impl ConnectionGenerator for OneToOne {
    fn arity(&self) -> usize {
        2
    }
}

// ── FixedProbability ──────────────────────────────────────────────────────────

/// Each `(source, target)` pair in the mask is connected independently with
/// probability `p`.
pub struct FixedProbability {
    pairs: AllToAll,
    p:     f64,
    rng:   SimRng,
}

impl FixedProbability {
    pub fn new(mask: Mask, p: f64, weight: f64, delay: f64, autapses: bool, rng: SimRng) -> Self {
        Self { pairs: AllToAll::new(mask, weight, delay, autapses), p, rng }
    }
}

impl Iterator for FixedProbability {
    type Item = ConnectResult<Connection>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let candidate = self.pairs.next()?;
            if self.rng.gen_bool(self.p) {
                return Some(candidate);
            }
        }
    }
}

impl ConnectionGenerator for FixedProbability {
    fn arity(&self) -> usize {
        2
    }
}
