//! Spike sources: precomputed spike trains replayed through the
//! `Integrator` interface.

use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::{InletPort, Integrator, StopMode, UnitError, UnitResult};

/// Degenerate integrator that emits a fixed, sorted list of spike times.
///
/// A spike at time `s` is emitted by the first `integrate_until(t)` with
/// `t >= s`, including spikes at exactly `t = 0`.
pub struct SpikeReplay {
    times:  Vec<f64>,
    cursor: usize,
    t:      f64,
}

impl SpikeReplay {
    pub fn new(mut times: Vec<f64>) -> Self {
        times.retain(|t| t.is_finite() && *t >= 0.0);
        times.sort_by(f64::total_cmp);
        Self { times, cursor: 0, t: 0.0 }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }
}

impl Integrator for SpikeReplay {
    fn solve_initial(&mut self) -> UnitResult<()> {
        self.cursor = 0;
        self.t = 0.0;
        Ok(())
    }

    fn integrate_until(&mut self, t: f64, mode: StopMode) -> UnitResult<Vec<f64>> {
        if t <= self.t {
            return Ok(Vec::new());
        }
        let end = self.times[self.cursor..]
            .iter()
            .position(|&s| s > t)
            .map_or(self.times.len(), |n| self.cursor + n);

        let end = match mode {
            StopMode::StopAtDiscontinuity if end > self.cursor => self.cursor + 1,
            _ => end,
        };

        let fired = self.times[self.cursor..end].to_vec();
        self.cursor = end;
        self.t = match (mode, fired.last()) {
            (StopMode::StopAtDiscontinuity, Some(&last)) => last,
            _ => self.t.max(t),
        };
        Ok(fired)
    }

    fn deliver_event(&mut self, port: InletPort) -> UnitResult<()> {
        Err(UnitError::UnknownPort {
            unit:    "spike source".to_owned(),
            synapse: port.synapse,
            port:    port.port,
        })
    }

    fn reinitialize(&mut self) -> UnitResult<()> {
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.t
    }

    fn variable_count(&self) -> usize {
        0
    }

    fn value(&self, _variable: &str) -> Option<f64> {
        None
    }
}

/// Spike times of a homogeneous Poisson process with `rate` (Hz) on
/// `[t0, t0 + duration]`.
///
/// Inter-spike intervals are drawn from `Exp(rate)`.  A non-positive rate
/// or duration yields no spikes.
pub fn poisson_spike_times<R: Rng + ?Sized>(
    rate:     f64,
    duration: f64,
    t0:       f64,
    rng:      &mut R,
) -> Vec<f64> {
    if !(rate > 0.0) || !(duration > 0.0) || !rate.is_finite() {
        return Vec::new();
    }
    let Ok(isi) = Exp::new(rate) else {
        return Vec::new();
    };

    let end = t0 + duration;
    let mut times = Vec::new();
    let mut t = t0;
    loop {
        t += isi.sample(rng);
        if t > end {
            break;
        }
        times.push(t);
    }
    times
}
