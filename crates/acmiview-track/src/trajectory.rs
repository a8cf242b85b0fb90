//! Append-only, time ordered sample store with interpolated queries.
//!
//! Samples are kept in non-decreasing timestamp order; equal timestamps are allowed
//! and keep their insertion order. Queries never extrapolate: before the first sample
//! there is no position, at or after the last sample the last position is returned.

use crate::sample::Sample;
use crate::time::{seconds_between, Timestamp};
use acmiview_core::{LocalPosition, RecordError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::OutOfOrder`] if the sample is older than the last stored
    /// sample. The trajectory is left unchanged in that case.
    pub fn push(&mut self, sample: Sample) -> Result<(), RecordError> {
        if let Some(last) = self.samples.last() {
            if sample.time < last.time {
                return Err(RecordError::out_of_order(last.time, sample.time));
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn first_time(&self) -> Option<Timestamp> {
        self.first().map(|s| s.time)
    }

    pub fn last_time(&self) -> Option<Timestamp> {
        self.last().map(|s| s.time)
    }

    /// Position at `t`, linearly interpolated between the bracketing samples.
    ///
    /// Returns `None` if there are no samples or `t` precedes the first sample, and the
    /// last sample's position if `t` is at or after the last sample.
    pub fn position_at(&self, t: Timestamp) -> Option<LocalPosition> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;

        if t < first.time {
            return None;
        }
        if t >= last.time {
            return Some(last.position);
        }

        let i = self.bracket(t);
        let (a, b) = (&self.samples[i], &self.samples[i + 1]);
        Some(a.position.lerp(&b.position, interpolation_factor(a.time, b.time, t)))
    }

    /// Positions for drawing the part of the trajectory between `t_start` and
    /// `min(t_end, current_time)`.
    ///
    /// The first point is the position at `max(t_start, first sample time)` (interpolated
    /// if that lies strictly inside the sampled span), followed by every raw sample
    /// strictly inside the window, and closed by the position at the window end. Returns
    /// `None` if that yields fewer than two points.
    pub fn samples_in_range(
        &self,
        t_start: Timestamp,
        t_end: Timestamp,
        current_time: Timestamp,
    ) -> Option<Vec<LocalPosition>> {
        let first = self.first_time()?;
        let last = self.last_time()?;

        let start = t_start.max(first);
        let end = t_end.min(current_time);
        if start >= end || start >= last {
            return None;
        }

        let mut points = Vec::new();

        if start > first {
            points.push(self.position_at(start)?);
        } else {
            points.push(self.samples[0].position);
        }

        let lo = self.samples.partition_point(|s| s.time <= start);
        points.extend(
            self.samples[lo..]
                .iter()
                .take_while(|s| s.time < end && s.time < last)
                .map(|s| s.position),
        );

        points.push(self.position_at(end)?);

        if points.len() < 2 {
            None
        } else {
            Some(points)
        }
    }

    /// Trail ending at `current_time` and reaching back `window_secs` seconds.
    pub fn trail(&self, current_time: Timestamp, window_secs: f64) -> Option<Vec<LocalPosition>> {
        let t_start = crate::time::offset_by(current_time, -window_secs)?;
        self.samples_in_range(t_start, current_time, current_time)
    }

    /// Index `i` of the first pair with `ts[i] <= t <= ts[i + 1]`.
    ///
    /// Requires `first <= t < last`. This picks the same pair a front-to-back scan would,
    /// including for runs of equal timestamps.
    fn bracket(&self, t: Timestamp) -> usize {
        let j = self.samples.partition_point(|s| s.time < t);
        j.saturating_sub(1)
    }
}

/// `(t - t_a) / (t_b - t_a)`, or 0 for a zero-length bracket.
fn interpolation_factor(t_a: Timestamp, t_b: Timestamp, t: Timestamp) -> f64 {
    let span = seconds_between(t_a, t_b);
    if span > 0.0 {
        seconds_between(t_a, t) / span
    } else {
        0.0
    }
}
