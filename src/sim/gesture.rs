//! Throw gesture recognition: pointer history to launch velocity
//!
//! During a drag the session feeds pointer samples (already mapped into
//! field units) into a bounded trail. On release the trail is collapsed into
//! a single launch velocity: the newest sample paired with the newest
//! *earlier* sample separated by more than the jitter gap, so same-frame
//! micro-jitter cannot dominate while fast flicks stay responsive.

use glam::Vec2;

use crate::consts::{SAMPLE_GAP_MS, TRAIL_MAX_SAMPLES, TRAIL_WINDOW_MS};

/// One pointer event as the simulation sees it: field-space position plus
/// the event timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pos: Vec2,
    pub time_ms: f64,
}

/// Recency-bounded buffer of pointer samples, newest last.
///
/// Entries older than the time window or beyond the sample cap are evicted
/// on push. Cleared at drag start and at throw release.
#[derive(Debug, Clone, Default)]
pub struct PointerTrail {
    samples: Vec<PointerSample>,
}

impl PointerTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: PointerSample) {
        self.samples.push(sample);

        let cutoff = sample.time_ms - TRAIL_WINDOW_MS;
        self.samples.retain(|s| s.time_ms >= cutoff);
        while self.samples.len() > TRAIL_MAX_SAMPLES {
            self.samples.remove(0);
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Launch velocity (field units/s) for the recorded trail.
    ///
    /// The newest sample is the endpoint; the anchor is the newest earlier
    /// sample whose timestamp differs by more than the jitter gap, falling
    /// back to the oldest sample when none qualifies. The raw `(dx, dy)/dt`
    /// is scaled by `power` and clamped into `[min_speed, max_speed]`.
    /// An empty trail or ~zero elapsed time yields zero velocity.
    pub fn launch_velocity(&self, power: f32, min_speed: f32, max_speed: f32) -> Vec2 {
        let Some(&end) = self.samples.last() else {
            return Vec2::ZERO;
        };

        let mut anchor = self.samples[0];
        for s in self.samples.iter().rev().skip(1) {
            if end.time_ms - s.time_ms > SAMPLE_GAP_MS {
                anchor = *s;
                break;
            }
        }

        let dt = ((end.time_ms - anchor.time_ms) / 1000.0) as f32;
        if dt <= f32::EPSILON {
            return Vec2::ZERO;
        }

        let raw = (end.pos - anchor.pos) / dt * power;
        clamp_speed(raw, min_speed, max_speed)
    }
}

/// Rescale `v` so its magnitude lies in `[min_speed, max_speed]`, preserving
/// direction. Zero input stays zero: there is no direction to preserve.
pub fn clamp_speed(v: Vec2, min_speed: f32, max_speed: f32) -> Vec2 {
    let speed = v.length();
    if speed <= f32::EPSILON {
        return Vec2::ZERO;
    }
    if speed < min_speed {
        v / speed * min_speed
    } else if speed > max_speed {
        v / speed * max_speed
    } else {
        v
    }
}
