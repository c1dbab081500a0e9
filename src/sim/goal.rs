//! Edge-triggered goal detection
//!
//! A score fires only on the transition from outside to inside the goal
//! area, and only when the ball is moving the scoring way - lingering inside
//! or drifting back in from the wrong side never re-triggers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ease_out_cubic;
use super::geom::Rect;

/// Which way the ball must be moving for an entry to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreDirection {
    /// Overhead rim: the ball must be falling (+y in the y-down frame).
    Down,
    /// Side goal opening to the left: the ball must be moving in -x.
    NegX,
    /// Side goal opening to the right: the ball must be moving in +x.
    PosX,
}

impl ScoreDirection {
    fn admits(self, vel: Vec2) -> bool {
        match self {
            ScoreDirection::Down => vel.y > 0.0,
            ScoreDirection::NegX => vel.x < 0.0,
            ScoreDirection::PosX => vel.x > 0.0,
        }
    }
}

/// Rising-edge goal sensor plus the score-message countdown.
#[derive(Debug, Clone)]
pub struct GoalSensor {
    direction: ScoreDirection,
    message_duration: f32,
    was_inside: bool,
    score_timer: f32,
}

impl GoalSensor {
    pub fn new(direction: ScoreDirection, message_duration: f32) -> Self {
        Self {
            direction,
            message_duration,
            was_inside: false,
            score_timer: 0.0,
        }
    }

    /// Evaluate one frame against the (pixel-space) goal area. Returns true
    /// exactly on a scoring entry. The inside latch updates unconditionally,
    /// whether or not the entry scored.
    pub fn check(&mut self, area: &Rect, ball_pos: Vec2, ball_vel: Vec2) -> bool {
        let inside = area.contains(ball_pos);
        let scored = inside && !self.was_inside && self.direction.admits(ball_vel);
        if scored {
            self.score_timer = self.message_duration;
        }
        self.was_inside = inside;
        scored
    }

    /// Count the message timer down; called only while the session is
    /// playing.
    pub fn tick_timer(&mut self, dt: f32) {
        self.score_timer = (self.score_timer - dt).max(0.0);
    }

    /// Remaining score-message time in seconds.
    pub fn score_timer(&self) -> f32 {
        self.score_timer
    }

    /// Eased banner progress: 1.0 right after a score, 0.0 once expired.
    pub fn message_progress(&self) -> f32 {
        if self.message_duration <= 0.0 {
            return 0.0;
        }
        ease_out_cubic(self.score_timer / self.message_duration)
    }

    /// Re-zero the latch and timer (session reset).
    pub fn reset(&mut self) {
        self.was_inside = false;
        self.score_timer = 0.0;
    }
}
