//! Ball state and free-flight integration
//!
//! The ball has two interaction modes: while `Dragging` it follows the
//! pointer with zero velocity and the integrator must not run; once `Free`
//! it integrates under gravity with ground, side-wall and spin handling.
//! Obstacle contacts are resolved separately (`sim::obstacle`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::REST_EPSILON;

/// Blend rate at which airborne spin relaxes toward rolling (per second).
const SPIN_BLEND_RATE: f32 = 12.0;

/// Extra spin injected on a ground bounce per unit of rolling rate
/// (friction coupling with the ground surface).
const GROUND_SPIN_KICK: f32 = 0.35;

/// Upward velocity injected per unit of ground penetration when a throw is
/// released from an overlapping position (field units/s per field unit).
const PENETRATION_KICK: f32 = 6.0;

/// Clearance left between ball and ground by the release snap.
const GROUND_SNAP_GAP: f32 = 0.002;

/// Per-variant ball tuning, copied into the ball at session init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallTuning {
    /// Radius as a fraction of the field width.
    pub radius: f32,
    /// Default resting position in field units.
    pub rest_pos: Vec2,
    /// Spin retention per tick, in (0, 1).
    pub spin_friction: f32,
    /// Lower bound on launch speed (field units/s).
    pub min_launch_speed: f32,
    /// Upper bound on launch speed (field units/s).
    pub max_launch_speed: f32,
    /// Multiplier applied to the raw gesture velocity.
    pub launch_power: f32,
}

/// Interaction mode; the session gates integration on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BallMode {
    #[default]
    Free,
    Dragging,
}

/// Ground/wall geometry and damping for one integration step, derived by the
/// session from the current fit and config.
#[derive(Debug, Clone, Copy)]
pub struct FieldBounds {
    /// Downward acceleration (field units/s^2; +y is down).
    pub gravity: f32,
    /// Ground line in field units.
    pub ground_y: f32,
    /// Vertical velocity retention on a ground bounce.
    pub ground_damping: f32,
    /// Horizontal velocity retention on a wall bounce.
    pub wall_damping: f32,
    /// Visible left field edge (side wall).
    pub wall_left: f32,
    /// Visible right field edge (side wall).
    pub wall_right: f32,
}

/// Bounces that occurred during one integration step, for the renderer's
/// benefit (sound/effect cues).
#[derive(Debug, Clone, Copy, Default)]
pub struct BounceReport {
    pub ground: bool,
    pub wall: bool,
}

/// The ball entity. Position/velocity are field-relative; position is not
/// clamped to [0, 1] by physics - only dragging clamps to visible bounds.
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub spin_angle: f32,
    pub spin_vel: f32,
    pub mode: BallMode,
    /// One-tick suppression of the ground bounce after a corrective release
    /// snap already handled the contact.
    pub skip_ground_bounce: bool,
    pub spin_friction: f32,
    pub min_launch_speed: f32,
    pub max_launch_speed: f32,
    pub launch_power: f32,
}

impl Ball {
    pub fn new(tuning: &BallTuning) -> Self {
        Self {
            pos: tuning.rest_pos,
            vel: Vec2::ZERO,
            radius: tuning.radius,
            spin_angle: 0.0,
            spin_vel: 0.0,
            mode: BallMode::Free,
            skip_ground_bounce: false,
            spin_friction: tuning.spin_friction,
            min_launch_speed: tuning.min_launch_speed,
            max_launch_speed: tuning.max_launch_speed,
            launch_power: tuning.launch_power,
        }
    }

    /// Begin a drag: velocity is forced to zero and integration stops.
    pub fn begin_drag(&mut self) {
        self.mode = BallMode::Dragging;
        self.vel = Vec2::ZERO;
        self.spin_vel = 0.0;
        self.skip_ground_bounce = false;
    }

    /// Follow the pointer while dragging (the session clamps `pos` to the
    /// visible bounds first).
    pub fn drag_to(&mut self, pos: Vec2) {
        if self.mode == BallMode::Dragging {
            self.pos = pos;
        }
    }

    /// Release the ball with a launch velocity.
    ///
    /// Seeds spin from the horizontal launch speed. If the resting position
    /// already penetrates the ground line (picked up from an overlapping
    /// state), the ball is snapped just above ground and given extra upward
    /// velocity proportional to the penetration; the next ground bounce is
    /// suppressed once so the corrective snap is not double-counted.
    pub fn release(&mut self, vel: Vec2, ground_y: f32) {
        self.mode = BallMode::Free;
        self.vel = vel;
        if self.radius > f32::EPSILON {
            self.spin_vel = vel.x / self.radius;
        }

        let penetration = self.pos.y + self.radius - ground_y;
        if penetration > 0.0 {
            self.pos.y = ground_y - self.radius - GROUND_SNAP_GAP;
            self.vel.y -= penetration * PENETRATION_KICK;
            self.skip_ground_bounce = true;
        }
    }

    /// One free-flight step. The caller guarantees `mode == Free` and a dt
    /// already clamped to the engine maximum.
    pub fn integrate(&mut self, env: &FieldBounds, dt: f32) -> BounceReport {
        let mut report = BounceReport::default();

        // Semi-implicit Euler: accelerate, then move.
        self.vel.y += env.gravity * dt;
        self.pos += self.vel * dt;

        // Spin relaxes toward the rolling rate while airborne, then decays.
        if self.radius > f32::EPSILON {
            let rolling = self.vel.x / self.radius;
            let blend = (SPIN_BLEND_RATE * dt).min(1.0);
            self.spin_vel = crate::lerp(self.spin_vel, rolling, blend);
        }
        self.spin_angle += self.spin_vel * dt;
        self.spin_vel *= self.spin_friction;

        // Ground contact.
        if self.skip_ground_bounce {
            // The release-time snap already resolved this contact.
            self.skip_ground_bounce = false;
        } else if self.pos.y + self.radius > env.ground_y {
            let incoming = self.vel.y;
            self.pos.y = env.ground_y - self.radius;
            self.vel.y = -self.vel.y * env.ground_damping;
            if self.vel.y.abs() < REST_EPSILON {
                self.vel.y = 0.0;
            }
            self.spin_vel = -self.spin_vel * self.spin_friction;
            if self.radius > f32::EPSILON {
                self.spin_vel += self.vel.x / self.radius * GROUND_SPIN_KICK;
            }
            report.ground = incoming.abs() >= REST_EPSILON;
        }

        // Rolling capture: grounded and moving, the ball grabs the surface
        // and spins at exactly the rolling rate, overriding the decay above.
        let on_ground = self.pos.y + self.radius >= env.ground_y - f32::EPSILON;
        if on_ground && self.vel.x != 0.0 && self.radius > f32::EPSILON {
            self.spin_vel = self.vel.x / self.radius;
        }

        // Side walls at the visible field edges.
        if self.pos.x - self.radius < env.wall_left {
            self.pos.x = env.wall_left + self.radius;
            self.vel.x = -self.vel.x * env.wall_damping;
            if self.vel.x.abs() < REST_EPSILON {
                self.vel.x = 0.0;
            }
            self.spin_vel = -self.spin_vel * self.spin_friction;
            report.wall = true;
        } else if self.pos.x + self.radius > env.wall_right {
            self.pos.x = env.wall_right - self.radius;
            self.vel.x = -self.vel.x * env.wall_damping;
            if self.vel.x.abs() < REST_EPSILON {
                self.vel.x = 0.0;
            }
            self.spin_vel = -self.spin_vel * self.spin_friction;
            report.wall = true;
        }

        report
    }
}
