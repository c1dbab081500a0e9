//! Declarative per-variant game configuration
//!
//! Each sport is a config value, not a subclass: one engine reads gravity,
//! damping, ball tuning, the obstacle layout and the goal rule from a
//! `GameConfig`, and a new variant is a new value (or a JSON file). Layouts
//! are expressed in field-relative terms and re-derived into pixel-space
//! constraints through `FitRect::place` whenever the container changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::ball::BallTuning;
use crate::sim::fit::{FitMode, FitRect};
use crate::sim::geom::Rect;
use crate::sim::goal::ScoreDirection;
use crate::sim::obstacle::{EdgeDamping, Obstacle};

/// An anchored box placed relative to the fitted field; the parent rectangle
/// every obstacle shape and the goal area are carved out of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Anchor position in field units.
    pub rel_pos: Vec2,
    /// Box width as a fraction of the drawn field width.
    pub rel_w: f32,
    /// Extra scale multiplier on top of `rel_w`.
    pub scale: f32,
    /// Width/height ratio of the box itself.
    pub aspect: f32,
    /// Which point of the box (0..1 per axis) sits at `rel_pos`.
    pub anchor: Vec2,
}

impl LayoutBox {
    fn derive(&self, fit: &FitRect) -> Rect {
        fit.place(self.rel_pos, self.rel_w, self.scale, self.aspect, self.anchor)
    }
}

/// One obstacle declaration; all coordinates are fractions of its layout box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObstacleSpec {
    /// Axis-aligned zone: fractional bounds inside the box, per-edge damping.
    RectZone {
        layout: LayoutBox,
        x0: f32,
        x1: f32,
        y0: f32,
        y1: f32,
        damping: EdgeDamping,
    },
    /// Net line between two fractional points of the box. `bounce_boost` is
    /// in field-width units/s and scales with the drawn field.
    NetSegment {
        layout: LayoutBox,
        from: Vec2,
        to: Vec2,
        damping_left: f32,
        damping_right: f32,
        bounce_boost: f32,
    },
    /// Crossbar: fractional origin inside the box, length and thickness as
    /// fractions of the box width, rotation in radians.
    RotatedBar {
        layout: LayoutBox,
        origin: Vec2,
        length: f32,
        thickness: f32,
        angle: f32,
        damping: f32,
    },
}

impl ObstacleSpec {
    /// Pixel-space constraint for the current fit. Re-run every frame; the
    /// declarations themselves never change at runtime.
    pub fn derive(&self, fit: &FitRect) -> Obstacle {
        match self {
            ObstacleSpec::RectZone {
                layout,
                x0,
                x1,
                y0,
                y1,
                damping,
            } => {
                let b = layout.derive(fit);
                Obstacle::RectZone {
                    rect: Rect::new(
                        b.x + x0 * b.w,
                        b.y + y0 * b.h,
                        (x1 - x0) * b.w,
                        (y1 - y0) * b.h,
                    ),
                    damping: *damping,
                }
            }
            ObstacleSpec::NetSegment {
                layout,
                from,
                to,
                damping_left,
                damping_right,
                bounce_boost,
            } => {
                let b = layout.derive(fit);
                let corner = Vec2::new(b.x, b.y);
                let size = Vec2::new(b.w, b.h);
                Obstacle::NetSegment {
                    a: corner + *from * size,
                    b: corner + *to * size,
                    damping_left: *damping_left,
                    damping_right: *damping_right,
                    bounce_boost: fit.px_radius(*bounce_boost),
                }
            }
            ObstacleSpec::RotatedBar {
                layout,
                origin,
                length,
                thickness,
                angle,
                damping,
            } => {
                let b = layout.derive(fit);
                Obstacle::RotatedBar {
                    origin: Vec2::new(b.x + origin.x * b.w, b.y + origin.y * b.h),
                    length: length * b.w,
                    thickness: thickness * b.w,
                    angle: *angle,
                    damping: *damping,
                }
            }
        }
    }
}

/// Goal area declaration plus the scoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub layout: LayoutBox,
    /// Fractional sub-rectangle of the layout box used for detection.
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
    pub direction: ScoreDirection,
    /// Score-message countdown set on each score, seconds.
    pub message_duration: f32,
}

impl GoalSpec {
    /// Pixel-space detection rectangle for the current fit.
    pub fn derive(&self, fit: &FitRect) -> Rect {
        let b = self.layout.derive(fit);
        Rect::new(
            b.x + self.x0 * b.w,
            b.y + self.y0 * b.h,
            (self.x1 - self.x0) * b.w,
            (self.y1 - self.y0) * b.h,
        )
    }
}

/// Complete declarative description of one sport variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width/height ratio of the field artwork.
    pub field_aspect: f32,
    pub fit_mode: FitMode,
    /// Focus origin for the fit (which part of the field survives cropping).
    pub fit_origin: Vec2,
    /// Downward acceleration, field units/s^2.
    pub gravity: f32,
    /// Ground line in field units.
    pub ground_y: f32,
    /// Vertical velocity retention on ground bounces.
    pub ground_damping: f32,
    /// Horizontal velocity retention on side-wall bounces.
    pub wall_damping: f32,
    pub ball: BallTuning,
    pub obstacles: Vec<ObstacleSpec>,
    pub goal: GoalSpec,
}

impl GameConfig {
    /// Pocket basketball: portrait court, basket assembly upper-right,
    /// score by dropping through the rim.
    pub fn basketball() -> Self {
        // Kept inboard of the cover-crop margin so the assembly stays
        // reachable on narrow portrait containers.
        let basket = LayoutBox {
            rel_pos: Vec2::new(0.88, 0.30),
            rel_w: 0.30,
            scale: 1.0,
            aspect: 1.25,
            anchor: Vec2::new(1.0, 0.5),
        };
        Self {
            field_aspect: 0.5625,
            fit_mode: FitMode::Cover,
            fit_origin: Vec2::new(0.5, 1.0),
            gravity: 4.2,
            ground_y: 0.84,
            ground_damping: 0.55,
            wall_damping: 0.72,
            ball: BallTuning {
                radius: 0.045,
                rest_pos: Vec2::new(0.28, 0.795),
                spin_friction: 0.985,
                min_launch_speed: 0.55,
                max_launch_speed: 2.6,
                launch_power: 1.15,
            },
            obstacles: vec![
                // Backboard along the right edge of the assembly.
                ObstacleSpec::RectZone {
                    layout: basket.clone(),
                    x0: 0.88,
                    x1: 1.0,
                    y0: 0.0,
                    y1: 0.85,
                    damping: EdgeDamping {
                        left: 0.62,
                        right: 0.62,
                        top: 0.45,
                        bottom: 0.45,
                    },
                },
                // Front and back rim lips.
                ObstacleSpec::RectZone {
                    layout: basket.clone(),
                    x0: 0.02,
                    x1: 0.12,
                    y0: 0.50,
                    y1: 0.58,
                    damping: EdgeDamping::uniform(0.58),
                },
                ObstacleSpec::RectZone {
                    layout: basket.clone(),
                    x0: 0.62,
                    x1: 0.72,
                    y0: 0.50,
                    y1: 0.58,
                    damping: EdgeDamping::uniform(0.58),
                },
            ],
            goal: GoalSpec {
                layout: basket,
                x0: 0.14,
                x1: 0.60,
                y0: 0.54,
                y1: 0.80,
                direction: ScoreDirection::Down,
                message_duration: 2.0,
            },
        }
    }

    /// Street soccer: landscape pitch, slanted net and crossbar on the left,
    /// score by crossing the goal mouth leftward.
    pub fn street_soccer() -> Self {
        let goal_box = LayoutBox {
            rel_pos: Vec2::new(0.02, 0.80),
            rel_w: 0.20,
            scale: 1.0,
            aspect: 1.1,
            anchor: Vec2::new(0.0, 1.0),
        };
        Self {
            field_aspect: 1.7778,
            fit_mode: FitMode::Contain,
            fit_origin: Vec2::new(0.5, 0.5),
            gravity: 3.6,
            ground_y: 0.80,
            ground_damping: 0.50,
            wall_damping: 0.68,
            ball: BallTuning {
                radius: 0.030,
                rest_pos: Vec2::new(0.62, 0.77),
                spin_friction: 0.98,
                min_launch_speed: 0.50,
                max_launch_speed: 2.2,
                launch_power: 1.1,
            },
            obstacles: vec![
                // Crossbar across the goal mouth, sagging slightly rightward.
                ObstacleSpec::RotatedBar {
                    layout: goal_box.clone(),
                    origin: Vec2::new(0.02, 0.10),
                    length: 0.95,
                    thickness: 0.06,
                    angle: 0.05,
                    damping: 0.6,
                },
                // Slanted back net running down toward the goal line.
                ObstacleSpec::NetSegment {
                    layout: goal_box.clone(),
                    from: Vec2::new(0.28, 0.02),
                    to: Vec2::new(0.02, 0.96),
                    damping_left: 0.22,
                    damping_right: 0.30,
                    bounce_boost: 0.04,
                },
            ],
            goal: GoalSpec {
                layout: goal_box,
                x0: 0.10,
                x1: 0.62,
                y0: 0.18,
                y1: 0.94,
                direction: ScoreDirection::NegX,
                message_duration: 2.0,
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
