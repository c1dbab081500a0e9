//! Resolution-independent simulation
//!
//! All gameplay state lives in normalized field space; device pixels exist
//! only transiently inside a tick. This module must stay free of rendering
//! and platform dependencies - the session drives it from whatever frame
//! callback the host provides, and tests drive it with synthetic dt values.

pub mod ball;
pub mod fit;
pub mod geom;
pub mod gesture;
pub mod goal;
pub mod obstacle;

pub use ball::{Ball, BallMode, BallTuning, BounceReport, FieldBounds};
pub use fit::{FitMode, FitRect, fit};
pub use geom::{Rect, RectEdge};
pub use gesture::{PointerSample, PointerTrail, clamp_speed};
pub use goal::{GoalSensor, ScoreDirection};
pub use obstacle::{Contact, EdgeDamping, Obstacle, resolve};
