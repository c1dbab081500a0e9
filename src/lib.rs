//! Flickball - drag-and-flick 2D sports mini-game physics
//!
//! Core modules:
//! - `sim`: resolution-independent simulation (fit mapping, throw gestures,
//!   ball physics, obstacle collisions, goal detection)
//! - `config`: declarative per-variant game configuration
//! - `session`: owning session with lifecycle and frame driver
//!
//! Rendering, asset loading and event plumbing are external collaborators:
//! the session consumes container sizes and pointer samples, and exposes ball
//! pose, derived obstacle geometry and score state for a renderer to pull.

pub mod config;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use session::{Session, SessionPhase, TickEvents};

/// Engine constants shared across modules
pub mod consts {
    /// Maximum integration step per frame (seconds). Elapsed real time beyond
    /// this is clamped, not integrated, so a backgrounded tab cannot produce
    /// a tunneling burst on resume.
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Bounce components slower than this snap to exactly zero (field
    /// units/second), ending micro-bounce jitter.
    pub const REST_EPSILON: f32 = 0.1;

    /// Two pointer samples closer in time than this are treated as
    /// same-frame jitter when estimating throw velocity (milliseconds).
    pub const SAMPLE_GAP_MS: f64 = 50.0;

    /// Pointer samples older than this are evicted from the trail
    /// (milliseconds).
    pub const TRAIL_WINDOW_MS: f64 = 300.0;

    /// Hard cap on retained pointer samples.
    pub const TRAIL_MAX_SAMPLES: usize = 10;
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-out over [0, 1].
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
