//! Owning simulation session
//!
//! One `Session` per active game screen: it owns the ball, the derived
//! obstacle set and the goal sensor, runs the drag/free state machine, and
//! advances physics once per host frame callback. Everything runs on the
//! caller's thread; pointer handlers and ticks interleave but never overlap,
//! and while a drag is active the integrator does not run.
//!
//! `tick(dt)` is independent of how frames are scheduled - tests call it
//! directly with synthetic dt values; hosts call `frame(now_ms)` which
//! derives a clamped dt from the clock.

use glam::Vec2;

use crate::config::GameConfig;
use crate::consts::MAX_FRAME_DT;
use crate::sim::ball::{Ball, BallMode, FieldBounds};
use crate::sim::fit::{FitRect, fit};
use crate::sim::geom::Rect;
use crate::sim::gesture::{PointerSample, PointerTrail};
use crate::sim::goal::GoalSensor;
use crate::sim::obstacle::{self, Obstacle};

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Created but not started; ticks are no-ops.
    #[default]
    Idle,
    Playing,
    Paused,
    /// Torn down; every call is a no-op from here on.
    Destroyed,
}

/// What happened during one tick, for the renderer's benefit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickEvents {
    pub scored: bool,
    pub obstacle_hit: bool,
    pub ground_bounce: bool,
    pub wall_bounce: bool,
}

/// One simulation session; see the module docs.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    phase: SessionPhase,
    container: Option<(f32, f32)>,
    fit_rect: FitRect,
    ball: Ball,
    trail: PointerTrail,
    sensor: GoalSensor,
    /// Pixel-space constraints, re-derived every tick (scratch storage).
    obstacles: Vec<Obstacle>,
    score: u32,
    last_time_ms: Option<f64>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        log::info!(
            "session created: aspect {:.3}, {} obstacles",
            config.field_aspect,
            config.obstacles.len()
        );
        let ball = Ball::new(&config.ball);
        let sensor = GoalSensor::new(config.goal.direction, config.goal.message_duration);
        Self {
            config,
            phase: SessionPhase::Idle,
            container: None,
            fit_rect: FitRect::default(),
            ball,
            trail: PointerTrail::new(),
            sensor,
            obstacles: Vec::new(),
            score: 0,
            last_time_ms: None,
        }
    }

    /// Provide/refresh the container size. Only the mapping inputs change;
    /// no simulation state is touched, which is what makes resizes safe at
    /// any moment.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.phase == SessionPhase::Destroyed {
            return;
        }
        self.container = Some((width, height));
        self.refit();
        log::debug!("container resized to {width:.0}x{height:.0}");
    }

    /// Begin playing from the idle state.
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Playing;
            log::info!("session started");
        }
    }

    /// Resume after a pause.
    pub fn play(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Paused;
        }
    }

    /// Re-zero ball, timers and score; configuration and phase are kept.
    pub fn reset(&mut self) {
        if self.phase == SessionPhase::Destroyed {
            return;
        }
        self.ball = Ball::new(&self.config.ball);
        self.trail.clear();
        self.sensor.reset();
        self.score = 0;
        self.last_time_ms = None;
        log::info!("session reset");
    }

    /// Stop for good. The in-flight tick (if any) has already finished by
    /// the time this runs; afterwards every entry point is a no-op.
    pub fn destroy(&mut self) {
        if self.phase != SessionPhase::Destroyed {
            self.phase = SessionPhase::Destroyed;
            log::info!("session destroyed (final score {})", self.score);
        }
    }

    /// Host frame callback: derive dt from the clock, clamped so a stalled
    /// tab cannot produce an unstable integration burst, then tick.
    pub fn frame(&mut self, now_ms: f64) -> TickEvents {
        let dt = match self.last_time_ms {
            Some(prev) => (((now_ms - prev) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);
        self.tick(dt)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// A tick either completes fully or returns early without touching any
    /// state (not playing, no container yet, degenerate fit).
    pub fn tick(&mut self, dt: f32) -> TickEvents {
        let mut events = TickEvents::default();
        if self.phase != SessionPhase::Playing {
            return events;
        }
        let Some((container_w, _)) = self.container else {
            return events;
        };
        self.refit();
        if self.fit_rect.is_degenerate() {
            return events;
        }

        // The score-message countdown runs whenever the session is playing,
        // held ball or not.
        self.sensor.tick_timer(dt);

        if self.ball.mode == BallMode::Dragging {
            // No integration while dragging; the goal latch still follows
            // the (zero-velocity) ball so a drop inside the area cannot
            // fake an entry later.
            let goal_rect = self.config.goal.derive(&self.fit_rect);
            let px_pos = self.fit_rect.field_to_px(self.ball.pos);
            self.sensor.check(&goal_rect, px_pos, Vec2::ZERO);
            return events;
        }

        // Free flight: gravity, ground, side walls, spin.
        let (wall_left, wall_right) = self.fit_rect.visible_field_x(container_w);
        let env = FieldBounds {
            gravity: self.config.gravity,
            ground_y: self.config.ground_y,
            ground_damping: self.config.ground_damping,
            wall_damping: self.config.wall_damping,
            wall_left,
            wall_right,
        };
        let report = self.ball.integrate(&env, dt);
        events.ground_bounce = report.ground;
        events.wall_bounce = report.wall;

        // Obstacles are resolved in pixel space; at most one per tick.
        self.obstacles.clear();
        self.obstacles
            .extend(self.config.obstacles.iter().map(|s| s.derive(&self.fit_rect)));

        let px_pos = self.fit_rect.field_to_px(self.ball.pos);
        let px_vel = self.fit_rect.vel_to_px(self.ball.vel);
        let px_radius = self.fit_rect.px_radius(self.ball.radius);
        if let Some(contact) = obstacle::resolve(px_pos, px_radius, px_vel, &self.obstacles) {
            self.ball.pos = self.fit_rect.px_to_field(contact.pos);
            self.ball.vel = self.fit_rect.vel_to_field(contact.vel);
            self.ball.spin_vel = -self.ball.spin_vel * self.ball.spin_friction;
            events.obstacle_hit = true;
        }

        // Goal detection on the derived area.
        let goal_rect = self.config.goal.derive(&self.fit_rect);
        let px_pos = self.fit_rect.field_to_px(self.ball.pos);
        let px_vel = self.fit_rect.vel_to_px(self.ball.vel);
        if self.sensor.check(&goal_rect, px_pos, px_vel) {
            self.score += 1;
            events.scored = true;
            log::info!("goal! score is now {}", self.score);
        }

        events
    }

    /// Pointer pressed: grab the ball. Velocity is zeroed and the sample
    /// history restarts from this event.
    pub fn pointer_down(&mut self, x: f32, y: f32, time_ms: f64) {
        if self.phase != SessionPhase::Playing || self.fit_rect.is_degenerate() {
            return;
        }
        let pos = self.fit_rect.px_to_field(Vec2::new(x, y));
        self.trail.clear();
        self.trail.push(PointerSample { pos, time_ms });
        let clamped = self.clamp_drag(pos);
        self.ball.begin_drag();
        self.ball.drag_to(clamped);
    }

    /// Pointer moved during a drag: the ball follows, clamped to the
    /// visible bounds (the one place position is ever clamped).
    pub fn pointer_move(&mut self, x: f32, y: f32, time_ms: f64) {
        if self.phase != SessionPhase::Playing
            || self.ball.mode != BallMode::Dragging
            || self.fit_rect.is_degenerate()
        {
            return;
        }
        let pos = self.fit_rect.px_to_field(Vec2::new(x, y));
        self.trail.push(PointerSample { pos, time_ms });
        let clamped = self.clamp_drag(pos);
        self.ball.drag_to(clamped);
    }

    /// Pointer released: convert the trail into a launch velocity and hand
    /// the ball back to the integrator.
    pub fn pointer_up(&mut self, _time_ms: f64) {
        if self.phase != SessionPhase::Playing || self.ball.mode != BallMode::Dragging {
            return;
        }
        let vel = self.trail.launch_velocity(
            self.ball.launch_power,
            self.ball.min_launch_speed,
            self.ball.max_launch_speed,
        );
        self.ball.release(vel, self.config.ground_y);
        self.trail.clear();
        log::debug!(
            "throw released at speed {:.2} field units/s",
            self.ball.vel.length()
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Remaining score-message time, seconds.
    pub fn score_timer(&self) -> f32 {
        self.sensor.score_timer()
    }

    /// Eased score-banner progress for the renderer.
    pub fn score_message_progress(&self) -> f32 {
        self.sensor.message_progress()
    }

    /// Current fit of the field into the container.
    pub fn fit_rect(&self) -> &FitRect {
        &self.fit_rect
    }

    /// Pixel-space obstacle constraints from the last tick, for drawing.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Pixel-space goal area for the current fit, for drawing.
    pub fn goal_rect(&self) -> Rect {
        self.config.goal.derive(&self.fit_rect)
    }

    fn refit(&mut self) {
        let Some((w, h)) = self.container else {
            return;
        };
        self.fit_rect = fit(
            self.config.field_aspect,
            w,
            h,
            self.config.fit_mode,
            self.config.fit_origin.x,
            self.config.fit_origin.y,
        );
    }

    /// Clamp a drag position to the visible field, leaving the ball fully
    /// on screen. The ground line is NOT part of this clamp - a drag may
    /// overlap the ground, which the release logic then corrects.
    fn clamp_drag(&self, pos: Vec2) -> Vec2 {
        let Some((container_w, _)) = self.container else {
            return pos;
        };
        let r = self.ball.radius;
        let (left, right) = self.fit_rect.visible_field_x(container_w);
        Vec2::new(
            pos.x.clamp(left + r, right - r),
            pos.y.clamp(r, 1.0 - r),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    const DT: f32 = 1.0 / 60.0;

    fn playing_session() -> Session {
        let mut session = Session::new(GameConfig::basketball());
        session.resize(390.0, 844.0);
        session.start();
        session
    }

    #[test]
    fn test_tick_is_noop_before_start() {
        let mut session = Session::new(GameConfig::basketball());
        session.resize(390.0, 844.0);
        let before = session.ball().pos;
        session.tick(DT);
        assert_eq!(session.ball().pos, before);
    }

    #[test]
    fn test_tick_is_noop_without_container() {
        let mut session = Session::new(GameConfig::basketball());
        session.start();
        let before = session.ball().pos;
        session.tick(DT);
        assert_eq!(session.ball().pos, before);
    }

    #[test]
    fn test_degenerate_container_skips_tick() {
        let mut session = Session::new(GameConfig::basketball());
        session.resize(0.0, 844.0);
        session.start();
        let before = session.ball().pos;
        session.tick(DT);
        assert_eq!(session.ball().pos, before);
    }

    #[test]
    fn test_no_integration_while_dragging() {
        let mut session = playing_session();
        session.pointer_down(100.0, 400.0, 0.0);
        assert_eq!(session.ball().mode, BallMode::Dragging);

        let held = session.ball().pos;
        for _ in 0..30 {
            session.tick(DT);
        }
        // Gravity must not act on a held ball.
        assert_eq!(session.ball().pos, held);
        assert_eq!(session.ball().vel, Vec2::ZERO);
    }

    #[test]
    fn test_drag_follows_and_clamps() {
        let mut session = playing_session();
        session.pointer_down(100.0, 400.0, 0.0);
        // Way off the left edge: clamped to the visible bound.
        session.pointer_move(-500.0, 400.0, 16.0);
        let (left, _) = session
            .fit_rect()
            .visible_field_x(390.0);
        assert!((session.ball().pos.x - (left + session.ball().radius)).abs() < 1e-4);
    }

    #[test]
    fn test_flick_launches_ball() {
        let mut session = playing_session();
        session.pointer_down(120.0, 700.0, 0.0);
        for i in 1..=6 {
            session.pointer_move(
                120.0 + i as f32 * 18.0,
                700.0 - i as f32 * 26.0,
                i as f64 * 16.0,
            );
        }
        session.pointer_up(96.0);

        let ball = session.ball();
        assert_eq!(ball.mode, BallMode::Free);
        let speed = ball.vel.length();
        assert!(speed >= ball.min_launch_speed - 1e-3);
        assert!(speed <= ball.max_launch_speed + 1e-3);
        // Up-and-right flick.
        assert!(ball.vel.x > 0.0);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_drop_settles_on_ground() {
        let mut session = playing_session();
        let ground_y = GameConfig::basketball().ground_y;

        // Drop the ball from mid-air on the empty side of the court.
        session.pointer_down(100.0, 300.0, 0.0);
        session.pointer_up(10.0);
        assert_eq!(session.ball().mode, BallMode::Free);

        let mut saw_ground_bounce = false;
        for _ in 0..1200 {
            let events = session.tick(DT);
            saw_ground_bounce |= events.ground_bounce;
        }
        assert!(saw_ground_bounce);
        let ball = session.ball();
        assert!((ball.pos.y - (ground_y - ball.radius)).abs() < 1e-4);
        assert_eq!(ball.vel.y, 0.0);
    }

    #[test]
    fn test_pause_freezes_and_play_resumes() {
        let mut session = playing_session();
        session.pointer_down(100.0, 300.0, 0.0);
        session.pointer_up(10.0);
        session.tick(DT);
        session.pause();
        let frozen = session.ball().pos;
        session.tick(DT);
        assert_eq!(session.ball().pos, frozen);
        session.play();
        session.tick(DT);
        assert_ne!(session.ball().pos, frozen);
    }

    #[test]
    fn test_reset_rezeroes_state() {
        let mut session = playing_session();
        session.pointer_down(100.0, 300.0, 0.0);
        session.pointer_up(10.0);
        for _ in 0..60 {
            session.tick(DT);
        }
        session.reset();
        assert_eq!(session.ball().pos, GameConfig::basketball().ball.rest_pos);
        assert_eq!(session.ball().vel, Vec2::ZERO);
        assert_eq!(session.score(), 0);
        assert_eq!(session.score_timer(), 0.0);
    }

    #[test]
    fn test_destroy_stops_everything() {
        let mut session = playing_session();
        session.destroy();
        assert_eq!(session.phase(), SessionPhase::Destroyed);
        let before = session.ball().pos;
        session.tick(DT);
        session.pointer_down(100.0, 300.0, 0.0);
        assert_eq!(session.ball().pos, before);
        assert_eq!(session.ball().mode, BallMode::Free);
    }

    #[test]
    fn test_frame_clamps_stalled_clock() {
        let mut session = playing_session();
        session.pointer_down(100.0, 300.0, 0.0);
        session.pointer_up(10.0);

        session.frame(0.0);
        let before = session.ball().vel.y;
        // Five seconds of stall integrate as one clamped step.
        session.frame(5000.0);
        let gained = session.ball().vel.y - before;
        let expected = GameConfig::basketball().gravity * MAX_FRAME_DT;
        assert!(gained <= expected + 1e-4);
    }

    #[test]
    fn test_score_requires_downward_entry() {
        let mut session = playing_session();

        // Park the ball directly above the goal area, then let it fall in.
        let goal = session.goal_rect();
        let entry = Vec2::new(goal.center().x, goal.y - 20.0);
        session.pointer_down(entry.x, entry.y, 0.0);
        session.pointer_up(10.0);

        let mut scores = 0;
        for _ in 0..240 {
            let events = session.tick(DT);
            scores += events.scored as u32;
        }
        // One entry, one score - frames spent inside do not re-trigger.
        assert_eq!(scores, 1);
        assert_eq!(session.score(), 1);
        assert!(session.score_timer() > 0.0);
    }
}
