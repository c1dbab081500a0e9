//! Headless demo: flick a ball at the basket and log what happens.
//!
//! Runs the simulation at a fixed 60 Hz with a synthetic drag-and-flick,
//! printing score events and the settled ball position. `RUST_LOG=debug`
//! shows the per-event session logging.

use flickball::{GameConfig, Session};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    env_logger::init();

    let mut session = Session::new(GameConfig::basketball());
    session.resize(390.0, 844.0);
    session.start();

    // Synthetic gesture: pick the ball up low on the left, flick up-right.
    let mut now = 0.0_f64;
    session.pointer_down(120.0, 700.0, now);
    for i in 1..=6 {
        now += 16.0;
        session.pointer_move(120.0 + i as f32 * 18.0, 700.0 - i as f32 * 26.0, now);
    }
    session.pointer_up(now);
    println!(
        "threw at {:.2} field units/s",
        session.ball().vel.length()
    );

    // Five seconds of frames.
    for _ in 0..300 {
        now += FRAME_MS;
        let events = session.frame(now);
        if events.scored {
            println!("score! total {}", session.score());
        }
        if events.obstacle_hit {
            println!("clang - obstacle at ({:.2}, {:.2})", session.ball().pos.x, session.ball().pos.y);
        }
    }

    let ball = session.ball();
    println!(
        "ball settled at ({:.3}, {:.3}), final score {}",
        ball.pos.x, ball.pos.y,
        session.score()
    );
    session.destroy();
}
