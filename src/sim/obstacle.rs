//! Obstacle constraint shapes and the single-collision resolver
//!
//! Three shapes cover the rim/backboard/crossbar geometry of every sport
//! variant with one closest-point + reflect pattern: an axis-aligned box, a
//! line segment, and a rotated box. Damping varies per contact. At most one
//! obstacle collision is applied per tick (first match in declared order) so
//! conflicting simultaneous constraints are never resolved against each
//! other.
//!
//! The resolver works in device pixels; the session converts the ball state
//! in and out around the call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::{self, GEOM_EPS, Rect, RectEdge};

/// Velocity retention per rectangle edge, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeDamping {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl EdgeDamping {
    pub const fn uniform(d: f32) -> Self {
        Self {
            left: d,
            right: d,
            top: d,
            bottom: d,
        }
    }

    fn for_edge(&self, edge: RectEdge) -> f32 {
        match edge {
            RectEdge::Left => self.left,
            RectEdge::Right => self.right,
            RectEdge::Top => self.top,
            RectEdge::Bottom => self.bottom,
        }
    }
}

/// A pixel-space collision constraint, re-derived from the fitted layout
/// every frame and never mutated in place.
#[derive(Debug, Clone)]
pub enum Obstacle {
    /// Axis-aligned box (backboard, rim lip, post) with per-edge damping.
    RectZone { rect: Rect, damping: EdgeDamping },
    /// Slanted net line with a damping coefficient per incidence side and an
    /// optional liveliness impulse along the contact normal (px/s).
    NetSegment {
        a: Vec2,
        b: Vec2,
        damping_left: f32,
        damping_right: f32,
        bounce_boost: f32,
    },
    /// Crossbar: spine from `origin` along `angle` for `length`, extended by
    /// `thickness` on the local up side; one uniform damping coefficient.
    RotatedBar {
        origin: Vec2,
        length: f32,
        thickness: f32,
        angle: f32,
        damping: f32,
    },
}

/// Resolved contact: corrected position/velocity plus the contact normal.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub pos: Vec2,
    pub vel: Vec2,
    pub normal: Vec2,
}

/// Resolve the ball against the obstacle set, applying at most one collision
/// (the first overlapping obstacle in declared order).
pub fn resolve(pos: Vec2, radius: f32, vel: Vec2, obstacles: &[Obstacle]) -> Option<Contact> {
    obstacles
        .iter()
        .find_map(|obstacle| resolve_one(pos, radius, vel, obstacle))
}

fn resolve_one(pos: Vec2, radius: f32, vel: Vec2, obstacle: &Obstacle) -> Option<Contact> {
    match *obstacle {
        Obstacle::RectZone { ref rect, damping } => resolve_rect(pos, radius, vel, rect, damping),
        Obstacle::NetSegment {
            a,
            b,
            damping_left,
            damping_right,
            bounce_boost,
        } => resolve_segment(pos, radius, vel, a, b, damping_left, damping_right, bounce_boost),
        Obstacle::RotatedBar {
            origin,
            length,
            thickness,
            angle,
            damping,
        } => resolve_bar(pos, radius, vel, origin, length, thickness, angle, damping),
    }
}

fn resolve_rect(
    pos: Vec2,
    radius: f32,
    vel: Vec2,
    rect: &Rect,
    damping: EdgeDamping,
) -> Option<Contact> {
    let closest = rect.closest_point(pos);
    let delta = pos - closest;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Center exactly on the surface (or inside the box): push straight up.
    let normal = if dist > GEOM_EPS {
        delta / dist
    } else {
        Vec2::NEG_Y
    };
    let new_pos = closest + normal * radius;

    // Damping belongs to the edge with the smallest overlap, not to the
    // collision normal. In corner overlaps the two can disagree.
    let d = damping.for_edge(geom::nearest_edge(rect, pos));

    // Negate and scale only the normal component; tangential motion is kept.
    let tangent = Vec2::new(-normal.y, normal.x);
    let new_vel = tangent * vel.dot(tangent) + normal * (-vel.dot(normal) * d);

    Some(Contact {
        pos: new_pos,
        vel: new_vel,
        normal,
    })
}

#[allow(clippy::too_many_arguments)]
fn resolve_segment(
    pos: Vec2,
    radius: f32,
    vel: Vec2,
    a: Vec2,
    b: Vec2,
    damping_left: f32,
    damping_right: f32,
    bounce_boost: f32,
) -> Option<Contact> {
    let closest = geom::closest_point_on_segment(a, b, pos);
    let delta = pos - closest;
    let dist = delta.length();
    if dist >= radius {
        return None;
    }

    let seg = b - a;
    let mut normal = Vec2::new(-seg.y, seg.x).normalize_or_zero();
    if normal.length_squared() < 0.5 {
        // Zero-length segment: treat as a point contact from above.
        normal = Vec2::NEG_Y;
    }
    // Orient the normal from the segment toward the ball center.
    if normal.dot(delta) < 0.0 {
        normal = -normal;
    }

    let new_pos = pos + normal * (radius - dist);

    // Incidence side decides the damping; the normal's x sign tells the
    // sides apart for the slanted net lines this shape models.
    let d = if normal.x < 0.0 {
        damping_left
    } else {
        damping_right
    };
    let new_vel = geom::reflect(vel, normal) * d + normal * bounce_boost;

    Some(Contact {
        pos: new_pos,
        vel: new_vel,
        normal,
    })
}

#[allow(clippy::too_many_arguments)]
fn resolve_bar(
    pos: Vec2,
    radius: f32,
    vel: Vec2,
    origin: Vec2,
    length: f32,
    thickness: f32,
    angle: f32,
    damping: f32,
) -> Option<Contact> {
    // Into the bar's local frame: origin at the spine start, spine along +x.
    let local = geom::rotate(pos - origin, -angle);
    let local_rect = Rect::new(0.0, -thickness, length, thickness);

    let closest = local_rect.closest_point(local);
    let delta = local - closest;
    let dist = delta.length();
    if dist >= radius {
        return None;
    }

    let local_normal = if dist > GEOM_EPS {
        delta / dist
    } else {
        // Center inside the bar: default straight up in the local frame.
        Vec2::NEG_Y
    };
    let normal = geom::rotate(local_normal, angle);

    let new_pos = pos + normal * radius;
    let new_vel = geom::reflect(vel, normal) * damping;

    Some(Contact {
        pos: new_pos,
        vel: new_vel,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_rect_zone_miss() {
        let obstacles = [Obstacle::RectZone {
            rect: Rect::new(100.0, 100.0, 50.0, 50.0),
            damping: EdgeDamping::uniform(0.5),
        }];
        assert!(resolve(Vec2::new(20.0, 20.0), 10.0, Vec2::ZERO, &obstacles).is_none());
    }

    #[test]
    fn test_rect_zone_pushes_out_and_damps_normal() {
        let obstacles = [Obstacle::RectZone {
            rect: Rect::new(100.0, 100.0, 50.0, 50.0),
            damping: EdgeDamping::uniform(0.5),
        }];
        // Approaching the left face, slightly overlapping.
        let pos = Vec2::new(95.0, 125.0);
        let vel = Vec2::new(60.0, 10.0);
        let contact = resolve(pos, 8.0, vel, &obstacles).unwrap();

        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        // Pushed out to exactly radius from the face.
        assert!((contact.pos.x - 92.0).abs() < 1e-3);
        // Normal component negated and halved; tangential kept.
        assert!((contact.vel.x + 30.0).abs() < 1e-3);
        assert!((contact.vel.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_rect_zone_nearest_edge_damping() {
        let damping = EdgeDamping {
            left: 0.9,
            right: 0.9,
            top: 0.1,
            bottom: 0.9,
        };
        let obstacles = [Obstacle::RectZone {
            rect: Rect::new(0.0, 100.0, 200.0, 20.0),
            damping,
        }];
        // Grazing the top face mid-span: top damping applies.
        let contact = resolve(Vec2::new(100.0, 96.0), 8.0, Vec2::new(0.0, 50.0), &obstacles).unwrap();
        assert!((contact.vel.y + 50.0 * 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_rect_zone_center_inside_uses_fallback_normal() {
        let obstacles = [Obstacle::RectZone {
            rect: Rect::new(0.0, 0.0, 40.0, 40.0),
            damping: EdgeDamping::uniform(1.0),
        }];
        // Ball center exactly on the top-left corner of the box interior.
        let contact = resolve(Vec2::new(0.0, 0.0), 5.0, Vec2::new(0.0, 10.0), &obstacles).unwrap();
        assert!(contact.normal.is_finite());
        assert!((contact.normal.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_first_match_wins() {
        // Two overlapping zones with very different damping; only the first
        // declared obstacle may be resolved.
        let first = Rect::new(90.0, 0.0, 40.0, 200.0);
        let second = Rect::new(90.0, 0.0, 40.0, 200.0);
        let obstacles = [
            Obstacle::RectZone {
                rect: first,
                damping: EdgeDamping::uniform(1.0),
            },
            Obstacle::RectZone {
                rect: second,
                damping: EdgeDamping::uniform(0.0),
            },
        ];
        let contact = resolve(Vec2::new(85.0, 100.0), 8.0, Vec2::new(40.0, 0.0), &obstacles).unwrap();
        // Fully elastic reflection proves the first zone resolved it; the
        // push-out also moved the ball clear of both.
        assert!((contact.vel.x + 40.0).abs() < 1e-3);
        assert!(contact.pos.x <= 82.0 + 1e-3);
    }

    #[test]
    fn test_segment_reflects_and_boosts() {
        // Vertical segment; ball approaches from the left.
        let obstacles = [Obstacle::NetSegment {
            a: Vec2::new(100.0, 0.0),
            b: Vec2::new(100.0, 200.0),
            damping_left: 0.5,
            damping_right: 0.9,
            bounce_boost: 4.0,
        }];
        let contact = resolve(Vec2::new(95.0, 50.0), 8.0, Vec2::new(30.0, 0.0), &obstacles).unwrap();

        // Normal points from the segment toward the ball (leftward).
        assert!((contact.normal - Vec2::new(-1.0, 0.0)).length() < 1e-4);
        // Pushed out by the penetration depth (8 - 5 = 3).
        assert!((contact.pos.x - 92.0).abs() < 1e-3);
        // Reflected (-30), scaled by the left-side damping, plus the boost
        // along the normal.
        assert!((contact.vel.x - (-30.0 * 0.5 + -4.0)).abs() < 1e-3);
    }

    #[test]
    fn test_segment_side_damping_by_normal_sign() {
        let obstacles = [Obstacle::NetSegment {
            a: Vec2::new(100.0, 0.0),
            b: Vec2::new(100.0, 200.0),
            damping_left: 0.5,
            damping_right: 0.25,
            bounce_boost: 0.0,
        }];
        // From the right side: normal points +x, right damping applies.
        let contact = resolve(Vec2::new(105.0, 50.0), 8.0, Vec2::new(-40.0, 0.0), &obstacles).unwrap();
        assert!(contact.normal.x > 0.0);
        assert!((contact.vel.x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotated_bar_diagonal_contact() {
        // Bar at 45 degrees starting at the origin.
        let obstacles = [Obstacle::RotatedBar {
            origin: Vec2::new(0.0, 0.0),
            length: 100.0,
            thickness: 10.0,
            angle: FRAC_PI_4,
            damping: 1.0,
        }];
        // A point above the middle of the bar (local up is -y), overlapping
        // its top face by half the radius.
        let mid = geom::rotate(Vec2::new(50.0, -14.0), FRAC_PI_4);
        let contact = resolve(mid, 8.0, Vec2::new(0.0, 60.0), &obstacles).unwrap();

        // Normal is the local up direction rotated into the world frame.
        let expected = geom::rotate(Vec2::NEG_Y, FRAC_PI_4);
        assert!((contact.normal - expected).length() < 1e-3);
        // Push-out leaves the ball at radius along the normal from its
        // pre-contact position.
        assert!((contact.pos - (mid + expected * 8.0)).length() < 1e-3);
    }

    #[test]
    fn test_rotated_bar_miss_beyond_end() {
        let obstacles = [Obstacle::RotatedBar {
            origin: Vec2::new(0.0, 0.0),
            length: 100.0,
            thickness: 10.0,
            angle: 0.0,
            damping: 0.6,
        }];
        assert!(resolve(Vec2::new(150.0, -5.0), 8.0, Vec2::ZERO, &obstacles).is_none());
    }

    proptest! {
        #[test]
        fn prop_bounce_never_gains_normal_speed(
            px in 60.0f32..140.0,
            py in 60.0f32..140.0,
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            d in 0.0f32..0.999,
        ) {
            let obstacles = [Obstacle::RectZone {
                rect: Rect::new(80.0, 80.0, 60.0, 60.0),
                damping: EdgeDamping::uniform(d),
            }];
            let vel = Vec2::new(vx, vy);
            if let Some(contact) = resolve(Vec2::new(px, py), 12.0, vel, &obstacles) {
                let before = vel.dot(contact.normal).abs();
                let after = contact.vel.dot(contact.normal).abs();
                prop_assert!(after <= before + 1e-3);
            }
        }
    }
}
