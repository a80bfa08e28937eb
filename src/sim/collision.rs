//! Collision detection and response
//!
//! Two primitives: axis-aligned wall reflection against the padded arena
//! rectangle, and circle-circle contact with positional separation and an
//! elastic impulse between unit masses.

use glam::Vec2;

use super::state::{Bounds, Fighter, Wall};

/// Result of a body-body overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from body A toward body B, measured before separation
    pub normal: Vec2,
    /// How far the bodies interpenetrated
    pub overlap: f32,
    /// Whether an impulse was applied (bodies were approaching)
    pub impulse_applied: bool,
}

/// Reflect a body off any wall its leading edge crossed.
///
/// The position is clamped back onto the wall and the matching velocity
/// component inverted. Returns the walls touched this step.
pub fn reflect_walls(pos: &mut Vec2, vel: &mut Vec2, radius: f32, bounds: &Bounds) -> Vec<Wall> {
    let mut hits = Vec::new();

    if pos.x - radius < bounds.min.x {
        pos.x = bounds.min.x + radius;
        vel.x = -vel.x;
        hits.push(Wall::Left);
    }
    if pos.x + radius > bounds.max.x {
        pos.x = bounds.max.x - radius;
        vel.x = -vel.x;
        hits.push(Wall::Right);
    }
    if pos.y - radius < bounds.min.y {
        pos.y = bounds.min.y + radius;
        vel.y = -vel.y;
        hits.push(Wall::Top);
    }
    if pos.y + radius > bounds.max.y {
        pos.y = bounds.max.y - radius;
        vel.y = -vel.y;
        hits.push(Wall::Bottom);
    }

    hits
}

/// Overlap test between two circles. Coincident centers report no contact
/// since there is no usable normal.
pub fn circle_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<(Vec2, f32)> {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;
    if dist > 0.0 && dist < min_dist {
        Some((delta / dist, min_dist - dist))
    } else {
        None
    }
}

/// Relative velocity of B with respect to A along `normal`.
/// Negative means the bodies are approaching.
#[inline]
pub fn normal_velocity(a_vel: Vec2, b_vel: Vec2, normal: Vec2) -> f32 {
    (b_vel - a_vel).dot(normal)
}

/// Elastic impulse between two unit masses. Applied only when approaching.
pub fn apply_impulse(a_vel: &mut Vec2, b_vel: &mut Vec2, normal: Vec2, restitution: f32) -> bool {
    let vel_along_normal = normal_velocity(*a_vel, *b_vel, normal);
    if vel_along_normal >= 0.0 {
        return false;
    }
    // Split evenly between equal masses
    let j = -(1.0 + restitution) * vel_along_normal / 2.0;
    let impulse = normal * j;
    *a_vel -= impulse;
    *b_vel += impulse;
    true
}

/// Separate two overlapping fighters by half the overlap each and bounce them
pub fn resolve_fighter_collision(a: &mut Fighter, b: &mut Fighter, restitution: f32) -> Option<Contact> {
    let (normal, overlap) = circle_overlap(a.pos, a.radius, b.pos, b.radius)?;

    let push = normal * overlap * 0.5;
    a.pos -= push;
    b.pos += push;

    let impulse_applied = apply_impulse(&mut a.vel, &mut b.vel, normal, restitution);

    Some(Contact {
        normal,
        overlap,
        impulse_applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contestant::{Contestant, RawStats};

    fn bounds() -> Bounds {
        Bounds {
            min: Vec2::splat(10.0),
            max: Vec2::new(390.0, 290.0),
        }
    }

    fn fighter(pos: Vec2, vel: Vec2) -> Fighter {
        Fighter::new(
            Contestant::new(1, "ball", "", RawStats::default()),
            pos,
            vel,
            20.0,
        )
    }

    #[test]
    fn test_no_wall_contact_inside() {
        let mut pos = Vec2::new(200.0, 150.0);
        let mut vel = Vec2::new(0.3, -0.2);
        assert!(reflect_walls(&mut pos, &mut vel, 20.0, &bounds()).is_empty());
        assert_eq!(vel, Vec2::new(0.3, -0.2));
    }

    #[test]
    fn test_left_wall_reflects_and_clamps() {
        let mut pos = Vec2::new(25.0, 150.0);
        let mut vel = Vec2::new(-0.4, 0.1);
        let hits = reflect_walls(&mut pos, &mut vel, 20.0, &bounds());
        assert_eq!(hits, vec![Wall::Left]);
        assert_eq!(pos.x, 30.0);
        assert_eq!(vel, Vec2::new(0.4, 0.1));
    }

    #[test]
    fn test_corner_hits_two_walls() {
        let mut pos = Vec2::new(385.0, 285.0);
        let mut vel = Vec2::new(0.2, 0.3);
        let hits = reflect_walls(&mut pos, &mut vel, 20.0, &bounds());
        assert_eq!(hits, vec![Wall::Right, Wall::Bottom]);
        assert_eq!(pos, Vec2::new(370.0, 270.0));
        assert_eq!(vel, Vec2::new(-0.2, -0.3));
    }

    #[test]
    fn test_circle_overlap() {
        let (n, overlap) = circle_overlap(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0).unwrap();
        assert_eq!(n, Vec2::X);
        assert!((overlap - 5.0).abs() < 1e-5);

        assert!(circle_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0).is_none());
        assert!(circle_overlap(Vec2::ZERO, 10.0, Vec2::ZERO, 10.0).is_none());
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let mut a = fighter(Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0));
        let mut b = fighter(Vec2::new(130.0, 100.0), Vec2::new(-0.5, 0.0));

        let contact = resolve_fighter_collision(&mut a, &mut b, 1.0).unwrap();
        assert!(contact.impulse_applied);
        assert!((contact.overlap - 10.0).abs() < 1e-4);
        // Separated to exactly touching
        assert!(((b.pos - a.pos).length() - 40.0).abs() < 1e-3);
        // Perfectly elastic equal masses swap normal velocities
        assert!((a.vel.x + 0.5).abs() < 1e-5);
        assert!((b.vel.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_restitution_loses_a_little_energy() {
        let mut a = fighter(Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0));
        let mut b = fighter(Vec2::new(130.0, 100.0), Vec2::new(-0.5, 0.0));
        resolve_fighter_collision(&mut a, &mut b, 0.99).unwrap();
        assert!((a.vel.x + 0.495).abs() < 1e-5);
        assert!((b.vel.x - 0.495).abs() < 1e-5);
        // Momentum conserved
        assert!((a.vel + b.vel).length() < 1e-5);
    }

    #[test]
    fn test_separating_bodies_get_no_impulse() {
        let mut a = fighter(Vec2::new(100.0, 100.0), Vec2::new(-0.5, 0.0));
        let mut b = fighter(Vec2::new(130.0, 100.0), Vec2::new(0.5, 0.0));
        let contact = resolve_fighter_collision(&mut a, &mut b, 0.99).unwrap();
        assert!(!contact.impulse_applied);
        assert_eq!(a.vel, Vec2::new(-0.5, 0.0));
        assert_eq!(b.vel, Vec2::new(0.5, 0.0));
    }
}
