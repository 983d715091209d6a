//! Elastic collision response.
//!
//! Computes post-collision velocities for the two kinds of impact:
//! - **Wall**: the velocity component normal to the wall is negated
//! - **Ball**: one-dimensional elastic exchange along the line of centers
//!
//! ## Ball-ball exchange
//!
//! ```text
//!          n (unit, from ball 1 to ball 2)
//!     ●────────────▶●
//!     v1 = v1n·n + v1t      v2 = v2n·n + v2t
//!
//! v1n' = ((m1-m2)·v1n + 2·m2·v2n) / (m1+m2)
//! v2n' = ((m2-m1)·v2n + 2·m1·v1n) / (m1+m2)
//! ```
//!
//! Tangential components pass through untouched, so momentum and kinetic
//! energy are both conserved.

use crate::types::Vec2;

/// Mass of a ball, treated as a uniform-density sphere.
pub fn mass_for_radius(radius: f64) -> f64 {
    radius * radius * radius / 1000.0
}

/// Elastic collision resolver.
pub struct ElasticResolver;

impl ElasticResolver {
    /// Reflect off axis-aligned walls; `flip_x` / `flip_y` select the axes hit.
    pub fn reflect_off_wall(velocity: Vec2, flip_x: bool, flip_y: bool) -> Vec2 {
        Vec2 {
            x: if flip_x { -velocity.x } else { velocity.x },
            y: if flip_y { -velocity.y } else { velocity.y },
        }
    }

    /// Exchange momentum along `normal` between two balls.
    ///
    /// `normal` must be a unit vector. Returns the new velocities of ball 1
    /// and ball 2.
    pub fn exchange_along_normal(
        v1: Vec2,
        m1: f64,
        v2: Vec2,
        m2: f64,
        normal: Vec2,
    ) -> (Vec2, Vec2) {
        let v1n = v1.dot(&normal);
        let v2n = v2.dot(&normal);
        let v1t = v1 - normal * v1n;
        let v2t = v2 - normal * v2n;

        let total = m1 + m2;
        let new_v1n = ((m1 - m2) * v1n + 2.0 * m2 * v2n) / total;
        let new_v2n = ((m2 - m1) * v2n + 2.0 * m1 * v1n) / total;

        (v1t + normal * new_v1n, v2t + normal * new_v2n)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn momentum(v1: Vec2, m1: f64, v2: Vec2, m2: f64) -> Vec2 {
        v1 * m1 + v2 * m2
    }

    fn energy(v1: Vec2, m1: f64, v2: Vec2, m2: f64) -> f64 {
        0.5 * m1 * v1.magnitude_squared() + 0.5 * m2 * v2.magnitude_squared()
    }

    #[test]
    fn test_wall_reflection_keeps_orthogonal_component() {
        let v = Vec2::new(-3.0, 2.0);
        assert_eq!(ElasticResolver::reflect_off_wall(v, true, false), Vec2::new(3.0, 2.0));
        assert_eq!(ElasticResolver::reflect_off_wall(v, false, true), Vec2::new(-3.0, -2.0));
        assert_eq!(ElasticResolver::reflect_off_wall(v, true, true), Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_equal_masses_swap_head_on() {
        let m = mass_for_radius(10.0);
        let (a, b) = ElasticResolver::exchange_along_normal(
            Vec2::new(2.0, 0.0),
            m,
            Vec2::new(-2.0, 0.0),
            m,
            Vec2::new(1.0, 0.0),
        );
        assert!((a.x + 2.0).abs() < 1e-12, "got {:?}", a);
        assert!((b.x - 2.0).abs() < 1e-12, "got {:?}", b);
        assert_eq!(a.y, 0.0);
        assert_eq!(b.y, 0.0);
    }

    #[test]
    fn test_oblique_conserves_momentum_and_energy() {
        let (m1, m2) = (mass_for_radius(25.0), mass_for_radius(60.0));
        let (v1, v2) = (Vec2::new(4.0, -1.5), Vec2::new(-0.5, 2.0));
        let normal = Vec2::new(1.0, 1.0).normalized();

        let (a, b) = ElasticResolver::exchange_along_normal(v1, m1, v2, m2, normal);

        let dp = momentum(a, m1, b, m2) - momentum(v1, m1, v2, m2);
        assert!(dp.magnitude() < 1e-9, "momentum drift {:?}", dp);

        let de = energy(a, m1, b, m2) - energy(v1, m1, v2, m2);
        assert!(de.abs() < 1e-9, "energy drift {}", de);
    }

    #[test]
    fn test_tangential_components_untouched() {
        let normal = Vec2::new(0.0, 1.0);
        let (a, b) = ElasticResolver::exchange_along_normal(
            Vec2::new(5.0, 1.0),
            1.0,
            Vec2::new(-7.0, -1.0),
            3.0,
            normal,
        );
        assert_eq!(a.x, 5.0);
        assert_eq!(b.x, -7.0);
    }

    #[test]
    fn test_heavy_ball_barely_moves() {
        let (a, b) = ElasticResolver::exchange_along_normal(
            Vec2::new(1.0, 0.0),
            mass_for_radius(1.0),
            Vec2::ZERO,
            mass_for_radius(100.0),
            Vec2::new(1.0, 0.0),
        );
        assert!(a.x < -0.99, "light ball should bounce back, got {}", a.x);
        assert!(b.x > 0.0 && b.x < 1e-5, "heavy ball should creep, got {}", b.x);
    }
}
