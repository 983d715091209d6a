//! Swept collision detection.
//!
//! Both tests treat balls as points: the walls are pulled in by the ball's
//! radius, and two balls become one point sweeping toward a circle of the
//! combined radius in the relative frame.

use crate::collision::resolution::{mass_for_radius, ElasticResolver};
use crate::collision::response::{CollisionResponse, Contact};
use crate::types::{constants, Boundary, Vec2};

/// Stateless swept-intersection tests.
pub struct CollisionPhysics;

impl CollisionPhysics {
    /// Earliest wall hit of a moving point inside the box inset by `radius`.
    ///
    /// Only impacts in `(0, time_limit]` count. A ball already on or past a
    /// wall and still moving outward is reported at [`constants::CONTACT_TIME`]
    /// instead of `t = 0`, so it gets snapped back and reflected.
    ///
    /// # Returns
    /// The response for the ball, or the sentinel if no wall is reached.
    pub fn point_intersects_rectangle_outer(
        position: Vec2,
        velocity: Vec2,
        radius: f64,
        boundary: &Boundary,
        time_limit: f64,
    ) -> CollisionResponse {
        let inset = boundary.inset(radius);
        let hit_x = Self::axis_crossing(position.x, velocity.x, inset.min_x, inset.max_x, time_limit);
        let hit_y = Self::axis_crossing(position.y, velocity.y, inset.min_y, inset.max_y, time_limit);

        let t = match (hit_x, hit_y) {
            (None, None) => return CollisionResponse::none(),
            (Some((tx, _)), None) => tx,
            (None, Some((ty, _))) => ty,
            (Some((tx, _)), Some((ty, _))) => tx.min(ty),
        };

        // Both axes reaching their walls at the same instant is a corner hit
        let at_t = |hit: Option<(f64, f64)>| {
            hit.filter(|(t_axis, _)| (t_axis - t).abs() <= constants::EPSILON)
                .map(|(_, bound)| bound)
        };
        let wall_x = at_t(hit_x);
        let wall_y = at_t(hit_y);

        CollisionResponse::new(
            t,
            ElasticResolver::reflect_off_wall(velocity, wall_x.is_some(), wall_y.is_some()),
            Contact::Wall {
                x: wall_x,
                y: wall_y,
            },
        )
    }

    /// Earliest impact between two moving balls.
    ///
    /// Solves `|Δp + tΔv| = r1 + r2` for the first `t` in `(0, time_limit]`.
    /// Separating, parallel and grazing pairs never collide. Pairs already
    /// touching or overlapping while approaching collide at
    /// [`constants::CONTACT_TIME`].
    ///
    /// # Returns
    /// `(response for ball 1, response for ball 2)`, both sentinels when the
    /// balls miss each other.
    #[allow(clippy::too_many_arguments)]
    pub fn point_intersects_moving_point(
        p1: Vec2,
        v1: Vec2,
        r1: f64,
        p2: Vec2,
        v2: Vec2,
        r2: f64,
        time_limit: f64,
    ) -> (CollisionResponse, CollisionResponse) {
        let miss = (CollisionResponse::none(), CollisionResponse::none());

        let dp = p2 - p1;
        let dv = v2 - v1;
        let reach = r1 + r2;

        // Moving apart or holding distance; also covers |Δv| = 0
        let half_b = dp.dot(&dv);
        if half_b >= 0.0 {
            return miss;
        }

        let a = dv.magnitude_squared();
        let c = dp.magnitude_squared() - reach * reach;

        let t = if c <= 0.0 {
            constants::CONTACT_TIME.min(time_limit)
        } else {
            let discriminant = half_b * half_b - a * c;
            if discriminant <= 0.0 {
                return miss;
            }
            // c > 0 and b < 0 put both roots in (0, ∞); the smaller is the entry
            let t = (-half_b - discriminant.sqrt()) / a;
            if t <= 0.0 || t > time_limit {
                return miss;
            }
            t
        };

        let normal = (dp + dv * t).normalized();
        if normal == Vec2::ZERO {
            return miss;
        }

        let (new_v1, new_v2) = ElasticResolver::exchange_along_normal(
            v1,
            mass_for_radius(r1),
            v2,
            mass_for_radius(r2),
            normal,
        );

        (
            CollisionResponse::new(t, new_v1, Contact::Body { partner: None }),
            CollisionResponse::new(t, new_v2, Contact::Body { partner: None }),
        )
    }

    /// Time and bound of the wall a 1-D point moving at `v` reaches first.
    fn axis_crossing(p: f64, v: f64, lo: f64, hi: f64, time_limit: f64) -> Option<(f64, f64)> {
        if v == 0.0 {
            return None;
        }
        let bound = if v > 0.0 { hi } else { lo };

        let outward = if v > 0.0 { p >= bound } else { p <= bound };
        if outward {
            return Some((constants::CONTACT_TIME.min(time_limit), bound));
        }

        let t = (bound - p) / v;
        (t > 0.0 && t <= time_limit).then_some((t, bound))
    }
}

// =============================================================================
// Tests
// =============================================================================
