//! The outcome of a single swept-intersection test.

use crate::types::{constants, BallId, Vec2};

/// What a collision response refers to.
///
/// Wall hits carry the exact inset-boundary coordinate per axis, so the
/// impact position can be snapped onto the wall instead of trusting the
/// interpolated value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Contact {
    #[default]
    None,
    Wall {
        x: Option<f64>,
        y: Option<f64>,
    },
    /// Another ball; `partner` is known once the world has tagged the pair.
    Body { partner: Option<BallId> },
}

/// Time of impact plus the velocity the owning ball leaves with.
///
/// `t` is a fraction of the current sub-step's remaining time. The
/// "no collision" sentinel is `+∞`, so it loses every "earliest" comparison
/// against a real impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResponse {
    pub t: f64,
    pub new_velocity: Vec2,
    pub contact: Contact,
}

impl Default for CollisionResponse {
    fn default() -> Self {
        Self::none()
    }
}

impl CollisionResponse {
    /// The sentinel response.
    pub const fn none() -> Self {
        Self {
            t: constants::NO_COLLISION,
            new_velocity: Vec2::ZERO,
            contact: Contact::None,
        }
    }

    pub fn new(t: f64, new_velocity: Vec2, contact: Contact) -> Self {
        Self {
            t,
            new_velocity,
            contact,
        }
    }

    /// Clear back to the sentinel in place.
    pub fn reset(&mut self) {
        *self = Self::none();
    }

    pub fn copy_from(&mut self, other: &CollisionResponse) {
        *self = *other;
    }

    pub fn is_collision(&self) -> bool {
        self.t.is_finite()
    }

    /// Strictly earlier than `other`. Ties keep the existing response.
    pub fn earlier_than(&self, other: &CollisionResponse) -> bool {
        self.t < other.t
    }

    /// Record which ball a body impact is with.
    pub fn with_partner(mut self, partner: BallId) -> Self {
        if let Contact::Body { .. } = self.contact {
            self.contact = Contact::Body {
                partner: Some(partner),
            };
        }
        self
    }

    /// Where a ball that started at `start` with `velocity` sits at time `t`.
    ///
    /// Axes that hit a wall are snapped onto the wall.
    pub fn position_at(&self, start: Vec2, velocity: Vec2) -> Vec2 {
        let mut pos = start.advanced(&velocity, self.t);
        if let Contact::Wall { x, y } = self.contact {
            if let Some(x) = x {
                pos.x = x;
            }
            if let Some(y) = y {
                pos.y = y;
            }
        }
        pos
    }
}
