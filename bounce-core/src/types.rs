//! Core types for the ball simulation.
//!
//! Units are abstract screen units:
//! - Position: pixels, y axis pointing down
//! - Velocity: pixels per frame
//! - Time: fractions of one frame
//! - Mass: normalized `radius³ / 1000`

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Point reached after moving along `velocity` for `t`.
    pub fn advanced(&self, velocity: &Self, t: f64) -> Self {
        *self + *velocity * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

// =============================================================================
// Boundary
// =============================================================================

/// The axis-aligned container box.
///
/// A ball of radius `r` is legal when its center lies inside the inset
/// rectangle `[min_x + r, max_x - r] × [min_y + r, max_y - r]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Boundary {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Box anchored at the origin, as a window of the given size.
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the box has finite corners and positive extent on both axes.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.max_x > self.min_x
            && self.max_y > self.min_y
    }

    /// The legal region for the center of a ball of `radius`.
    ///
    /// May be inverted when the ball does not fit; check [`Self::fits`] first.
    pub fn inset(&self, radius: f64) -> Boundary {
        Boundary {
            min_x: self.min_x + radius,
            min_y: self.min_y + radius,
            max_x: self.max_x - radius,
            max_y: self.max_y - radius,
        }
    }

    /// Whether a ball of `radius` fits between the walls on both axes.
    pub fn fits(&self, radius: f64) -> bool {
        let inset = self.inset(radius);
        inset.max_x >= inset.min_x && inset.max_y >= inset.min_y
    }

    /// Check if a point lies inside the box (edges included).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Nearest point inside the box.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        )
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::from_size(1280.0, 800.0)
    }
}

// =============================================================================
// BallId, Color
// =============================================================================

/// Stable handle of a ball: its spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub usize);

/// Fill color handed to renderers, as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const BLUE: Color = Color(0, 0, 255);
    pub const CYAN: Color = Color(0, 255, 255);
    pub const GREEN: Color = Color(0, 255, 0);
    pub const MAGENTA: Color = Color(255, 0, 255);
    pub const ORANGE: Color = Color(255, 200, 0);
    pub const PINK: Color = Color(255, 175, 175);
    pub const YELLOW: Color = Color(255, 255, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLUE
    }
}

// =============================================================================
// Constants
// =============================================================================

/// Numeric constants used across the simulation.
pub mod constants {
    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;

    /// Sentinel time of impact meaning "no collision found"
    pub const NO_COLLISION: f64 = f64::INFINITY;

    /// Time of impact reported for bodies already in contact and pushing inward
    pub const CONTACT_TIME: f64 = 1e-9;

    /// Remaining frame time below which a frame is considered finished
    pub const EPSILON_TIME: f64 = 1e-2;

    /// Upper bound on sub-steps per frame
    pub const MAX_SUBSTEPS: usize = 1000;

    /// Default number of balls a world accepts
    pub const MAX_BALLS: usize = 25;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 5.0);

        assert_eq!(a + b, Vec2::new(5.0, 7.0));
        assert_eq!(a - b, Vec2::new(-3.0, -3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert_eq!(a.dot(&b), 14.0); // 1*4 + 2*5
    }

    #[test]
    fn test_vec2_normalized() {
        let v = Vec2::new(3.0, 4.0);
        let n = v.normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-10);
        assert!((n.x - 0.6).abs() < 1e-10);
        assert!((n.y - 0.8).abs() < 1e-10);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_advanced() {
        let p = Vec2::new(10.0, 10.0);
        let v = Vec2::new(-3.0, 1.0);
        assert_eq!(p.advanced(&v, 2.0), Vec2::new(4.0, 12.0));
    }

    #[test]
    fn test_boundary_inset() {
        let b = Boundary::from_size(100.0, 50.0);
        let inset = b.inset(5.0);
        assert_eq!(inset, Boundary::new(5.0, 5.0, 95.0, 45.0));
        assert!(b.fits(25.0));
        assert!(!b.fits(25.5)); // taller than the box
    }

    #[test]
    fn test_boundary_validity() {
        assert!(Boundary::from_size(10.0, 10.0).is_valid());
        assert!(!Boundary::new(10.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!Boundary::new(0.0, 0.0, f64::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_boundary_clamp() {
        let b = Boundary::from_size(100.0, 100.0).inset(5.0);
        assert_eq!(b.clamp(Vec2::new(-3.0, 50.0)), Vec2::new(5.0, 50.0));
        assert_eq!(b.clamp(Vec2::new(120.0, 96.0)), Vec2::new(95.0, 95.0));
        assert!(b.contains(Vec2::new(5.0, 95.0)));
        assert!(!b.contains(Vec2::new(4.9, 50.0)));
    }
}
