//! The bouncing ball.
//!
//! Each ball keeps the earliest collision found for it during the current
//! sub-step. Detection only ever lowers that record; [`Ball::commit`] consumes
//! it and clears it for the next sub-step:
//!
//! ```text
//! idle ──detect_*──▶ detecting ──(world picks t_min)──▶ commit ──▶ idle
//! ```

use std::fmt;

use crate::collision::{mass_for_radius, CollisionPhysics, CollisionResponse, Contact};
use crate::types::{BallId, Boundary, Color, Vec2};

/// A circular body moving at constant velocity between collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    position: Vec2,
    velocity: Vec2,
    radius: f64,
    color: Color,
    earliest: CollisionResponse,
}

impl Ball {
    pub fn new(position: Vec2, velocity: Vec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
            color: Color::default(),
            earliest: CollisionResponse::none(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Ball launched with `speed` at `angle_deg`, counter-clockwise from +x.
    ///
    /// Screen coordinates: y grows downward, so a positive angle moves up.
    pub fn from_polar(x: f64, y: f64, radius: f64, speed: f64, angle_deg: f64) -> Self {
        let angle = angle_deg.to_radians();
        let velocity = Vec2::new(speed * angle.cos(), -speed * angle.sin());
        Self::new(Vec2::new(x, y), velocity, radius)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn mass(&self) -> f64 {
        mass_for_radius(self.radius)
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// Direction of travel in degrees, counter-clockwise, screen y flipped.
    pub fn move_angle(&self) -> f64 {
        (-self.velocity.y).atan2(self.velocity.x).to_degrees()
    }

    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass() * self.velocity.magnitude_squared()
    }

    /// The earliest collision found so far in this sub-step.
    pub fn earliest_collision(&self) -> &CollisionResponse {
        &self.earliest
    }

    /// Check the walls over one full sub-step.
    pub fn detect_against_boundary(&mut self, boundary: &Boundary) {
        self.detect_against_boundary_within(boundary, 1.0);
    }

    /// Check the walls over `(0, time_limit]`.
    pub fn detect_against_boundary_within(&mut self, boundary: &Boundary, time_limit: f64) {
        let candidate = CollisionPhysics::point_intersects_rectangle_outer(
            self.position,
            self.velocity,
            self.radius,
            boundary,
            time_limit,
        );
        self.offer(&candidate);
    }

    /// Check this ball against `other`; either record may be lowered.
    pub fn detect_against_body(&mut self, other: &mut Ball, time_limit: f64) {
        let (mine, theirs) = CollisionPhysics::point_intersects_moving_point(
            self.position,
            self.velocity,
            self.radius,
            other.position,
            other.velocity,
            other.radius,
            time_limit,
        );
        other.offer(&theirs);
        self.offer(&mine);
    }

    /// [`Self::detect_against_body`], with each side's response naming the
    /// other ball so the world can check that both picked the same impact.
    pub fn detect_against_partner(
        &mut self,
        id: BallId,
        other: &mut Ball,
        other_id: BallId,
        time_limit: f64,
    ) {
        let (mine, theirs) = CollisionPhysics::point_intersects_moving_point(
            self.position,
            self.velocity,
            self.radius,
            other.position,
            other.velocity,
            other.radius,
            time_limit,
        );
        other.offer(&theirs.with_partner(id));
        self.offer(&mine.with_partner(other_id));
    }

    /// Drop the recorded impact; the next [`Self::commit`] moves straight.
    pub fn forget_collision(&mut self) {
        self.earliest.reset();
    }

    /// Advance by `time`, stopping at the recorded impact if it falls inside.
    ///
    /// An impact at `t <= time` moves the ball to the exact impact position
    /// and adopts the post-collision velocity; the rest of the sub-step is
    /// left for the next round of detection. Otherwise the ball moves in a
    /// straight line. The record is cleared either way.
    ///
    /// # Returns
    /// The contact that was applied, or [`Contact::None`].
    pub fn commit(&mut self, time: f64) -> Contact {
        let applied = if self.earliest.t <= time {
            self.position = self.earliest.position_at(self.position, self.velocity);
            self.velocity = self.earliest.new_velocity;
            self.earliest.contact
        } else {
            self.position = self.position.advanced(&self.velocity, time);
            Contact::None
        };
        self.earliest.reset();
        applied
    }

    /// Pull the center back inside the legal region of `boundary`.
    ///
    /// Returns true if the ball had to move.
    pub fn confine(&mut self, boundary: &Boundary) -> bool {
        let clamped = boundary.inset(self.radius).clamp(self.position);
        let moved = clamped != self.position;
        self.position = clamped;
        moved
    }

    fn offer(&mut self, candidate: &CollisionResponse) {
        if candidate.earlier_than(&self.earliest) {
            self.earliest.copy_from(candidate);
        }
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@({:3.0},{:3.0}) r={:3.0} V=({:2.0},{:2.0}) S={:4.1} \u{0398}={:4.0} KE={:3.0}",
            self.position.x,
            self.position.y,
            self.radius,
            self.velocity.x,
            self.velocity.y,
            self.speed(),
            self.move_angle(),
            self.kinetic_energy()
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_box() -> Boundary {
        Boundary::from_size(100.0, 100.0)
    }

    #[test]
    fn test_from_polar_screen_convention() {
        let ball = Ball::from_polar(0.0, 0.0, 10.0, 2.0, 90.0);
        assert!(ball.velocity().x.abs() < 1e-12);
        assert!((ball.velocity().y + 2.0).abs() < 1e-12, "90° should move up the screen");
        assert!((ball.move_angle() - 90.0).abs() < 1e-9);
        assert!((ball.speed() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mass_and_energy() {
        let ball = Ball::new(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        assert!((ball.mass() - 1.0).abs() < 1e-12);
        assert!((ball.kinetic_energy() - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_detection_keeps_earliest() {
        let mut ball = Ball::new(Vec2::new(7.0, 10.0), Vec2::new(-3.0, 0.0), 5.0);
        ball.detect_against_boundary(&test_box());
        let first = *ball.earliest_collision();
        assert!((first.t - 2.0 / 3.0).abs() < 1e-12);

        // A later candidate must not replace it
        let mut other = Ball::new(Vec2::new(30.0, 10.0), Vec2::new(-10.0, 0.0), 5.0);
        ball.detect_against_body(&mut other, 5.0);
        assert!(other.earliest_collision().t > first.t);
        assert_eq!(*ball.earliest_collision(), first);
    }

    #[test]
    fn test_body_detection_updates_both() {
        let mut a = Ball::new(Vec2::new(20.0, 50.0), Vec2::new(2.0, 0.0), 10.0);
        let mut b = Ball::new(Vec2::new(42.0, 50.0), Vec2::new(-2.0, 0.0), 10.0);
        a.detect_against_body(&mut b, 1.0);
        assert!((a.earliest_collision().t - 0.5).abs() < 1e-12);
        assert!((b.earliest_collision().t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_commit_without_collision_moves_straight() {
        let mut ball = Ball::new(Vec2::new(10.0, 10.0), Vec2::new(-3.0, 0.0), 5.0);
        ball.detect_against_boundary(&test_box());
        assert_eq!(ball.commit(1.0), Contact::None);
        assert_eq!(ball.position(), Vec2::new(7.0, 10.0));
        assert_eq!(ball.velocity(), Vec2::new(-3.0, 0.0));
        assert!(!ball.earliest_collision().is_collision());
    }

    #[test]
    fn test_commit_stops_at_wall() {
        let mut ball = Ball::new(Vec2::new(7.0, 10.0), Vec2::new(-3.0, 0.0), 5.0);
        ball.detect_against_boundary(&test_box());
        let contact = ball.commit(1.0);
        assert!(matches!(contact, Contact::Wall { x: Some(_), y: None }));
        assert_eq!(ball.position(), Vec2::new(5.0, 10.0));
        assert_eq!(ball.velocity(), Vec2::new(3.0, 0.0));
        assert!(!ball.earliest_collision().is_collision());
    }

    #[test]
    fn test_commit_before_impact_time_moves_straight() {
        let mut ball = Ball::new(Vec2::new(7.0, 10.0), Vec2::new(-3.0, 0.0), 5.0);
        ball.detect_against_boundary(&test_box());
        // Another event ended the sub-step at t = 0.5, before this ball's wall
        assert_eq!(ball.commit(0.5), Contact::None);
        assert_eq!(ball.position(), Vec2::new(5.5, 10.0));
        assert_eq!(ball.velocity(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_resting_ball_is_unchanged() {
        let mut ball = Ball::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 5.0);
        ball.detect_against_boundary(&test_box());
        ball.commit(1.0);
        assert_eq!(ball.position(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_partner_detection_tags_both_sides() {
        let mut a = Ball::new(Vec2::new(20.0, 50.0), Vec2::new(2.0, 0.0), 10.0);
        let mut b = Ball::new(Vec2::new(42.0, 50.0), Vec2::new(-2.0, 0.0), 10.0);
        a.detect_against_partner(BallId(0), &mut b, BallId(1), 1.0);
        assert_eq!(
            a.earliest_collision().contact,
            Contact::Body {
                partner: Some(BallId(1))
            }
        );
        assert_eq!(
            b.earliest_collision().contact,
            Contact::Body {
                partner: Some(BallId(0))
            }
        );
    }

    #[test]
    fn test_forgotten_collision_moves_straight() {
        let mut ball = Ball::new(Vec2::new(7.0, 10.0), Vec2::new(-3.0, 0.0), 5.0);
        ball.detect_against_boundary(&test_box());
        ball.forget_collision();
        assert_eq!(ball.commit(2.0 / 3.0), Contact::None);
        assert_eq!(ball.velocity(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_color_defaults_to_blue() {
        let ball = Ball::new(Vec2::ZERO, Vec2::ZERO, 5.0);
        assert_eq!(ball.color(), Color::BLUE);
        assert_eq!(ball.with_color(Color::PINK).color(), Color::PINK);
    }

    #[test]
    fn test_confine() {
        let mut ball = Ball::new(Vec2::new(98.0, 50.0), Vec2::ZERO, 5.0);
        assert!(ball.confine(&test_box()));
        assert_eq!(ball.position(), Vec2::new(95.0, 50.0));
        assert!(!ball.confine(&test_box()));
    }

    #[test]
    fn test_display() {
        let ball = Ball::new(Vec2::new(100.0, 410.0), Vec2::new(3.0, 0.0), 25.0);
        let text = ball.to_string();
        assert!(text.starts_with("@(100,410) r= 25"), "got {}", text);
    }
}
