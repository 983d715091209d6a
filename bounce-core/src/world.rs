//! The world: every ball plus the box, advanced one frame at a time.
//!
//! ## Frame loop
//!
//! A frame is one unit of motion for every ball. It is split into sub-steps,
//! each ending at the earliest collision anywhere in the world:
//!
//! ```text
//! remaining = 1
//! loop:
//!     detect all pairs + all walls within `remaining`
//!     t_min = min(remaining, earliest t of any ball)
//!     commit every ball up to t_min      (colliding balls bounce)
//!     remaining -= t_min
//! while remaining > time_epsilon
//! ```
//!
//! A bounce can expose a second collision later in the same frame (a ball
//! leaves a wall straight into another ball); the next sub-step picks it up
//! at its true time instead of skipping it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::body::Ball;
use crate::collision::Contact;
use crate::config::{check_ball, ConfigError, LaunchConfig, ScenarioConfig, SimulationParams};
use crate::types::{BallId, Boundary, Color, Vec2};

/// Error type for world operations.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world is full ({max} balls)")]
    CapacityExceeded { max: usize },
    #[error("ball of radius {radius} does not fit in a {width}x{height} boundary")]
    BallDoesNotFit { radius: f64, width: f64, height: f64 },
    #[error("ball overlaps ball {}", .other.0)]
    Overlaps { other: BallId },
    #[error("invalid ball: {0}")]
    InvalidBall(String),
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Sub-steps the frame was split into
    pub substeps: usize,
    /// Ball-side impacts committed (a ball-ball hit counts once per ball)
    pub impacts: usize,
    /// Frame time left unconsumed, below `time_epsilon` unless capped
    pub time_left: f64,
    /// The sub-step cap cut the frame short
    pub capped: bool,
}

/// Read-only view of one ball for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: BallId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub color: Color,
}

/// Owned copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub boundary: Boundary,
    pub balls: Vec<BallView>,
}

/// Balls in a box.
#[derive(Debug, Clone)]
pub struct World {
    boundary: Boundary,
    balls: Vec<Ball>,
    params: SimulationParams,
    launcher: LaunchConfig,
    frames: u64,
}

impl World {
    /// Empty world.
    pub fn new(boundary: Boundary, params: SimulationParams) -> Result<Self, WorldError> {
        if !boundary.is_valid() {
            return Err(WorldError::InvalidBoundary(format!("{:?}", boundary)));
        }
        params.validate()?;
        Ok(Self {
            boundary,
            balls: Vec::new(),
            params,
            launcher: LaunchConfig::default(),
            frames: 0,
        })
    }

    /// World populated from a validated scenario.
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let mut world = Self::new(config.boundary, config.simulation)?;
        world.launcher = config.launcher;
        for ball in config.build_balls() {
            world.spawn(ball)?;
        }
        info!(
            name = %config.name,
            balls = world.balls.len(),
            "world created from scenario"
        );
        Ok(world)
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Frames stepped so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.balls.iter().map(Ball::kinetic_energy).sum()
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.balls
            .iter()
            .fold(Vec2::ZERO, |acc, ball| acc + ball.momentum())
    }

    /// Add a ball. It must fit inside the box, stay clear of every live ball
    /// (touching is allowed) and the world must have room.
    pub fn spawn(&mut self, ball: Ball) -> Result<BallId, WorldError> {
        if self.balls.len() >= self.params.max_balls {
            return Err(WorldError::CapacityExceeded {
                max: self.params.max_balls,
            });
        }
        if ball.radius() > 0.0 && !self.boundary.fits(ball.radius()) {
            return Err(Self::does_not_fit(&self.boundary, &ball));
        }
        check_ball(&self.boundary, &ball).map_err(WorldError::InvalidBall)?;
        if let Some(other) = self.balls.iter().position(|b| overlaps(b, &ball)) {
            return Err(WorldError::Overlaps {
                other: BallId(other),
            });
        }

        let id = BallId(self.balls.len());
        self.balls.push(ball);
        info!(id = id.0, ball = %ball, "spawned ball");
        Ok(id)
    }

    /// Fire a ball from the configured launcher.
    pub fn launch(&mut self) -> Result<BallId, WorldError> {
        let ball = self.launcher.ball_in(&self.boundary);
        self.spawn(ball)
    }

    pub fn set_launcher(&mut self, launcher: LaunchConfig) {
        self.launcher = launcher;
    }

    /// Replace the box between frames.
    ///
    /// Balls left outside the new legal region are pulled back inside.
    /// Rejected if any ball would no longer fit.
    pub fn resize(&mut self, boundary: Boundary) -> Result<(), WorldError> {
        if !boundary.is_valid() {
            return Err(WorldError::InvalidBoundary(format!("{:?}", boundary)));
        }
        if let Some(ball) = self.balls.iter().find(|b| !boundary.fits(b.radius())) {
            return Err(Self::does_not_fit(&boundary, ball));
        }

        self.boundary = boundary;
        let moved = self
            .balls
            .iter_mut()
            .map(|ball| ball.confine(&boundary))
            .filter(|&moved| moved)
            .count();
        info!(
            width = boundary.width(),
            height = boundary.height(),
            moved,
            "resized boundary"
        );
        Ok(())
    }

    /// Owned copy of the current state for renderers.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            boundary: self.boundary,
            balls: self
                .balls
                .iter()
                .enumerate()
                .map(|(i, ball)| BallView {
                    id: BallId(i),
                    position: ball.position(),
                    velocity: ball.velocity(),
                    radius: ball.radius(),
                    color: ball.color(),
                })
                .collect(),
        }
    }

    /// Advance every ball by one frame, resolving collisions in time order.
    pub fn step(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        let mut remaining = 1.0;

        loop {
            if report.substeps == self.params.max_substeps {
                report.capped = true;
                warn!(
                    frame = self.frames,
                    remaining,
                    substeps = report.substeps,
                    "sub-step cap reached, frame cut short"
                );
                break;
            }
            report.substeps += 1;

            let t_min = self.detect(remaining);
            report.impacts += self.commit(t_min);
            remaining -= t_min;

            if remaining <= self.params.time_epsilon {
                break;
            }
        }

        report.time_left = remaining;
        self.frames += 1;
        debug!(
            frame = self.frames,
            substeps = report.substeps,
            impacts = report.impacts,
            "frame complete"
        );
        report
    }

    /// Run `frames` frames and sum their reports.
    pub fn step_n(&mut self, frames: usize) -> FrameReport {
        let mut total = FrameReport::default();
        for _ in 0..frames {
            let report = self.step();
            total.substeps += report.substeps;
            total.impacts += report.impacts;
            total.time_left = report.time_left;
            total.capped |= report.capped;
        }
        total
    }

    fn does_not_fit(boundary: &Boundary, ball: &Ball) -> WorldError {
        WorldError::BallDoesNotFit {
            radius: ball.radius(),
            width: boundary.width(),
            height: boundary.height(),
        }
    }

    /// Fill every ball's earliest-collision record and return the sub-step length.
    fn detect(&mut self, remaining: f64) -> f64 {
        for i in 0..self.balls.len() {
            let (head, tail) = self.balls.split_at_mut(i + 1);
            let ball = &mut head[i];
            for (j, other) in tail.iter_mut().enumerate() {
                ball.detect_against_partner(BallId(i), other, BallId(i + 1 + j), remaining);
            }
        }

        let boundary = self.boundary;
        let mut t_min = remaining;
        for ball in &mut self.balls {
            ball.detect_against_boundary_within(&boundary, remaining);
            t_min = t_min.min(ball.earliest_collision().t);
        }
        t_min
    }

    /// Whether ball `i` may apply its recorded impact.
    ///
    /// A ball can be one side of several pair impacts at the same instant but
    /// keeps only one. A partner whose pick was not returned must not bounce.
    fn partner_agrees(&self, i: usize) -> bool {
        match self.balls[i].earliest_collision().contact {
            Contact::Body {
                partner: Some(partner),
            } => matches!(
                self.balls.get(partner.0).map(|b| b.earliest_collision().contact),
                Some(Contact::Body { partner: Some(back) }) if back == BallId(i)
            ),
            _ => true,
        }
    }

    fn commit(&mut self, t_min: f64) -> usize {
        let deferred: Vec<usize> = (0..self.balls.len())
            .filter(|&i| !self.partner_agrees(i))
            .collect();
        for &i in &deferred {
            // Redetected next sub-step, where the pair is in contact
            trace!(id = i, t = t_min, "impact deferred, partner took another");
            self.balls[i].forget_collision();
        }

        let mut impacts = 0;
        for (i, ball) in self.balls.iter_mut().enumerate() {
            match ball.commit(t_min) {
                Contact::None => {}
                contact => {
                    impacts += 1;
                    trace!(id = i, t = t_min, ?contact, "impact");
                }
            }
        }
        impacts
    }
}

/// Centers closer than the combined radius.
fn overlaps(a: &Ball, b: &Ball) -> bool {
    let reach = a.radius() + b.radius();
    (b.position() - a.position()).magnitude_squared() < reach * reach
}

// =============================================================================
// Tests
// =============================================================================
