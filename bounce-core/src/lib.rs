//! # Bounce Core
//!
//! Event-ordered 2D simulation of elastic balls inside a rectangular box.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, Boundary, constants)
//! - `collision`: Swept detection, response records and elastic resolution
//! - `body`: The ball and its per-sub-step earliest collision
//! - `world`: Frame loop, spawning, resizing and snapshots
//! - `config`: YAML-based scenario loader
//!
//! ```
//! use bounce_core::{Ball, Boundary, SimulationParams, Vec2, World};
//!
//! let mut world = World::new(Boundary::from_size(100.0, 100.0), SimulationParams::default())?;
//! world.spawn(Ball::new(Vec2::new(10.0, 10.0), Vec2::new(-3.0, 0.0), 5.0))?;
//! world.step();
//! assert_eq!(world.balls()[0].position(), Vec2::new(7.0, 10.0));
//! # Ok::<(), bounce_core::WorldError>(())
//! ```

pub mod body;
pub mod collision;
pub mod config;
pub mod types;
pub mod world;

pub use body::Ball;
pub use config::{BallConfig, ConfigError, LaunchConfig, ScenarioConfig, ScenarioLoader, SimulationParams};
pub use types::{BallId, Boundary, Color, Vec2};
pub use world::{BallView, FrameReport, World, WorldError, WorldSnapshot};
