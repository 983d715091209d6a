//! Scenario configuration loader.
//!
//! Loads worlds from YAML files so scenes can be tweaked without
//! recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! scenarios/
//! ├── ball_world.yaml
//! ├── head_on.yaml
//! └── wall_bounce.yaml
//! ```
//!
//! ## Format
//!
//! ```yaml
//! name: "two balls"
//! boundary: { min_x: 0, min_y: 0, max_x: 640, max_y: 480 }
//! simulation:            # optional, defaults shown
//!   time_epsilon: 0.01
//!   max_substeps: 1000
//!   max_balls: 25
//! launcher:              # optional, defaults shown
//!   offset: 20
//!   radius: 15
//!   speed: 5
//!   angle: 45
//!   color: [0, 0, 0]
//! balls:
//!   - { x: 100, y: 410, radius: 25, speed: 3, angle: 34, color: [255, 255, 0] }
//! ```
//!
//! Balls may touch but not overlap. A missing `color` is blue.
//!
//! Angles are degrees counter-clockwise with the screen y axis pointing down.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::body::Ball;
use crate::types::{constants, Boundary, Color, Vec2};

/// Error type for scenario loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario not found: {0}")]
    NotFound(String),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Tuning knobs for the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Remaining frame time below which a frame is finished
    pub time_epsilon: f64,
    /// Sub-steps allowed per frame before the frame is cut short
    pub max_substeps: usize,
    /// Capacity of the world
    pub max_balls: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            time_epsilon: constants::EPSILON_TIME,
            max_substeps: constants::MAX_SUBSTEPS,
            max_balls: constants::MAX_BALLS,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.time_epsilon > 0.0 && self.time_epsilon < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "time_epsilon must be in (0, 1), got {}",
                self.time_epsilon
            )));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1".into()));
        }
        Ok(())
    }
}

/// Template for balls spawned by [`crate::world::World::launch`].
///
/// Launched balls appear `offset` in from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub offset: f64,
    pub radius: f64,
    pub speed: f64,
    pub angle: f64,
    pub color: Color,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            offset: 20.0,
            radius: 15.0,
            speed: 5.0,
            angle: 45.0,
            color: Color::BLACK,
        }
    }
}

impl LaunchConfig {
    /// The ball this launcher fires inside `boundary`.
    pub fn ball_in(&self, boundary: &Boundary) -> Ball {
        Ball::from_polar(
            boundary.min_x + self.offset,
            boundary.max_y - self.offset,
            self.radius,
            self.speed,
            self.angle,
        )
        .with_color(self.color)
    }
}

/// Initial state of one ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub color: Color,
}

impl BallConfig {
    pub const fn new(x: f64, y: f64, radius: f64, speed: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            radius,
            speed,
            angle,
            color: Color::BLUE,
        }
    }

    pub const fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn to_ball(&self) -> Ball {
        Ball::from_polar(self.x, self.y, self.radius, self.speed, self.angle).with_color(self.color)
    }
}

/// A complete world description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub boundary: Boundary,
    #[serde(default)]
    pub simulation: SimulationParams,
    #[serde(default)]
    pub launcher: LaunchConfig,
    #[serde(default)]
    pub balls: Vec<BallConfig>,
}

impl ScenarioConfig {
    /// The built-in demo scene: eleven balls of mixed sizes in a window.
    pub fn ball_world(width: f64, height: f64) -> Self {
        Self {
            name: "A World of Balls".to_string(),
            boundary: Boundary::from_size(width, height),
            simulation: SimulationParams::default(),
            launcher: LaunchConfig::default(),
            balls: vec![
                BallConfig::new(100.0, 410.0, 25.0, 3.0, 34.0).with_color(Color::YELLOW),
                BallConfig::new(80.0, 350.0, 25.0, 2.0, -114.0).with_color(Color::YELLOW),
                BallConfig::new(530.0, 400.0, 30.0, 3.0, 14.0).with_color(Color::GREEN),
                BallConfig::new(400.0, 400.0, 30.0, 3.0, 14.0).with_color(Color::GREEN),
                BallConfig::new(400.0, 50.0, 35.0, 1.0, -47.0).with_color(Color::PINK),
                BallConfig::new(480.0, 320.0, 35.0, 4.0, 47.0).with_color(Color::PINK),
                BallConfig::new(80.0, 150.0, 40.0, 1.0, -114.0).with_color(Color::ORANGE),
                BallConfig::new(100.0, 240.0, 40.0, 2.0, 60.0).with_color(Color::ORANGE),
                BallConfig::new(250.0, 400.0, 50.0, 3.0, -42.0).with_color(Color::BLUE),
                BallConfig::new(200.0, 80.0, 70.0, 6.0, -84.0).with_color(Color::CYAN),
                BallConfig::new(500.0, 170.0, 90.0, 6.0, -42.0).with_color(Color::MAGENTA),
            ],
        }
    }

    /// Parse and validate a scenario from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let scenario: ScenarioConfig = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject scenes the frame loop cannot run meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.boundary.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "boundary must have max > min on both axes, got {:?}",
                self.boundary
            )));
        }
        self.simulation.validate()?;

        if self.balls.len() > self.simulation.max_balls {
            return Err(ConfigError::Invalid(format!(
                "{} balls exceed max_balls = {}",
                self.balls.len(),
                self.simulation.max_balls
            )));
        }
        for (i, ball) in self.balls.iter().enumerate() {
            check_ball(&self.boundary, &ball.to_ball())
                .map_err(|reason| ConfigError::Invalid(format!("ball {}: {}", i, reason)))?;
        }
        let balls = self.build_balls();
        for (i, a) in balls.iter().enumerate() {
            for (j, b) in balls.iter().enumerate().skip(i + 1) {
                let reach = a.radius() + b.radius();
                if (b.position() - a.position()).magnitude_squared() < reach * reach {
                    return Err(ConfigError::Invalid(format!("balls {} and {} overlap", i, j)));
                }
            }
        }
        check_ball(&self.boundary, &self.launcher.ball_in(&self.boundary))
            .map_err(|reason| ConfigError::Invalid(format!("launcher: {}", reason)))?;
        Ok(())
    }

    pub fn build_balls(&self) -> Vec<Ball> {
        self.balls.iter().map(BallConfig::to_ball).collect()
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::ball_world(1280.0, 800.0)
    }
}

/// Checks a ball against a boundary, returning the reason it is unusable.
pub(crate) fn check_ball(boundary: &Boundary, ball: &Ball) -> Result<(), String> {
    let radius = ball.radius();
    if !(radius.is_finite() && radius > 0.0) {
        return Err(format!("radius must be positive, got {}", radius));
    }
    if !ball.position().is_finite() || !ball.velocity().is_finite() {
        return Err("position and velocity must be finite".to_string());
    }
    if !boundary.fits(radius) {
        return Err(format!(
            "radius {} does not fit in a {}x{} boundary",
            radius,
            boundary.width(),
            boundary.height()
        ));
    }
    if !boundary.inset(radius).contains(ball.position()) {
        let Vec2 { x, y } = ball.position();
        return Err(format!("center ({}, {}) lies outside the boundary", x, y));
    }
    Ok(())
}

/// Scenario loader with configurable base directory.
pub struct ScenarioLoader {
    base_path: PathBuf,
}

impl ScenarioLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a scenario by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ScenarioLoader::new("scenarios");
    /// let scene = loader.load("ball_world")?;
    /// ```
    pub fn load(&self, name: &str) -> Result<ScenarioConfig, ConfigError> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        Self::load_path(&path)
    }

    /// Load a scenario from an explicit file path.
    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let scenario = ScenarioConfig::from_yaml_str(&contents)?;
        info!(
            path = %path.display(),
            name = %scenario.name,
            balls = scenario.balls.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    /// List all available scenarios.
    pub fn list(&self) -> Result<Vec<String>, ConfigError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn get_scenarios_path() -> PathBuf {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(manifest_dir).join("..").join("scenarios")
    }

    #[test]
    fn test_ball_world_is_valid() {
        let scene = ScenarioConfig::ball_world(1280.0, 800.0);
        assert!(scene.validate().is_ok(), "{:?}", scene.validate().err());
        assert_eq!(scene.build_balls().len(), 11);
    }

    #[test]
    fn test_load_existing_scenario() {
        let loader = ScenarioLoader::new(get_scenarios_path());
        let result = loader.load("ball_world");

        assert!(result.is_ok(), "Should load ball_world: {:?}", result.err());
        let scene = result.unwrap();
        assert_eq!(scene.balls.len(), 11);
        assert_eq!(scene.boundary, Boundary::from_size(1280.0, 800.0));
    }

    #[test]
    fn test_checked_in_ball_world_matches_builtin() {
        let loader = ScenarioLoader::new(get_scenarios_path());
        let scene = loader.load("ball_world").unwrap();
        assert_eq!(scene.balls, ScenarioConfig::ball_world(1280.0, 800.0).balls);
    }

    #[test]
    fn test_load_nonexistent_scenario() {
        let loader = ScenarioLoader::new(get_scenarios_path());
        let result = loader.load("nonexistent_scenario_xyz");

        match result {
            Err(ConfigError::NotFound(name)) => {
                assert_eq!(name, "nonexistent_scenario_xyz");
            }
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_scenarios() {
        let loader = ScenarioLoader::new(get_scenarios_path());
        let names = loader.list().unwrap();
        assert!(names.contains(&"ball_world".to_string()));
        assert!(names.contains(&"head_on".to_string()));
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let scene = ScenarioConfig::from_yaml_str(
            "boundary: { min_x: 0, min_y: 0, max_x: 100, max_y: 100 }\n\
             balls:\n  - { x: 50, y: 50, radius: 5 }\n",
        )
        .unwrap();
        assert_eq!(scene.simulation, SimulationParams::default());
        assert_eq!(scene.launcher, LaunchConfig::default());
        assert_eq!(scene.balls[0].speed, 0.0);
    }

    #[test]
    fn test_rejects_ball_larger_than_box() {
        let err = ScenarioConfig::from_yaml_str(
            "boundary: { min_x: 0, min_y: 0, max_x: 100, max_y: 40 }\n\
             balls:\n  - { x: 50, y: 20, radius: 25 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {:?}", err);
    }

    #[test]
    fn test_rejects_inverted_boundary() {
        let err = ScenarioConfig::from_yaml_str(
            "boundary: { min_x: 100, min_y: 0, max_x: 0, max_y: 100 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_ball_outside_box() {
        let mut scene = ScenarioConfig::ball_world(1280.0, 800.0);
        scene.balls.push(BallConfig::new(5.0, 5.0, 10.0, 0.0, 0.0));
        assert!(matches!(scene.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_overlapping_balls() {
        let err = ScenarioConfig::from_yaml_str(
            "boundary: { min_x: 0, min_y: 0, max_x: 200, max_y: 200 }\n\
             balls:\n  - { x: 50, y: 50, radius: 20 }\n  - { x: 80, y: 50, radius: 20 }\n",
        )
        .unwrap_err();
        match err {
            ConfigError::Invalid(reason) => assert!(reason.contains("overlap"), "got {}", reason),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_colors_parse_and_default() {
        let scene = ScenarioConfig::from_yaml_str(
            "boundary: { min_x: 0, min_y: 0, max_x: 200, max_y: 200 }\n\
             balls:\n  - { x: 50, y: 50, radius: 20, color: [255, 0, 255] }\n  - { x: 150, y: 50, radius: 20 }\n",
        )
        .unwrap();
        let balls = scene.build_balls();
        assert_eq!(balls[0].color(), Color::MAGENTA);
        assert_eq!(balls[1].color(), Color::BLUE);
        assert_eq!(scene.launcher.ball_in(&scene.boundary).color(), Color::BLACK);
    }

    #[test]
    fn test_rejects_too_many_balls() {
        let mut scene = ScenarioConfig::ball_world(1280.0, 800.0);
        scene.simulation.max_balls = 4;
        assert!(matches!(scene.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = ScenarioConfig::from_yaml_str("balls: [ { x: oops } ]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_yaml_roundtrip_of_builtin() {
        let scene = ScenarioConfig::ball_world(640.0, 480.0);
        let text = scene.to_yaml_string().unwrap();
        assert_eq!(ScenarioConfig::from_yaml_str(&text).unwrap(), scene);
    }
}
