//! Python bindings for the bounce-core ball simulation.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from bounce_physics import World
//!
//! world = World.from_yaml("scenarios/ball_world.yaml")
//! world.launch()
//!
//! for _ in range(100):
//!     world.step()
//!     for x, y, r in world.ball_positions():
//!         draw_circle(x, y, r)
//! ```

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use tracing_subscriber::EnvFilter;

use bounce_core::{
    Ball, Boundary, Color, ConfigError, FrameReport, ScenarioConfig, ScenarioLoader, SimulationParams,
    Vec2 as CoreVec2, World as CoreWorld, WorldError,
};

fn to_py_err(err: WorldError) -> PyErr {
    match err {
        WorldError::Config(ConfigError::Io(e)) => PyIOError::new_err(e.to_string()),
        WorldError::Config(ConfigError::NotFound(name)) => {
            PyIOError::new_err(format!("scenario not found: {}", name))
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

/// 2D vector for positions and velocities.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec2 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
}

#[pymethods]
impl Vec2 {
    #[new]
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn __repr__(&self) -> String {
        format!("Vec2({:.4}, {:.4})", self.x, self.y)
    }

    fn magnitude(&self) -> f64 {
        CoreVec2::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<CoreVec2> for Vec2 {
    fn from(v: CoreVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2> for CoreVec2 {
    fn from(v: Vec2) -> Self {
        CoreVec2::new(v.x, v.y)
    }
}

/// Outcome of one or more frames.
#[pyclass(get_all)]
#[derive(Clone, Copy)]
pub struct StepReport {
    pub substeps: usize,
    pub impacts: usize,
    pub capped: bool,
}

#[pymethods]
impl StepReport {
    fn __repr__(&self) -> String {
        format!(
            "StepReport(substeps={}, impacts={}, capped={})",
            self.substeps, self.impacts, self.capped
        )
    }
}

impl From<FrameReport> for StepReport {
    fn from(report: FrameReport) -> Self {
        Self {
            substeps: report.substeps,
            impacts: report.impacts,
            capped: report.capped,
        }
    }
}

/// Balls bouncing in a box.
///
/// Handles frame stepping, spawning and resizing.
#[pyclass]
pub struct World {
    inner: CoreWorld,
}

#[pymethods]
impl World {
    /// Create an empty world of the given size with default settings.
    #[new]
    fn new(width: f64, height: f64) -> PyResult<Self> {
        let inner = CoreWorld::new(Boundary::from_size(width, height), SimulationParams::default())
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// The built-in eleven-ball scene.
    #[staticmethod]
    #[pyo3(signature = (width=1280.0, height=800.0))]
    fn ball_world(width: f64, height: f64) -> PyResult<Self> {
        let inner = CoreWorld::from_config(&ScenarioConfig::ball_world(width, height))
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Load a scene from a YAML scenario file.
    #[staticmethod]
    fn from_yaml(path: &str) -> PyResult<Self> {
        let config = ScenarioLoader::load_path(path)
            .map_err(|e| to_py_err(WorldError::Config(e)))?;
        let inner = CoreWorld::from_config(&config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Frames stepped so far.
    #[getter]
    fn frames(&self) -> u64 {
        self.inner.frames()
    }

    /// Box as (min_x, min_y, max_x, max_y).
    #[getter]
    fn boundary(&self) -> (f64, f64, f64, f64) {
        let b = self.inner.boundary();
        (b.min_x, b.min_y, b.max_x, b.max_y)
    }

    fn ball_count(&self) -> usize {
        self.inner.len()
    }

    /// Total kinetic energy, handy for checking a run stays elastic.
    fn kinetic_energy(&self) -> f64 {
        self.inner.total_kinetic_energy()
    }

    /// Advance one frame.
    fn step(&mut self) -> StepReport {
        self.inner.step().into()
    }

    /// Run multiple frames at once (more efficient).
    fn step_n(&mut self, frames: usize) -> StepReport {
        self.inner.step_n(frames).into()
    }

    /// Add a ball; returns its index.
    #[pyo3(signature = (x, y, radius, vx=0.0, vy=0.0, color=None))]
    fn spawn(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        vx: f64,
        vy: f64,
        color: Option<(u8, u8, u8)>,
    ) -> PyResult<usize> {
        let color = color.map_or_else(Color::default, |(r, g, b)| Color(r, g, b));
        let ball =
            Ball::new(CoreVec2::new(x, y), CoreVec2::new(vx, vy), radius).with_color(color);
        let id = self.inner.spawn(ball).map_err(to_py_err)?;
        Ok(id.0)
    }

    /// Add a ball from speed and angle (degrees, counter-clockwise, y down).
    fn spawn_polar(&mut self, x: f64, y: f64, radius: f64, speed: f64, angle: f64) -> PyResult<usize> {
        let ball = Ball::from_polar(x, y, radius, speed, angle);
        let id = self.inner.spawn(ball).map_err(to_py_err)?;
        Ok(id.0)
    }

    /// Fire a ball from the bottom-left launcher.
    fn launch(&mut self) -> PyResult<usize> {
        let id = self.inner.launch().map_err(to_py_err)?;
        Ok(id.0)
    }

    /// Resize the box, keeping the origin corner.
    fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
        let b = *self.inner.boundary();
        let boundary = Boundary::new(b.min_x, b.min_y, b.min_x + width, b.min_y + height);
        self.inner.resize(boundary).map_err(to_py_err)
    }

    /// Ball position as Vec2.
    fn ball_position(&self, index: usize) -> PyResult<Vec2> {
        self.ball(index).map(|b| b.position().into())
    }

    /// Ball velocity as Vec2.
    fn ball_velocity(&self, index: usize) -> PyResult<Vec2> {
        self.ball(index).map(|b| b.velocity().into())
    }

    /// (x, y, radius) of every ball, for drawing.
    fn ball_positions(&self) -> Vec<(f64, f64, f64)> {
        self.inner
            .balls()
            .iter()
            .map(|b| (b.position().x, b.position().y, b.radius()))
            .collect()
    }

    /// One-line description of a ball.
    fn describe(&self, index: usize) -> PyResult<String> {
        self.ball(index).map(|b| b.to_string())
    }

    /// Get current state as dict for easy inspection.
    fn snapshot_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let snapshot = self.inner.snapshot();
        let dict = PyDict::new_bound(py);
        dict.set_item("frames", self.inner.frames())?;
        let b = snapshot.boundary;
        dict.set_item("boundary", (b.min_x, b.min_y, b.max_x, b.max_y))?;

        let balls = PyList::empty_bound(py);
        for view in &snapshot.balls {
            let ball = PyDict::new_bound(py);
            ball.set_item("id", view.id.0)?;
            ball.set_item("x", view.position.x)?;
            ball.set_item("y", view.position.y)?;
            ball.set_item("vx", view.velocity.x)?;
            ball.set_item("vy", view.velocity.y)?;
            ball.set_item("radius", view.radius)?;
            let Color(r, g, b) = view.color;
            ball.set_item("color", (r, g, b))?;
            balls.append(ball)?;
        }
        dict.set_item("balls", balls)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        let b = self.inner.boundary();
        format!(
            "World({}x{}, balls={}, frames={})",
            b.width(),
            b.height(),
            self.inner.len(),
            self.inner.frames()
        )
    }
}

impl World {
    fn ball(&self, index: usize) -> PyResult<&Ball> {
        self.inner
            .balls()
            .get(index)
            .ok_or_else(|| PyValueError::new_err(format!("no ball at index {}", index)))
    }
}

/// Route engine logs to stderr, filtered by `level` (e.g. "info", "bounce_core=trace").
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn init_logging(level: &str) -> PyResult<()> {
    let filter = EnvFilter::try_new(level).map_err(|e| PyValueError::new_err(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Python module definition.
#[pymodule]
fn bounce_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec2>()?;
    m.add_class::<StepReport>()?;
    m.add_class::<World>()?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}
