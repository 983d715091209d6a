//! Collision detection and response for balls in a box.
//!
//! This module handles:
//! - **Response**: the time-of-impact record each ball keeps per sub-step
//! - **Detection**: finding when collisions occur (swept points)
//! - **Resolution**: computing elastic post-collision velocities
//!
//! ## Swept Point Algorithm
//!
//! Instead of moving balls and then checking for overlap (which misses fast
//! balls and simultaneous hits), we solve for the first instant inside the
//! sub-step at which a ball's center reaches a wall of its inset rectangle,
//! or at which two centers are exactly `r1 + r2` apart.
//!
//! ```text
//!  t=0                    t=1
//!   ●───────────────▶ ╎   ○       without sweeping: ends past the wall
//!   ●──────────▶◉ ╎               swept: stops at t_hit, reflects
//!               ◀─────○           and spends 1 - t_hit moving back
//!                 ╎
//!              inset wall
//! ```

pub mod detection;
pub mod resolution;
pub mod response;

pub use detection::*;
pub use resolution::*;
pub use response::*;
