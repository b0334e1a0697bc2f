//! Time-to-trajectory path generation
//!
//! Every generator here is a pure function of elapsed time: given the
//! microseconds since its logical index (minute, hour) last changed, it
//! returns the coordinate the axis should be chasing right now. Nothing is
//! stored between calls except configuration, so evaluating the same
//! instant twice always gives the same target.
//!
//! # Coordinates
//!
//! The gantry works in millimetres with `+y` pointing down the board; the
//! hour arm works in degrees from its homed position.

pub mod hour;
pub mod line;
pub mod minutes;
pub mod point;
pub mod polyline;
pub mod square;

pub use hour::{HourPosMapper, SweepPlan};
pub use line::LinePath;
pub use minutes::MinutesPathMapper;
pub use point::Point;
pub use polyline::{Polyline, MAX_WAYPOINTS};
pub use square::SquarePath;

/// A mapping from elapsed time to a planar position
pub trait Path {
    /// Position at `elapsed_us` microseconds into the path
    fn position(&self, elapsed_us: u32) -> Point;
}
