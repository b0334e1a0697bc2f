//! Stepper motion
//!
//! Speed- and acceleration-limited step generation, limit-switch homing,
//! and the two machine-level axes built on top of it: the XY gantry in
//! millimetres and the hour arm in degrees.

pub mod gantry;
pub mod homing;
pub mod hour_axis;
pub mod stepper;

#[cfg(test)]
pub(crate) mod sim;

pub use gantry::Gantry;
pub use homing::{HomingDirection, HomingPhase, HomingPoll, HomingProcedure};
pub use hour_axis::HourAxis;
pub use stepper::StepperAxis;
