//! Hardware abstraction traits
//!
//! These traits define the interface between the clock logic and the
//! hardware-specific implementations.

pub mod stepper;
pub mod time_source;

pub use stepper::{AxisPins, Direction, StepperPins, SwitchState};
pub use time_source::TimeSource;
