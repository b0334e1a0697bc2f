//! Board-agnostic core logic for the pen-plotting clock
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (stepper pin bundle, time source)
//! - Kinematic-limited stepper control and limit-switch homing
//! - Gantry (millimetres) and hour arm (degrees) axis composition
//! - Path generators mapping elapsed time to target coordinates
//! - Wall-clock time keeping and RTC resynchronisation
//! - Debounced buttons for manual time adjustment
//! - Configuration types and the configuration text parser
//! - The per-tick control loop

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod control;
pub mod motion;
pub mod path;
pub mod time;
pub mod traits;
pub mod ui;

pub use control::{PlotClock, TickStatus};
