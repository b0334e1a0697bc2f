//! RP2040-specific HAL for the plotting clock firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `plotclock-hal` traits, plus RP2040-specific functionality:
//!
//! - GPIO wrappers with configurable inversion
//! - Dynamic pin allocation for config-driven setup
//! - Step/dir/limit pin bundles with a minimum step pulse width
//! - Microsecond clock and blocking delay on top of `embassy-time`
//! - I2C bus adapter for any `embedded-hal` blocking I2C master

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod pins;
pub mod stepper;
pub mod time;

pub use gpio::{RpInput, RpOutput};
pub use i2c::I2cAdapter;
pub use pins::{PinBank, PinError, RemainingPeripherals};
pub use stepper::RpStepperPins;
pub use time::{RpClock, RpDelay};
