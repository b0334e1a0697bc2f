//! Wall-clock time source trait
//!
//! Implemented by the battery-backed RTC driver. The core reads it at boot,
//! resynchronises from it periodically and writes manual adjustments back.

use crate::time::WallClockTime;

/// Battery-backed source of wall-clock time
pub trait TimeSource {
    /// Error type for bus/device failures
    type Error;

    /// Read the current time
    fn read_time(&mut self) -> Result<WallClockTime, Self::Error>;

    /// Overwrite the current time
    fn set_time(&mut self, time: &WallClockTime) -> Result<(), Self::Error>;
}
