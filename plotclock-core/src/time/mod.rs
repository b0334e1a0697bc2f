//! Wall-clock time keeping
//!
//! The RTC only has whole-second resolution and is slow to read over I2C,
//! so the control loop keeps time itself from the microsecond clock
//! ([`ClockTracker`]) and only consults the RTC once a minute
//! ([`TimeSync`]) to correct drift.

pub mod sync;
pub mod tracker;
pub mod wall_clock;

pub use sync::{TimeSync, TimeSyncError};
pub use tracker::ClockTracker;
pub use wall_clock::WallClockTime;

/// Microseconds in one second
pub const MICROS_PER_SECOND: u32 = 1_000_000;

/// Microseconds in one minute
pub const MICROS_PER_MINUTE: u32 = 60 * MICROS_PER_SECOND;
