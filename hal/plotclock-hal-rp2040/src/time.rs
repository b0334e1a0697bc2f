//! Microsecond clock and blocking delay backed by the embassy time driver

use embassy_time::{block_for, Duration, Instant};
use plotclock_hal::{DelayUs, MicrosClock};

/// Free-running microsecond counter
///
/// Truncates the 64-bit embassy tick count, so it wraps like the counter
/// the core expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpClock;

impl MicrosClock for RpClock {
    fn now_micros(&self) -> u32 {
        Instant::now().as_micros() as u32
    }
}

/// Busy-wait delay
#[derive(Debug, Clone, Copy, Default)]
pub struct RpDelay;

impl DelayUs for RpDelay {
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}
