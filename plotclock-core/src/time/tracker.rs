//! Free-running time of day anchored to the microsecond clock

use super::{WallClockTime, MICROS_PER_MINUTE, MICROS_PER_SECOND};

/// Drift tolerated before an RTC reading re-anchors the tracker
const SYNC_TOLERANCE_S: i32 = 1;

/// Current time of day plus the timestamp at which the current minute began
///
/// All timestamp arithmetic wraps, so the tracker survives the `u32`
/// microsecond counter rolling over (every ~71.6 minutes) as long as
/// [`advance`](Self::advance) is called more often than that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTracker {
    time: WallClockTime,
    minute_start_us: u32,
}

impl ClockTracker {
    /// Start tracking from `time`, observed at `now_us`
    pub fn new(time: WallClockTime, now_us: u32) -> Self {
        let mut tracker = Self {
            time,
            minute_start_us: now_us,
        };
        tracker.set(time, now_us);
        tracker
    }

    /// Current time of day (as of the last [`advance`](Self::advance))
    pub fn time(&self) -> WallClockTime {
        self.time
    }

    /// Timestamp at which the current minute began
    pub fn minute_start_us(&self) -> u32 {
        self.minute_start_us
    }

    /// Microseconds since the current minute began
    pub fn elapsed_in_minute(&self, now_us: u32) -> u32 {
        now_us.wrapping_sub(self.minute_start_us)
    }

    /// Re-anchor on `time`, observed at `now_us`
    pub fn set(&mut self, time: WallClockTime, now_us: u32) {
        self.time = time;
        self.minute_start_us = now_us.wrapping_sub(time.second as u32 * MICROS_PER_SECOND);
    }

    /// Roll the time forward to `now_us`
    ///
    /// Returns `true` when at least one minute boundary was crossed.
    pub fn advance(&mut self, now_us: u32) -> bool {
        let mut elapsed = self.elapsed_in_minute(now_us);
        let mut rolled = false;

        while elapsed >= MICROS_PER_MINUTE {
            self.minute_start_us = self.minute_start_us.wrapping_add(MICROS_PER_MINUTE);
            self.time = self.time.start_of_minute().add_seconds(60);
            elapsed -= MICROS_PER_MINUTE;
            rolled = true;
        }

        self.time.second = (elapsed / MICROS_PER_SECOND) as u8;
        rolled
    }

    /// Correct drift against an external reading
    ///
    /// The reading has whole-second resolution, so it only re-anchors the
    /// tracker when the two disagree by more than a second; otherwise the
    /// sub-second phase of the current minute is kept. Returns `true` if
    /// the tracker was re-anchored.
    pub fn sync(&mut self, reading: WallClockTime, now_us: u32) -> bool {
        self.advance(now_us);
        let drift = reading.seconds_since(&self.time);
        if drift.abs() > SYNC_TOLERANCE_S {
            self.set(reading, now_us);
            true
        } else {
            false
        }
    }
}
