//! Hour-arm angle from wall-clock time
//!
//! Twelve hours are spread over a thirteen-unit scale: the scale starts at
//! [`HourScaleConfig::start_hour`] and one display slot is left empty so the
//! marks line up with the board artwork. Within an hour the arm creeps
//! forward with the minutes and seconds.
//!
//! At the start of selected minutes the arm performs a sweep: from where it
//! rested at the end of the previous minute it swings to the bottom of the
//! scale, up to the top, back down, and finally settles on the angle it
//! would have reached by the end of the sweep window anyway.

use crate::config::{ClockConfig, HourScaleConfig, SweepConfig, HOUR_POSITIONS};
use crate::time::{WallClockTime, MICROS_PER_MINUTE, MICROS_PER_SECOND};

/// Maps wall-clock time to an arm angle in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HourPosMapper {
    scale: HourScaleConfig,
    sweep: SweepConfig,
}

/// Precomputed four-phase sweep
///
/// `waypoints` are the angles at the phase boundaries: start, scale
/// minimum, scale maximum, scale minimum, resting angle. The window is
/// split between the phases in proportion to their travel, so the arm
/// moves at one constant angular speed for the whole sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepPlan {
    pub waypoints: [f32; 5],
    pub window_us: u32,
}

impl SweepPlan {
    /// Total angular travel in degrees
    pub fn travel(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|w| libm::fabsf(w[1] - w[0]))
            .sum()
    }

    /// Elapsed time at which each phase ends
    pub fn phase_ends_us(&self) -> [u32; 4] {
        let total = self.travel();
        let mut ends = [self.window_us; 4];
        if total <= 0.0 {
            return ends;
        }

        let mut covered = 0.0;
        for (i, w) in self.waypoints.windows(2).enumerate().take(3) {
            covered += libm::fabsf(w[1] - w[0]);
            ends[i] = (self.window_us as f32 * covered / total) as u32;
        }
        ends
    }

    /// Arm angle `elapsed_us` into the sweep
    pub fn angle_at(&self, elapsed_us: u32) -> f32 {
        let last = self.waypoints[4];
        if elapsed_us >= self.window_us {
            return last;
        }

        let total = self.travel();
        if total <= 0.0 {
            return last;
        }

        let mut remaining = total * elapsed_us as f32 / self.window_us as f32;
        for w in self.waypoints.windows(2) {
            let len = libm::fabsf(w[1] - w[0]);
            if remaining <= len && len > 0.0 {
                return w[0] + (w[1] - w[0]) * remaining / len;
            }
            remaining -= len;
        }
        last
    }
}

impl HourPosMapper {
    /// Create a new mapper
    pub const fn new(scale: HourScaleConfig, sweep: SweepConfig) -> Self {
        Self { scale, sweep }
    }

    /// Create a mapper from the clock configuration
    pub fn from_config(config: &ClockConfig) -> Self {
        Self::new(config.hour_scale, config.sweep)
    }

    /// Display slot for a 0-23 hour
    ///
    /// Slots at or past the skipped slot move up by one, so the result is
    /// in `0..=12` and never equals the skipped slot.
    pub fn display_slot(&self, hour: u8) -> u8 {
        let positions = HOUR_POSITIONS;
        let base = (hour % positions + positions - self.scale.start_hour % positions) % positions;
        if base >= self.scale.skipped_slot {
            base + 1
        } else {
            base
        }
    }

    /// Bottom of the scale (slot 0, on the hour)
    pub fn scale_min(&self) -> f32 {
        self.scale.offset_deg
    }

    /// Top of the scale (end of the last slot)
    pub fn scale_max(&self) -> f32 {
        self.scale.offset_deg + (HOUR_POSITIONS + 1) as f32 * self.scale.deg_per_hour
    }

    fn angle(&self, hour: u8, minute: u8, elapsed_us: u32) -> f32 {
        let dph = self.scale.deg_per_hour;
        let seconds = elapsed_us.min(MICROS_PER_MINUTE) as f32 / MICROS_PER_SECOND as f32;

        self.display_slot(hour) as f32 * dph
            + minute as f32 * dph / 60.0
            + seconds * dph / 3600.0
            + self.scale.offset_deg
    }

    /// Angle the arm rests at `elapsed_us` into the given minute
    pub fn resting_angle(&self, time: &WallClockTime, elapsed_us: u32) -> f32 {
        self.angle(time.hour, time.minute, elapsed_us)
    }

    /// Check whether the arm is sweeping at this instant
    pub fn is_sweeping(&self, time: &WallClockTime, elapsed_us: u32) -> bool {
        self.sweep.sweeps_at(time.minute) && elapsed_us < self.sweep.window_us
    }

    /// Sweep for the minute in `time`
    ///
    /// Starts from the final resting angle of the previous minute and ends
    /// on the resting angle at the end of the window.
    pub fn sweep_plan(&self, time: &WallClockTime) -> SweepPlan {
        let (prev_hour, prev_minute) = if time.minute == 0 {
            ((time.hour + 23) % 24, 59)
        } else {
            (time.hour, time.minute - 1)
        };

        let start = self.angle(prev_hour, prev_minute, MICROS_PER_MINUTE);
        let end = self.angle(time.hour, time.minute, self.sweep.window_us);
        let (min, max) = (self.scale_min(), self.scale_max());

        SweepPlan {
            waypoints: [start, min, max, min, end],
            window_us: self.sweep.window_us,
        }
    }

    /// Arm angle in degrees `elapsed_us` into the minute in `time`
    pub fn position(&self, time: &WallClockTime, elapsed_us: u32) -> f32 {
        if self.is_sweeping(time, elapsed_us) {
            self.sweep_plan(time).angle_at(elapsed_us)
        } else {
            self.resting_angle(time, elapsed_us)
        }
    }
}

impl Default for HourPosMapper {
    fn default() -> Self {
        Self::new(HourScaleConfig::default(), SweepConfig::default())
    }
}
