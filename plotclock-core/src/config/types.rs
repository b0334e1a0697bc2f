//! Clock layout and animation configuration
//!
//! Everything the path generators need: where the minute grid sits on the
//! board, how each minute glyph is drawn, how long the stitched transitions
//! take, and how the hour scale is laid out.

use crate::path::Point;

use super::hardware::{AxisConfig, ButtonConfig, RtcConfig};

/// Grid columns (minutes per row)
pub const GRID_COLUMNS: u8 = 10;

/// Grid rows
pub const GRID_ROWS: u8 = 6;

/// Hour positions on the dial
pub const HOUR_POSITIONS: u8 = 12;

/// Minute grid placement on the board
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridConfig {
    /// Centre of the cell for minute 1
    pub origin: Point,
    /// Distance between neighbouring columns (mm, along x)
    pub column_pitch: f32,
    /// Distance between neighbouring rows (mm, along y)
    pub row_pitch: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            origin: Point::new(30.0, 30.0),
            column_pitch: 30.0,
            row_pitch: 35.0,
        }
    }
}

/// Per-minute glyph (a rectangle traced around the cell centre)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SquareConfig {
    /// Rectangle width in mm
    pub width: f32,
    /// Rectangle height in mm
    pub height: f32,
    /// Time for one full loop
    pub period_us: u32,
}

impl Default for SquareConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            // Four loops per minute, ending where the next one starts
            period_us: 15_000_000,
        }
    }
}

/// Durations of the stitched transitions between minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransitionConfig {
    /// End of a row to the start of the next row
    pub carriage_return_us: u32,
    /// Minute 60 back to minute 1
    pub zigzag_return_us: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            carriage_return_us: 3_000_000,
            zigzag_return_us: 8_000_000,
        }
    }
}

/// Hour scale layout
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HourScaleConfig {
    /// Hour shown at the start of the scale (0-11)
    pub start_hour: u8,
    /// Display slot left empty; slots from here on shift up by one
    pub skipped_slot: u8,
    /// Angle between neighbouring hour marks
    pub deg_per_hour: f32,
    /// Angle of slot 0 relative to the homed position
    pub offset_deg: f32,
}

impl Default for HourScaleConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            skipped_slot: 6,
            deg_per_hour: 12.0,
            offset_deg: 12.0,
        }
    }
}

/// Hour-arm sweep animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepConfig {
    /// Length of the animation at the start of a sweep minute
    pub window_us: u32,
    /// Bit `n` set = sweep at the start of minute `n`
    pub minutes: u64,
}

impl SweepConfig {
    /// Check whether minute `minute` starts with a sweep
    pub fn sweeps_at(&self, minute: u8) -> bool {
        minute < 60 && self.minutes & (1u64 << minute) != 0
    }

    /// Enable the sweep for `minute`
    pub fn enable_minute(&mut self, minute: u8) {
        if minute < 60 {
            self.minutes |= 1u64 << minute;
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            window_us: 6_000_000,
            // On the hour
            minutes: 1,
        }
    }
}

/// Semantic configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A path period or transition duration is zero
    NonPositivePeriod,
    /// A kinematic limit or steps-per-unit is zero or negative
    NonPositiveLimit,
    /// Grid pitch or glyph size is not positive, or glyphs overlap
    InvalidGrid,
    /// Hour scale start or skipped slot out of range
    InvalidHourScale,
    /// Sweep window does not fit in one minute
    SweepTooLong,
}

/// Complete clock configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Gantry X axis
    pub x: AxisConfig,
    /// Gantry Y axis
    pub y: AxisConfig,
    /// Hour arm
    pub hour: AxisConfig,
    /// Minute grid
    pub grid: GridConfig,
    /// Minute glyph
    pub square: SquareConfig,
    /// Row/cycle transitions
    pub transitions: TransitionConfig,
    /// Hour scale
    pub hour_scale: HourScaleConfig,
    /// Hour sweep
    pub sweep: SweepConfig,
    /// Time-setting buttons
    pub buttons: ButtonConfig,
    /// Real-time clock
    pub rtc: RtcConfig,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            x: AxisConfig::gantry_x(),
            y: AxisConfig::gantry_y(),
            hour: AxisConfig::hour(),
            grid: GridConfig::default(),
            square: SquareConfig::default(),
            transitions: TransitionConfig::default(),
            hour_scale: HourScaleConfig::default(),
            sweep: SweepConfig::default(),
            buttons: ButtonConfig::default(),
            rtc: RtcConfig::default(),
        }
    }
}

impl ClockConfig {
    /// Create the reference-rig configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the preconditions the motion and path code relies on
    ///
    /// Periods are divisors and limits are square-rooted or inverted
    /// downstream, so they are checked once here instead of on every tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in [&self.x, &self.y, &self.hour] {
            if !(axis.limits.max_speed > 0.0
                && axis.limits.max_accel > 0.0
                && axis.steps_per_unit > 0.0)
            {
                return Err(ConfigError::NonPositiveLimit);
            }
        }

        if self.square.period_us == 0
            || self.transitions.carriage_return_us == 0
            || self.transitions.zigzag_return_us == 0
            || self.sweep.window_us == 0
        {
            return Err(ConfigError::NonPositivePeriod);
        }

        if !(self.grid.column_pitch > 0.0
            && self.grid.row_pitch > 0.0
            && self.square.width > 0.0
            && self.square.height > 0.0
            && self.square.width < self.grid.column_pitch
            && self.square.height < self.grid.row_pitch)
        {
            return Err(ConfigError::InvalidGrid);
        }

        if self.hour_scale.start_hour >= HOUR_POSITIONS
            || self.hour_scale.skipped_slot > HOUR_POSITIONS
            || !(self.hour_scale.deg_per_hour > 0.0)
        {
            return Err(ConfigError::InvalidHourScale);
        }

        if self.sweep.window_us >= 60_000_000 {
            return Err(ConfigError::SweepTooLong);
        }

        Ok(())
    }
}
