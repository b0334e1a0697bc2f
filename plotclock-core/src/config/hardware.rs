//! Hardware configuration types
//!
//! These types describe the physical rig: which GPIO drives which line,
//! how a motor is geared, and how hard it may be pushed. They replace
//! compile-time pin constants so that simulated pins can be injected in
//! tests.

use heapless::String;

/// Maximum axis name length
pub const MAX_NAME_LEN: usize = 8;

/// Microsteps per millimetre of gantry travel
///
/// 200 full steps x 16 microsteps per revolution, 20 tooth pulley on a
/// 2 mm pitch belt.
pub const GANTRY_STEPS_PER_MM: f32 = (200.0 * 16.0) / (20.0 * 2.0);

/// Microsteps per degree of hour-arm rotation (3:1 reduction)
pub const HOUR_STEPS_PER_DEGREE: f32 = (3.0 * 200.0 * 16.0) / 360.0;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low input with the internal pull-up enabled
    ///
    /// This is how the limit switches and buttons are wired: the switch
    /// shorts the line to ground.
    pub const fn switch(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Speed and acceleration ceiling for one axis, in microsteps
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KinematicLimits {
    /// Maximum speed in steps/s
    pub max_speed: f32,
    /// Maximum acceleration in steps/s²
    pub max_accel: f32,
}

impl KinematicLimits {
    /// Shortest allowed interval between two steps, rounded to whole micros
    pub fn min_step_micros(&self) -> u32 {
        (1_000_000.0 / self.max_speed + 0.5) as u32
    }
}

/// Inter-step delays for the three homing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingDelays {
    /// Fast approach toward the switch
    pub fast_toward_us: u32,
    /// Back-off away from the switch
    pub fast_away_us: u32,
    /// Slow final approach toward the switch
    pub slow_toward_us: u32,
}

impl HomingDelays {
    /// Delays used by both gantry axes
    pub const GANTRY: Self = Self {
        fast_toward_us: 200,
        fast_away_us: 2000,
        slow_toward_us: 2000,
    };

    /// Delays used by the hour arm (heavier, geared)
    pub const HOUR: Self = Self {
        fast_toward_us: 400,
        fast_away_us: 2000,
        slow_toward_us: 2000,
    };
}

impl Default for HomingDelays {
    fn default() -> Self {
        Self::GANTRY
    }
}

/// Stepper axis configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    /// Axis name ("x", "y", "hour")
    pub name: String<MAX_NAME_LEN>,
    /// Step pulse pin
    pub step_pin: PinConfig,
    /// Direction pin
    pub dir_pin: PinConfig,
    /// Limit switch pin
    pub limit_pin: PinConfig,
    /// Motor is mounted mirrored: invert the direction line
    pub flipped: bool,
    /// Speed/acceleration ceiling
    pub limits: KinematicLimits,
    /// Microsteps per physical unit (mm for the gantry, degrees for the arm)
    pub steps_per_unit: f32,
    /// Homing step delays
    pub homing: HomingDelays,
}

impl AxisConfig {
    /// Gantry X axis of the reference rig
    pub fn gantry_x() -> Self {
        Self {
            name: axis_name("x"),
            step_pin: PinConfig::new(3),
            dir_pin: PinConfig::new(28),
            limit_pin: PinConfig::switch(9),
            flipped: true,
            limits: gantry_limits(),
            steps_per_unit: GANTRY_STEPS_PER_MM,
            homing: HomingDelays::GANTRY,
        }
    }

    /// Gantry Y axis of the reference rig
    pub fn gantry_y() -> Self {
        Self {
            name: axis_name("y"),
            step_pin: PinConfig::new(5),
            dir_pin: PinConfig::new(4),
            limit_pin: PinConfig::switch(10),
            flipped: false,
            limits: gantry_limits(),
            steps_per_unit: GANTRY_STEPS_PER_MM,
            homing: HomingDelays::GANTRY,
        }
    }

    /// Hour arm of the reference rig
    pub fn hour() -> Self {
        Self {
            name: axis_name("hour"),
            step_pin: PinConfig::new(7),
            dir_pin: PinConfig::new(6),
            limit_pin: PinConfig::switch(8),
            flipped: true,
            limits: KinematicLimits {
                // 150 degrees per second
                max_speed: 4000.0,
                max_accel: 20_000.0,
            },
            steps_per_unit: HOUR_STEPS_PER_DEGREE,
            homing: HomingDelays::HOUR,
        }
    }

    /// Physical-unit to step conversion, rounded to the nearest step
    pub fn units_to_steps(&self, units: f32) -> i32 {
        round_to_i32(units * self.steps_per_unit)
    }

    /// Step to physical-unit conversion
    pub fn steps_to_units(&self, steps: i32) -> f32 {
        steps as f32 / self.steps_per_unit
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::gantry_x()
    }
}

/// Round half away from zero
pub fn round_to_i32(value: f32) -> i32 {
    libm::roundf(value) as i32
}

fn gantry_limits() -> KinematicLimits {
    KinematicLimits {
        // 200 mm/s, 500 mm/s²
        max_speed: 16_000.0,
        max_accel: 40_000.0,
    }
}

fn axis_name(name: &str) -> String<MAX_NAME_LEN> {
    let mut s = String::new();
    let _ = s.push_str(name);
    s
}

/// Manual time-setting buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Hour/minute select (released = adjust hours, held = adjust minutes)
    pub mode_pin: PinConfig,
    /// Increment
    pub up_pin: PinConfig,
    /// Decrement
    pub down_pin: PinConfig,
    /// Debounce window
    pub debounce_us: u32,
    /// Auto-repeat interval while held
    pub repeat_us: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            mode_pin: PinConfig::switch(29),
            up_pin: PinConfig::switch(26),
            down_pin: PinConfig::switch(27),
            debounce_us: 10_000,
            repeat_us: 500_000,
        }
    }
}

/// Real-time clock wiring and resync policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RtcConfig {
    /// I2C data pin
    pub sda_pin: u8,
    /// I2C clock pin
    pub scl_pin: u8,
    /// Interval between re-reads of the RTC
    pub resync_interval_us: u32,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            sda_pin: 20,
            scl_pin: 21,
            resync_interval_us: 60_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_config() {
        let pin = PinConfig::new(10);
        assert_eq!(pin.pin, 10);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let inverted = PinConfig::inverted(12);
        assert!(inverted.inverted);

        let switch = PinConfig::switch(4);
        assert!(switch.pull_up);
        assert!(switch.inverted);
    }

    #[test]
    fn test_gear_ratios() {
        assert_eq!(GANTRY_STEPS_PER_MM, 80.0);
        assert!(libm::fabsf(HOUR_STEPS_PER_DEGREE - 26.666_666) < 1e-4);
    }

    #[test]
    fn test_min_step_micros() {
        let limits = KinematicLimits {
            max_speed: 16_000.0,
            max_accel: 1.0,
        };
        // 62.5us rounds up
        assert_eq!(limits.min_step_micros(), 63);

        let limits = KinematicLimits {
            max_speed: 4000.0,
            max_accel: 1.0,
        };
        assert_eq!(limits.min_step_micros(), 250);
    }

    #[test]
    fn test_units_to_steps_rounds_to_nearest() {
        let x = AxisConfig::gantry_x();
        assert_eq!(x.units_to_steps(1.0), 80);
        assert_eq!(x.units_to_steps(0.01), 1);
        assert_eq!(x.units_to_steps(0.006), 0);
        assert_eq!(x.units_to_steps(-0.01), -1);
        assert_eq!(x.steps_to_units(160), 2.0);
    }

    #[test]
    fn test_reference_axes() {
        let x = AxisConfig::gantry_x();
        let y = AxisConfig::gantry_y();
        let h = AxisConfig::hour();
        assert_eq!(x.name.as_str(), "x");
        assert_eq!(y.name.as_str(), "y");
        assert_eq!(h.name.as_str(), "hour");
        assert!(x.flipped);
        assert!(!y.flipped);
        assert_eq!(h.homing, HomingDelays::HOUR);
        assert_eq!(h.units_to_steps(90.0), 2400);
    }
}
