//! Stepper pin bundle trait
//!
//! A step/dir driver (A4988, TMC2209 in standalone mode, ...) needs three
//! lines per axis: step, direction and the limit switch used for homing.

use plotclock_hal::{InputPin, OutputPin};

/// Logical direction of travel along an axis
///
/// `Positive` increases the step position. The physical level on the
/// direction line is decided by the axis configuration, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing step count (away from the home switch)
    Positive,
    /// Decreasing step count (toward the home switch)
    Negative,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Direction of a signed distance (zero maps to `Positive`)
    pub fn of(distance: i32) -> Self {
        if distance < 0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }

    /// +1 or -1
    pub fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// +1.0 or -1.0
    pub fn signum(self) -> f32 {
        self.sign() as f32
    }
}

/// Logical state of a limit switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    /// Switch actuated (axis at the home position)
    Pressed,
    /// Switch open
    Released,
}

impl SwitchState {
    /// Decode a raw pin level
    ///
    /// `active_low` switches (pulled up, shorting to ground) read low when
    /// pressed.
    pub fn from_level(high: bool, active_low: bool) -> Self {
        if high != active_low {
            SwitchState::Pressed
        } else {
            SwitchState::Released
        }
    }
}

/// Lines driving a single step/dir stepper axis
pub trait StepperPins {
    /// Drive the direction line to `high`
    fn set_direction_level(&mut self, high: bool);

    /// Emit one step pulse (rising then falling edge)
    fn pulse_step(&mut self);

    /// Raw level of the limit-switch input
    fn limit_level(&self) -> bool;

    /// Put step and direction lines into their idle state
    fn idle(&mut self) {
        self.set_direction_level(false);
    }
}

/// Concrete pin bundle built from HAL pins
pub struct AxisPins<S, D, L> {
    /// Step pulse output
    pub step: S,
    /// Direction output
    pub dir: D,
    /// Limit switch input
    pub limit: L,
}

impl<S, D, L> AxisPins<S, D, L> {
    /// Bundle the three lines of an axis
    pub fn new(step: S, dir: D, limit: L) -> Self {
        Self { step, dir, limit }
    }
}

impl<S: OutputPin, D: OutputPin, L: InputPin> StepperPins for AxisPins<S, D, L> {
    fn set_direction_level(&mut self, high: bool) {
        self.dir.set_state(high);
    }

    fn pulse_step(&mut self) {
        self.step.set_high();
        self.step.set_low();
    }

    fn limit_level(&self) -> bool {
        self.limit.is_high()
    }

    fn idle(&mut self) {
        self.step.set_low();
        self.dir.set_low();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Positive.opposite(), Direction::Negative);
        assert_eq!(Direction::Negative.opposite(), Direction::Positive);
    }

    #[test]
    fn test_direction_of_distance() {
        assert_eq!(Direction::of(12), Direction::Positive);
        assert_eq!(Direction::of(-3), Direction::Negative);
        assert_eq!(Direction::of(-3).sign(), -1);
        assert_eq!(Direction::Positive.signum(), 1.0);
    }

    #[test]
    fn test_switch_state_active_low() {
        // Pull-up switch: low means pressed
        assert_eq!(SwitchState::from_level(false, true), SwitchState::Pressed);
        assert_eq!(SwitchState::from_level(true, true), SwitchState::Released);
    }

    /// Output that counts rising edges
    #[derive(Default)]
    struct Line {
        high: bool,
        rises: u32,
    }

    impl OutputPin for Line {
        fn set_high(&mut self) {
            if !self.high {
                self.rises += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_axis_pins_drive_lines() {
        let mut pins = AxisPins::new(Line::default(), Line::default(), Level(false));

        pins.set_direction_level(true);
        assert!(pins.dir.is_set_high());

        pins.pulse_step();
        pins.pulse_step();
        assert_eq!(pins.step.rises, 2);
        assert!(pins.step.is_set_low());
        assert!(!pins.limit_level());

        pins.idle();
        assert!(pins.dir.is_set_low());
    }

    #[test]
    fn test_switch_state_active_high() {
        assert_eq!(SwitchState::from_level(true, false), SwitchState::Pressed);
        assert_eq!(SwitchState::from_level(false, false), SwitchState::Released);
    }
}
