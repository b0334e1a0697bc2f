//! Bit-banged step/dir stepper lines
//!
//! The core decides when to step; this only has to produce a pulse the
//! driver chip will see. A4988/TMC2209 want at least 1 us high and 200 ns
//! of direction setup, which a back-to-back pair of GPIO writes at 125 MHz
//! does not give.

use plotclock_core::config::AxisConfig;
use plotclock_core::traits::StepperPins;
use plotclock_hal::{InputPin, OutputPin};

use crate::gpio::{RpInput, RpOutput};
use crate::pins::{PinBank, PinError};

/// Busy-wait after a direction change and while the step line is high
/// (2 us at 125 MHz)
const PULSE_CYCLES: u32 = 250;

/// Step, direction and limit lines of one axis
pub struct RpStepperPins {
    step: RpOutput,
    dir: RpOutput,
    limit: RpInput,
}

impl RpStepperPins {
    /// Create a new pin bundle from already-configured lines
    pub fn new(step: RpOutput, dir: RpOutput, limit: RpInput) -> Self {
        Self { step, dir, limit }
    }

    /// Take the axis pins named by `config` out of the bank
    pub fn from_config(bank: &mut PinBank, config: &AxisConfig) -> Result<Self, PinError> {
        let step = RpOutput::new(bank.take(config.step_pin.pin)?, &config.step_pin);
        let dir = RpOutput::new(bank.take(config.dir_pin.pin)?, &config.dir_pin);
        let limit = RpInput::new(bank.take(config.limit_pin.pin)?, &config.limit_pin);
        Ok(Self::new(step, dir, limit))
    }
}

impl StepperPins for RpStepperPins {
    fn set_direction_level(&mut self, high: bool) {
        if self.dir.is_set_high() != high {
            self.dir.set_state(high);
            cortex_m::asm::delay(PULSE_CYCLES);
        }
    }

    fn pulse_step(&mut self) {
        self.step.set_high();
        cortex_m::asm::delay(PULSE_CYCLES);
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
