//! GPIO wrappers implementing the `plotclock-hal` pin traits
//!
//! Outputs apply the configured inversion so the core only ever deals in
//! logical levels. Inputs report the raw level; the core decodes it with
//! the pin's `inverted` flag (limit switches and buttons are active-low).

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use plotclock_core::config::PinConfig;

/// Digital output with optional inversion
pub struct RpOutput {
    pin: Output<'static>,
    inverted: bool,
}

impl RpOutput {
    /// Create a new output, driven to its inactive (logical low) level
    pub fn new(pin: Peri<'static, AnyPin>, config: &PinConfig) -> Self {
        let idle = if config.inverted {
            Level::High
        } else {
            Level::Low
        };
        Self {
            pin: Output::new(pin, idle),
            inverted: config.inverted,
        }
    }
}

impl plotclock_hal::OutputPin for RpOutput {
    fn set_high(&mut self) {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high() != self.inverted
    }
}

/// Digital input
pub struct RpInput {
    pin: Input<'static>,
}

impl RpInput {
    /// Create a new input, with the internal pull-up if configured
    pub fn new(pin: Peri<'static, AnyPin>, config: &PinConfig) -> Self {
        let pull = if config.pull_up { Pull::Up } else { Pull::None };
        Self {
            pin: Input::new(pin, pull),
        }
    }
}

impl plotclock_hal::InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
