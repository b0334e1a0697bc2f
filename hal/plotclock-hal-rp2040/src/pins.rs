//! Dynamic pin allocation for config-driven hardware setup
//!
//! Provides a way to get GPIO pins by number at runtime, so the pin map
//! can come from the clock configuration instead of being hardcoded.
//!
//! GPIO20/21 are handed out as typed pins for I2C0 (the RTC bus) and are
//! not available from the bank.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{I2C0, PIN_20, PIN_21};
use embassy_rp::{Peri, Peripherals};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// I2C0 data pin
pub const I2C_SDA_PIN: u8 = 20;

/// I2C0 clock pin
pub const I2C_SCL_PIN: u8 = 21;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for special function
    Reserved,
}

/// Pin bank that holds the GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

/// Non-GPIO peripherals that remain after creating the bank
pub struct RemainingPeripherals {
    pub i2c0: Peri<'static, I2C0>,
    pub sda: Peri<'static, PIN_20>,
    pub scl: Peri<'static, PIN_21>,
}

impl PinBank {
    /// Split the peripherals into the pin bank and the I2C resources
    pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                None,
                None,
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };
        let remaining = RemainingPeripherals {
            i2c0: p.I2C0,
            sda: p.PIN_20,
            scl: p.PIN_21,
        };
        (bank, remaining)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if is_reserved(pin_num) {
            return Err(PinError::Reserved);
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        pin_num < GPIO_COUNT && self.pins[pin_num as usize].is_some()
    }
}

fn is_reserved(pin_num: u8) -> bool {
    pin_num == I2C_SDA_PIN || pin_num == I2C_SCL_PIN
}
