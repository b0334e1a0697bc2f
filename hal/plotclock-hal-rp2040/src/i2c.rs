//! I2C bus adapter
//!
//! Bridges any blocking `embedded-hal` I2C master (the embassy-rp
//! `I2c<_, Blocking>` on the board) to [`plotclock_hal::I2cBus`].

use embassy_rp::i2c::{Blocking, Config, I2c, Instance, SclPin, SdaPin};
use embassy_rp::Peri;
use plotclock_hal::i2c::I2cConfig;
use plotclock_hal::I2cBus;

/// Wraps an `embedded_hal::i2c::I2c` implementation
pub struct I2cAdapter<T> {
    bus: T,
}

impl<T> I2cAdapter<T> {
    /// Wrap an existing bus
    pub fn new(bus: T) -> Self {
        Self { bus }
    }

    /// Release the wrapped bus
    pub fn release(self) -> T {
        self.bus
    }
}

impl<'d, P: Instance> I2cAdapter<I2c<'d, P, Blocking>> {
    /// Bring up a blocking I2C master on the given pins
    pub fn blocking(
        peri: Peri<'d, P>,
        scl: Peri<'d, impl SclPin<P>>,
        sda: Peri<'d, impl SdaPin<P>>,
        config: &I2cConfig,
    ) -> Self {
        let mut rp_config = Config::default();
        rp_config.frequency = config.frequency;
        Self::new(I2c::new_blocking(peri, scl, sda, rp_config))
    }
}

impl<T: embedded_hal::i2c::I2c> I2cBus for I2cAdapter<T> {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.bus.write(address, data)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus.write_read(address, write_data, read_buf)
    }
}
