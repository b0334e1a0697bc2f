//! DS3231 real-time clock (I2C)
//!
//! The DS3231 is a temperature-compensated RTC with a coin-cell backup.
//! Only the time-of-day registers are used; the calendar, alarms and
//! temperature sensor are left alone.
//!
//! # Register access
//!
//! Every transaction starts by writing the register pointer. Reads and
//! writes then auto-increment through the register file, so the three
//! time registers are read in one burst.
//!
//! # Oscillator stop flag
//!
//! OSF is set when the oscillator stopped at some point, typically after
//! the coin cell went flat. The time registers are meaningless until the
//! time has been written again, which is also what clears the flag.

use plotclock_core::time::WallClockTime;
use plotclock_core::traits::TimeSource;
use plotclock_hal::I2cBus;

/// Fixed 7-bit bus address
pub const DS3231_ADDRESS: u8 = 0x68;

/// DS3231 register addresses
pub mod reg {
    /// Seconds (BCD, 00-59)
    pub const SECONDS: u8 = 0x00;
    /// Minutes (BCD, 00-59)
    pub const MINUTES: u8 = 0x01;
    /// Hours (BCD, 12/24 hour format selected by bit 6)
    pub const HOURS: u8 = 0x02;
    /// Control
    pub const CONTROL: u8 = 0x0E;
    /// Control/status
    pub const STATUS: u8 = 0x0F;
}

/// Hours register bits
mod hours {
    /// 12-hour mode when set
    pub const MODE_12H: u8 = 1 << 6;
    /// PM in 12-hour mode
    pub const PM: u8 = 1 << 5;
}

/// Control register bits
mod control {
    /// Oscillator disabled on battery (active high)
    pub const EOSC: u8 = 1 << 7;
    /// Battery-backed square wave enable
    pub const BBSQW: u8 = 1 << 6;
    /// Interrupt control: INT/SQW pin is the alarm interrupt, not a square wave
    pub const INTCN: u8 = 1 << 2;
    /// Alarm 2 interrupt enable
    pub const A2IE: u8 = 1 << 1;
    /// Alarm 1 interrupt enable
    pub const A1IE: u8 = 1 << 0;
}

/// Status register bits
mod status {
    /// Oscillator stop flag
    pub const OSF: u8 = 1 << 7;
    /// 32 kHz output enable
    pub const EN32KHZ: u8 = 1 << 3;
}

/// DS3231 error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Registers hold a value that is not valid BCD for the field
    InvalidData,
    /// The oscillator stopped since the time was last set
    OscillatorStopped,
}

/// DS3231 driver
pub struct Ds3231<I> {
    i2c: I,
}

impl<I: I2cBus> Ds3231<I> {
    /// Create a new driver on the given bus
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Configure the chip for plain timekeeping
    ///
    /// Keeps the oscillator running on battery, turns off the square-wave
    /// and 32 kHz outputs and disables both alarm interrupts. Returns
    /// `true` if the oscillator stop flag is set, meaning the time must be
    /// set before it can be read.
    pub fn init(&mut self) -> Result<bool, RtcError<I::Error>> {
        let ctrl = self.read_register(reg::CONTROL)?;
        let ctrl = (ctrl & !(control::EOSC | control::BBSQW | control::A1IE | control::A2IE))
            | control::INTCN;
        self.write_register(reg::CONTROL, ctrl)?;

        let stat = self.read_register(reg::STATUS)?;
        if stat & status::EN32KHZ != 0 {
            self.write_register(reg::STATUS, stat & !status::EN32KHZ)?;
        }

        let stopped = stat & status::OSF != 0;

        #[cfg(feature = "defmt")]
        if stopped {
            defmt::warn!("DS3231: oscillator stopped, time is invalid until set");
        }

        Ok(stopped)
    }

    /// Check the oscillator stop flag
    pub fn oscillator_stopped(&mut self) -> Result<bool, RtcError<I::Error>> {
        Ok(self.read_register(reg::STATUS)? & status::OSF != 0)
    }

    /// Read the time of day
    pub fn read_time(&mut self) -> Result<WallClockTime, RtcError<I::Error>> {
        if self.oscillator_stopped()? {
            return Err(RtcError::OscillatorStopped);
        }

        let mut buf = [0u8; 3];
        self.i2c
            .read_registers(DS3231_ADDRESS, reg::SECONDS, &mut buf)
            .map_err(RtcError::Bus)?;

        decode_time(buf).ok_or(RtcError::InvalidData)
    }

    /// Write the time of day in 24-hour format and clear the stop flag
    pub fn set_time(&mut self, time: &WallClockTime) -> Result<(), RtcError<I::Error>> {
        let [s, m, h] = encode_time(time);
        self.i2c
            .write(DS3231_ADDRESS, &[reg::SECONDS, s, m, h])
            .map_err(RtcError::Bus)?;

        let stat = self.read_register(reg::STATUS)?;
        if stat & status::OSF != 0 {
            self.write_register(reg::STATUS, stat & !status::OSF)?;
        }

        Ok(())
    }

    /// Release the bus
    pub fn release(self) -> I {
        self.i2c
    }

    fn read_register(&mut self, register: u8) -> Result<u8, RtcError<I::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .read_registers(DS3231_ADDRESS, register, &mut buf)
            .map_err(RtcError::Bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), RtcError<I::Error>> {
        self.i2c
            .write_register(DS3231_ADDRESS, register, value)
            .map_err(RtcError::Bus)
    }
}

impl<I: I2cBus> TimeSource for Ds3231<I> {
    type Error = RtcError<I::Error>;

    fn read_time(&mut self) -> Result<WallClockTime, Self::Error> {
        Ds3231::read_time(self)
    }

    fn set_time(&mut self, time: &WallClockTime) -> Result<(), Self::Error> {
        Ds3231::set_time(self, time)
    }
}

/// Decode two BCD digits, rejecting nibbles above 9
fn bcd_to_bin(value: u8) -> Option<u8> {
    let (tens, ones) = (value >> 4, value & 0x0F);
    if tens > 9 || ones > 9 {
        return None;
    }
    Some(tens * 10 + ones)
}

fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn decode_hours(raw: u8) -> Option<u8> {
    if raw & hours::MODE_12H != 0 {
        let hour12 = bcd_to_bin(raw & 0x1F)?;
        if !(1..=12).contains(&hour12) {
            return None;
        }
        let pm = raw & hours::PM != 0;
        Some(hour12 % 12 + if pm { 12 } else { 0 })
    } else {
        let hour = bcd_to_bin(raw & 0x3F)?;
        (hour < 24).then_some(hour)
    }
}

fn decode_time([seconds, minutes, hours]: [u8; 3]) -> Option<WallClockTime> {
    // Bit 7 of the seconds and minutes registers always reads 0
    let second = bcd_to_bin(seconds & 0x7F).filter(|&s| s < 60)?;
    let minute = bcd_to_bin(minutes & 0x7F).filter(|&m| m < 60)?;
    let hour = decode_hours(hours)?;
    Some(WallClockTime {
        hour,
        minute,
        second,
    })
}

fn encode_time(time: &WallClockTime) -> [u8; 3] {
    [
        bin_to_bcd(time.second),
        bin_to_bcd(time.minute),
        // 24-hour mode: bit 6 clear
        bin_to_bcd(time.hour),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTERS: usize = 0x13;

    /// Register-file model of the chip
    struct MockBus {
        regs: [u8; REGISTERS],
        fail: bool,
        writes: usize,
    }

    impl MockBus {
        fn new() -> Self {
            let mut regs = [0u8; REGISTERS];
            // Power-on defaults
            regs[reg::CONTROL as usize] = 0x1C;
            regs[reg::STATUS as usize] = status::OSF | status::EN32KHZ;
            Self {
                regs,
                fail: false,
                writes: 0,
            }
        }

        fn running(seconds: u8, minutes: u8, hours: u8) -> Self {
            let mut bus = Self::new();
            bus.regs[reg::STATUS as usize] = 0;
            bus.regs[0] = seconds;
            bus.regs[1] = minutes;
            bus.regs[2] = hours;
            bus
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    impl I2cBus for MockBus {
        type Error = Nack;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Nack> {
            if self.fail || address != DS3231_ADDRESS {
                return Err(Nack);
            }
            if let Some((&pointer, values)) = data.split_first() {
                for (i, &value) in values.iter().enumerate() {
                    self.regs[(pointer as usize + i) % REGISTERS] = value;
                }
            }
            self.writes += 1;
            Ok(())
        }

        fn write_read(
            &mut self,
            address: u8,
            write_data: &[u8],
            read_buf: &mut [u8],
        ) -> Result<(), Nack> {
            if self.fail || address != DS3231_ADDRESS {
                return Err(Nack);
            }
            let pointer = write_data.first().copied().unwrap_or(0) as usize;
            for (i, byte) in read_buf.iter_mut().enumerate() {
                *byte = self.regs[(pointer + i) % REGISTERS];
            }
            Ok(())
        }
    }

    #[test]
    fn test_bcd() {
        assert_eq!(bcd_to_bin(0x59), Some(59));
        assert_eq!(bcd_to_bin(0x00), Some(0));
        assert_eq!(bcd_to_bin(0x1A), None);
        assert_eq!(bcd_to_bin(0xA1), None);
        assert_eq!(bin_to_bcd(47), 0x47);
        assert_eq!(bin_to_bcd(9), 0x09);
    }

    #[test]
    fn test_read_24h() {
        let mut rtc = Ds3231::new(MockBus::running(0x30, 0x45, 0x23));
        assert_eq!(rtc.read_time(), Ok(WallClockTime::new(23, 45, 30)));
    }

    #[test]
    fn test_read_12h() {
        // 12:05:00 AM is midnight
        let mut rtc = Ds3231::new(MockBus::running(0x00, 0x05, hours::MODE_12H | 0x12));
        assert_eq!(rtc.read_time(), Ok(WallClockTime::new(0, 5, 0)));

        // 12 PM is noon
        let mut rtc = Ds3231::new(MockBus::running(
            0x00,
            0x00,
            hours::MODE_12H | hours::PM | 0x12,
        ));
        assert_eq!(rtc.read_time(), Ok(WallClockTime::new(12, 0, 0)));

        // 7 PM
        let mut rtc = Ds3231::new(MockBus::running(
            0x59,
            0x59,
            hours::MODE_12H | hours::PM | 0x07,
        ));
        assert_eq!(rtc.read_time(), Ok(WallClockTime::new(19, 59, 59)));
    }

    #[test]
    fn test_invalid_registers() {
        let mut rtc = Ds3231::new(MockBus::running(0x60, 0x00, 0x00));
        assert_eq!(rtc.read_time(), Err(RtcError::InvalidData));

        let mut rtc = Ds3231::new(MockBus::running(0x00, 0x00, 0x24));
        assert_eq!(rtc.read_time(), Err(RtcError::InvalidData));

        let mut rtc = Ds3231::new(MockBus::running(0x00, 0x00, hours::MODE_12H));
        assert_eq!(rtc.read_time(), Err(RtcError::InvalidData));
    }

    #[test]
    fn test_init_configures_outputs() {
        let mut rtc = Ds3231::new(MockBus::new());
        assert_eq!(rtc.init(), Ok(true));

        let bus = rtc.release();
        let ctrl = bus.regs[reg::CONTROL as usize];
        assert_eq!(ctrl & control::INTCN, control::INTCN);
        assert_eq!(ctrl & (control::EOSC | control::BBSQW | control::A1IE | control::A2IE), 0);

        let stat = bus.regs[reg::STATUS as usize];
        assert_eq!(stat & status::EN32KHZ, 0);
        // The stop flag survives init; only setting the time clears it
        assert_eq!(stat & status::OSF, status::OSF);
    }

    #[test]
    fn test_stopped_oscillator_blocks_reads_until_set() {
        let mut rtc = Ds3231::new(MockBus::new());
        rtc.init().unwrap();
        assert_eq!(rtc.read_time(), Err(RtcError::OscillatorStopped));

        let time = WallClockTime::new(9, 41, 7);
        rtc.set_time(&time).unwrap();
        assert_eq!(rtc.oscillator_stopped(), Ok(false));
        assert_eq!(rtc.read_time(), Ok(time));
    }

    #[test]
    fn test_set_time_writes_24h_bcd() {
        let mut rtc = Ds3231::new(MockBus::running(0, 0, hours::MODE_12H | 0x01));
        rtc.set_time(&WallClockTime::new(21, 9, 58)).unwrap();

        let bus = rtc.release();
        assert_eq!(&bus.regs[..3], &[0x58, 0x09, 0x21]);
        // Flag already clear: no status write
        assert_eq!(bus.writes, 1);
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut bus = MockBus::running(0, 0, 0);
        bus.fail = true;
        let mut rtc = Ds3231::new(bus);
        assert_eq!(rtc.read_time(), Err(RtcError::Bus(Nack)));
        assert_eq!(rtc.init(), Err(RtcError::Bus(Nack)));
    }

    #[test]
    fn test_time_source_roundtrip_through_trait() {
        fn via_trait<T: TimeSource>(source: &mut T, time: &WallClockTime) -> Option<WallClockTime> {
            source.set_time(time).ok()?;
            source.read_time().ok()
        }

        let mut rtc = Ds3231::new(MockBus::new());
        let time = WallClockTime::new(0, 0, 0);
        assert_eq!(via_trait(&mut rtc, &time), Some(time));
    }
}
