//! Time source abstractions
//!
//! The motion engine and the path generators are driven by a single
//! free-running microsecond counter. It is 32 bits wide and wraps roughly
//! every 71.6 minutes; consumers must only ever take differences with
//! `wrapping_sub`.

/// Monotonic microsecond counter (wraps at `u32::MAX`)
pub trait MicrosClock {
    /// Current timestamp in microseconds
    fn now_micros(&self) -> u32;

    /// Microseconds elapsed since `earlier`, correct across one wraparound
    fn micros_since(&self, earlier: u32) -> u32 {
        self.now_micros().wrapping_sub(earlier)
    }
}

/// Blocking delay
///
/// Only used by the startup homing sequence. Everything else is
/// non-blocking and rate-limits itself from timestamps.
pub trait DelayUs {
    /// Busy-wait for at least `us` microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: DelayUs + ?Sized> DelayUs for &mut T {
    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32);

    impl MicrosClock for Fixed {
        fn now_micros(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_micros_since() {
        let clock = Fixed(1_500);
        assert_eq!(clock.micros_since(1_000), 500);
    }

    #[test]
    fn test_micros_since_wraps() {
        // Counter wrapped 100us after the earlier reading was taken
        let clock = Fixed(50);
        assert_eq!(clock.micros_since(u32::MAX - 49), 100);
    }
}
