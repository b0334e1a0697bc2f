//! Hour/minute/second time of day

/// Seconds in one day
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Time of day, always normalised
///
/// Fields compare in declaration order, so the derived ordering is the
/// chronological one within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClockTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
}

impl WallClockTime {
    /// Midnight
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Create a time, carrying overflowing fields into the next one
    ///
    /// `WallClockTime::new(23, 59, 75)` is `00:00:15`.
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self::normalize_from(hour as u32, minute as u32, second as u32)
    }

    /// Normalise arbitrary field values: seconds carry into minutes,
    /// minutes into hours, and hours wrap at the day boundary
    pub fn normalize_from(hours: u32, minutes: u32, seconds: u32) -> Self {
        let minutes = minutes + seconds / 60;
        let hours = hours + minutes / 60;
        Self {
            hour: (hours % 24) as u8,
            minute: (minutes % 60) as u8,
            second: (seconds % 60) as u8,
        }
    }

    /// Time `seconds` after midnight, wrapping at the day boundary
    pub fn from_seconds_of_day(seconds: u32) -> Self {
        Self::normalize_from(0, 0, seconds % SECONDS_PER_DAY)
    }

    /// Seconds since midnight
    pub fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Time `seconds` later, wrapping past midnight
    pub fn add_seconds(self, seconds: u32) -> Self {
        let total = self.seconds_of_day() as u64 + seconds as u64;
        Self::from_seconds_of_day((total % SECONDS_PER_DAY as u64) as u32)
    }

    /// Step the hour, wrapping within the day
    pub fn adjust_hour(self, delta: i8) -> Self {
        Self {
            hour: (self.hour as i16 + delta as i16).rem_euclid(24) as u8,
            ..self
        }
    }

    /// Step the minute, wrapping within the hour (no carry into the hour)
    pub fn adjust_minute(self, delta: i8) -> Self {
        Self {
            minute: (self.minute as i16 + delta as i16).rem_euclid(60) as u8,
            ..self
        }
    }

    /// Same hour and minute, zero seconds
    pub fn start_of_minute(self) -> Self {
        Self { second: 0, ..self }
    }

    /// Signed difference `self - earlier` in seconds, taking the shorter
    /// way around midnight
    pub fn seconds_since(&self, earlier: &WallClockTime) -> i32 {
        let day = SECONDS_PER_DAY as i32;
        let diff = (self.seconds_of_day() as i32 - earlier.seconds_of_day() as i32).rem_euclid(day);
        if diff > day / 2 {
            diff - day
        } else {
            diff
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalisation_carries() {
        assert_eq!(WallClockTime::new(23, 59, 75), WallClockTime::new(0, 0, 15));
        assert_eq!(
            WallClockTime::new(10, 70, 0),
            WallClockTime {
                hour: 11,
                minute: 10,
                second: 0
            }
        );
        assert_eq!(WallClockTime::new(25, 0, 0).hour, 1);
    }

    #[test]
    fn test_add_seconds_rolls_over_midnight() {
        let t = WallClockTime::new(23, 59, 59);
        assert_eq!(t.add_seconds(1), WallClockTime::MIDNIGHT);
        assert_eq!(t.add_seconds(61), WallClockTime::new(0, 1, 0));
        assert_eq!(t.add_seconds(SECONDS_PER_DAY), t);
    }

    #[test]
    fn test_adjust_wraps_without_carry() {
        let t = WallClockTime::new(23, 59, 30);
        assert_eq!(t.adjust_minute(1), WallClockTime::new(23, 0, 30));
        assert_eq!(t.adjust_hour(1), WallClockTime::new(0, 59, 30));

        let t = WallClockTime::new(0, 0, 5);
        assert_eq!(t.adjust_minute(-1), WallClockTime::new(0, 59, 5));
        assert_eq!(t.adjust_hour(-1), WallClockTime::new(23, 0, 5));
    }

    #[test]
    fn test_ordering_is_chronological() {
        assert!(WallClockTime::new(9, 59, 59) < WallClockTime::new(10, 0, 0));
        assert!(WallClockTime::new(10, 0, 1) > WallClockTime::new(10, 0, 0));
    }

    #[test]
    fn test_seconds_since_takes_short_way() {
        let a = WallClockTime::new(0, 0, 10);
        let b = WallClockTime::new(23, 59, 50);
        assert_eq!(a.seconds_since(&b), 20);
        assert_eq!(b.seconds_since(&a), -20);
        assert_eq!(a.seconds_since(&a), 0);
    }

    proptest! {
        #[test]
        fn prop_normalised_fields_in_range(h in any::<u8>(), m in any::<u8>(), s in any::<u8>()) {
            let t = WallClockTime::new(h, m, s);
            prop_assert!(t.hour < 24);
            prop_assert!(t.minute < 60);
            prop_assert!(t.second < 60);
        }

        #[test]
        fn prop_seconds_of_day_roundtrip(secs in 0u32..SECONDS_PER_DAY) {
            prop_assert_eq!(WallClockTime::from_seconds_of_day(secs).seconds_of_day(), secs);
        }

        #[test]
        fn prop_add_seconds_matches_day_arithmetic(secs in 0u32..SECONDS_PER_DAY, add in any::<u32>()) {
            let t = WallClockTime::from_seconds_of_day(secs);
            let expected = ((secs as u64 + add as u64) % SECONDS_PER_DAY as u64) as u32;
            prop_assert_eq!(t.add_seconds(add).seconds_of_day(), expected);
        }
    }
}
