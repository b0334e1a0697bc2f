//! Periodic resynchronisation against a battery-backed time source

use crate::traits::TimeSource;

use super::WallClockTime;

/// Time source failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeSyncError<E> {
    /// Reading the source failed
    Read(E),
    /// Writing the source failed
    Write(E),
}

/// Rate-limited reader for a [`TimeSource`]
pub struct TimeSync<S> {
    source: S,
    interval_us: u32,
    last_sync_us: u32,
}

impl<S: TimeSource> TimeSync<S> {
    /// Create a new wrapper that re-reads `source` every `interval_us`
    pub fn new(source: S, interval_us: u32) -> Self {
        Self {
            source,
            interval_us,
            last_sync_us: 0,
        }
    }

    /// Read the source once at startup
    pub fn init(&mut self, now_us: u32) -> Result<WallClockTime, TimeSyncError<S::Error>> {
        self.last_sync_us = now_us;
        self.source.read_time().map_err(TimeSyncError::Read)
    }

    /// Re-read the source if the resync interval has passed
    ///
    /// Returns `Ok(Some(time))` when a read happened. A failed read still
    /// restarts the interval so a dead bus is not hammered every tick.
    pub fn update(
        &mut self,
        now_us: u32,
    ) -> Result<Option<WallClockTime>, TimeSyncError<S::Error>> {
        if now_us.wrapping_sub(self.last_sync_us) <= self.interval_us {
            return Ok(None);
        }

        self.last_sync_us = now_us;
        let time = self.source.read_time().map_err(TimeSyncError::Read)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("RTC resync: {}", time);

        Ok(Some(time))
    }

    /// Write a new time to the source
    pub fn set(&mut self, time: &WallClockTime) -> Result<(), TimeSyncError<S::Error>> {
        self.source.set_time(time).map_err(TimeSyncError::Write)
    }

    /// Interval between reads
    pub fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Access the wrapped source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Release the wrapped source
    pub fn into_inner(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RTC double that counts reads and can be made to fail
    struct FakeRtc {
        time: WallClockTime,
        reads: u32,
        fail: bool,
    }

    impl FakeRtc {
        fn new(time: WallClockTime) -> Self {
            Self {
                time,
                reads: 0,
                fail: false,
            }
        }
    }

    impl TimeSource for FakeRtc {
        type Error = ();

        fn read_time(&mut self) -> Result<WallClockTime, ()> {
            self.reads += 1;
            if self.fail {
                Err(())
            } else {
                Ok(self.time)
            }
        }

        fn set_time(&mut self, time: &WallClockTime) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.time = *time;
            Ok(())
        }
    }

    #[test]
    fn test_init_reads_once() {
        let mut sync = TimeSync::new(FakeRtc::new(WallClockTime::new(6, 30, 0)), 60_000_000);
        assert_eq!(sync.init(500), Ok(WallClockTime::new(6, 30, 0)));
        assert_eq!(sync.source_mut().reads, 1);
    }

    #[test]
    fn test_update_is_rate_limited() {
        let mut sync = TimeSync::new(FakeRtc::new(WallClockTime::new(6, 30, 0)), 60_000_000);
        sync.init(0).unwrap();

        assert_eq!(sync.update(30_000_000), Ok(None));
        assert_eq!(sync.update(60_000_000), Ok(None));
        assert_eq!(
            sync.update(60_000_001),
            Ok(Some(WallClockTime::new(6, 30, 0)))
        );
        assert_eq!(sync.update(90_000_000), Ok(None));
        assert_eq!(sync.source_mut().reads, 2);
    }

    #[test]
    fn test_update_across_counter_wrap() {
        let mut sync = TimeSync::new(FakeRtc::new(WallClockTime::MIDNIGHT), 1_000);
        sync.init(u32::MAX - 500).unwrap();

        assert_eq!(sync.update(400), Ok(None));
        assert!(sync.update(600).unwrap().is_some());
    }

    #[test]
    fn test_failed_read_restarts_interval() {
        let mut sync = TimeSync::new(FakeRtc::new(WallClockTime::MIDNIGHT), 1_000);
        sync.init(0).unwrap();
        sync.source_mut().fail = true;

        assert_eq!(sync.update(2_000), Err(TimeSyncError::Read(())));
        assert_eq!(sync.update(2_500), Ok(None));
    }

    #[test]
    fn test_set_writes_through() {
        let mut sync = TimeSync::new(FakeRtc::new(WallClockTime::MIDNIGHT), 1_000);
        sync.set(&WallClockTime::new(12, 34, 56)).unwrap();
        assert_eq!(sync.into_inner().time, WallClockTime::new(12, 34, 56));

        let mut rtc = FakeRtc::new(WallClockTime::MIDNIGHT);
        rtc.fail = true;
        let mut sync = TimeSync::new(rtc, 1_000);
        assert_eq!(
            sync.set(&WallClockTime::MIDNIGHT),
            Err(TimeSyncError::Write(()))
        );
    }
}
