//! Straight back-and-forth stroke along y

use super::{Path, Point};

/// Vertical stroke at `x = amplitude / 2`
///
/// The first half period climbs from `-S/2` to the centre line `y = 0`;
/// the second half restarts at the centre line and runs back out toward
/// `-S/2`, where the next period picks up. The stroke never reaches `+S/2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinePath {
    /// Stroke length in mm
    pub amplitude: f32,
    /// Period in microseconds (must be non-zero)
    pub period_us: u32,
}

impl LinePath {
    /// Create a new line path
    pub const fn new(amplitude: f32, period_us: u32) -> Self {
        Self {
            amplitude,
            period_us,
        }
    }
}

impl Path for LinePath {
    fn position(&self, elapsed_us: u32) -> Point {
        let period = self.period_us.max(1);
        let t = elapsed_us % period;
        let half = period / 2;
        let s = self.amplitude;
        let d = period as f32;

        let y = if t < half {
            -s / 2.0 + s * t as f32 / d
        } else {
            -s * (t - half) as f32 / d
        };

        Point::new(s / 2.0, y)
    }
}
