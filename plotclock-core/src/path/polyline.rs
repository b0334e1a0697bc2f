//! Constant-speed traversal of a short waypoint list
//!
//! Used to stitch one minute glyph to the next when the pen has to cross
//! the board (end of a row, end of the hour).

use heapless::Vec;

use super::{Path, Point};

/// Maximum number of waypoints in a polyline
pub const MAX_WAYPOINTS: usize = 8;

/// Open polyline walked once over a fixed duration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polyline {
    points: Vec<Point, MAX_WAYPOINTS>,
    duration_us: u32,
}

impl Polyline {
    /// Build a polyline from waypoints; anything past [`MAX_WAYPOINTS`] is dropped
    pub fn from_points(points: &[Point], duration_us: u32) -> Self {
        Self {
            points: points.iter().take(MAX_WAYPOINTS).copied().collect(),
            duration_us,
        }
    }

    /// Waypoints in traversal order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Time to walk the whole polyline
    pub fn duration_us(&self) -> u32 {
        self.duration_us
    }

    /// Total length in mm
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .sum()
    }
}

impl Path for Polyline {
    fn position(&self, elapsed_us: u32) -> Point {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Point::ZERO,
        };

        if elapsed_us >= self.duration_us {
            return last;
        }

        let total = self.length();
        if total <= 0.0 {
            return first;
        }

        let mut remaining = total * elapsed_us as f32 / self.duration_us as f32;
        for pair in self.points.windows(2) {
            let len = pair[0].distance_to(pair[1]);
            if remaining <= len && len > 0.0 {
                return pair[0].lerp(pair[1], remaining / len);
            }
            remaining -= len;
        }

        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        libm::fabsf(a.x - b.x) < 1e-3 && libm::fabsf(a.y - b.y) < 1e-3
    }

    #[test]
    fn test_constant_speed() {
        // Two 10 mm legs and one 20 mm leg, 40 mm in 4 s
        let path = Polyline::from_points(
            &[
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(-10.0, 10.0),
            ],
            4_000_000,
        );

        assert_eq!(path.length(), 40.0);
        assert!(close(path.position(0), Point::new(0.0, 0.0)));
        assert!(close(path.position(500_000), Point::new(5.0, 0.0)));
        assert!(close(path.position(1_500_000), Point::new(10.0, 5.0)));
        assert!(close(path.position(3_000_000), Point::new(0.0, 10.0)));
    }

    #[test]
    fn test_clamps_at_end() {
        let path = Polyline::from_points(&[Point::new(1.0, 2.0), Point::new(3.0, 2.0)], 1000);
        assert_eq!(path.position(1000), Point::new(3.0, 2.0));
        assert_eq!(path.position(u32::MAX), Point::new(3.0, 2.0));
    }

    #[test]
    fn test_degenerate_polylines() {
        let empty = Polyline::from_points(&[], 1000);
        assert_eq!(empty.position(10), Point::ZERO);

        let single = Polyline::from_points(&[Point::new(4.0, 4.0)], 1000);
        assert_eq!(single.position(10), Point::new(4.0, 4.0));

        // Repeated waypoints do not stall the walk
        let repeated = Polyline::from_points(
            &[Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, 8.0)],
            1000,
        );
        assert!(close(repeated.position(500), Point::new(0.0, 4.0)));
    }

    #[test]
    fn test_too_many_points_truncated() {
        let points = [Point::ZERO; MAX_WAYPOINTS + 3];
        let path = Polyline::from_points(&points, 1000);
        assert_eq!(path.points().len(), MAX_WAYPOINTS);
        assert_eq!(path.duration_us(), 1000);
    }
}
