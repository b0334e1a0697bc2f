//! Rectangular loop around the origin

use super::{Path, Point};

/// Rectangle traced at constant speed, centred on the origin
///
/// The loop starts and ends at the middle of the left edge:
///
/// ```text
///     2 -------- 3
///     |          |
///     1/6        |
///     |          |
///     5 -------- 4
/// ```
///
/// Up the left edge, across the top, down the right edge, back along the
/// bottom and up to the start again. `reversed` mirrors the loop about the
/// x axis so it winds the other way.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SquarePath {
    /// Width in mm
    pub width: f32,
    /// Height in mm
    pub height: f32,
    /// Time for one loop in microseconds (must be non-zero)
    pub period_us: u32,
    /// Wind the loop the other way
    pub reversed: bool,
}

impl SquarePath {
    /// Create a new square path
    pub const fn new(width: f32, height: f32, period_us: u32, reversed: bool) -> Self {
        Self {
            width,
            height,
            period_us,
            reversed,
        }
    }

    /// Same loop, wound the other way
    pub const fn reversed(self) -> Self {
        Self {
            reversed: !self.reversed,
            ..self
        }
    }

    /// Loop length in mm
    pub fn perimeter(&self) -> f32 {
        2.0 * (self.width + self.height)
    }

    /// Start (and end) of every loop
    pub fn start(&self) -> Point {
        Point::new(-self.width / 2.0, 0.0)
    }

    fn corners(&self) -> [Point; 6] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            Point::new(-hw, 0.0),
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
            Point::new(-hw, 0.0),
        ]
    }
}

impl Path for SquarePath {
    fn position(&self, elapsed_us: u32) -> Point {
        let period = self.period_us.max(1);
        let t = elapsed_us % period;
        let mut remaining = self.perimeter() * t as f32 / period as f32;

        let corners = self.corners();
        let mut p = corners[0];
        for pair in corners.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let len = a.distance_to(b);
            if remaining <= len {
                p = if len > 0.0 {
                    a.lerp(b, remaining / len)
                } else {
                    a
                };
                break;
            }
            remaining -= len;
            p = b;
        }

        if self.reversed {
            Point::new(p.x, -p.y)
        } else {
            p
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Point, b: Point) -> bool {
        libm::fabsf(a.x - b.x) < 1e-3 && libm::fabsf(a.y - b.y) < 1e-3
    }

    #[test]
    fn test_corners_in_order() {
        // 20 x 20, 80 mm loop in 8 s: 10 mm per second
        let square = SquarePath::new(20.0, 20.0, 8_000_000, false);

        assert!(close(square.position(0), Point::new(-10.0, 0.0)));
        assert!(close(square.position(1_000_000), Point::new(-10.0, -10.0)));
        assert!(close(square.position(3_000_000), Point::new(10.0, -10.0)));
        assert!(close(square.position(5_000_000), Point::new(10.0, 10.0)));
        assert!(close(square.position(7_000_000), Point::new(-10.0, 10.0)));
        assert!(close(square.position(7_500_000), Point::new(-10.0, 5.0)));
        assert!(close(square.position(8_000_000), Point::new(-10.0, 0.0)));
    }

    #[test]
    fn test_reversed_mirrors_y() {
        let square = SquarePath::new(20.0, 10.0, 6_000_000, false);
        let mirrored = square.reversed();
        assert!(mirrored.reversed);

        for t in [0, 500_000, 1_700_000, 3_200_000, 5_900_000] {
            let a = square.position(t);
            let b = mirrored.position(t);
            assert!(close(a, Point::new(b.x, -b.y)));
        }
    }

    #[test]
    fn test_rectangle_edges() {
        // 30 wide, 10 tall, 80 mm loop in 8 s
        let square = SquarePath::new(30.0, 10.0, 8_000_000, false);
        assert!(close(square.position(500_000), Point::new(-15.0, -5.0)));
        assert!(close(square.position(3_500_000), Point::new(15.0, -5.0)));
        assert!(close(square.position(4_500_000), Point::new(15.0, 5.0)));
    }

    proptest! {
        #[test]
        fn prop_periodic(t in 0u32..1_000_000_000, reversed in any::<bool>()) {
            let square = SquarePath::new(20.0, 16.0, 15_000_000, reversed);
            prop_assert_eq!(square.position(t), square.position(t + 15_000_000));
        }

        #[test]
        fn prop_on_outline(t in any::<u32>()) {
            let square = SquarePath::new(20.0, 16.0, 15_000_000, false);
            let p = square.position(t);
            let on_vertical = libm::fabsf(libm::fabsf(p.x) - 10.0) < 1e-3;
            let on_horizontal = libm::fabsf(libm::fabsf(p.y) - 8.0) < 1e-3;
            prop_assert!(on_vertical || on_horizontal);
            prop_assert!(libm::fabsf(p.x) <= 10.0 + 1e-3);
            prop_assert!(libm::fabsf(p.y) <= 8.0 + 1e-3);
        }
    }
}
