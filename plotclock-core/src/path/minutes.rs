//! Minute grid layout and glyph stitching
//!
//! Minutes 1-60 sit on a 10 x 6 grid, left to right then top to bottom,
//! with minute 0 drawn in the last cell as minute 60. During a minute the
//! pen loops around the minute's cell. When the new minute starts a row,
//! a carriage return first brings the pen over from the end of the previous
//! row; when the hour rolls over, a zigzag return walks it from the last
//! cell back to the first without crossing any glyph.

use crate::config::{
    ClockConfig, GridConfig, SquareConfig, TransitionConfig, GRID_COLUMNS, GRID_ROWS,
};

use super::{Path, Point, Polyline, SquarePath};

/// Number of drawable minute cells
const CELLS: u8 = GRID_COLUMNS * GRID_ROWS;

/// Maps (minute, time into minute) to a pen position
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MinutesPathMapper {
    grid: GridConfig,
    square: SquarePath,
    transitions: TransitionConfig,
}

impl MinutesPathMapper {
    /// Create a new mapper
    pub fn new(grid: GridConfig, square: SquareConfig, transitions: TransitionConfig) -> Self {
        Self {
            grid,
            square: SquarePath::new(square.width, square.height, square.period_us, false),
            transitions,
        }
    }

    /// Create a mapper from the clock configuration
    pub fn from_config(config: &ClockConfig) -> Self {
        Self::new(config.grid, config.square, config.transitions)
    }

    /// Grid cell for `minute`, with 0 drawn as 60
    fn cell(minute: u8) -> u8 {
        match minute % CELLS {
            0 => CELLS,
            m => m,
        }
    }

    /// Centre of the cell that shows `minute`
    pub fn cell_center(&self, minute: u8) -> Point {
        let idx = Self::cell(minute) - 1;
        let col = (idx % GRID_COLUMNS) as f32;
        let row = (idx / GRID_COLUMNS) as f32;
        self.grid.origin + Point::new(col * self.grid.column_pitch, row * self.grid.row_pitch)
    }

    /// Where the glyph loop for `minute` starts and ends
    pub fn cell_start(&self, minute: u8) -> Point {
        self.cell_center(minute) + self.square.start()
    }

    /// Glyph loop for `minute`, centred on the origin
    ///
    /// Odd minutes wind the other way.
    pub fn glyph(&self, minute: u8) -> SquarePath {
        SquarePath {
            reversed: Self::cell(minute) % 2 == 1,
            ..self.square
        }
    }

    /// Time spent on the transition into `minute` before its glyph starts
    pub fn lead_in_us(&self, minute: u8) -> u32 {
        let cell = Self::cell(minute);
        if cell == 1 {
            self.transitions.zigzag_return_us
        } else if (cell - 1) % GRID_COLUMNS == 0 {
            self.transitions.carriage_return_us
        } else {
            0
        }
    }

    /// Row change from the previous cell's start into `minute`'s start
    ///
    /// Half the row delta vertically, across to the new column, then the
    /// remaining half, so the pen runs between the rows of glyphs.
    pub fn carriage_return(&self, minute: u8) -> Polyline {
        let cell = Self::cell(minute);
        let prev = self.cell_start(cell - 1);
        let next = self.cell_start(cell);
        let mid_y = prev.y + (next.y - prev.y) / 2.0;

        Polyline::from_points(
            &[
                prev,
                Point::new(prev.x, mid_y),
                Point::new(next.x, mid_y),
                next,
            ],
            self.transitions.carriage_return_us,
        )
    }

    /// End-of-hour walk from minute 60's start back to minute 1's start
    ///
    /// Leaves the last cell into the column gap, drops below the grid,
    /// runs left past column 0, climbs to the first row and steps into
    /// minute 1.
    pub fn zigzag_return(&self) -> Polyline {
        let last = self.cell_start(CELLS);
        let first = self.cell_start(1);
        let last_center = self.cell_center(CELLS);
        let first_center = self.cell_center(1);

        let gap_x = last_center.x - self.grid.column_pitch / 2.0;
        let below_y = last_center.y + self.grid.row_pitch / 2.0;
        let left_x = first_center.x - self.grid.column_pitch / 2.0;

        Polyline::from_points(
            &[
                last,
                Point::new(gap_x, last.y),
                Point::new(gap_x, below_y),
                Point::new(left_x, below_y),
                Point::new(left_x, first.y),
                first,
            ],
            self.transitions.zigzag_return_us,
        )
    }

    /// Pen position `elapsed_us` into `minute`
    pub fn position(&self, minute: u8, elapsed_us: u32) -> Point {
        let cell = Self::cell(minute);
        let lead_in = self.lead_in_us(cell);

        if elapsed_us < lead_in {
            let transition = if cell == 1 {
                self.zigzag_return()
            } else {
                self.carriage_return(cell)
            };
            return transition.position(elapsed_us);
        }

        self.cell_center(cell) + self.glyph(cell).position(elapsed_us - lead_in)
    }
}

impl Default for MinutesPathMapper {
    fn default() -> Self {
        Self::new(
            GridConfig::default(),
            SquareConfig::default(),
            TransitionConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Point, b: Point) -> bool {
        libm::fabsf(a.x - b.x) < 1e-3 && libm::fabsf(a.y - b.y) < 1e-3
    }

    fn mapper() -> MinutesPathMapper {
        MinutesPathMapper::default()
    }

    #[test]
    fn test_grid_placement() {
        let m = mapper();
        let grid = GridConfig::default();

        assert_eq!(m.cell_center(1), grid.origin);
        assert_eq!(
            m.cell_center(11),
            grid.origin + Point::new(0.0, grid.row_pitch)
        );
        assert_eq!(
            m.cell_center(10),
            grid.origin + Point::new(9.0 * grid.column_pitch, 0.0)
        );
        assert_eq!(m.cell_center(0), m.cell_center(60));
        assert_eq!(
            m.cell_center(60),
            grid.origin + Point::new(9.0 * grid.column_pitch, 5.0 * grid.row_pitch)
        );
    }

    #[test]
    fn test_grid_holds_one_hour() {
        let m = mapper();
        let grid = GridConfig::default();
        assert_eq!(CELLS, 60);

        // Minute 60 sits in the last column of the last row
        let last_row = (GRID_ROWS - 1) as f32;
        let last_col = (GRID_COLUMNS - 1) as f32;
        assert_eq!(
            m.cell_center(60),
            grid.origin + Point::new(last_col * grid.column_pitch, last_row * grid.row_pitch)
        );
    }

    #[test]
    fn test_minute_zero_is_sixty() {
        let m = mapper();
        for t in [0, 1_000_000, 20_000_000, 59_999_999] {
            assert_eq!(m.position(0, t), m.position(60, t));
        }
    }

    #[test]
    fn test_lead_in() {
        let m = mapper();
        let transitions = TransitionConfig::default();
        assert_eq!(m.lead_in_us(1), transitions.zigzag_return_us);
        assert_eq!(m.lead_in_us(11), transitions.carriage_return_us);
        assert_eq!(m.lead_in_us(51), transitions.carriage_return_us);
        assert_eq!(m.lead_in_us(2), 0);
        assert_eq!(m.lead_in_us(10), 0);
        assert_eq!(m.lead_in_us(0), 0);
    }

    #[test]
    fn test_plain_minute_starts_at_cell_start() {
        let m = mapper();
        assert!(close(m.position(2, 0), m.cell_start(2)));
        assert!(close(m.position(37, 0), m.cell_start(37)));
        // One full glyph loop later
        let period = SquareConfig::default().period_us;
        assert!(close(m.position(37, period), m.cell_start(37)));
    }

    #[test]
    fn test_odd_minutes_wind_the_other_way() {
        let m = mapper();
        let quarter = SquareConfig::default().period_us / 8;

        // Even minutes head up (-y) first, odd minutes head down
        let even = m.position(4, quarter) - m.cell_start(4);
        let odd = m.position(5, quarter) - m.cell_start(5);
        assert!(even.y < 0.0);
        assert!(odd.y > 0.0);
    }

    #[test]
    fn test_carriage_return_joins_rows() {
        let m = mapper();
        let cr = TransitionConfig::default().carriage_return_us;

        assert!(close(m.position(11, 0), m.cell_start(10)));
        assert!(close(m.position(11, cr), m.cell_start(11)));

        // Halfway across the board, between the first and second row
        let mid = m.position(11, cr / 2);
        let row_gap_y = m.cell_start(10).y + GridConfig::default().row_pitch / 2.0;
        assert!(libm::fabsf(mid.y - row_gap_y) < 1e-3);
    }

    #[test]
    fn test_zigzag_return_goes_around_the_grid() {
        let m = mapper();
        let zz = TransitionConfig::default().zigzag_return_us;

        assert!(close(m.position(1, 0), m.cell_start(60)));
        assert!(close(m.position(1, zz), m.cell_start(1)));

        let path = m.zigzag_return();
        let points = path.points();
        assert_eq!(points.len(), 6);

        // Runs below the bottom row and left of the first column
        let grid = GridConfig::default();
        let bottom = m.cell_center(60).y;
        assert!(points[2].y > bottom && points[3].y > bottom);
        assert!(points[3].x < grid.origin.x - SquareConfig::default().width / 2.0);
    }

    #[test]
    fn test_transition_lengths() {
        let m = mapper();
        let grid = GridConfig::default();

        // Nine columns across plus one row pitch down
        let cr = m.carriage_return(21);
        let expected = 9.0 * grid.column_pitch + grid.row_pitch;
        assert!(libm::fabsf(cr.length() - expected) < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_glyph_starts_where_transition_ends(minute in 0u8..60) {
            let m = mapper();
            let lead = m.lead_in_us(minute);
            let p = m.position(minute, lead);
            prop_assert!(close(p, m.cell_start(minute)));
        }

        #[test]
        fn prop_glyph_periodic(minute in 0u8..60, t in 0u32..40_000_000) {
            let m = mapper();
            let lead = m.lead_in_us(minute);
            let period = SquareConfig::default().period_us;
            prop_assert_eq!(
                m.position(minute, lead + t),
                m.position(minute, lead + t + period)
            );
        }

        #[test]
        fn prop_glyph_stays_in_cell(minute in 0u8..60, t in 8_000_000u32..60_000_000) {
            let m = mapper();
            let square = SquareConfig::default();
            let d = m.position(minute, t) - m.cell_center(minute);
            prop_assert!(libm::fabsf(d.x) <= square.width / 2.0 + 1e-3);
            prop_assert!(libm::fabsf(d.y) <= square.height / 2.0 + 1e-3);
        }
    }
}
