use std::fmt;

/// A cell coordinate on the play field.
///
/// Coordinates are signed so that a head which has run off the edge of the
/// grid (e.g., `(-1, 5)`) can still be represented and reported.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Point {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Point {
    pub(crate) const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// Return the point offset from `self` by `(dx, dy)`
    pub(crate) fn offset(self, (dx, dy): (i32, i32)) -> Point {
        Point {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns `true` if `other` differs from `self` by exactly one unit
    /// along exactly one axis
    pub(crate) fn is_adjacent(self, other: Point) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx + dy == 1
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Point {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The dimensions of the play field in cells.  Valid coordinates are those in
/// `[0, width) × [0, height)`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Grid {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Grid {
    pub(crate) const fn new(width: u32, height: u32) -> Grid {
        Grid { width, height }
    }

    /// Total number of cells in the grid
    pub(crate) fn cell_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub(crate) fn contains(self, p: Point) -> bool {
        u32::try_from(p.x).is_ok_and(|x| x < self.width)
            && u32::try_from(p.y).is_ok_and(|y| y < self.height)
    }

    /// The cell at which a new snake's head is placed
    pub(crate) fn center(self) -> Point {
        Point::new(to_coord(self.width / 2), to_coord(self.height / 2))
    }

    /// Iterate over every cell of the grid in row-major order
    pub(crate) fn positions(self) -> impl Iterator<Item = Point> {
        let width = to_coord(self.width);
        let height = to_coord(self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Grid dimensions are derived from pixel sizes that fit comfortably in an
/// `i32`; anything larger is clamped.
fn to_coord(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Point::new(0, 0), true)]
    #[case(Point::new(9, 4), true)]
    #[case(Point::new(10, 4), false)]
    #[case(Point::new(9, 5), false)]
    #[case(Point::new(-1, 2), false)]
    #[case(Point::new(3, -1), false)]
    fn test_contains(#[case] p: Point, #[case] inside: bool) {
        assert_eq!(Grid::new(10, 5).contains(p), inside);
    }

    #[rstest]
    #[case(Grid::new(10, 10), Point::new(5, 5))]
    #[case(Grid::new(40, 30), Point::new(20, 15))]
    #[case(Grid::new(7, 3), Point::new(3, 1))]
    fn test_center(#[case] grid: Grid, #[case] center: Point) {
        assert_eq!(grid.center(), center);
    }

    #[test]
    fn positions_cover_grid() {
        let grid = Grid::new(3, 2);
        let cells = grid.positions().collect::<Vec<_>>();
        assert_eq!(
            cells,
            [
                Point::new(0, 0),
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(0, 1),
                Point::new(1, 1),
                Point::new(2, 1),
            ]
        );
        assert_eq!(grid.cell_count(), 6);
    }

    #[rstest]
    #[case(Point::new(5, 5), Point::new(6, 5), true)]
    #[case(Point::new(5, 5), Point::new(5, 4), true)]
    #[case(Point::new(5, 5), Point::new(6, 6), false)]
    #[case(Point::new(5, 5), Point::new(5, 5), false)]
    #[case(Point::new(0, 5), Point::new(-1, 5), true)]
    fn test_is_adjacent(#[case] a: Point, #[case] b: Point, #[case] adjacent: bool) {
        assert_eq!(a.is_adjacent(b), adjacent);
    }
}
