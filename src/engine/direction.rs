use super::grid::Point;
use thiserror::Error;

/// One of the four unit vectors along which the snake can move.  North is
/// towards decreasing `y`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// The `(dx, dy)` unit vector for this direction
    pub(crate) fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Return the cell one step from `pos` in this direction.  No bounds are
    /// applied; the result may lie outside the grid.
    pub(crate) fn advance(self, pos: Point) -> Point {
        pos.offset(self.delta())
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = InvalidDirection;

    fn try_from((dx, dy): (i32, i32)) -> Result<Direction, InvalidDirection> {
        match (dx, dy) {
            (0, -1) => Ok(Direction::North),
            (1, 0) => Ok(Direction::East),
            (0, 1) => Ok(Direction::South),
            (-1, 0) => Ok(Direction::West),
            _ => Err(InvalidDirection { dx, dy }),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("({dx}, {dy}) is not a unit vector along one axis")]
pub(crate) struct InvalidDirection {
    dx: i32,
    dy: i32,
}
