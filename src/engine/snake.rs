use super::direction::Direction;
use super::grid::{Grid, Point};
use std::collections::VecDeque;

/// The snake's body together with its buffered turn and growth.
///
/// All positions are grid coordinates.  Direction changes are buffered in
/// `pending` and only committed at the start of the next [`advance()`], so
/// that of several turns requested between two ticks only the last one takes
/// effect.
///
/// [`advance()`]: SnakeBody::advance
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SnakeBody {
    /// The cells occupied by the snake, head first
    pub(super) segments: VecDeque<Point>,

    /// The direction in which the snake moved on the last tick
    pub(super) direction: Direction,

    /// The direction in which the snake will move on the next tick
    pub(super) pending: Direction,

    /// Whether the next [`advance()`](SnakeBody::advance) should lengthen the
    /// snake instead of moving its tail
    pub(super) growth_pending: bool,
}

impl SnakeBody {
    /// Create a snake of `length` segments with its head at `head`, facing in
    /// `direction`, with the rest of its body laid out in a straight line
    /// behind it.  A `length` of zero is treated as one.
    pub(crate) fn new(head: Point, length: usize, direction: Direction) -> SnakeBody {
        let behind = direction.reverse();
        let segments = std::iter::successors(Some(head), |&p| Some(behind.advance(p)))
            .take(length.max(1))
            .collect();
        SnakeBody {
            segments,
            direction,
            pending: direction,
            growth_pending: false,
        }
    }

    pub(crate) fn head(&self) -> Point {
        // `segments` is never empty.
        self.segments.front().copied().unwrap_or_default()
    }

    /// Return the positions of the snake's cells, head first
    pub(crate) fn segments(&self) -> &VecDeque<Point> {
        &self.segments
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn contains(&self, p: Point) -> bool {
        self.segments.contains(&p)
    }

    /// The direction committed on the most recent tick
    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// The direction that will be committed on the next tick
    pub(crate) fn pending_direction(&self) -> Direction {
        self.pending
    }

    #[cfg(test)]
    pub(crate) fn growth_pending(&self) -> bool {
        self.growth_pending
    }

    /// Request that the snake move in `direction` on the next tick.
    ///
    /// A request for the exact reverse of the currently committed direction
    /// is ignored, and `false` is returned.  Otherwise the request replaces
    /// any earlier one made since the last tick.
    pub(crate) fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.reverse() {
            false
        } else {
            self.pending = direction;
            true
        }
    }

    /// Commit the pending direction and move the head one cell in it.  The
    /// tail follows unless growth was requested, in which case the snake
    /// becomes one cell longer.
    pub(crate) fn advance(&mut self) {
        self.direction = self.pending;
        let head = self.direction.advance(self.head());
        self.segments.push_front(head);
        if self.growth_pending {
            self.growth_pending = false;
        } else {
            let _ = self.segments.pop_back();
        }
    }

    /// Lengthen the snake by one cell on the next
    /// [`advance()`](SnakeBody::advance)
    pub(crate) fn request_growth(&mut self) {
        self.growth_pending = true;
    }

    /// Test whether the head has left `grid` or overlaps another segment
    pub(crate) fn check_collision(&self, grid: Grid) -> Option<Collision> {
        let head = self.head();
        if !grid.contains(head) {
            Some(Collision::Wall)
        } else if self.segments.iter().skip(1).any(|&p| p == head) {
            Some(Collision::Body)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    Body,
}
