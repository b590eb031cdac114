use super::grid::{Grid, Point};
use rand::{seq::IteratorRandom, Rng};
use serde::{Deserialize, Serialize};

/// Which cells new food is allowed to appear on
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum FoodPlacement {
    /// Food avoids both existing food and the snake's body
    #[default]
    AvoidSnake,

    /// Food only avoids existing food and may appear underneath the snake,
    /// where it stays hidden until the snake moves off of it
    AvoidFoodOnly,
}

impl FoodPlacement {
    pub(crate) fn avoids_snake(self) -> bool {
        self == FoodPlacement::AvoidSnake
    }
}

/// The food currently on the board.
///
/// Positions are kept in the order in which they were placed and never
/// contain duplicates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FoodSet {
    pub(super) positions: Vec<Point>,
    grid: Grid,
    capacity: usize,
}

impl FoodSet {
    /// Create an empty food set for `grid` that will hold `capacity` items
    /// once populated
    pub(crate) fn new(grid: Grid, capacity: usize) -> FoodSet {
        FoodSet {
            positions: Vec::with_capacity(capacity),
            grid,
            capacity,
        }
    }

    pub(crate) fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn contains(&self, p: Point) -> bool {
        self.positions.contains(&p)
    }

    /// Place one new item of food on a uniformly-chosen cell that neither
    /// holds food already nor satisfies `excluded`.
    ///
    /// Random cells are drawn and rejected until an acceptable one turns up;
    /// after as many failed draws as there are cells in the grid, the cell
    /// is instead chosen directly from the list of free cells.  Returns
    /// `None` if there are no free cells.
    pub(crate) fn place_one<R, F>(&mut self, rng: &mut R, excluded: F) -> Option<Point>
    where
        R: Rng,
        F: Fn(Point) -> bool,
    {
        if self.grid.width == 0 || self.grid.height == 0 {
            return None;
        }
        let is_free = |p: Point| !self.contains(p) && !excluded(p);
        let mut attempts = self.grid.cell_count();
        let pos = loop {
            if attempts == 0 {
                break self.grid.positions().filter(|&p| is_free(p)).choose(rng)?;
            }
            attempts -= 1;
            let x = rng.random_range(0..self.grid.width);
            let y = rng.random_range(0..self.grid.height);
            let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                continue;
            };
            let p = Point::new(x, y);
            if is_free(p) {
                break p;
            }
        };
        self.positions.push(pos);
        Some(pos)
    }

    /// Discard all food and place `capacity` new items.  Returns the number
    /// of items actually placed, which is less than `capacity` only if the
    /// grid ran out of free cells.
    pub(crate) fn populate<R, F>(&mut self, rng: &mut R, excluded: F) -> usize
    where
        R: Rng,
        F: Fn(Point) -> bool,
    {
        self.positions.clear();
        self.replenish(rng, excluded)
    }

    /// Place new food until the set holds `capacity` items or the grid runs
    /// out of free cells.  Returns the number of items placed.
    pub(crate) fn replenish<R, F>(&mut self, rng: &mut R, excluded: F) -> usize
    where
        R: Rng,
        F: Fn(Point) -> bool,
    {
        let mut placed = 0;
        while self.positions.len() < self.capacity {
            if self.place_one(rng, &excluded).is_none() {
                break;
            }
            placed += 1;
        }
        placed
    }

    /// If there is food at `pos`, remove it, top the set back up, and return
    /// `true`
    pub(crate) fn consume_if_matched<R, F>(&mut self, pos: Point, rng: &mut R, excluded: F) -> bool
    where
        R: Rng,
        F: Fn(Point) -> bool,
    {
        let Some(i) = self.positions.iter().position(|&p| p == pos) else {
            return false;
        };
        let _ = self.positions.remove(i);
        self.replenish(rng, excluded);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::HashSet;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn rng() -> ChaCha12Rng {
        ChaCha12Rng::seed_from_u64(RNG_SEED)
    }

    #[test]
    fn populate_fills_to_capacity() {
        let mut rng = rng();
        let grid = Grid::new(10, 10);
        let mut food = FoodSet::new(grid, 8);
        assert_eq!(food.populate(&mut rng, |_| false), 8);
        assert_eq!(food.len(), 8);
        let unique = food.positions().iter().copied().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 8);
        assert!(food.positions().iter().all(|&p| grid.contains(p)));
    }

    #[test]
    fn populate_discards_old_food() {
        let mut rng = rng();
        let mut food = FoodSet::new(Grid::new(10, 10), 2);
        food.positions = vec![Point::new(100, 100)];
        food.populate(&mut rng, |_| false);
        assert_eq!(food.len(), 2);
        assert!(!food.contains(Point::new(100, 100)));
    }

    #[test]
    fn place_one_avoids_excluded_cells() {
        let grid = Grid::new(4, 4);
        let snake = grid
            .positions()
            .filter(|p| p.y < 3)
            .collect::<HashSet<_>>();
        for seed in 0..20 {
            let mut rng = ChaCha12Rng::seed_from_u64(seed);
            let mut food = FoodSet::new(grid, 1);
            let p = food.place_one(&mut rng, |p| snake.contains(&p));
            assert!(p.is_some_and(|p| p.y == 3), "seed {seed} placed food at {p:?}");
        }
    }

    #[test]
    fn place_one_falls_back_to_only_free_cell() {
        let mut rng = rng();
        let grid = Grid::new(5, 5);
        let mut food = FoodSet::new(grid, 1);
        let free = Point::new(3, 1);
        assert_eq!(food.place_one(&mut rng, |p| p != free), Some(free));
    }

    #[test]
    fn place_one_on_full_grid() {
        let mut rng = rng();
        let mut food = FoodSet::new(Grid::new(3, 3), 1);
        assert_eq!(food.place_one(&mut rng, |_| true), None);
        assert!(food.is_empty());
    }

    #[test]
    fn replenish_stops_when_grid_is_full() {
        let mut rng = rng();
        let mut food = FoodSet::new(Grid::new(2, 2), 4);
        let snake = [Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)];
        assert_eq!(food.populate(&mut rng, |p| snake.contains(&p)), 1);
        assert_eq!(food.positions(), [Point::new(0, 1)]);
    }

    #[test]
    fn consume_if_matched_replaces_food() {
        let mut rng = rng();
        let mut food = FoodSet::new(Grid::new(10, 10), 3);
        food.positions = vec![Point::new(1, 1), Point::new(2, 2), Point::new(3, 3)];
        assert!(food.consume_if_matched(Point::new(2, 2), &mut rng, |p| p == Point::new(2, 2)));
        assert_eq!(food.len(), 3);
        assert!(!food.contains(Point::new(2, 2)));
        assert_eq!(food.positions()[..2], [Point::new(1, 1), Point::new(3, 3)]);
    }

    #[test]
    fn consume_if_matched_without_food() {
        let mut rng = rng();
        let mut food = FoodSet::new(Grid::new(10, 10), 1);
        food.positions = vec![Point::new(1, 1)];
        assert!(!food.consume_if_matched(Point::new(5, 5), &mut rng, |_| false));
        assert_eq!(food.positions(), [Point::new(1, 1)]);
    }
}
