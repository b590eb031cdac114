//! Headless snake simulation.
//!
//! The engine knows nothing about terminals or input devices.  A front end
//! drives it by calling [`GameEngine::tick()`] at the configured interval and
//! [`GameEngine::set_direction()`] whenever the player turns, and reads its
//! state back through the query methods.
mod direction;
mod food;
mod grid;
mod snake;
pub(crate) use self::direction::{Direction, InvalidDirection};
pub(crate) use self::food::{FoodPlacement, FoodSet};
pub(crate) use self::grid::{Grid, Point};
pub(crate) use self::snake::{Collision, SnakeBody};
use crate::settings::{ConfigSettings, ConfigurationError};
use rand::Rng;
use std::collections::VecDeque;

/// Points awarded for each item of food eaten
pub(crate) const SCORE_PER_FOOD: u32 = 10;

/// A single round of snake
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameEngine<R> {
    rng: R,
    settings: ConfigSettings,
    grid: Grid,
    snake: SnakeBody,
    food: FoodSet,
    score: u32,
    state: GameState,
    end_reason: Option<EndReason>,
}

impl<R: Rng> GameEngine<R> {
    /// Start a new round with the given settings, using `rng` to place food.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the settings are invalid or describe a grid too small
    /// to hold the initial snake and food.
    pub(crate) fn new(settings: ConfigSettings, mut rng: R) -> Result<GameEngine<R>, ConfigurationError> {
        let grid = settings.validate()?;
        let snake = SnakeBody::new(
            grid.center(),
            settings.initial_snake_length,
            Direction::East,
        );
        let mut food = FoodSet::new(grid, settings.food_count);
        let avoid_snake = settings.food_placement.avoids_snake();
        food.populate(&mut rng, |p| avoid_snake && snake.contains(p));
        log::info!(
            "Starting round on {grid} grid with snake of length {} and {} food",
            snake.len(),
            food.len()
        );
        Ok(GameEngine {
            rng,
            settings,
            grid,
            snake,
            food,
            score: 0,
            state: GameState::Running,
            end_reason: None,
        })
    }

    /// Advance the simulation by one step.  Does nothing once the round has
    /// ended.
    pub(crate) fn tick(&mut self) -> Tick {
        if self.state == GameState::Terminal {
            return Tick::default();
        }
        let old_head = self.snake.head();
        self.snake.advance();
        let head = self.snake.head();
        debug_assert!(
            old_head.is_adjacent(head),
            "snake moved from {old_head} to non-adjacent {head}"
        );
        let avoid_snake = self.settings.food_placement.avoids_snake();
        let snake = &self.snake;
        let ate_food = self
            .food
            .consume_if_matched(head, &mut self.rng, |p| avoid_snake && snake.contains(p));
        if ate_food {
            self.snake.request_growth();
            self.score = self.score.saturating_add(SCORE_PER_FOOD);
            log::debug!("Ate food at {head}; score is now {}", self.score);
            if self.food.len() < self.food.capacity() {
                log::warn!(
                    "Only room for {} of {} food items",
                    self.food.len(),
                    self.food.capacity()
                );
            }
        }
        let ended = match self.snake.check_collision(self.grid) {
            Some(Collision::Wall) => Some(EndReason::Wall),
            Some(Collision::Body) => Some(EndReason::SelfCollision),
            // With no free cell left, every move on the next tick is a
            // collision, so end the round now with the same score.
            None if self.food.is_empty() => Some(EndReason::BoardFilled),
            None => None,
        };
        if let Some(reason) = ended {
            self.state = GameState::Terminal;
            self.end_reason = Some(reason);
            log::info!("Game over ({reason}) with score {}", self.score);
        }
        Tick { ate_food, ended }
    }
}

impl<R> GameEngine<R> {
    /// Request that the snake turn to `direction` on the next tick.  Returns
    /// `false` if the request was rejected for reversing the snake.
    pub(crate) fn set_direction(&mut self, direction: Direction) -> bool {
        let accepted = self.snake.set_direction(direction);
        if !accepted {
            log::trace!(
                "Ignoring turn {direction:?} that would reverse the snake; next move is {:?}",
                self.snake.pending_direction()
            );
        }
        accepted
    }

    /// Like [`set_direction()`](GameEngine::set_direction), but takes the
    /// direction as a `(dx, dy)` vector.
    ///
    /// # Errors
    ///
    /// Returns `Err` without changing any state if the vector is not one of
    /// the four unit vectors.
    pub(crate) fn set_direction_vector(&mut self, dx: i32, dy: i32) -> Result<bool, InvalidDirection> {
        let direction = Direction::try_from((dx, dy))?;
        Ok(self.set_direction(direction))
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    /// Why the round ended, or `None` while it is still running
    pub(crate) fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// The cells occupied by the snake, head first
    pub(crate) fn snake_segments(&self) -> &VecDeque<Point> {
        self.snake.segments()
    }

    /// The direction the snake is facing
    pub(crate) fn heading(&self) -> Direction {
        self.snake.direction()
    }

    /// The cells holding food, in the order they were placed
    pub(crate) fn food_positions(&self) -> &[Point] {
        self.food.positions()
    }

    pub(crate) fn grid(&self) -> Grid {
        self.grid
    }

    pub(crate) fn settings(&self) -> ConfigSettings {
        self.settings
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum GameState {
    Running,
    Terminal,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum EndReason {
    /// The snake's head left the grid
    Wall,

    /// The snake's head ran into its body
    SelfCollision,

    /// The snake has filled the board and there are no more cells to place
    /// food in.
    BoardFilled,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EndReason::Wall => "hit the wall",
            EndReason::SelfCollision => "hit itself",
            EndReason::BoardFilled => "filled the board",
        };
        f.pad(s)
    }
}

/// What happened during a call to [`GameEngine::tick()`]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Tick {
    pub(crate) ate_food: bool,
    pub(crate) ended: Option<EndReason>,
}
