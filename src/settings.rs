use crate::engine::{FoodPlacement, Grid};
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The parameters of a round, chosen on the settings screen.
///
/// A `ConfigSettings` is a plain value: each round gets its own copy, so
/// changing the settings for the next round never affects one in progress.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct ConfigSettings {
    /// Width of the play field in pixels
    pub(crate) window_width: u32,

    /// Height of the play field in pixels
    pub(crate) window_height: u32,

    /// Side length of one grid cell in pixels
    pub(crate) cell_size: u32,

    pub(crate) initial_snake_length: usize,

    /// Number of food items kept on the board
    pub(crate) food_count: usize,

    /// Time between ticks in milliseconds
    pub(crate) tick_interval_ms: u64,

    pub(crate) food_placement: FoodPlacement,
}

impl Default for ConfigSettings {
    fn default() -> ConfigSettings {
        ConfigSettings {
            window_width: 800,
            window_height: 600,
            cell_size: 20,
            initial_snake_length: 3,
            food_count: 1,
            tick_interval_ms: 120,
            food_placement: FoodPlacement::AvoidSnake,
        }
    }
}

impl ConfigSettings {
    /// Number of grid columns.  Leftover pixels that don't make up a whole
    /// cell are unused.
    pub(crate) fn grid_width(&self) -> u32 {
        self.window_width.checked_div(self.cell_size).unwrap_or(0)
    }

    /// Number of grid rows.  Leftover pixels that don't make up a whole cell
    /// are unused.
    pub(crate) fn grid_height(&self) -> u32 {
        self.window_height.checked_div(self.cell_size).unwrap_or(0)
    }

    pub(crate) fn grid(&self) -> Grid {
        Grid::new(self.grid_width(), self.grid_height())
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The window size that the grid actually fills, in pixels
    pub(crate) fn used_window_size(&self) -> (u32, u32) {
        (
            self.grid_width().saturating_mul(self.cell_size),
            self.grid_height().saturating_mul(self.cell_size),
        )
    }

    /// Check that a round can be played with these settings and return the
    /// grid it will be played on.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any size, count, or interval is zero, if the cell size
    /// leaves no room for a grid, or if the grid has fewer cells than the
    /// initial snake and food need.
    pub(crate) fn validate(&self) -> Result<Grid, ConfigurationError> {
        let zeroes = [
            ("window-width", self.window_width == 0),
            ("window-height", self.window_height == 0),
            ("cell-size", self.cell_size == 0),
            ("initial-snake-length", self.initial_snake_length == 0),
            ("food-count", self.food_count == 0),
            ("tick-interval-ms", self.tick_interval_ms == 0),
        ];
        if let Some(&(field, _)) = zeroes.iter().find(|&&(_, zero)| zero) {
            return Err(ConfigurationError::Zero { field });
        }
        let grid = self.grid();
        if grid.width == 0 || grid.height == 0 {
            return Err(ConfigurationError::EmptyGrid {
                cell_size: self.cell_size,
                window_width: self.window_width,
                window_height: self.window_height,
            });
        }
        let required = to_u64(self.initial_snake_length).saturating_add(to_u64(self.food_count));
        if grid.cell_count() < required {
            return Err(ConfigurationError::GridTooSmall {
                cells: grid.cell_count(),
                required,
            });
        }
        Ok(grid)
    }

    pub(crate) fn get(&self, key: SettingKey) -> SettingValue {
        match key.slider_bounds() {
            Some(bounds) => {
                let value = match key {
                    SettingKey::WindowWidth => self.window_width,
                    SettingKey::WindowHeight => self.window_height,
                    SettingKey::CellSize => self.cell_size,
                    SettingKey::SnakeLength => to_u32(self.initial_snake_length),
                    SettingKey::FoodCount => to_u32(self.food_count),
                    SettingKey::TickInterval => {
                        u32::try_from(self.tick_interval_ms).unwrap_or(u32::MAX)
                    }
                    SettingKey::FoodOnSnake => 0,
                };
                Slider::new(value, bounds).into()
            }
            None => SettingValue::Bool(self.food_placement == FoodPlacement::AvoidFoodOnly),
        }
    }

    pub(crate) fn set(&mut self, key: SettingKey, value: SettingValue) {
        if key == SettingKey::FoodOnSnake {
            let on_snake: bool = value
                .try_into()
                .expect("ConfigSettings::set(FoodOnSnake, value) called with non-Bool value");
            self.food_placement = if on_snake {
                FoodPlacement::AvoidFoodOnly
            } else {
                FoodPlacement::AvoidSnake
            };
            return;
        }
        let slider: Slider = value
            .try_into()
            .expect("ConfigSettings::set() called with non-Slider value for a slider setting");
        let v = slider.value;
        match key {
            SettingKey::WindowWidth => self.window_width = v,
            SettingKey::WindowHeight => self.window_height = v,
            SettingKey::CellSize => self.cell_size = v,
            SettingKey::SnakeLength => self.initial_snake_length = to_usize(v),
            SettingKey::FoodCount => self.food_count = to_usize(v),
            SettingKey::TickInterval => self.tick_interval_ms = u64::from(v),
            SettingKey::FoodOnSnake => (),
        }
    }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigurationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("cell size {cell_size} leaves no room for a grid in a {window_width}×{window_height} window")]
    EmptyGrid {
        cell_size: u32,
        window_width: u32,
        window_height: u32,
    },
    #[error("grid has {cells} cells but the snake and food need {required}")]
    GridTooSmall { cells: u64, required: u64 },
}

/// The rows of the settings screen
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum SettingKey {
    WindowWidth,
    WindowHeight,
    CellSize,
    SnakeLength,
    FoodCount,
    TickInterval,
    FoodOnSnake,
}

impl SettingKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 13;

    pub(crate) fn iter() -> impl Iterator<Item = SettingKey> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SettingKey::WindowWidth => "Width",
            SettingKey::WindowHeight => "Height",
            SettingKey::CellSize => "Block Size",
            SettingKey::SnakeLength => "Snake Length",
            SettingKey::FoodCount => "Food",
            SettingKey::TickInterval => "Speed (ms)",
            SettingKey::FoodOnSnake => "Food on Snake",
        }
    }

    /// The range and step size of the slider for this setting, or `None` if
    /// the setting is a toggle
    fn slider_bounds(self) -> Option<SliderBounds> {
        let (min, max, step) = match self {
            SettingKey::WindowWidth => (600, 1200, 10),
            SettingKey::WindowHeight => (400, 800, 10),
            SettingKey::CellSize => (15, 30, 1),
            SettingKey::SnakeLength => (2, 10, 1),
            SettingKey::FoodCount => (1, 8, 1),
            SettingKey::TickInterval => (60, 200, 5),
            SettingKey::FoodOnSnake => return None,
        };
        Some(SliderBounds { min, max, step })
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn to_min(&mut self);
    fn to_max(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SettingValue {
    Slider,
    Bool(bool),
}

impl SettingValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 20;
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SettingValue::Slider(slider) => write!(
                f,
                "{left} {bar} {value:>4} {right}",
                left = if slider.can_decrease() { '◀' } else { '◁' },
                bar = slider.bar(),
                value = slider.value,
                right = if slider.can_increase() { '▶' } else { '▷' },
            ),
            SettingValue::Bool(b) => write!(
                f,
                "{mark:^width$}",
                mark = if b { "[✓]" } else { "[ ]" },
                width = usize::from(Self::DISPLAY_WIDTH)
            ),
        }
    }
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn toggle(&mut self) {
        *self = !*self;
    }

    fn to_min(&mut self) {
        *self = false;
    }

    fn to_max(&mut self) {
        *self = true;
    }

    fn can_increase(&self) -> bool {
        !*self
    }

    fn can_decrease(&self) -> bool {
        *self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SliderBounds {
    min: u32,
    max: u32,
    step: u32,
}

/// A numeric setting adjusted in fixed steps within a suggested range.
///
/// Values loaded from a configuration file may lie outside the range; the
/// first adjustment brings them back inside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Slider {
    value: u32,
    bounds: SliderBounds,
}

impl Slider {
    /// Number of characters in the slider's track
    const BAR_WIDTH: u32 = 11;

    fn new(value: u32, bounds: SliderBounds) -> Slider {
        Slider { value, bounds }
    }

    fn clamp_to_bounds(&mut self) {
        self.value = self.value.clamp(self.bounds.min, self.bounds.max);
    }

    /// Render the slider's track with a knob at the current value
    fn bar(self) -> String {
        let SliderBounds { min, max, .. } = self.bounds;
        let span = max.saturating_sub(min);
        let offset = self.value.clamp(min, max) - min;
        let knob = (u64::from(offset) * u64::from(Self::BAR_WIDTH - 1))
            .checked_div(u64::from(span))
            .unwrap_or(0);
        let knob = usize::try_from(knob).unwrap_or(0);
        let width = to_usize(Self::BAR_WIDTH);
        let mut bar = "━".repeat(knob);
        bar.push('●');
        bar.push_str(&"─".repeat(width.saturating_sub(knob + 1)));
        bar
    }
}

impl Adjustable for Slider {
    fn increase(&mut self) {
        if self.can_increase() {
            self.value = self.value.saturating_add(self.bounds.step);
            self.clamp_to_bounds();
        }
    }

    fn decrease(&mut self) {
        if self.can_decrease() {
            self.value = self.value.saturating_sub(self.bounds.step);
            self.clamp_to_bounds();
        }
    }

    fn toggle(&mut self) {}

    fn to_min(&mut self) {
        self.value = self.bounds.min;
    }

    fn to_max(&mut self) {
        self.value = self.bounds.max;
    }

    fn can_increase(&self) -> bool {
        self.value < self.bounds.max
    }

    fn can_decrease(&self) -> bool {
        self.value > self.bounds.min
    }
}
