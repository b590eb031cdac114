use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::engine::{Direction, EndReason, GameEngine, GameState, Point};
use crate::menu::SettingsMenu;
use crate::settings::ConfigurationError;
use crate::util::{center_rect, Globals};
use crossterm::event::{poll, read, Event};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Widget},
    Frame,
};
use std::time::Instant;

/// The play screen: one round of snake plus the state needed to start the
/// next one
#[derive(Clone, Debug)]
pub(crate) struct Game<R = StdRng> {
    engine: GameEngine<R>,
    globals: Globals,
    next_tick: Option<Instant>,
}

impl<R: Rng> Game<R> {
    /// Start a round with `globals.settings`, placing food with `rng`
    ///
    /// # Errors
    ///
    /// Returns `Err` if the settings cannot be played with.
    pub(crate) fn new(globals: Globals, rng: R) -> Result<Game<R>, ConfigurationError> {
        let engine = GameEngine::new(globals.settings, rng)?;
        Ok(Game {
            engine,
            globals,
            next_tick: None,
        })
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        if self.running() {
            let interval = self.engine.settings().tick_interval();
            let when = *self
                .next_tick
                .get_or_insert_with(|| Instant::now() + interval);
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                self.next_tick = None;
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    fn advance(&mut self) {
        let tick = self.engine.tick();
        if tick.ate_food {
            log::trace!(
                "Snake is now {} segments long",
                self.engine.snake_segments().len()
            );
        }
        if let Some(reason) = tick.ended {
            log::debug!("Waiting for input after round ended ({reason})");
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        match self.engine.state() {
            GameState::Running => match cmd {
                Command::Quit => return Some(Screen::Quit),
                Command::Esc => return Some(self.settings_screen()),
                _ => {
                    let (dx, dy) = cmd.movement()?;
                    match self.engine.set_direction_vector(dx, dy) {
                        Ok(_) => (),
                        Err(e) => log::warn!("Ignoring turn: {e}"),
                    }
                }
            },
            GameState::Terminal => match cmd {
                Command::R => return Some(self.restart()),
                Command::M => return Some(self.settings_screen()),
                Command::Quit | Command::Q | Command::Esc => return Some(Screen::Quit),
                _ => (),
            },
        }
        None
    }

    /// Start a fresh round with the same settings
    fn restart(&mut self) -> Screen {
        let rng = StdRng::from_rng(&mut self.globals.rng);
        match Game::new(self.globals.clone(), rng) {
            Ok(game) => Screen::Game(Box::new(game)),
            Err(e) => {
                log::error!("Cannot restart round: {e}");
                self.settings_screen()
            }
        }
    }

    fn settings_screen(&self) -> Screen {
        Screen::Settings(SettingsMenu::new(self.globals.clone()))
    }

    fn running(&self) -> bool {
        self.engine.state() == GameState::Running
    }

    fn head_symbol(&self) -> char {
        match self.engine.heading() {
            Direction::North => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Direction::South => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Direction::East => consts::SNAKE_HEAD_EAST_SYMBOL,
            Direction::West => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [score_area, board_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled(
            format!(" Score: {}", self.engine.score()),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let grid = self.engine.grid();
        let block_size = Size {
            width: to_u16(grid.width).saturating_add(2),
            height: to_u16(grid.height).saturating_add(2),
        };
        if board_area.width < block_size.width || board_area.height < block_size.height {
            TooSmall {
                required: Size {
                    width: block_size.width,
                    height: block_size.height.saturating_add(3),
                },
            }
            .render(board_area, buf);
        } else {
            let block_area = center_rect(board_area, block_size);
            Block::bordered().render(block_area, buf);
            let mut board = Canvas {
                area: block_area.inner(Margin::new(1, 1)),
                buf,
            };
            for (i, &pos) in self.engine.food_positions().iter().enumerate() {
                let style = consts::FOOD_STYLES[i % consts::FOOD_STYLES.len()];
                board.draw_cell(pos, consts::FOOD_SYMBOL, style);
            }
            let segments = self.engine.snake_segments();
            for &pos in segments.iter().skip(1) {
                board.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
            }
            // Draw the head last so that, if it's a collision, we overwrite
            // whatever it's colliding with.  A head that went through a wall
            // is off the board, so mark the cell it left instead.
            let head = segments.front().copied();
            match self.engine.end_reason() {
                Some(EndReason::Wall) => {
                    if let Some(&pos) = segments.get(1) {
                        board.draw_cell(pos, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
                    }
                }
                Some(EndReason::SelfCollision) => {
                    if let Some(pos) = head {
                        board.draw_cell(pos, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
                    }
                }
                Some(EndReason::BoardFilled) | None => {
                    if let Some(pos) = head {
                        board.draw_cell(pos, self.head_symbol(), consts::SNAKE_HEAD_STYLE);
                    }
                }
            }
        }

        if let Some(reason) = self.engine.end_reason() {
            Line::from(format!(
                " GAME OVER! The snake {reason}. Final score: {}",
                self.engine.score()
            ))
            .render(msg1_area, buf);
            Line::from_iter([
                Span::raw(" Restart ("),
                Span::styled("r", consts::KEY_STYLE),
                Span::raw(") · Settings ("),
                Span::styled("m", consts::KEY_STYLE),
                Span::raw(") · Quit ("),
                Span::styled("q", consts::KEY_STYLE),
                Span::raw(")"),
            ])
            .render(msg2_area, buf);
        }
    }
}

fn to_u16(n: u32) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Shown in place of the board when the terminal cannot fit it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct TooSmall {
    required: Size,
}

impl Widget for TooSmall {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter([
            Line::from("Terminal too small for the board"),
            Line::from(format!(
                "Need at least {}×{}",
                self.required.width, self.required.height
            )),
        ])
        .style(consts::ERROR_STYLE)
        .centered();
        let text_area = center_rect(
            area,
            Size {
                width: area.width,
                height: 2,
            },
        );
        text.render(text_area, buf);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw `symbol` at grid cell `pos`.  Cells outside the canvas are
    /// skipped.
    fn draw_cell(&mut self, pos: Point, symbol: char, style: Style) {
        let (Ok(px), Ok(py)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        if px >= self.area.width || py >= self.area.height {
            return;
        }
        let Some(x) = self.area.x.checked_add(px) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(py) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}
