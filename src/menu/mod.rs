mod widgets;
use self::widgets::{Instructions, Title};
use crate::app::Screen;
use crate::command::Command;
use crate::consts;
use crate::game::Game;
use crate::settings::{Adjustable, ConfigSettings, SettingKey, SettingValue};
use crate::util::{get_display_area, EnumExt, Globals};
use crossterm::event::{read, Event};
use enum_map::Enum;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};

/// The settings screen shown before each round
#[derive(Clone, Debug)]
pub(crate) struct SettingsMenu {
    globals: Globals,
    selection: Selection,
}

impl SettingsMenu {
    pub(crate) fn new(globals: Globals) -> Self {
        SettingsMenu {
            globals,
            selection: Selection::default(),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Screen>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Screen> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit) => return Some(Screen::Quit),
            (Selection::Setting(key), Command::Home) => self.adjust(key, SettingValue::to_min),
            (Selection::Setting(key), Command::End) => self.adjust(key, SettingValue::to_max),
            (_, Command::Home) => self.selection = Selection::PlayButton,
            (_, Command::End) => self.selection = Selection::QuitButton,
            (Selection::PlayButton, Command::Enter) | (_, Command::P) => return self.play(),
            (Selection::PlayButton, Command::Prev) => self.selection = Selection::QuitButton,
            (Selection::PlayButton, Command::Down | Command::Next) => {
                self.selection = Selection::Setting(SettingKey::min());
            }
            (Selection::Setting(key), Command::Up | Command::Prev) => {
                self.selection = key.prev().map_or(Selection::PlayButton, Selection::Setting);
            }
            (Selection::Setting(key), Command::Down | Command::Next) => {
                self.selection = key.next().map_or(Selection::QuitButton, Selection::Setting);
            }
            (Selection::Setting(key), Command::Left) => self.adjust(key, SettingValue::decrease),
            (Selection::Setting(key), Command::Right) => self.adjust(key, SettingValue::increase),
            (Selection::Setting(key), Command::Space | Command::Enter) => {
                self.adjust(key, SettingValue::toggle);
            }
            (_, Command::R) => {
                log::debug!("Resetting settings to defaults");
                self.globals.settings = self.globals.defaults;
            }
            (Selection::QuitButton, Command::Enter) | (_, Command::Q | Command::Esc) => {
                return Some(Screen::Quit);
            }
            (Selection::QuitButton, Command::Next) => self.selection = Selection::PlayButton,
            (Selection::QuitButton, Command::Up | Command::Prev) => {
                self.selection = Selection::Setting(SettingKey::max());
            }
            _ => (),
        }
        None
    }

    fn adjust<F: FnOnce(&mut SettingValue)>(&mut self, key: SettingKey, func: F) {
        let mut value = self.globals.settings.get(key);
        func(&mut value);
        self.globals.settings.set(key, value);
    }

    /// Start a round with the current settings.  If the settings are invalid,
    /// the error is logged, the error line on the screen explains why, and
    /// `None` is returned.
    fn play(&mut self) -> Option<Screen> {
        let rng = StdRng::from_rng(&mut self.globals.rng);
        match Game::new(self.globals.clone(), rng) {
            Ok(game) => Some(Screen::Game(Box::new(game))),
            Err(e) => {
                log::warn!("Cannot start a round with the current settings: {e}");
                None
            }
        }
    }
}

impl Widget for &SettingsMenu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [title_area, play_area, settings_area, preview_area, error_area, quit_area, instructions_area] =
            Layout::vertical([
                Title::HEIGHT,
                1,
                SettingsPanel::HEIGHT,
                Preview::HEIGHT,
                1,
                1,
                Instructions::HEIGHT,
            ])
            .flex(Flex::Start)
            .spacing(1)
            .areas(display);

        Title.render(title_area, buf);

        button("Play", "p", self.selection == Selection::PlayButton).render(play_area, buf);

        let [settings_area] = Layout::horizontal([SettingsPanel::WIDTH])
            .flex(Flex::Center)
            .areas(settings_area);
        SettingsPanel {
            settings: &self.globals.settings,
            selection: match self.selection {
                Selection::Setting(key) => Some(key),
                _ => None,
            },
        }
        .render(settings_area, buf);

        Preview(&self.globals.settings).render(preview_area, buf);

        if let Err(e) = self.globals.settings.validate() {
            Line::styled(format!("Cannot play: {e}"), consts::ERROR_STYLE)
                .centered()
                .render(error_area, buf);
        }

        button("Quit", "q", self.selection == Selection::QuitButton).render(quit_area, buf);

        let [instructions_area] = Layout::horizontal([Instructions::WIDTH])
            .flex(Flex::Center)
            .areas(instructions_area);
        Instructions.render(instructions_area, buf);
    }
}

fn button(label: &'static str, key: &'static str, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    Line::from_iter([
        Span::styled(format!("[{label} ("), style),
        Span::styled(key, consts::KEY_STYLE.patch(style)),
        Span::styled(")]", style),
    ])
    .centered()
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Selection {
    #[default]
    PlayButton,
    Setting(SettingKey),
    QuitButton,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SettingsPanel<'a> {
    settings: &'a ConfigSettings,
    selection: Option<SettingKey>,
}

impl SettingsPanel<'_> {
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = (SettingKey::LENGTH as u16) + 2 /* for border */;
    const HORIZONTAL_PADDING: u16 = 1; // padding on each side
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 1;
    const WIDTH: u16 = 2 /* for border */ + 2 * Self::HORIZONTAL_PADDING + Self::POINTER_WIDTH + SettingKey::DISPLAY_WIDTH + Self::LABEL_VALUE_GUTTER + SettingValue::DISPLAY_WIDTH;
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Settings: ")
            .padding(Padding::horizontal(Self::HORIZONTAL_PADDING));
        let panel_area = block.inner(area);
        block.render(area, buf);
        for (key, row) in SettingKey::iter().zip(panel_area.rows()) {
            let selected = Some(key) == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(Self::POINTER_WIDTH),
                lwidth = usize::from(SettingKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(Self::LABEL_VALUE_GUTTER),
                value = self.settings.get(key),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}

/// The grid that the current settings produce
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Preview<'a>(&'a ConfigSettings);

impl Preview<'_> {
    const HEIGHT: u16 = 3;
}

impl Widget for Preview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let settings = self.0;
        let grid = settings.grid();
        let (used_width, used_height) = settings.used_window_size();
        Text::from_iter([
            Line::from(format!("Grid: {} × {} blocks", grid.width, grid.height)),
            Line::from(format!("Total blocks: {}", grid.cell_count())),
            Line::from(format!("Window used: {used_width} × {used_height}")),
        ])
        .style(consts::PREVIEW_STYLE)
        .centered()
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FoodPlacement;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    fn globals() -> Globals {
        Globals::new(ConfigSettings::default(), StdRng::seed_from_u64(0x0123456789ABCDEF))
    }

    fn press(menu: &mut SettingsMenu, code: KeyCode) -> Option<Screen> {
        menu.handle_event(Event::Key(code.into()))
    }

    fn render(menu: &SettingsMenu) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        menu.render(area, &mut buffer);
        buffer
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn draw_initial() {
        let menu = SettingsMenu::new(globals());
        let buffer = render(&menu);
        let mut expected = Buffer::with_lines([
            "                               ~ Snake Settings ~                               ",
            "                                                                                ",
            "                                   [Play (p)]                                   ",
            "                                                                                ",
            "                    ┌ Settings: ───────────────────────────┐                    ",
            "                    │   Width         ◀ ━━━●───────  800 ▶ │                    ",
            "                    │   Height        ◀ ━━━━━●─────  600 ▶ │                    ",
            "                    │   Block Size    ◀ ━━━●───────   20 ▶ │                    ",
            "                    │   Snake Length  ◀ ━●─────────    3 ▶ │                    ",
            "                    │   Food          ◁ ●──────────    1 ▶ │                    ",
            "                    │   Speed (ms)    ◀ ━━━━●──────  120 ▶ │                    ",
            "                    │   Food on Snake         [ ]          │                    ",
            "                    └──────────────────────────────────────┘                    ",
            "                                                                                ",
            "                              Grid: 40 × 30 blocks                              ",
            "                               Total blocks: 1200                               ",
            "                             Window used: 800 × 600                             ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                   [Quit (q)]                                   ",
            "                                                                                ",
            "                    ↑ ↓ select  ← → adjust  Home End min/max                    ",
            "                        Space toggle  r defaults  p play                        ",
        ]);
        expected.set_style(Rect::new(0, 0, 80, 1), consts::TITLE_STYLE);
        expected.set_style(Rect::new(35, 2, 10, 1), consts::MENU_SELECTION_STYLE);
        expected.set_style(Rect::new(42, 2, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(0, 14, 80, 3), consts::PREVIEW_STYLE);
        expected.set_style(Rect::new(42, 20, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(20, 22, 3, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(32, 22, 3, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(44, 22, 8, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(24, 23, 5, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(38, 23, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(50, 23, 1, 1), consts::KEY_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn adjust_selected_setting() {
        let mut menu = SettingsMenu::new(globals());
        assert!(press(&mut menu, KeyCode::Down).is_none());
        assert_eq!(menu.selection, Selection::Setting(SettingKey::WindowWidth));
        assert!(press(&mut menu, KeyCode::Right).is_none());
        assert_eq!(menu.globals.settings.window_width, 810);
        let buffer = render(&menu);
        assert_eq!(
            row_text(&buffer, 5),
            "                    │ » Width         ◀ ━━━●───────  810 ▶ │                    "
        );
        assert_eq!(
            row_text(&buffer, 14),
            "                              Grid: 40 × 30 blocks                              "
        );
        assert!(press(&mut menu, KeyCode::End).is_none());
        assert_eq!(menu.globals.settings.window_width, 1200);
        assert!(press(&mut menu, KeyCode::Home).is_none());
        assert_eq!(menu.globals.settings.window_width, 600);
        let buffer = render(&menu);
        assert_eq!(
            row_text(&buffer, 14),
            "                              Grid: 30 × 30 blocks                              "
        );
    }

    #[test]
    fn navigate_between_buttons_and_settings() {
        let mut menu = SettingsMenu::new(globals());
        press(&mut menu, KeyCode::Up);
        assert_eq!(menu.selection, Selection::PlayButton);
        press(&mut menu, KeyCode::Tab);
        assert_eq!(menu.selection, Selection::Setting(SettingKey::WindowWidth));
        press(&mut menu, KeyCode::BackTab);
        assert_eq!(menu.selection, Selection::PlayButton);
        press(&mut menu, KeyCode::BackTab);
        assert_eq!(menu.selection, Selection::QuitButton);
        press(&mut menu, KeyCode::Up);
        assert_eq!(menu.selection, Selection::Setting(SettingKey::FoodOnSnake));
        press(&mut menu, KeyCode::Down);
        assert_eq!(menu.selection, Selection::QuitButton);
        press(&mut menu, KeyCode::Tab);
        assert_eq!(menu.selection, Selection::PlayButton);
        press(&mut menu, KeyCode::End);
        assert_eq!(menu.selection, Selection::QuitButton);
    }

    #[test]
    fn toggle_food_on_snake() {
        let mut menu = SettingsMenu::new(globals());
        press(&mut menu, KeyCode::End);
        press(&mut menu, KeyCode::Up);
        press(&mut menu, KeyCode::Char(' '));
        assert_eq!(
            menu.globals.settings.food_placement,
            FoodPlacement::AvoidFoodOnly
        );
        let buffer = render(&menu);
        assert_eq!(
            row_text(&buffer, 11),
            "                    │ » Food on Snake         [✓]          │                    "
        );
        press(&mut menu, KeyCode::Enter);
        assert_eq!(menu.globals.settings.food_placement, FoodPlacement::AvoidSnake);
    }

    #[test]
    fn reset_restores_defaults() {
        let defaults = ConfigSettings {
            food_count: 4,
            ..ConfigSettings::default()
        };
        let mut menu = SettingsMenu::new(Globals::new(defaults, StdRng::seed_from_u64(0)));
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Left);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Right);
        assert_ne!(menu.globals.settings, defaults);
        assert!(press(&mut menu, KeyCode::Char('r')).is_none());
        assert_eq!(menu.globals.settings, defaults);
    }

    #[test]
    fn play_with_valid_settings() {
        let mut menu = SettingsMenu::new(globals());
        assert!(matches!(
            press(&mut menu, KeyCode::Enter),
            Some(Screen::Game(_))
        ));
        press(&mut menu, KeyCode::Down);
        assert!(matches!(
            press(&mut menu, KeyCode::Char('p')),
            Some(Screen::Game(_))
        ));
    }

    #[test]
    fn invalid_settings_block_play() {
        let settings = ConfigSettings {
            food_count: 0,
            ..ConfigSettings::default()
        };
        let mut menu = SettingsMenu::new(Globals::new(settings, StdRng::seed_from_u64(0)));
        assert!(press(&mut menu, KeyCode::Char('p')).is_none());
        let buffer = render(&menu);
        assert_eq!(
            row_text(&buffer, 18).trim(),
            "Cannot play: food-count must be greater than zero"
        );
        assert_eq!(buffer[(15, 18)].style().fg, consts::ERROR_STYLE.fg);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Right);
        assert_eq!(menu.globals.settings.food_count, 1);
        assert!(matches!(
            press(&mut menu, KeyCode::Char('p')),
            Some(Screen::Game(_))
        ));
    }

    #[test]
    fn quit_keys() {
        let mut menu = SettingsMenu::new(globals());
        assert!(matches!(press(&mut menu, KeyCode::Char('q')), Some(Screen::Quit)));
        assert!(matches!(press(&mut menu, KeyCode::Esc), Some(Screen::Quit)));
        press(&mut menu, KeyCode::End);
        assert!(matches!(press(&mut menu, KeyCode::Enter), Some(Screen::Quit)));
    }
}
