use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::Widget,
};

/// The heading of the settings screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Title;

impl Title {
    pub(super) const HEIGHT: u16 = 1;
}

impl Widget for Title {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Line::styled("~ Snake Settings ~", consts::TITLE_STYLE)
            .centered()
            .render(area, buf);
    }
}

/// Key bindings for the settings screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 2;
    pub(super) const WIDTH: u16 = 40;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter([
            Line::from_iter([
                Span::styled("↑ ↓", consts::KEY_STYLE),
                Span::raw(" select  "),
                Span::styled("← →", consts::KEY_STYLE),
                Span::raw(" adjust  "),
                Span::styled("Home End", consts::KEY_STYLE),
                Span::raw(" min/max"),
            ]),
            Line::from_iter([
                Span::styled("Space", consts::KEY_STYLE),
                Span::raw(" toggle  "),
                Span::styled("r", consts::KEY_STYLE),
                Span::raw(" defaults  "),
                Span::styled("p", consts::KEY_STYLE),
                Span::raw(" play"),
            ]),
        ])
        .centered();
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        text.render(area, buf);
    }
}
