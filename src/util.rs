use crate::consts;
use crate::settings::ConfigSettings;
use enum_map::Enum;
use rand::rngs::StdRng;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// State carried from screen to screen
#[derive(Clone, Debug)]
pub(crate) struct Globals {
    /// Settings loaded from the configuration file, restored by "reset"
    pub(crate) defaults: ConfigSettings,

    /// Settings most recently chosen on the settings screen
    pub(crate) settings: ConfigSettings,

    /// Source of randomness from which each round's generator is seeded
    pub(crate) rng: StdRng,
}

impl Globals {
    pub(crate) fn new(defaults: ConfigSettings, rng: StdRng) -> Globals {
        Globals {
            defaults,
            settings: defaults,
            rng,
        }
    }
}

pub(crate) trait EnumExt: Enum + Sized {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH.saturating_sub(1))
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize().saturating_add(1);
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size centered in `area`, shrunk to fit if
/// necessary
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}
