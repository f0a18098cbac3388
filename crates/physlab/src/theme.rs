//! The colour palette.
//!
//! There is exactly one theme and it is dark. Renderers and the terminal
//! host read [`THEME`] directly; nothing switches or persists it.

use crate::scene::Rgb;

/// Semantic colour tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Canvas background.
    pub background: Rgb,
    /// Ground, axes and reference lines.
    pub guide: Rgb,
    /// Secondary text and inactive elements.
    pub muted: Rgb,
    /// Primary text.
    pub text: Rgb,
    /// Highlight for the selected tab and parameter.
    pub accent: Rgb,
    /// Moving bodies.
    pub body: Rgb,
    /// Fixed anchors, walls, obstacles.
    pub anchor: Rgb,
    /// Motion trails and history plots.
    pub trail: Rgb,
    /// Velocity arrows.
    pub velocity: Rgb,
    /// Force / acceleration arrows.
    pub force: Rgb,
    /// Slow end of the speed gradient.
    pub cold: Rgb,
    /// Fast end of the speed gradient.
    pub hot: Rgb,
}

impl Theme {
    /// The dark palette.
    pub const DARK: Theme = Theme {
        background: Rgb::new(0x11, 0x14, 0x1c),
        guide: Rgb::new(0x3b, 0x42, 0x52),
        muted: Rgb::new(0x6b, 0x72, 0x80),
        text: Rgb::new(0xe5, 0xe7, 0xeb),
        accent: Rgb::new(0x8b, 0x5c, 0xf6),
        body: Rgb::new(0xf5, 0x9e, 0x0b),
        anchor: Rgb::new(0x94, 0xa3, 0xb8),
        trail: Rgb::new(0x38, 0xbd, 0xf8),
        velocity: Rgb::new(0x34, 0xd3, 0x99),
        force: Rgb::new(0xf8, 0x71, 0x71),
        cold: Rgb::new(0x3b, 0x82, 0xf6),
        hot: Rgb::new(0xef, 0x44, 0x44),
    };

    /// Maps `t` in `[0, 1]` onto the cold→hot gradient.
    pub fn heat(&self, t: f64) -> Rgb {
        self.cold.blend(self.hot, t)
    }
}

/// The active theme.
pub const THEME: Theme = Theme::DARK;
