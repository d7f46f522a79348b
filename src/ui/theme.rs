use ratatui::style::Color;

use crate::core::{ColorRgb, ColorTheme, EntryKind, NoticeLevel};

/// A color theme resolved to terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    theme: ColorTheme,
}

impl Palette {
    pub fn new(theme: ColorTheme) -> Self {
        Self { theme }
    }

    pub fn background(&self) -> Color {
        to_color(self.theme.background)
    }

    pub fn foreground(&self) -> Color {
        to_color(self.theme.foreground)
    }

    pub fn border(&self) -> Color {
        to_color(self.theme.border)
    }

    pub fn title(&self) -> Color {
        to_color(self.theme.title)
    }

    pub fn entry(&self, kind: EntryKind) -> Color {
        to_color(self.theme.entry_color(kind))
    }

    pub fn notice(&self, level: NoticeLevel) -> Color {
        to_color(self.theme.notice_color(level))
    }
}

fn to_color(color: ColorRgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColorThemeId;

    #[test]
    fn palette_maps_theme_channels() {
        let theme = ColorThemeId::Paper.theme();

        let palette = Palette::new(theme);

        let ColorRgb { r, g, b } = theme.entries.directory;
        assert_eq!(palette.entry(EntryKind::Directory), Color::Rgb(r, g, b));
        assert_ne!(palette.background(), palette.foreground());
    }
}
