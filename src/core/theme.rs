use crate::core::EntryKind;
use crate::core::user_notice::NoticeLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColorThemeId {
    #[default]
    Harbor,
    Ember,
    Moss,
    Paper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPalette {
    pub directory: ColorRgb,
    pub script: ColorRgb,
    pub plain: ColorRgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticPalette {
    pub success: ColorRgb,
    pub warn: ColorRgb,
    pub error: ColorRgb,
    pub info: ColorRgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTheme {
    pub id: ColorThemeId,
    pub name: &'static str,
    pub background: ColorRgb,
    pub foreground: ColorRgb,
    pub border: ColorRgb,
    pub title: ColorRgb,
    pub entries: EntryPalette,
    pub semantic: SemanticPalette,
}

impl ColorTheme {
    pub fn entry_color(&self, kind: EntryKind) -> ColorRgb {
        match kind {
            EntryKind::Directory => self.entries.directory,
            EntryKind::ScriptFile => self.entries.script,
            EntryKind::PlainFile => self.entries.plain,
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> ColorRgb {
        match level {
            NoticeLevel::Info => self.semantic.info,
            NoticeLevel::Success => self.semantic.success,
            NoticeLevel::Warn => self.semantic.warn,
            NoticeLevel::Error => self.semantic.error,
        }
    }
}

impl ColorThemeId {
    pub fn name(self) -> &'static str {
        self.theme().name
    }

    pub fn theme(self) -> ColorTheme {
        match self {
            ColorThemeId::Harbor => ColorTheme {
                id: self,
                name: "Harbor",
                background: ColorRgb::new(0x1B, 0x22, 0x2B),
                foreground: ColorRgb::new(0xD8, 0xDE, 0xE9),
                border: ColorRgb::new(0x4E, 0x6C, 0x92),
                title: ColorRgb::new(0x8A, 0xB4, 0xF8),
                entries: EntryPalette {
                    directory: ColorRgb::new(0x6A, 0xA0, 0xE7),
                    script: ColorRgb::new(0x5E, 0xC3, 0x8F),
                    plain: ColorRgb::new(0xD8, 0xDE, 0xE9),
                },
                semantic: SemanticPalette {
                    success: ColorRgb::new(0x5E, 0xC3, 0x8F),
                    warn: ColorRgb::new(0xF4, 0xB0, 0x4C),
                    error: ColorRgb::new(0xE3, 0x8A, 0x90),
                    info: ColorRgb::new(0x5D, 0xD0, 0xFF),
                },
            },
            ColorThemeId::Ember => ColorTheme {
                id: self,
                name: "Ember",
                background: ColorRgb::new(0x22, 0x1C, 0x1A),
                foreground: ColorRgb::new(0xE6, 0xDA, 0xCF),
                border: ColorRgb::new(0x8C, 0x5A, 0x3C),
                title: ColorRgb::new(0xF2, 0xA6, 0x66),
                entries: EntryPalette {
                    directory: ColorRgb::new(0xF2, 0xA6, 0x66),
                    script: ColorRgb::new(0xD6, 0x72, 0x78),
                    plain: ColorRgb::new(0xE6, 0xDA, 0xCF),
                },
                semantic: SemanticPalette {
                    success: ColorRgb::new(0x9C, 0xC4, 0x6C),
                    warn: ColorRgb::new(0xF7, 0xBF, 0x5C),
                    error: ColorRgb::new(0xE0, 0x5A, 0x4F),
                    info: ColorRgb::new(0xC9, 0xB1, 0x8B),
                },
            },
            ColorThemeId::Moss => ColorTheme {
                id: self,
                name: "Moss",
                background: ColorRgb::new(0x1C, 0x22, 0x1C),
                foreground: ColorRgb::new(0xCC, 0xD7, 0xD3),
                border: ColorRgb::new(0x3F, 0x4F, 0x46),
                title: ColorRgb::new(0x8A, 0xC6, 0xA5),
                entries: EntryPalette {
                    directory: ColorRgb::new(0x8A, 0xC6, 0xA5),
                    script: ColorRgb::new(0xF0, 0xB1, 0x5A),
                    plain: ColorRgb::new(0xCC, 0xD7, 0xD3),
                },
                semantic: SemanticPalette {
                    success: ColorRgb::new(0x48, 0xB8, 0x7B),
                    warn: ColorRgb::new(0xF0, 0xB1, 0x5A),
                    error: ColorRgb::new(0xDD, 0x7B, 0x80),
                    info: ColorRgb::new(0x7D, 0xAF, 0xFF),
                },
            },
            ColorThemeId::Paper => ColorTheme {
                id: self,
                name: "Paper",
                background: ColorRgb::new(0xF5, 0xF2, 0xEB),
                foreground: ColorRgb::new(0x2E, 0x2A, 0x24),
                border: ColorRgb::new(0x9A, 0x93, 0x86),
                title: ColorRgb::new(0x2F, 0x5D, 0x8A),
                entries: EntryPalette {
                    directory: ColorRgb::new(0x2F, 0x5D, 0x8A),
                    script: ColorRgb::new(0x2E, 0x7D, 0x4F),
                    plain: ColorRgb::new(0x2E, 0x2A, 0x24),
                },
                semantic: SemanticPalette {
                    success: ColorRgb::new(0x2E, 0x7D, 0x4F),
                    warn: ColorRgb::new(0xA8, 0x6A, 0x00),
                    error: ColorRgb::new(0xB0, 0x30, 0x30),
                    info: ColorRgb::new(0x2F, 0x5D, 0x8A),
                },
            },
        }
    }

    pub fn all() -> &'static [ColorThemeId] {
        &[
            ColorThemeId::Harbor,
            ColorThemeId::Ember,
            ColorThemeId::Moss,
            ColorThemeId::Paper,
        ]
    }

    pub fn from_name(name: &str) -> Option<ColorThemeId> {
        let normalized = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kinds_have_distinct_colors() {
        for id in ColorThemeId::all() {
            let theme = id.theme();
            let directory = theme.entry_color(EntryKind::Directory);
            let script = theme.entry_color(EntryKind::ScriptFile);
            let plain = theme.entry_color(EntryKind::PlainFile);

            assert_ne!(directory, script, "{}", theme.name);
            assert_ne!(directory, plain, "{}", theme.name);
            assert_ne!(script, plain, "{}", theme.name);
        }
    }

    #[test]
    fn theme_lookup_is_case_insensitive() {
        assert_eq!(ColorThemeId::from_name(" ember "), Some(ColorThemeId::Ember));
        assert_eq!(ColorThemeId::from_name("nope"), None);
    }

    #[test]
    fn notice_color_follows_level() {
        let theme = ColorThemeId::Harbor.theme();

        assert_eq!(theme.notice_color(NoticeLevel::Error), theme.semantic.error);
        assert_eq!(theme.notice_color(NoticeLevel::Info), theme.semantic.info);
    }
}
