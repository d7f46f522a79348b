use unicode_width::UnicodeWidthChar;

pub const TRUNCATION_MARKER: char = '…';
pub const TAB_EXPANSION: &str = "  ";
pub const HORIZONTAL: char = '─';
pub const VERTICAL: char = '│';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub left: char,
    pub joint: char,
    pub right: char,
}

pub const TOP_BORDER: BorderGlyphs = BorderGlyphs {
    left: '┌',
    joint: '┬',
    right: '┐',
};

pub const BOTTOM_BORDER: BorderGlyphs = BorderGlyphs {
    left: '└',
    joint: '┴',
    right: '┘',
};

/// Fits `text` into exactly `width` terminal cells.
///
/// Short text is padded with spaces. Long text keeps `width - 1` cells and ends
/// with [`TRUNCATION_MARKER`]. Control characters are shown as `?` so that a
/// stray newline in a file name cannot move the cursor.
pub fn fit(width: usize, text: &str) -> String {
    assert!(width > 0, "fit called with zero width");
    let total: usize = text.chars().map(|ch| cell_width(display_char(ch))).sum();
    if total <= width {
        let mut fitted: String = text.chars().map(display_char).collect();
        pad_to(&mut fitted, total, width);
        return fitted;
    }

    let budget = width - 1;
    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars().map(display_char) {
        let cells = cell_width(ch);
        if used + cells > budget {
            break;
        }
        fitted.push(ch);
        used += cells;
    }
    pad_to(&mut fitted, used, budget);
    fitted.push(TRUNCATION_MARKER);
    fitted
}

/// Number of cells `text` occupies once rendered through [`fit`].
pub fn display_width(text: &str) -> usize {
    text.chars().map(|ch| cell_width(display_char(ch))).sum()
}

pub fn expand_tabs(line: &str) -> String {
    line.replace('\t', TAB_EXPANSION)
}

/// Builds one horizontal border row. `joints` are absolute columns where the
/// vertical separators meet the row; the first and last cells use the corner
/// glyphs.
pub fn border_row(width: usize, joints: &[usize], glyphs: BorderGlyphs) -> String {
    (0..width)
        .map(|column| {
            if column == 0 {
                glyphs.left
            } else if column + 1 == width {
                glyphs.right
            } else if joints.contains(&column) {
                glyphs.joint
            } else {
                HORIZONTAL
            }
        })
        .collect()
}

fn display_char(ch: char) -> char {
    if ch.is_control() { '?' } else { ch }
}

fn cell_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn pad_to(text: &mut String, used: usize, width: usize) {
    for _ in used..width {
        text.push(' ');
    }
}
