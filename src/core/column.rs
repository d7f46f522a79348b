use std::ops::Range;

use crate::core::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnId {
    Left,
    Mid,
    Right,
}

impl ColumnId {
    pub fn all() -> [ColumnId; 3] {
        [ColumnId::Left, ColumnId::Mid, ColumnId::Right]
    }
}

/// Screen placement of a column's inner area, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnGeometry {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ColumnGeometry {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.width)
            && y >= self.y
            && y < self.y.saturating_add(self.height)
    }
}

/// Rows and scroll offset detached from a column's geometry, used when
/// listings move between panes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnContents {
    pub rows: Vec<Entry>,
    pub scroll: usize,
}

/// One pane. Row indices in the public API are 1-based, matching the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    geometry: ColumnGeometry,
    rows: Vec<Entry>,
    scroll: usize,
}

impl Column {
    pub fn new(geometry: ColumnGeometry) -> Self {
        Self {
            geometry,
            rows: Vec::new(),
            scroll: 0,
        }
    }

    pub fn geometry(&self) -> ColumnGeometry {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: ColumnGeometry) {
        self.geometry = geometry;
        self.clamp_scroll();
    }

    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Entry> {
        index.checked_sub(1).and_then(|offset| self.rows.get(offset))
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn height(&self) -> usize {
        usize::from(self.geometry.height)
    }

    /// Replaces the rows. The scroll offset is kept, only clamped.
    pub fn set_rows(&mut self, rows: Vec<Entry>) {
        self.rows = rows;
        self.clamp_scroll();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.scroll = 0;
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    pub fn take_contents(&mut self) -> ColumnContents {
        let contents = ColumnContents {
            rows: std::mem::take(&mut self.rows),
            scroll: self.scroll,
        };
        self.scroll = 0;
        contents
    }

    pub fn put_contents(&mut self, contents: ColumnContents) {
        self.rows = contents.rows;
        self.scroll = contents.scroll;
        self.clamp_scroll();
    }

    pub fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.height())
    }

    pub fn visible_count(&self) -> usize {
        self.rows.len().saturating_sub(self.scroll).min(self.height())
    }

    /// 0-based row offsets currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        self.scroll..self.scroll + self.visible_count()
    }

    /// Scrolls by the smallest amount that puts the 1-based `cursor` on screen.
    /// Returns the signed change applied to the scroll offset.
    pub fn ensure_visible(&mut self, cursor: usize) -> isize {
        let before = self.scroll;
        if cursor <= self.scroll {
            self.scroll = cursor.saturating_sub(1);
        } else if cursor - self.scroll > self.height() {
            self.scroll = cursor - self.height();
        }
        self.clamp_scroll();
        self.scroll as isize - before as isize
    }

    /// Moves the scroll offset by `delta` rows within the legal range and
    /// returns the change actually applied.
    pub fn scroll_by(&mut self, delta: isize) -> isize {
        let before = self.scroll;
        let target = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta.unsigned_abs())
        };
        self.scroll = target.min(self.max_scroll());
        self.scroll as isize - before as isize
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|entry| entry.name() == name)
            .map(|offset| offset + 1)
    }

    /// Appends a row and returns its 1-based index.
    pub fn push(&mut self, entry: Entry) -> usize {
        self.rows.push(entry);
        self.rows.len()
    }

    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        let offset = index.checked_sub(1)?;
        if offset >= self.rows.len() {
            return None;
        }
        let entry = self.rows.remove(offset);
        self.clamp_scroll();
        Some(entry)
    }

    /// Screen row of the 1-based `index`, if it is inside the viewport.
    pub fn screen_row(&self, index: usize) -> Option<u16> {
        let offset = index.checked_sub(1)?;
        if !self.visible_range().contains(&offset) {
            return None;
        }
        let slot = u16::try_from(offset - self.scroll).ok()?;
        Some(self.geometry.y + slot)
    }

    /// 1-based row index under screen row `y`, if a row is drawn there.
    pub fn row_at(&self, y: u16) -> Option<usize> {
        if y < self.geometry.y {
            return None;
        }
        let slot = usize::from(y - self.geometry.y);
        if slot >= self.visible_count() {
            return None;
        }
        Some(self.scroll + slot + 1)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
    }
}
