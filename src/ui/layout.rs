use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::ColumnGeometry;

pub const MIN_WIDTH: u16 = 16;
pub const MIN_HEIGHT: u16 = 5;

/// Fixed screen regions: title row, bordered three-column body and status row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub width: u16,
    pub height: u16,
    pub title_row: u16,
    pub top_border: u16,
    pub bottom_border: u16,
    pub status_row: u16,
    pub columns: [ColumnGeometry; 3],
    /// x of every vertical separator, outer edges included.
    pub separators: [u16; 4],
}

impl ScreenLayout {
    /// `None` when the terminal cannot fit one row per column.
    pub fn compute(width: u16, height: u16) -> Option<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return None;
        }
        let body = Rect::new(0, 2, width - 1, height - 4);
        let chunks = Layout::horizontal([
            Constraint::Ratio(1, 5),
            Constraint::Ratio(2, 5),
            Constraint::Ratio(2, 5),
        ])
        .split(body);
        // Each chunk starts with its separator cell.
        let inner = |chunk: Rect| {
            ColumnGeometry::new(
                chunk.x + 1,
                body.y,
                chunk.width.saturating_sub(1),
                body.height,
            )
        };
        Some(Self {
            width,
            height,
            title_row: 0,
            top_border: 1,
            bottom_border: height - 2,
            status_row: height - 1,
            columns: [inner(chunks[0]), inner(chunks[1]), inner(chunks[2])],
            separators: [chunks[0].x, chunks[1].x, chunks[2].x, width - 1],
        })
    }

    pub fn body_height(&self) -> u16 {
        self.bottom_border - self.top_border - 1
    }

    /// Separators between columns, excluding the outer edges.
    pub fn joints(&self) -> [usize; 2] {
        [usize::from(self.separators[1]), usize::from(self.separators[2])]
    }
}
