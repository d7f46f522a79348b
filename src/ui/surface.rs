use ratatui::{
    buffer::{Buffer, Cell},
    layout::Rect,
    style::{Color, Style},
};

/// Cell grid the renderer draws into. Coordinates are absolute screen cells;
/// anything outside the surface is clipped.
pub trait Surface {
    fn size(&self) -> (u16, u16);

    /// Colors used by every following `fill` and `put_str`.
    fn set_colors(&mut self, foreground: Color, background: Color);

    fn fill(&mut self, area: Rect, ch: char);

    fn put_str(&mut self, x: u16, y: u16, text: &str);

    /// Copies the cells of `area` to the same area moved by (`dx`, `dy`).
    fn copy_rect(&mut self, area: Rect, dx: i16, dy: i16);

    /// Saves a copy of the visible buffer.
    fn stash(&mut self);

    /// Exchanges the visible buffer with the stashed one.
    fn swap_buffers(&mut self);
}

/// Off-screen buffers flushed through `ratatui::Terminal` once per frame.
#[derive(Debug, Clone)]
pub struct BufferSurface {
    current: Buffer,
    stashed: Buffer,
    style: Style,
}

impl BufferSurface {
    pub fn new(width: u16, height: u16) -> Self {
        let area = Rect::new(0, 0, width, height);
        Self {
            current: Buffer::empty(area),
            stashed: Buffer::empty(area),
            style: Style::default(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn buffer(&self) -> &Buffer {
        &self.current
    }

    /// Copies the visible buffer into `target`, clipped to both areas.
    pub fn blit(&self, target: &mut Buffer) {
        let area = self.current.area.intersection(target.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = target.cell_mut((x, y)) {
                    *cell = self.current[(x, y)].clone();
                }
            }
        }
    }
}

impl Surface for BufferSurface {
    fn size(&self) -> (u16, u16) {
        (self.current.area.width, self.current.area.height)
    }

    fn set_colors(&mut self, foreground: Color, background: Color) {
        self.style = Style::default().fg(foreground).bg(background);
    }

    fn fill(&mut self, area: Rect, ch: char) {
        let area = area.intersection(self.current.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = self.current.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_char(ch).set_style(self.style);
                }
            }
        }
    }

    fn put_str(&mut self, x: u16, y: u16, text: &str) {
        let area = self.current.area;
        if x >= area.right() || y >= area.bottom() {
            return;
        }
        let max_width = usize::from(area.right() - x);
        self.current.set_stringn(x, y, text, max_width, self.style);
    }

    fn copy_rect(&mut self, area: Rect, dx: i16, dy: i16) {
        let source = area.intersection(self.current.area);
        let mut cells: Vec<(u16, u16, Cell)> = Vec::new();
        for y in source.top()..source.bottom() {
            for x in source.left()..source.right() {
                let (Some(tx), Some(ty)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                cells.push((tx, ty, self.current[(x, y)].clone()));
            }
        }
        for (x, y, cell) in cells {
            if let Some(target) = self.current.cell_mut((x, y)) {
                *target = cell;
            }
        }
    }

    fn stash(&mut self) {
        self.stashed = self.current.clone();
    }

    fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.stashed);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn line(surface: &BufferSurface, y: u16) -> String {
        let (width, _) = surface.size();
        (0..width)
            .map(|x| surface.buffer()[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut surface = BufferSurface::new(5, 1);

        surface.put_str(3, 0, "abcdef");

        assert_eq!(line(&surface, 0), "   ab");
    }

    #[test]
    fn copy_rect_moves_band_up() {
        let mut surface = BufferSurface::new(3, 3);
        surface.put_str(0, 0, "aaa");
        surface.put_str(0, 1, "bbb");
        surface.put_str(0, 2, "ccc");

        surface.copy_rect(Rect::new(0, 1, 3, 2), 0, -1);

        assert_eq!(line(&surface, 0), "bbb");
        assert_eq!(line(&surface, 1), "ccc");
        assert_eq!(line(&surface, 2), "ccc");
    }

    #[test]
    fn stash_and_swap_restore_screen() {
        let mut surface = BufferSurface::new(3, 1);
        surface.put_str(0, 0, "abc");

        surface.stash();
        surface.fill(Rect::new(1, 0, 1, 1), 'x');
        assert_eq!(line(&surface, 0), "axc");
        surface.swap_buffers();

        assert_eq!(line(&surface, 0), "abc");
    }

    #[test]
    fn fill_applies_current_colors() {
        let mut surface = BufferSurface::new(2, 1);
        surface.set_colors(Color::Red, Color::Blue);

        surface.fill(Rect::new(0, 0, 2, 1), '-');

        let cell = &surface.buffer()[(1, 0)];
        assert_eq!(cell.symbol(), "-");
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(cell.bg, Color::Blue);
    }
}
