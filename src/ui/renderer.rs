use ratatui::{layout::Rect, style::Color};

use crate::app::{App, Damage, Preview};
use crate::core::text::{self, BOTTOM_BORDER, TOP_BORDER, VERTICAL};
use crate::core::{ColumnGeometry, ColumnId, Entry};
use crate::ui::{
    help, layout::ScreenLayout, prompt::LineEditor, surface::Surface, theme::Palette,
};

const TOO_SMALL: &str = "terminal too small";

/// Turns damage lists into the smallest set of surface calls.
#[derive(Debug)]
pub struct Renderer {
    palette: Palette,
    script_extension: String,
    layout: Option<ScreenLayout>,
    colors: Option<(Color, Color)>,
}

impl Renderer {
    pub fn new(palette: Palette, script_extension: impl Into<String>) -> Self {
        Self {
            palette,
            script_extension: script_extension.into(),
            layout: None,
            colors: None,
        }
    }

    pub fn set_layout(&mut self, layout: Option<ScreenLayout>) {
        self.layout = layout;
    }

    pub fn render(&mut self, surface: &mut dyn Surface, app: &App, damage: &[Damage]) {
        self.colors = None;
        for item in normalize(damage) {
            if item != Damage::Frame && self.layout.is_none() {
                continue;
            }
            match item {
                Damage::Frame => self.draw_frame(surface, app),
                Damage::Row { column, index } => self.draw_row(surface, app, column, index),
                Damage::Scrolled { column, delta } => {
                    self.draw_scrolled(surface, app, column, delta)
                }
                Damage::Removed { column, index } => {
                    self.draw_removed(surface, app, column, index)
                }
                Damage::Column(column) => self.repaint(surface, app, column),
                Damage::Preview => self.draw_preview(surface, app),
                Damage::Title => self.draw_title(surface, app),
                Damage::Status => self.draw_status(surface, app),
            }
        }
    }

    /// Boxed key reference centered over whatever is on screen.
    pub fn draw_help(&mut self, surface: &mut dyn Surface) {
        self.colors = None;
        let (width, height) = surface.size();
        let lines = help::lines();
        let inner = lines
            .iter()
            .map(|line| text::display_width(line))
            .max()
            .unwrap_or(0)
            .max(help::TITLE.len());
        let box_width = (inner + 2).min(usize::from(width));
        let box_height = (lines.len() + 2).min(usize::from(height));
        if box_width < 3 || box_height < 3 {
            return;
        }
        let (Ok(box_w), Ok(box_h)) = (u16::try_from(box_width), u16::try_from(box_height)) else {
            return;
        };
        let x = (width - box_w) / 2;
        let y = (height - box_h) / 2;

        self.use_colors(surface, self.palette.border(), self.palette.background());
        surface.put_str(x, y, &text::border_row(box_width, &[], TOP_BORDER));
        surface.put_str(x, y + box_h - 1, &text::border_row(box_width, &[], BOTTOM_BORDER));
        surface.fill(Rect::new(x, y + 1, 1, box_h - 2), VERTICAL);
        surface.fill(Rect::new(x + box_w - 1, y + 1, 1, box_h - 2), VERTICAL);
        if box_width > help::TITLE.len() + 2 {
            self.use_colors(surface, self.palette.title(), self.palette.background());
            surface.put_str(x + 1, y, help::TITLE);
        }
        self.use_colors(surface, self.palette.foreground(), self.palette.background());
        for (offset, line) in lines.iter().take(box_height - 2).enumerate() {
            surface.put_str(x + 1, y + 1 + offset as u16, &text::fit(box_width - 2, line));
        }
    }

    /// Input line on the status row with an inverted cell at the cursor.
    pub fn draw_prompt(&mut self, surface: &mut dyn Surface, label: &str, editor: &LineEditor) {
        self.colors = None;
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return;
        }
        let row = height - 1;
        let (before, after) = editor.split();
        let line = format!("{label}{before}{after}");
        self.use_colors(surface, self.palette.foreground(), self.palette.background());
        surface.put_str(0, row, &text::fit(usize::from(width), &line));

        let cursor_x = text::display_width(label) + text::display_width(before);
        let Ok(cursor_x) = u16::try_from(cursor_x) else {
            return;
        };
        if cursor_x >= width {
            return;
        }
        let under = after.chars().next().unwrap_or(' ');
        self.use_colors(surface, self.palette.background(), self.palette.foreground());
        surface.put_str(cursor_x, row, &under.to_string());
    }

    fn use_colors(&mut self, surface: &mut dyn Surface, foreground: Color, background: Color) {
        if self.colors != Some((foreground, background)) {
            surface.set_colors(foreground, background);
            self.colors = Some((foreground, background));
        }
    }

    fn draw_frame(&mut self, surface: &mut dyn Surface, app: &App) {
        let (width, height) = surface.size();
        self.use_colors(surface, self.palette.foreground(), self.palette.background());
        surface.fill(Rect::new(0, 0, width, height), ' ');
        let Some(layout) = self.layout else {
            if width > 0 && height > 0 {
                surface.put_str(0, 0, &text::fit(usize::from(width), TOO_SMALL));
            }
            return;
        };
        self.draw_borders(surface, &layout);
        self.draw_title(surface, app);
        self.repaint(surface, app, ColumnId::Left);
        self.repaint(surface, app, ColumnId::Mid);
        self.draw_preview(surface, app);
        self.draw_status(surface, app);
    }

    fn draw_borders(&mut self, surface: &mut dyn Surface, layout: &ScreenLayout) {
        let width = usize::from(layout.width);
        let joints = layout.joints();
        self.use_colors(surface, self.palette.border(), self.palette.background());
        surface.put_str(
            0,
            layout.top_border,
            &text::border_row(width, &joints, TOP_BORDER),
        );
        surface.put_str(
            0,
            layout.bottom_border,
            &text::border_row(width, &joints, BOTTOM_BORDER),
        );
        for x in layout.separators {
            surface.fill(
                Rect::new(x, layout.top_border + 1, 1, layout.body_height()),
                VERTICAL,
            );
        }
    }

    fn draw_title(&mut self, surface: &mut dyn Surface, app: &App) {
        let Some(layout) = self.layout else {
            return;
        };
        let selected = app.selected_entry().map(Entry::name).unwrap_or("");
        let title = format!(
            "[{}] {} | {}",
            app.parent_label,
            app.current_dir.display(),
            selected
        );
        self.use_colors(surface, self.palette.title(), self.palette.background());
        surface.put_str(
            0,
            layout.title_row,
            &text::fit(usize::from(layout.width), &title),
        );
    }

    fn draw_status(&mut self, surface: &mut dyn Surface, app: &App) {
        let Some(layout) = self.layout else {
            return;
        };
        let (color, message) = match app.status.current() {
            Some(notice) => (self.palette.notice(notice.level), notice.text.as_str()),
            None => (self.palette.foreground(), ""),
        };
        self.use_colors(surface, color, self.palette.background());
        surface.put_str(
            0,
            layout.status_row,
            &text::fit(usize::from(layout.width), message),
        );
    }

    fn repaint(&mut self, surface: &mut dyn Surface, app: &App, id: ColumnId) {
        if id == ColumnId::Right {
            self.draw_preview(surface, app);
        } else {
            self.draw_column(surface, app, id);
        }
    }

    fn draw_column(&mut self, surface: &mut dyn Surface, app: &App, id: ColumnId) {
        let column = app.column(id);
        let geometry = column.geometry();
        let visible = column.visible_count();
        for slot in 0..visible {
            self.draw_row(surface, app, id, column.scroll() + slot + 1);
        }
        self.blank(surface, geometry, visible, usize::from(geometry.height) - visible);
    }

    fn draw_preview(&mut self, surface: &mut dyn Surface, app: &App) {
        let geometry = app.right.geometry();
        match &app.preview {
            Preview::Listing => self.draw_column(surface, app, ColumnId::Right),
            Preview::Text(lines) => {
                let height = usize::from(geometry.height);
                let shown = lines.len().min(height);
                if geometry.width > 0 {
                    self.use_colors(surface, self.palette.foreground(), self.palette.background());
                    let width = usize::from(geometry.width);
                    for (slot, line) in lines.iter().take(shown).enumerate() {
                        surface.put_str(geometry.x, geometry.y + slot as u16, &text::fit(width, line));
                    }
                }
                self.blank(surface, geometry, shown, height - shown);
            }
            Preview::Blank => self.blank(surface, geometry, 0, usize::from(geometry.height)),
        }
    }

    fn draw_row(&mut self, surface: &mut dyn Surface, app: &App, id: ColumnId, index: usize) {
        let column = app.column(id);
        let geometry = column.geometry();
        if geometry.width == 0 {
            return;
        }
        let (Some(y), Some(entry)) = (column.screen_row(index), column.row(index)) else {
            return;
        };
        let color = self.palette.entry(entry.kind(&self.script_extension));
        let background = self.palette.background();
        if app.highlighted(id) == Some(index) {
            self.use_colors(surface, background, color);
        } else {
            self.use_colors(surface, color, background);
        }
        surface.put_str(
            geometry.x,
            y,
            &text::fit(usize::from(geometry.width), entry.name()),
        );
    }

    /// Draws whatever belongs in viewport slot `slot` (0-based).
    fn draw_slot(&mut self, surface: &mut dyn Surface, app: &App, id: ColumnId, slot: usize) {
        let column = app.column(id);
        let index = column.scroll() + slot + 1;
        if index <= column.len() {
            self.draw_row(surface, app, id, index);
        } else {
            self.blank(surface, column.geometry(), slot, 1);
        }
    }

    fn draw_scrolled(&mut self, surface: &mut dyn Surface, app: &App, id: ColumnId, delta: isize) {
        let geometry = app.column(id).geometry();
        let height = usize::from(geometry.height);
        let shift = delta.unsigned_abs();
        if shift == 0 {
            return;
        }
        let (Ok(shift_rows), Ok(offset)) = (u16::try_from(shift), i16::try_from(shift)) else {
            return self.repaint(surface, app, id);
        };
        if shift >= height || geometry.width == 0 {
            return self.repaint(surface, app, id);
        }
        let kept = geometry.height - shift_rows;
        if delta > 0 {
            let band = Rect::new(geometry.x, geometry.y + shift_rows, geometry.width, kept);
            surface.copy_rect(band, 0, -offset);
            for slot in height - shift..height {
                self.draw_slot(surface, app, id, slot);
            }
        } else {
            let band = Rect::new(geometry.x, geometry.y, geometry.width, kept);
            surface.copy_rect(band, 0, offset);
            for slot in 0..shift {
                self.draw_slot(surface, app, id, slot);
            }
        }
    }

    fn draw_removed(&mut self, surface: &mut dyn Surface, app: &App, id: ColumnId, index: usize) {
        let column = app.column(id);
        let geometry = column.geometry();
        let height = usize::from(geometry.height);
        let visible = column.visible_count();
        let slot = index
            .checked_sub(column.scroll() + 1)
            .filter(|slot| *slot < height);
        let Some(slot) = slot else {
            return self.repaint(surface, app, id);
        };
        if visible >= height || geometry.width == 0 {
            return self.repaint(surface, app, id);
        }
        let below = height - slot - 1;
        if below > 0 {
            let band = Rect::new(
                geometry.x,
                geometry.y + slot as u16 + 1,
                geometry.width,
                below as u16,
            );
            surface.copy_rect(band, 0, -1);
        }
        self.blank(surface, geometry, visible, 1);
    }

    fn blank(&mut self, surface: &mut dyn Surface, geometry: ColumnGeometry, from: usize, rows: usize) {
        if rows == 0 || geometry.width == 0 {
            return;
        }
        self.use_colors(surface, self.palette.foreground(), self.palette.background());
        surface.fill(
            Rect::new(geometry.x, geometry.y + from as u16, geometry.width, rows as u16),
            ' ',
        );
    }
}

/// Drops work that a later repaint covers. A frame covers everything; a
/// column repaint covers row-level damage of the same column.
fn normalize(damage: &[Damage]) -> Vec<Damage> {
    if damage.contains(&Damage::Frame) {
        return vec![Damage::Frame];
    }
    let repainted = |column: ColumnId| {
        damage.iter().any(|item| match item {
            Damage::Column(id) => *id == column,
            Damage::Preview => column == ColumnId::Right,
            _ => false,
        })
    };
    let mut normalized = Vec::with_capacity(damage.len());
    for item in damage {
        let keep = match item {
            Damage::Row { column, .. } => !repainted(*column) && !normalized.contains(item),
            Damage::Scrolled { column, .. } | Damage::Removed { column, .. } => {
                !repainted(*column)
            }
            Damage::Column(ColumnId::Right) => {
                !normalized.contains(item) && !normalized.contains(&Damage::Preview)
            }
            Damage::Preview => {
                !normalized.contains(item) && !normalized.contains(&Damage::Column(ColumnId::Right))
            }
            _ => !normalized.contains(item),
        };
        if keep {
            normalized.push(*item);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemoryFs;
    use crate::core::{ColorThemeId, CommandError, CommandExecutor, CommandRequest};
    use crate::ui::surface::{BufferSurface, testing::RecordingSurface};
    use std::path::Path;

    struct NoopExecutor;

    impl CommandExecutor for NoopExecutor {
        fn execute(&self, _request: &CommandRequest) -> Result<(), CommandError> {
            Ok(())
        }
    }

    fn sample_fs() -> MemoryFs {
        let names: Vec<String> = (0..30).map(|index| format!("f{index:02}.txt")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        MemoryFs::new()
            .with_dir("/", &["home/", "many/"])
            .with_dir("/home", &["a.txt", "sub/", "b.lua"])
            .with_dir("/home/sub", &["inner.txt"])
            .with_dir("/many", &refs)
            .with_file("/home/a.txt", &["hello", "world"])
            .with_file("/home/b.lua", &["print(1)"])
            .with_file("/home/sub/inner.txt", &["inner"])
    }

    fn renderer() -> Renderer {
        Renderer::new(Palette::new(ColorThemeId::Harbor.theme()), "lua")
    }

    fn setup(fs: &MemoryFs, path: &str, width: u16, height: u16) -> (App, Renderer, BufferSurface) {
        let layout = ScreenLayout::compute(width, height).unwrap();
        let mut app = App::load(Path::new(path), fs, 1).unwrap();
        app.resize(layout.columns, fs);
        let mut renderer = renderer();
        renderer.set_layout(Some(layout));
        let mut surface = BufferSurface::new(width, height);
        renderer.render(&mut surface, &app, &[Damage::Frame]);
        (app, renderer, surface)
    }

    fn apply(renderer: &mut Renderer, surface: &mut BufferSurface, app: &App, mut damage: Vec<Damage>) {
        damage.push(Damage::Status);
        renderer.render(surface, app, &damage);
    }

    fn assert_matches_full_render(app: &App, renderer: &mut Renderer, surface: &BufferSurface) {
        let (width, height) = surface.size();
        let mut fresh = BufferSurface::new(width, height);

        renderer.render(&mut fresh, app, &[Damage::Frame]);

        assert_eq!(surface.buffer(), fresh.buffer());
    }

    fn line(surface: &BufferSurface, y: u16) -> String {
        let (width, _) = surface.size();
        (0..width)
            .map(|x| surface.buffer()[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn clamped_cursor_move_issues_no_draw_calls() {
        let fs = sample_fs();
        let layout = ScreenLayout::compute(60, 12).unwrap();
        let mut app = App::load(Path::new("/home"), &fs, 1).unwrap();
        app.resize(layout.columns, &fs);
        let mut renderer = renderer();
        renderer.set_layout(Some(layout));
        let mut surface = RecordingSurface::new(60, 12);

        let damage = app.move_cursor(-1, &fs);
        renderer.render(&mut surface, &app, &damage);

        assert_eq!(surface.draw_calls(), 0);
    }

    #[test]
    fn frame_shows_columns_title_and_preview() {
        let fs = sample_fs();

        let (_, _, surface) = setup(&fs, "/home", 60, 12);

        assert!(line(&surface, 0).starts_with("[/] /home | a.txt"));
        assert!(line(&surface, 1).starts_with('┌'));
        assert!(line(&surface, 2).contains("home/"));
        assert!(line(&surface, 2).contains("a.txt"));
        assert!(line(&surface, 2).contains("hello"));
        assert!(line(&surface, 3).contains("world"));
        assert!(line(&surface, 10).starts_with('└'));
    }

    #[test]
    fn selected_row_is_inverted() {
        let fs = sample_fs();
        let (app, _, surface) = setup(&fs, "/home", 60, 12);
        let mid = app.mid.geometry();
        let theme = Palette::new(ColorThemeId::Harbor.theme());

        let selected = &surface.buffer()[(mid.x, mid.y)];
        let plain = &surface.buffer()[(mid.x, mid.y + 1)];

        assert_eq!(selected.fg, theme.background());
        assert_eq!(plain.bg, theme.background());
    }

    #[test]
    fn cursor_move_matches_full_render() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/home", 60, 12);

        let damage = app.move_cursor(1, &fs);
        apply(&mut renderer, &mut surface, &app, damage);

        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn scrolling_cursor_move_matches_full_render() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/many", 60, 12);

        for _ in 0..12 {
            let damage = app.move_cursor(1, &fs);
            apply(&mut renderer, &mut surface, &app, damage);
        }
        let damage = app.move_page(-1, &fs);
        apply(&mut renderer, &mut surface, &app, damage);

        assert!(app.mid.scroll() > 0);
        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn wheel_scroll_copies_band_and_matches_full_render() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/many", 60, 12);

        let damage = app.scroll(ColumnId::Mid, 3, &fs);
        apply(&mut renderer, &mut surface, &app, damage);
        let damage = app.scroll(ColumnId::Mid, -2, &fs);
        apply(&mut renderer, &mut surface, &app, damage);

        assert_eq!(app.mid.scroll(), 1);
        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn wheel_scroll_uses_copy_rect() {
        let fs = sample_fs();
        let layout = ScreenLayout::compute(60, 12).unwrap();
        let mut app = App::load(Path::new("/many"), &fs, 1).unwrap();
        app.resize(layout.columns, &fs);
        let mut renderer = renderer();
        renderer.set_layout(Some(layout));
        let mut surface = RecordingSurface::new(60, 12);

        let damage = app.scroll(ColumnId::Mid, 2, &fs);
        renderer.render(&mut surface, &app, &damage);

        assert_eq!(surface.copies.len(), 1);
        assert_eq!(surface.copies[0].2, -2);
    }

    #[test]
    fn removing_row_from_short_column_matches_full_render() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/home", 60, 12);
        app.move_cursor(1, &fs);
        renderer.render(&mut surface, &app, &[Damage::Frame]);

        let damage = app.delete_selected(&fs, &NoopExecutor);
        assert!(damage.contains(&Damage::Removed {
            column: ColumnId::Mid,
            index: 2
        }));
        apply(&mut renderer, &mut surface, &app, damage);

        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn removing_row_from_full_column_repaints() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/many", 60, 12);

        let damage = app.delete_selected(&fs, &NoopExecutor);
        apply(&mut renderer, &mut surface, &app, damage);

        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn enter_and_exit_match_full_render() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/home", 60, 12);
        app.move_cursor(1, &fs);

        let damage = app.enter_selected(&fs);
        apply(&mut renderer, &mut surface, &app, damage);
        assert_matches_full_render(&app, &mut renderer, &surface);

        let damage = app.exit_to_parent(&fs);
        apply(&mut renderer, &mut surface, &app, damage);
        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn create_entry_matches_full_render() {
        let fs = sample_fs();
        let (mut app, mut renderer, mut surface) = setup(&fs, "/home", 60, 12);

        let damage = app.create_entry("notes/", &fs, &NoopExecutor);
        apply(&mut renderer, &mut surface, &app, damage);

        assert_matches_full_render(&app, &mut renderer, &surface);
    }

    #[test]
    fn tiny_terminal_shows_notice() {
        let fs = sample_fs();
        let app = App::load(Path::new("/home"), &fs, 1).unwrap();
        let mut renderer = renderer();
        renderer.set_layout(ScreenLayout::compute(20, 3));
        let mut surface = BufferSurface::new(20, 3);

        renderer.render(&mut surface, &app, &[Damage::Frame]);

        assert_eq!(line(&surface, 0), "terminal too small  ");
    }

    #[test]
    fn colors_are_only_sent_when_they_change() {
        let fs = sample_fs();
        let layout = ScreenLayout::compute(60, 30).unwrap();
        let mut app = App::load(Path::new("/many"), &fs, 1).unwrap();
        app.resize(layout.columns, &fs);
        let mut renderer = renderer();
        renderer.set_layout(Some(layout));
        let mut surface = RecordingSurface::new(60, 30);

        renderer.render(&mut surface, &app, &[Damage::Column(ColumnId::Mid)]);

        assert_eq!(surface.strings.len(), 26);
        assert_eq!(surface.color_changes, 2);
    }

    #[test]
    fn help_overlay_is_restored_by_swapping_back() {
        let fs = sample_fs();
        let (_, mut renderer, mut surface) = setup(&fs, "/home", 80, 30);
        let before = surface.buffer().clone();

        surface.stash();
        renderer.draw_help(&mut surface);
        let overlay = surface.buffer().clone();
        surface.swap_buffers();

        assert_ne!(overlay, before);
        assert_eq!(surface.buffer(), &before);
    }

    #[test]
    fn prompt_marks_cursor_cell() {
        let mut renderer = renderer();
        let mut surface = BufferSurface::new(20, 3);
        let editor = LineEditor::new("ab");

        renderer.draw_prompt(&mut surface, "new: ", &editor);

        assert_eq!(line(&surface, 2), "new: ab             ");
        let palette = Palette::new(ColorThemeId::Harbor.theme());
        assert_eq!(surface.buffer()[(7, 2)].bg, palette.foreground());
        assert_eq!(surface.buffer()[(6, 2)].bg, palette.background());
    }

    #[test]
    fn normalize_lets_column_repaint_absorb_row_damage() {
        let damage = [
            Damage::Row {
                column: ColumnId::Mid,
                index: 1,
            },
            Damage::Column(ColumnId::Mid),
            Damage::Row {
                column: ColumnId::Left,
                index: 1,
            },
            Damage::Title,
            Damage::Title,
        ];

        let normalized = normalize(&damage);

        assert_eq!(
            normalized,
            vec![
                Damage::Column(ColumnId::Mid),
                Damage::Row {
                    column: ColumnId::Left,
                    index: 1
                },
                Damage::Title,
            ]
        );
        assert_eq!(normalize(&[Damage::Title, Damage::Frame]), vec![Damage::Frame]);
    }
}
