use std::path::{Path, PathBuf};

use crate::core::{
    Column, ColumnContents, ColumnGeometry, ColumnId, CommandExecutor, CommandRequest, Entry,
    Filesystem, FsError, ROOT_ENTRY, StatusLine, copy_command, fuzzy_find, make_dir_command,
    remove_command, rename_command, touch_command,
};
use crate::error::AppResult;

/// Screen regions invalidated by a state transition. Row indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    Row { column: ColumnId, index: usize },
    Scrolled { column: ColumnId, delta: isize },
    Removed { column: ColumnId, index: usize },
    Column(ColumnId),
    Preview,
    Title,
    Status,
    Frame,
}

/// What the right column shows. `Listing` means the right column's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Blank,
    Listing,
    Text(Vec<String>),
}

#[derive(Debug)]
pub struct App {
    pub current_dir: PathBuf,
    pub parent_label: String,
    pub left: Column,
    pub mid: Column,
    pub right: Column,
    /// Row of the current directory inside the left column.
    pub left_cursor: Option<usize>,
    /// 1-based row in the mid column; `None` exactly when the mid column is empty.
    pub cursor: Option<usize>,
    pub preview: Preview,
    pub clipboard: Option<PathBuf>,
    pub status: StatusLine,
    scroll_multiplier: usize,
}

impl App {
    pub fn load(start_dir: &Path, fs: &dyn Filesystem, scroll_multiplier: usize) -> AppResult<Self> {
        let current_dir = fs.resolve(start_dir)?;
        let mut app = Self {
            current_dir: current_dir.clone(),
            parent_label: String::new(),
            left: Column::default(),
            mid: Column::default(),
            right: Column::default(),
            left_cursor: None,
            cursor: None,
            preview: Preview::Blank,
            clipboard: None,
            status: StatusLine::new(),
            scroll_multiplier: scroll_multiplier.max(1),
        };
        app.rebuild_at(current_dir, fs)?;
        Ok(app)
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.cursor.and_then(|index| self.mid.row(index))
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry()
            .map(|entry| child_path(&self.current_dir, entry))
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        match id {
            ColumnId::Left => &self.left,
            ColumnId::Mid => &self.mid,
            ColumnId::Right => &self.right,
        }
    }

    fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        match id {
            ColumnId::Left => &mut self.left,
            ColumnId::Mid => &mut self.mid,
            ColumnId::Right => &mut self.right,
        }
    }

    /// Highlighted row of a column, if any.
    pub fn highlighted(&self, id: ColumnId) -> Option<usize> {
        match id {
            ColumnId::Left => self.left_cursor,
            ColumnId::Mid => self.cursor,
            ColumnId::Right => None,
        }
    }

    pub fn resize(&mut self, geometries: [ColumnGeometry; 3], fs: &dyn Filesystem) -> Vec<Damage> {
        let [left, mid, right] = geometries;
        self.left.set_geometry(left);
        self.mid.set_geometry(mid);
        self.right.set_geometry(right);
        if let Some(index) = self.left_cursor {
            self.left.ensure_visible(index);
        }
        self.follow_cursor();
        if matches!(self.preview, Preview::Text(_)) {
            self.update_preview(fs);
        }
        vec![Damage::Frame]
    }

    pub fn move_cursor(&mut self, delta: isize, fs: &dyn Filesystem) -> Vec<Damage> {
        let Some(current) = self.cursor else {
            return Vec::new();
        };
        let target = current.saturating_add_signed(delta);
        self.select(target, fs)
    }

    pub fn move_cursor_to(&mut self, index: usize, fs: &dyn Filesystem) -> Vec<Damage> {
        if self.cursor.is_none() {
            return Vec::new();
        }
        self.select(index, fs)
    }

    pub fn move_page(&mut self, pages: isize, fs: &dyn Filesystem) -> Vec<Damage> {
        let height = self.mid.height().max(1) as isize;
        self.move_cursor(pages.saturating_mul(height), fs)
    }

    pub fn move_to_last(&mut self, fs: &dyn Filesystem) -> Vec<Damage> {
        let last = self.mid.len();
        self.move_cursor_to(last, fs)
    }

    fn select(&mut self, target: usize, fs: &dyn Filesystem) -> Vec<Damage> {
        let Some(current) = self.cursor else {
            return Vec::new();
        };
        let target = target.clamp(1, self.mid.len());
        if target == current {
            return Vec::new();
        }
        self.cursor = Some(target);
        let mut damage = Vec::new();
        let delta = self.mid.ensure_visible(target);
        if delta != 0 {
            damage.push(Damage::Scrolled {
                column: ColumnId::Mid,
                delta,
            });
        }
        damage.push(Damage::Row {
            column: ColumnId::Mid,
            index: current,
        });
        damage.push(Damage::Row {
            column: ColumnId::Mid,
            index: target,
        });
        self.update_preview(fs);
        damage.extend([Damage::Preview, Damage::Title]);
        damage
    }

    /// Scroll-wheel input. The mid column drags the cursor along so it stays
    /// on screen.
    pub fn scroll(&mut self, column: ColumnId, steps: isize, fs: &dyn Filesystem) -> Vec<Damage> {
        let delta = steps.saturating_mul(self.scroll_multiplier as isize);
        let applied = self.column_mut(column).scroll_by(delta);
        if applied == 0 {
            return Vec::new();
        }
        let mut damage = vec![Damage::Scrolled {
            column,
            delta: applied,
        }];
        if column != ColumnId::Mid {
            return damage;
        }
        let Some(current) = self.cursor else {
            return damage;
        };
        let first = self.mid.scroll() + 1;
        let last = self.mid.scroll() + self.mid.visible_count();
        let target = current.clamp(first, last);
        if target != current {
            self.cursor = Some(target);
            damage.push(Damage::Row {
                column: ColumnId::Mid,
                index: target,
            });
            self.update_preview(fs);
            damage.extend([Damage::Preview, Damage::Title]);
        }
        damage
    }

    /// Pointer press at screen cell (`x`, `y`).
    pub fn click(&mut self, x: u16, y: u16, fs: &dyn Filesystem) -> Vec<Damage> {
        if self.left.geometry().contains(x, y) {
            return self.exit_to_parent(fs);
        }
        if self.mid.geometry().contains(x, y) {
            let Some(index) = self.mid.row_at(y) else {
                return Vec::new();
            };
            if Some(index) == self.cursor {
                return self.enter_selected(fs);
            }
            return self.move_cursor_to(index, fs);
        }
        if self.right.geometry().contains(x, y) && self.preview == Preview::Listing {
            let index = self.right.row_at(y);
            let mut damage = self.enter_selected(fs);
            if let Some(index) = index {
                damage.extend(self.move_cursor_to(index, fs));
            }
            return damage;
        }
        Vec::new()
    }

    /// Descends into the selected directory by shifting columns to the left.
    pub fn enter_selected(&mut self, fs: &dyn Filesystem) -> Vec<Damage> {
        let Some(entry) = self.selected_entry().cloned() else {
            return Vec::new();
        };
        if !entry.is_dir() {
            return Vec::new();
        }
        let target = child_path(&self.current_dir, &entry);
        if self.preview != Preview::Listing {
            match fs.list(&target) {
                Ok(rows) => self.right.set_rows(rows),
                Err(error) => {
                    self.status.error(error.to_string());
                    return Vec::new();
                }
            }
        }
        tracing::debug!("entering {}", target.display());

        let left_cursor = self.cursor;
        let mid = self.mid.take_contents();
        let right = self.right.take_contents();
        self.left.put_contents(mid);
        self.mid.put_contents(right);
        self.left_cursor = left_cursor;
        if let Some(index) = left_cursor {
            self.left.ensure_visible(index);
        }
        self.current_dir = target;
        self.parent_label = parent_label_of(fs, &self.current_dir);
        self.cursor = first_row(self.mid.len());
        self.follow_cursor();
        self.update_preview(fs);
        shift_damage()
    }

    /// Ascends one level by shifting columns to the right. The directory just
    /// left becomes the selection.
    pub fn exit_to_parent(&mut self, fs: &dyn Filesystem) -> Vec<Damage> {
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            self.status.warn("already at root");
            return Vec::new();
        };
        let Some(exited) = fs.path_segments(&self.current_dir).pop() else {
            self.status.warn("already at root");
            return Vec::new();
        };
        let exited = Entry::directory(&exited);
        let grandparent_rows = match parent_rows(fs, &parent) {
            Ok(rows) => rows,
            Err(error) => {
                self.status.error(error.to_string());
                return Vec::new();
            }
        };
        if self.left.index_of(exited.name()).is_none() {
            tracing::warn!(
                "{} not found in {}; reloading",
                exited.name(),
                parent.display()
            );
            match fs.list(&parent) {
                Ok(rows) => self.left.set_rows(rows),
                Err(error) => {
                    self.status.error(error.to_string());
                    return Vec::new();
                }
            }
        }
        tracing::debug!("leaving {} for {}", self.current_dir.display(), parent.display());

        let mid = self.mid.take_contents();
        let left = self.left.take_contents();
        self.right.put_contents(ColumnContents {
            rows: mid.rows,
            scroll: 0,
        });
        self.preview = Preview::Listing;
        self.mid.put_contents(left);
        self.left.set_rows(grandparent_rows);
        self.left.reset_scroll();
        self.current_dir = parent;
        self.sync_parent(fs);

        self.cursor = self.mid.index_of(exited.name());
        if self.cursor.is_none() {
            self.cursor = first_row(self.mid.len());
            self.update_preview(fs);
        }
        self.follow_cursor();
        shift_damage()
    }

    /// Re-lists parent and current directory, keeping the selection by name
    /// when it still exists.
    pub fn refresh(&mut self, fs: &dyn Filesystem) -> Vec<Damage> {
        let selected = self.selected_entry().map(|entry| entry.name().to_string());
        self.refresh_selecting(selected.as_deref(), fs)
    }

    fn refresh_selecting(&mut self, name: Option<&str>, fs: &dyn Filesystem) -> Vec<Damage> {
        let previous = self.cursor;
        if let Err(error) = self.reload_lists(fs) {
            self.status.error(error.to_string());
            return Vec::new();
        }
        self.cursor = name
            .and_then(|name| self.mid.index_of(name))
            .or_else(|| clamp_cursor(previous, self.mid.len()));
        self.follow_cursor();
        self.update_preview(fs);
        shift_damage()
    }

    pub fn jump_to(&mut self, path: &Path, fs: &dyn Filesystem) -> Vec<Damage> {
        let target = match fs.resolve(path) {
            Ok(target) => target,
            Err(error) => {
                self.status.error(error.to_string());
                return Vec::new();
            }
        };
        if !fs.is_directory(&target) {
            self.status.warn(format!("not a directory: {}", target.display()));
            return Vec::new();
        }
        if let Err(error) = self.rebuild_at(target, fs) {
            self.status.error(error.to_string());
            return Vec::new();
        }
        shift_damage()
    }

    pub fn reload_preview(&mut self, fs: &dyn Filesystem) -> Vec<Damage> {
        self.update_preview(fs);
        vec![Damage::Preview]
    }

    pub fn fuzzy_goto(&mut self, query: &str, fs: &dyn Filesystem) -> Vec<Damage> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        match fuzzy_find(self.mid.rows(), query, self.cursor) {
            Some(index) => self.move_cursor_to(index, fs),
            None => {
                self.status.warn(format!("could not find \"{query}\""));
                Vec::new()
            }
        }
    }

    /// Creates a file, or a directory when `input` ends with `/`. The new row
    /// is appended without re-listing.
    pub fn create_entry(
        &mut self,
        input: &str,
        fs: &dyn Filesystem,
        executor: &dyn CommandExecutor,
    ) -> Vec<Damage> {
        let entry = match entry_from_input(input) {
            Ok(Some(entry)) => entry,
            Ok(None) => return Vec::new(),
            Err(reason) => {
                self.status.warn(reason);
                return Vec::new();
            }
        };
        if self.name_taken(entry.file_name()) {
            self.status.warn(format!("{} already exists", entry.file_name()));
            return Vec::new();
        }
        let path = child_path(&self.current_dir, &entry);
        let command = if entry.is_dir() {
            make_dir_command(&path)
        } else {
            touch_command(&path)
        };
        if let Err(error) = executor.execute(&CommandRequest::captured(&self.current_dir, command)) {
            self.status.error(error.to_string());
            return Vec::new();
        }
        tracing::info!("created {}", path.display());
        self.status.success(format!("created {}", entry.name()));

        let previous = self.cursor;
        let index = self.mid.push(entry);
        self.cursor = Some(index);
        let mut damage = Vec::new();
        let delta = self.mid.ensure_visible(index);
        if delta != 0 {
            damage.push(Damage::Scrolled {
                column: ColumnId::Mid,
                delta,
            });
        }
        if let Some(previous) = previous {
            damage.push(Damage::Row {
                column: ColumnId::Mid,
                index: previous,
            });
        }
        damage.push(Damage::Row {
            column: ColumnId::Mid,
            index,
        });
        self.update_preview(fs);
        damage.extend([Damage::Preview, Damage::Title]);
        damage
    }

    pub fn rename_selected(
        &mut self,
        input: &str,
        fs: &dyn Filesystem,
        executor: &dyn CommandExecutor,
    ) -> Vec<Damage> {
        let Some(selected) = self.selected_entry().cloned() else {
            return Vec::new();
        };
        let requested = match entry_from_input(input) {
            Ok(Some(entry)) => entry,
            Ok(None) => return Vec::new(),
            Err(reason) => {
                self.status.warn(reason);
                return Vec::new();
            }
        };
        let renamed = if selected.is_dir() {
            Entry::directory(requested.file_name())
        } else {
            Entry::new(requested.file_name())
        };
        if renamed == selected {
            return Vec::new();
        }
        if self.name_taken(renamed.file_name()) {
            self.status.warn(format!("{} already exists", renamed.file_name()));
            return Vec::new();
        }
        let from = child_path(&self.current_dir, &selected);
        let to = child_path(&self.current_dir, &renamed);
        let request = CommandRequest::captured(&self.current_dir, rename_command(&from, &to));
        if let Err(error) = executor.execute(&request) {
            self.status.error(error.to_string());
            return Vec::new();
        }
        tracing::info!("renamed {} to {}", from.display(), to.display());
        self.status
            .success(format!("renamed {} to {}", selected.name(), renamed.name()));
        self.refresh_selecting(Some(renamed.name()), fs)
    }

    /// Removes the selected entry. Emptying the directory ascends out of it.
    pub fn delete_selected(
        &mut self,
        fs: &dyn Filesystem,
        executor: &dyn CommandExecutor,
    ) -> Vec<Damage> {
        let (Some(index), Some(entry)) = (self.cursor, self.selected_entry().cloned()) else {
            return Vec::new();
        };
        let path = child_path(&self.current_dir, &entry);
        let request = CommandRequest::captured(&self.current_dir, remove_command(&path));
        if let Err(error) = executor.execute(&request) {
            self.status.error(error.to_string());
            return Vec::new();
        }
        tracing::info!("removed {}", path.display());
        self.status.success(format!("deleted {}", entry.name()));

        let scroll_before = self.mid.scroll();
        self.mid.remove(index);
        if self.mid.is_empty() {
            self.cursor = None;
            if self.current_dir.parent().is_some() {
                return self.exit_to_parent(fs);
            }
            self.update_preview(fs);
            return vec![Damage::Column(ColumnId::Mid), Damage::Preview, Damage::Title];
        }

        let target = index.min(self.mid.len());
        self.cursor = Some(target);
        let delta = self.mid.ensure_visible(target);
        let mut damage = Vec::new();
        if delta != 0 || self.mid.scroll() != scroll_before {
            damage.push(Damage::Column(ColumnId::Mid));
        } else {
            damage.push(Damage::Removed {
                column: ColumnId::Mid,
                index,
            });
        }
        damage.push(Damage::Row {
            column: ColumnId::Mid,
            index: target,
        });
        self.update_preview(fs);
        damage.extend([Damage::Preview, Damage::Title]);
        damage
    }

    pub fn yank_selected(&mut self) -> Vec<Damage> {
        let Some(path) = self.selected_path() else {
            return Vec::new();
        };
        self.status.info(format!("yanked {}", path.display()));
        self.clipboard = Some(path);
        Vec::new()
    }

    /// Copies the yanked path into the current directory. The clipboard is
    /// kept so the same path can be pasted again elsewhere.
    pub fn paste(&mut self, fs: &dyn Filesystem, executor: &dyn CommandExecutor) -> Vec<Damage> {
        let Some(source) = self.clipboard.clone() else {
            self.status.warn("nothing yanked");
            return Vec::new();
        };
        let Some(name) = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
        else {
            self.status.warn(format!("cannot paste {}", source.display()));
            return Vec::new();
        };
        let entry = if fs.is_directory(&source) {
            Entry::directory(&name)
        } else {
            Entry::new(name)
        };
        if self.name_taken(entry.file_name()) {
            self.status.warn(format!("{} already exists here", entry.file_name()));
            return Vec::new();
        }
        let request =
            CommandRequest::captured(&self.current_dir, copy_command(&source, &self.current_dir));
        if let Err(error) = executor.execute(&request) {
            self.status.error(error.to_string());
            return Vec::new();
        }
        tracing::info!("pasted {} into {}", source.display(), self.current_dir.display());
        self.status.success(format!("pasted {}", entry.name()));
        self.refresh_selecting(Some(entry.name()), fs)
    }

    fn name_taken(&self, bare: &str) -> bool {
        self.mid.index_of(bare).is_some()
            || self.mid.index_of(Entry::directory(bare).name()).is_some()
    }

    fn rebuild_at(&mut self, dir: PathBuf, fs: &dyn Filesystem) -> Result<(), FsError> {
        let rows = fs.list(&dir)?;
        let parent = parent_rows(fs, &dir)?;
        tracing::debug!("loading {}", dir.display());
        self.current_dir = dir;
        self.mid.set_rows(rows);
        self.mid.reset_scroll();
        self.left.set_rows(parent);
        self.left.reset_scroll();
        self.sync_parent(fs);
        self.cursor = first_row(self.mid.len());
        self.follow_cursor();
        self.update_preview(fs);
        Ok(())
    }

    fn reload_lists(&mut self, fs: &dyn Filesystem) -> Result<(), FsError> {
        let rows = fs.list(&self.current_dir)?;
        let parent = parent_rows(fs, &self.current_dir)?;
        self.mid.set_rows(rows);
        self.left.set_rows(parent);
        self.sync_parent(fs);
        Ok(())
    }

    fn sync_parent(&mut self, fs: &dyn Filesystem) {
        self.parent_label = parent_label_of(fs, &self.current_dir);
        self.left_cursor = match fs.path_segments(&self.current_dir).last() {
            Some(name) => self.left.index_of(Entry::directory(name).name()),
            None => self.left.index_of(ROOT_ENTRY),
        };
        if let Some(index) = self.left_cursor {
            self.left.ensure_visible(index);
        }
    }

    fn follow_cursor(&mut self) {
        if let Some(index) = self.cursor {
            self.mid.ensure_visible(index);
        }
    }

    fn update_preview(&mut self, fs: &dyn Filesystem) {
        self.right.clear();
        let Some(entry) = self.selected_entry().cloned() else {
            self.preview = Preview::Blank;
            return;
        };
        let path = child_path(&self.current_dir, &entry);
        if entry.is_dir() {
            match fs.list(&path) {
                Ok(rows) => {
                    self.right.set_rows(rows);
                    self.preview = Preview::Listing;
                }
                Err(error) => {
                    self.status.error(error.to_string());
                    self.preview = Preview::Blank;
                }
            }
            return;
        }
        match fs.excerpt(&path, self.right.height()) {
            Ok(lines) => self.preview = Preview::Text(lines),
            Err(error) => {
                self.status.error(format!("{}: {error}", entry.name()));
                self.preview = Preview::Blank;
            }
        }
    }
}

fn shift_damage() -> Vec<Damage> {
    vec![
        Damage::Column(ColumnId::Left),
        Damage::Column(ColumnId::Mid),
        Damage::Preview,
        Damage::Title,
    ]
}

fn first_row(len: usize) -> Option<usize> {
    if len == 0 { None } else { Some(1) }
}

fn clamp_cursor(previous: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(previous.unwrap_or(1).clamp(1, len))
}

fn child_path(dir: &Path, entry: &Entry) -> PathBuf {
    dir.join(entry.file_name())
}

fn parent_rows(fs: &dyn Filesystem, dir: &Path) -> Result<Vec<Entry>, FsError> {
    match dir.parent() {
        Some(parent) => fs.list(parent),
        None => Ok(vec![Entry::root()]),
    }
}

fn parent_label_of(fs: &dyn Filesystem, dir: &Path) -> String {
    let segments = fs.path_segments(dir);
    match segments.len() {
        0 | 1 => ROOT_ENTRY.to_string(),
        count => segments[count - 2].clone(),
    }
}

/// `Ok(None)` means the prompt was left empty.
fn entry_from_input(input: &str) -> Result<Option<Entry>, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let is_dir = trimmed.ends_with('/');
    let bare = trimmed.trim_end_matches('/');
    if bare.is_empty() || bare == "." || bare == ".." {
        return Err("invalid name");
    }
    if bare.contains('/') {
        return Err("name must not contain '/'");
    }
    Ok(Some(if is_dir {
        Entry::directory(bare)
    } else {
        Entry::new(bare)
    }))
}
