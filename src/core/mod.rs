mod column;
mod entries;
mod fs;
mod preview;
mod search;
mod shell;
pub mod text;
mod theme;
mod user_notice;

pub use column::{Column, ColumnContents, ColumnGeometry, ColumnId};
pub use entries::{Entry, EntryKind, ROOT_ENTRY};
pub use fs::{Filesystem, FsError, LocalFs};
pub use search::fuzzy_find;
pub use shell::{
    CommandError, CommandExecutor, CommandRequest, ShellExecutor, copy_command, make_dir_command,
    open_with_command, remove_command, rename_command, run_command, touch_command,
};
pub use theme::{ColorRgb, ColorTheme, ColorThemeId};
pub use user_notice::{NoticeLevel, StatusLine};

#[cfg(test)]
pub use fs::testing;
