pub const DIR_SEPARATOR: char = '/';
pub const ROOT_ENTRY: &str = "/";

/// A name as produced by a directory listing. Directories carry a trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    ScriptFile,
    PlainFile,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn directory(name: &str) -> Self {
        let bare = name.trim_end_matches(DIR_SEPARATOR);
        Self {
            name: format!("{bare}{DIR_SEPARATOR}"),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_ENTRY)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without its directory marker, suitable for joining onto a path.
    pub fn file_name(&self) -> &str {
        if self.name == ROOT_ENTRY {
            return ROOT_ENTRY;
        }
        self.name.trim_end_matches(DIR_SEPARATOR)
    }

    pub fn is_dir(&self) -> bool {
        self.name.ends_with(DIR_SEPARATOR)
    }

    pub fn kind(&self, script_extension: &str) -> EntryKind {
        classify(&self.name, script_extension)
    }
}

impl From<&str> for Entry {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

pub fn classify(name: &str, script_extension: &str) -> EntryKind {
    if name.ends_with(DIR_SEPARATOR) {
        return EntryKind::Directory;
    }
    match name.rsplit_once('.') {
        Some((_, extension)) if extension == script_extension => EntryKind::ScriptFile,
        _ => EntryKind::PlainFile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_marks_trailing_separator_as_directory() {
        assert_eq!(classify("sub/", "lua"), EntryKind::Directory);
        assert_eq!(classify("/", "lua"), EntryKind::Directory);
    }

    #[test]
    fn classify_matches_script_extension_after_last_dot() {
        assert_eq!(classify("b.lua", "lua"), EntryKind::ScriptFile);
        assert_eq!(classify("archive.lua.txt", "lua"), EntryKind::PlainFile);
        assert_eq!(classify("a.txt", "lua"), EntryKind::PlainFile);
        assert_eq!(classify("Makefile", "lua"), EntryKind::PlainFile);
    }

    #[test]
    fn classify_directory_wins_over_extension() {
        assert_eq!(classify("scripts.lua/", "lua"), EntryKind::Directory);
    }

    #[test]
    fn directory_constructor_adds_single_marker() {
        assert_eq!(Entry::directory("sub").name(), "sub/");
        assert_eq!(Entry::directory("sub//").name(), "sub/");
    }

    #[test]
    fn file_name_strips_marker_but_keeps_root() {
        assert_eq!(Entry::new("sub/").file_name(), "sub");
        assert_eq!(Entry::new("a.txt").file_name(), "a.txt");
        assert_eq!(Entry::root().file_name(), "/");
    }
}
