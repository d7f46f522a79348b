pub const TITLE: &str = "keys";

pub const BINDINGS: &[(&str, &str)] = &[
    ("Up k / Down j", "move cursor"),
    ("Left h", "parent directory"),
    ("Right l", "enter directory"),
    ("Enter", "enter directory or edit file"),
    ("Home g / End G", "first / last row"),
    ("PgUp / PgDn", "move one page"),
    ("Del d", "delete (asks y/n)"),
    ("n", "new file, trailing / for a directory"),
    ("r", "rename"),
    ("y / p", "yank path / paste copy"),
    ("e", "edit file"),
    ("x", "run script with arguments"),
    ("~", "home directory"),
    ("/", "fuzzy goto"),
    ("!", "shell command"),
    ("R", "reload"),
    ("?", "this help"),
    ("q Ctrl-q", "quit"),
];

/// Help rows padded so the descriptions line up.
pub fn lines() -> Vec<String> {
    let keys_width = BINDINGS
        .iter()
        .map(|(keys, _)| keys.chars().count())
        .max()
        .unwrap_or(0);
    BINDINGS
        .iter()
        .map(|(keys, action)| format!("{keys:<keys_width$}  {action}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_align_descriptions() {
        let lines = lines();

        assert_eq!(lines.len(), BINDINGS.len());
        let column = lines[0].find("move cursor").unwrap();
        assert_eq!(lines[1].find("parent directory"), Some(column));
    }
}
