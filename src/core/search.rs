use crate::core::Entry;

/// Finds the next row whose name contains the characters of `query` in order,
/// ignoring case. The scan starts after the 1-based `after` row and wraps, so
/// repeating a search walks through every match.
pub fn fuzzy_find(rows: &[Entry], query: &str, after: Option<usize>) -> Option<usize> {
    let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
    if needle.is_empty() || rows.is_empty() {
        return None;
    }
    let start = after.unwrap_or(0) % rows.len();
    (0..rows.len())
        .map(|step| (start + step) % rows.len())
        .find(|&offset| is_subsequence(&needle, rows[offset].name()))
        .map(|offset| offset + 1)
}

fn is_subsequence(needle: &[char], haystack: &str) -> bool {
    let mut pending = needle.iter().peekable();
    for ch in haystack.chars().flat_map(char::to_lowercase) {
        if pending.peek() == Some(&&ch) {
            pending.next();
        }
    }
    pending.peek().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(names: &[&str]) -> Vec<Entry> {
        names.iter().map(|name| Entry::new(*name)).collect()
    }

    #[test]
    fn fuzzy_find_matches_subsequence_case_insensitively() {
        let rows = rows(&["README.md", "src/", "Cargo.toml"]);

        assert_eq!(fuzzy_find(&rows, "cgt", None), Some(3));
        assert_eq!(fuzzy_find(&rows, "RDm", None), Some(1));
    }

    #[test]
    fn fuzzy_find_starts_after_cursor_and_wraps() {
        let rows = rows(&["a.txt", "sub/", "b.lua", "a.lua"]);

        assert_eq!(fuzzy_find(&rows, "a", Some(1)), Some(3));
        assert_eq!(fuzzy_find(&rows, "a.", Some(4)), Some(1));
    }

    #[test]
    fn fuzzy_find_reports_no_match() {
        let rows = rows(&["a.txt", "sub/"]);

        assert_eq!(fuzzy_find(&rows, "zzz", Some(1)), None);
        assert_eq!(fuzzy_find(&rows, "   ", Some(1)), None);
        assert_eq!(fuzzy_find(&[], "a", None), None);
    }
}
