use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::core::text::expand_tabs;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("binary file")]
    BinaryFile,
    #[error("permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Io(String),
}

/// Reads up to `max_lines` lines with tabs expanded. Lines are returned
/// untruncated; fitting to the column happens at draw time.
pub fn load_preview(path: &Path, max_lines: usize) -> Result<Vec<String>, PreviewError> {
    let file = File::open(path).map_err(map_io_error)?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();
    while lines.len() < max_lines {
        buffer.clear();
        let read = reader.read_until(b'\n', &mut buffer).map_err(map_io_error)?;
        if read == 0 {
            break;
        }
        if buffer.contains(&0) {
            return Err(PreviewError::BinaryFile);
        }
        lines.push(expand_tabs(&decode_line(&buffer)));
    }
    Ok(lines)
}

fn decode_line(bytes: &[u8]) -> String {
    let trimmed = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let trimmed = trimmed.strip_suffix(b"\r").unwrap_or(trimmed);
    String::from_utf8_lossy(trimmed).into_owned()
}

fn map_io_error(error: std::io::Error) -> PreviewError {
    use std::io::ErrorKind;
    match error.kind() {
        ErrorKind::PermissionDenied => PreviewError::PermissionDenied,
        _ => PreviewError::Io(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_preview_stops_at_max_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("note.txt");
        let mut file = File::create(&file_path).unwrap();
        for index in 0..45 {
            writeln!(file, "line-{index}").unwrap();
        }

        let lines = load_preview(&file_path, 10).unwrap();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[9], "line-9");
    }

    #[test]
    fn load_preview_expands_tabs_and_strips_crlf() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("main.lua");
        std::fs::write(&file_path, "function f()\r\n\treturn 1\r\nend").unwrap();

        let lines = load_preview(&file_path, 10).unwrap();

        assert_eq!(lines, vec!["function f()", "  return 1", "end"]);
    }

    #[test]
    fn load_preview_decodes_non_utf8_lossily() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("latin1.txt");
        std::fs::write(&file_path, vec![b'c', b'a', b'f', 0xE9, b'\n']).unwrap();

        let lines = load_preview(&file_path, 10).unwrap();

        assert_eq!(lines, vec!["caf\u{FFFD}".to_string()]);
    }

    #[test]
    fn load_preview_rejects_binary_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("blob.bin");
        std::fs::write(&file_path, vec![0x7F, b'E', b'L', b'F', 0, 1, 2]).unwrap();

        let result = load_preview(&file_path, 10);

        assert_eq!(result.unwrap_err(), PreviewError::BinaryFile);
    }

    #[test]
    fn load_preview_reports_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = load_preview(&temp_dir.path().join("missing.txt"), 10);

        assert!(matches!(result, Err(PreviewError::Io(_))));
    }

    #[test]
    fn load_preview_with_zero_lines_reads_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("note.txt");
        std::fs::write(&file_path, "hello\n").unwrap();

        assert!(load_preview(&file_path, 0).unwrap().is_empty());
    }
}
