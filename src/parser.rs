// Name Parser - free-form text and .csv/.txt files into participants
// Delimiters are newline and comma in any mixture; empty tokens are dropped.

use crate::error::ImportError;
use crate::participant::Participant;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: char = '\u{feff}';

// ============================================================================
// TEXT PARSING
// ============================================================================

/// Split `input` on `\n` and `,`, trim every token, drop empty ones and give
/// each survivor a fresh identity. Order follows the input.
///
/// Never fails: empty or garbage input yields an empty list.
pub fn parse_names(input: &str) -> Vec<Participant> {
    input
        .split(|c: char| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Participant::new)
        .collect()
}

// ============================================================================
// FILE TYPES
// ============================================================================

/// FileKind - which accepted text format an upload is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    PlainText,
}

impl FileKind {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            FileKind::Csv => "CSV",
            FileKind::PlainText => "Plain text",
        }
    }

    /// Accept by extension (case-insensitive) or by MIME type
    pub fn detect(file_name: &str, mime: Option<&str>) -> Result<FileKind, ImportError> {
        let lower = file_name.to_lowercase();

        if lower.ends_with(".csv") {
            return Ok(FileKind::Csv);
        }
        if lower.ends_with(".txt") {
            return Ok(FileKind::PlainText);
        }

        // Browsers and some pickers only report the MIME type
        match mime.map(|m| m.split(';').next().unwrap_or("").trim()) {
            Some("text/csv") => Ok(FileKind::Csv),
            Some("text/plain") => Ok(FileKind::PlainText),
            _ => Err(ImportError::UnsupportedFileType {
                file_name: file_name.to_string(),
            }),
        }
    }
}

// ============================================================================
// FILE IMPORT
// ============================================================================

/// Decode raw file bytes as text the way a browser text reader does:
/// invalid UTF-8 is replaced, a leading BOM is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix(UTF8_BOM).unwrap_or(&*text).to_string()
}

/// Load participants from a .csv or .txt file
pub fn load_names_from_file(path: &Path) -> Result<Vec<Participant>, ImportError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let kind = match FileKind::detect(file_name, None) {
        Ok(kind) => kind,
        Err(e) => {
            warn!(file = %path.display(), "rejected import: unsupported file type");
            return Err(e);
        }
    };

    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(file = %path.display(), kind = kind.name(), bytes = bytes.len(), "read import file");

    let participants = parse_names(&decode_text(&bytes));
    info!(file = %path.display(), count = participants.len(), "imported participants");

    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn parsed_names(input: &str) -> Vec<String> {
        parse_names(input).into_iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_parse_mixed_delimiters() {
        assert_eq!(
            parsed_names("Alice, Bob\nAlice"),
            vec!["Alice", "Bob", "Alice"]
        );
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        assert_eq!(
            parsed_names(",,\n  Carol ,\n\n,Dave,,  \n"),
            vec!["Carol", "Dave"]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_names("").is_empty());
        assert!(parse_names(" \n , \t ,\n").is_empty());
    }

    #[test]
    fn test_parse_handles_crlf() {
        assert_eq!(parsed_names("Eve\r\nFrank\r\n"), vec!["Eve", "Frank"]);
    }

    #[test]
    fn test_parse_keeps_inner_spaces() {
        assert_eq!(parsed_names("  Mary Jane  ,Li Wei"), vec!["Mary Jane", "Li Wei"]);
    }

    #[test]
    fn test_parse_count_matches_token_count() {
        let input = "a,b,,c\n\nd , e,\n f";
        let expected = input
            .split(|c: char| c == '\n' || c == ',')
            .filter(|t| !t.trim().is_empty())
            .count();

        assert_eq!(parse_names(input).len(), expected);
    }

    #[test]
    fn test_reparse_same_names_fresh_ids() {
        let input = "王小明, 李小華\n陳大文";
        let first = parse_names(input);
        let second = parse_names(input);

        let first_names: Vec<_> = first.iter().map(|p| &p.name).collect();
        let second_names: Vec<_> = second.iter().map(|p| &p.name).collect();
        assert_eq!(first_names, second_names);

        let ids: HashSet<_> = first.iter().chain(second.iter()).map(|p| p.id).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(FileKind::detect("team.csv", None).unwrap(), FileKind::Csv);
        assert_eq!(FileKind::detect("TEAM.TXT", None).unwrap(), FileKind::PlainText);
    }

    #[test]
    fn test_detect_by_mime() {
        assert_eq!(
            FileKind::detect("upload", Some("text/csv")).unwrap(),
            FileKind::Csv
        );
        assert_eq!(
            FileKind::detect("upload", Some("text/plain; charset=utf-8")).unwrap(),
            FileKind::PlainText
        );
    }

    #[test]
    fn test_detect_rejects_other_types() {
        let err = FileKind::detect("roster.xlsx", Some("application/vnd.ms-excel")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileType { .. }));

        assert!(FileKind::detect("names.json", None).is_err());
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = "\u{feff}Group,Name".as_bytes();
        assert_eq!(decode_text(bytes), "Group,Name");
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        let bytes = [b'A', 0xFF, b',', b'B'];
        let names = parsed_names(&decode_text(&bytes));
        assert_eq!(names.len(), 2);
        assert_eq!(names[1], "B");
    }
}
