//! Insertion of rendered text into an existing file.
//!
//! These functions only compute the new file contents; reading and writing
//! the file is left to the caller.

/// Where appended text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendPosition {
    /// After the last line, separated by a newline.
    End,
    /// As a new line above the first line containing the keyword.
    Before(String),
    /// As a new line below the first line containing the keyword.
    After(String),
    /// Before the existing 1-based line.
    Line(i64),
}

/// A decoded `append` option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendDirective {
    /// Target file, relative to the output root. Falls back to the `path`
    /// option when the `append` table names no file.
    pub file: Option<String>,
    pub position: AppendPosition,
}

impl AppendDirective {
    /// Contents of the target after inserting `content`. `existing` is `None`
    /// when the target does not exist yet.
    pub fn apply(&self, existing: Option<&str>, content: &str) -> String {
        self.position.apply(existing, content)
    }
}

impl AppendPosition {
    pub fn apply(&self, existing: Option<&str>, content: &str) -> String {
        match (self, existing) {
            (AppendPosition::End, existing) => {
                format!("{}\n{}", existing.unwrap_or_default(), content)
            }
            (AppendPosition::Before(keyword), None) => format!("{content}\n{keyword}\n"),
            (AppendPosition::Before(keyword), Some(existing)) => {
                let line = find_line(existing, keyword).max(1);
                insert_at_line(existing, content, line)
            }
            (AppendPosition::After(keyword), None) => format!("{keyword}\n{content}"),
            (AppendPosition::After(keyword), Some(existing)) => {
                let line = find_line(existing, keyword) + 1;
                insert_at_line(existing, content, line)
            }
            (AppendPosition::Line(_), None) => content.to_string(),
            (AppendPosition::Line(line), Some(existing)) => match usize::try_from(*line) {
                Ok(line) if line >= 1 => insert_at_line(existing, content, line),
                _ => content.to_string(),
            },
        }
    }
}

/// 1-based number of the first line containing `keyword`, or 0.
pub fn find_line(contents: &str, keyword: &str) -> usize {
    contents
        .split('\n')
        .position(|line| line.contains(keyword))
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Insert `text` so it becomes line `line` (1-based). Lines past the end
/// append.
fn insert_at_line(existing: &str, text: &str, line: usize) -> String {
    let mut lines: Vec<&str> = existing.split('\n').collect();
    let index = (line - 1).min(lines.len());
    lines.insert(index, text);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXISTING: &str = "a\nMARK\nb";

    fn before(k: &str) -> AppendPosition {
        AppendPosition::Before(k.to_string())
    }

    fn after(k: &str) -> AppendPosition {
        AppendPosition::After(k.to_string())
    }

    #[test]
    fn test_before_keyword() {
        assert_eq!(before("MARK").apply(Some(EXISTING), "X"), "a\nX\nMARK\nb");
    }

    #[test]
    fn test_after_keyword() {
        assert_eq!(after("MARK").apply(Some(EXISTING), "X"), "a\nMARK\nX\nb");
    }

    #[test]
    fn test_missing_file_synthesizes_keyword() {
        assert_eq!(after("MARK").apply(None, "X"), "MARK\nX");
        assert_eq!(before("MARK").apply(None, "X"), "X\nMARK\n");
    }

    #[test]
    fn test_keyword_not_found_inserts_at_start() {
        assert_eq!(before("NOPE").apply(Some(EXISTING), "X"), "X\na\nMARK\nb");
        assert_eq!(after("NOPE").apply(Some(EXISTING), "X"), "X\na\nMARK\nb");
    }

    #[test]
    fn test_keyword_matches_substring() {
        assert_eq!(
            after("ARK").apply(Some("x\n// MARK here\ny"), "Z"),
            "x\n// MARK here\nZ\ny"
        );
    }

    #[test]
    fn test_line_position() {
        assert_eq!(AppendPosition::Line(2).apply(Some(EXISTING), "X"), "a\nX\nMARK\nb");
        assert_eq!(AppendPosition::Line(10).apply(Some(EXISTING), "X"), "a\nMARK\nb\nX");
        assert_eq!(AppendPosition::Line(0).apply(Some(EXISTING), "X"), "X");
        assert_eq!(AppendPosition::Line(3).apply(None, "X"), "X");
    }

    #[test]
    fn test_end_position() {
        assert_eq!(AppendPosition::End.apply(Some(EXISTING), "X"), "a\nMARK\nb\nX");
        assert_eq!(AppendPosition::End.apply(None, "X"), "\nX");
    }

    #[test]
    fn test_find_line() {
        assert_eq!(find_line(EXISTING, "MARK"), 2);
        assert_eq!(find_line(EXISTING, "a"), 1);
        assert_eq!(find_line(EXISTING, "zzz"), 0);
    }
}
