//! Line counting for Java source.
//!
//! - **Physical Lines**: raw line count
//! - **Code Lines**: lines with code (excludes comments and blanks)
//! - **Comment Lines**: lines that are only comment (`//`, `/* */`, `/** */`)
//! - **Blank Lines**: lines containing only whitespace
//!
//! The invariant `physical_lines == code_lines + comment_lines + blank_lines`
//! always holds. Comment markers inside string literals are not detected.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocCount {
    pub physical_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
}

impl LocCount {
    /// Lines that are not blank, comment lines included.
    pub fn non_empty_lines(&self) -> usize {
        self.code_lines + self.comment_lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineType {
    Code,
    Comment,
    Blank,
}

pub fn count_lines(content: &str) -> LocCount {
    let mut count = LocCount::default();
    let mut in_block_comment = false;

    for line in content.lines() {
        count.physical_lines += 1;
        match classify_line(line.trim(), &mut in_block_comment) {
            LineType::Blank => count.blank_lines += 1,
            LineType::Comment => count.comment_lines += 1,
            LineType::Code => count.code_lines += 1,
        }
    }

    count
}

fn classify_line(trimmed: &str, in_block_comment: &mut bool) -> LineType {
    if trimmed.is_empty() {
        return LineType::Blank;
    }

    if *in_block_comment {
        return match trimmed.find("*/") {
            Some(end) => {
                *in_block_comment = false;
                let rest = trimmed[end + 2..].trim();
                if rest.is_empty() || rest.starts_with("//") {
                    LineType::Comment
                } else {
                    // Code after the close may open another comment
                    classify_line(rest, in_block_comment).max_code()
                }
            }
            None => LineType::Comment,
        };
    }

    if trimmed.starts_with("//") {
        return LineType::Comment;
    }

    if let Some(rest) = trimmed.strip_prefix("/*") {
        return match rest.find("*/") {
            Some(end) => {
                let after = rest[end + 2..].trim();
                if after.is_empty() || after.starts_with("//") {
                    LineType::Comment
                } else {
                    classify_line(after, in_block_comment).max_code()
                }
            }
            None => {
                *in_block_comment = true;
                LineType::Comment
            }
        };
    }

    // Code line; track a trailing block comment that stays open
    if let Some(start) = trimmed.find("/*") {
        if !trimmed[start + 2..].contains("*/") {
            *in_block_comment = true;
        }
    }

    LineType::Code
}

impl LineType {
    /// A line that contains any code counts as code.
    fn max_code(self) -> LineType {
        match self {
            LineType::Blank => LineType::Comment,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_physical_lines() {
        let source = "package a;\n\n// note\n/*\n * doc\n */\nclass A {}\n";
        let count = count_lines(source);
        assert_eq!(count.physical_lines, 7);
        assert_eq!(count.blank_lines, 1);
        assert_eq!(count.comment_lines, 4);
        assert_eq!(count.code_lines, 2);
        assert_eq!(
            count.physical_lines,
            count.code_lines + count.comment_lines + count.blank_lines
        );
    }

    #[test]
    fn test_code_after_block_comment_is_code() {
        let count = count_lines("/* a */ int x = 1;\n");
        assert_eq!(count.code_lines, 1);
        assert_eq!(count.comment_lines, 0);
    }

    #[test]
    fn test_trailing_block_comment_opens_state() {
        let count = count_lines("int x; /* start\n still comment\n end */\nint y;\n");
        assert_eq!(count.code_lines, 2);
        assert_eq!(count.comment_lines, 2);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(count_lines(""), LocCount::default());
    }
}
