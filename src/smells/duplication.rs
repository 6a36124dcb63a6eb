use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::core::{Severity, SourceLocation};
use crate::extraction::text::mask_comments_and_literals;

use super::{format_comparison, Smell, SmellKind};

/// A run of normalized lines that occurs more than once in one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateBlock {
    pub hash: String,
    pub lines: usize,
    /// First line of each occurrence, ascending.
    pub start_lines: Vec<usize>,
}

/// Hash every window of `min_lines` significant lines and keep the repeats.
///
/// Comments and string contents are masked first and blank or brace-only
/// lines are skipped, so reformatting alone does not hide a copy.
/// Occurrences that overlap an earlier occurrence of the same window are
/// ignored.
pub fn find_duplicate_blocks(content: &str, min_lines: usize) -> Vec<DuplicateBlock> {
    if min_lines == 0 {
        return Vec::new();
    }

    let masked = mask_comments_and_literals(content);
    let significant: Vec<(usize, &str)> = masked
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| is_significant(line))
        .collect();

    if significant.len() < min_lines {
        return Vec::new();
    }

    let mut windows: HashMap<String, Vec<usize>> = HashMap::new();
    for start in 0..=significant.len() - min_lines {
        let window = &significant[start..start + min_lines];
        let normalized = window
            .iter()
            .map(|(_, line)| normalize_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        let occurrences = windows.entry(calculate_hash(&normalized)).or_default();
        // overlapping repeats are the same block
        if occurrences
            .last()
            .map_or(true, |&last| start >= last + min_lines)
        {
            occurrences.push(start);
        }
    }

    let mut blocks: Vec<DuplicateBlock> = windows
        .into_iter()
        .filter(|(_, starts)| starts.len() > 1)
        .map(|(hash, starts)| DuplicateBlock {
            hash,
            lines: min_lines,
            start_lines: starts.iter().map(|&i| significant[i].0).collect(),
        })
        .collect();

    blocks.sort_by(|a, b| a.start_lines.cmp(&b.start_lines));
    merge_adjacent(blocks)
}

/// Consecutive windows of one longer copy collapse into the first window.
fn merge_adjacent(blocks: Vec<DuplicateBlock>) -> Vec<DuplicateBlock> {
    let mut merged: Vec<DuplicateBlock> = Vec::new();
    for block in blocks {
        if let Some(last) = merged.last_mut() {
            let continues = last.start_lines.len() == block.start_lines.len()
                && last
                    .start_lines
                    .iter()
                    .zip(&block.start_lines)
                    .all(|(a, b)| b > a && *b <= a + last.lines);
            if continues {
                last.lines += 1;
                continue;
            }
        }
        merged.push(block);
    }
    merged
}

fn is_significant(line: &str) -> bool {
    !line.is_empty() && !line.chars().all(|c| matches!(c, '{' | '}' | '(' | ')' | ';'))
}

fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn calculate_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn detect_duplicate_code(content: &str, min_lines: usize) -> Option<Smell> {
    let blocks = find_duplicate_blocks(content, min_lines);
    if blocks.is_empty() {
        return None;
    }

    let copies: usize = blocks.iter().map(|b| b.start_lines.len()).sum();
    let severity = if blocks.len() > 3 {
        Severity::High
    } else {
        Severity::Medium
    };

    let mut smell = Smell::new(
        SmellKind::DuplicateCode,
        severity,
        format!(
            "{} duplicated blocks appear {copies} times",
            blocks.len()
        ),
    )
    .with_evidence(
        "loc",
        format_comparison("Duplicated blocks", blocks.len() as f64, ">", 0.0),
    );

    smell.locations = blocks
        .iter()
        .flat_map(|block| {
            block.start_lines.iter().map(move |&line| SourceLocation {
                line,
                description: format!("Duplicated block of {} lines", block.lines),
            })
        })
        .collect();
    smell.locations.sort();
    Some(smell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const COPY_PASTE: &str = indoc! {r#"
        class Report {
            void monthly() {
                int total = 0;
                for (Row row : rows) {
                    total += row.amount();
                    log.info("row " + row.id());
                }
                print(total);
            }

            void yearly() {
                int total = 0;
                for (Row row : rows) {
                    total   +=   row.amount();
                    log.info("other text " + row.id());
                }
                print(total);
            }
        }
    "#};

    #[test]
    fn test_detects_reformatted_copy() {
        let blocks = find_duplicate_blocks(COPY_PASTE, 4);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_lines, vec![3, 12]);
        assert_eq!(blocks[0].lines, 5);
    }

    #[test]
    fn test_no_duplicates_below_window() {
        assert!(find_duplicate_blocks(COPY_PASTE, 6).is_empty());
        assert!(find_duplicate_blocks("", 6).is_empty());
        assert!(find_duplicate_blocks(COPY_PASTE, 0).is_empty());
    }

    #[test]
    fn test_repeated_single_line_is_not_self_duplicate() {
        let source = "x();\n".repeat(4);
        let blocks = find_duplicate_blocks(&source, 2);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_lines, vec![1, 3]);
    }

    #[test]
    fn test_smell_lists_each_copy() {
        let smell = detect_duplicate_code(COPY_PASTE, 4).unwrap();
        assert_eq!(smell.kind, SmellKind::DuplicateCode);
        let lines: Vec<_> = smell.locations.iter().map(|l| l.line).collect();
        assert_eq!(lines, vec![3, 12]);
    }
}
