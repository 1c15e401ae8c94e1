//! Diagnostics for a target block that did not match exactly.
//!
//! When the full block is missing, the anchor (a short, durable piece of the
//! region being patched) is located instead and a bounded window of content
//! starting there is captured, so a human can see what the file actually
//! holds. Nothing in here can fail: every lookup degrades to "not found".

use crate::config::PatchConfig;

/// Longest prefix (in chars) fed to the similarity score.
const SIMILARITY_LIMIT: usize = 4096;

/// Why an exact match failed, as far as can be told from the content.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    /// Context at the first anchor occurrence, `None` if the anchor is absent
    pub anchor: Option<AnchorWindow>,
    /// The replacement block is already present in the content
    pub already_applied: bool,
}

impl Diagnosis {
    pub fn anchor_found(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Bounded slice of content starting at the first anchor occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorWindow {
    /// Byte offset of the anchor in the content
    pub offset: usize,
    /// 1-based line of `offset`
    pub line: usize,
    /// At most `context_window` chars of content starting at `offset`
    pub text: String,
    /// The window stopped at end of content
    pub reaches_end: bool,
    /// First line where content at the anchor departs from the target
    pub divergence: Option<Divergence>,
    /// Normalized edit similarity (0.0..=1.0) between target and content here
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// 1-based line within the target block
    pub target_line: usize,
    pub expected: String,
    /// `None` when the content ends before this line
    pub found: Option<String>,
    /// The lines are equal once whitespace runs are ignored
    pub whitespace_only: bool,
}

/// Run the fallback search over content that lacks the target block.
pub fn diagnose(content: &str, config: &PatchConfig) -> Diagnosis {
    let already_applied =
        !config.replacement().is_empty() && content.contains(config.replacement());

    let anchor = content.find(config.anchor()).map(|offset| {
        let (text, reaches_end) = context_window(content, offset, config.context_window());
        let line = line_of(content, offset);
        tracing::debug!(offset, line, chars = text.chars().count(), "anchor located");

        let (expected, found, first_line) = align(content, offset, config);
        AnchorWindow {
            offset,
            line,
            text: text.to_string(),
            reaches_end,
            divergence: first_divergence(expected, found, first_line),
            similarity: similarity(expected, found),
        }
    });

    if anchor.is_none() {
        tracing::debug!(anchor = config.anchor(), "anchor absent");
    }

    Diagnosis {
        anchor,
        already_applied,
    }
}

/// Up to `max_chars` characters of `content` starting at byte `offset`.
///
/// Returns the slice and whether it was cut short by end of content.
/// `offset` must lie on a char boundary.
pub fn context_window(content: &str, offset: usize, max_chars: usize) -> (&str, bool) {
    let rest = &content[offset..];
    match rest.char_indices().nth(max_chars) {
        Some((end, _)) => (&rest[..end], false),
        None => (rest, true),
    }
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Line up the target with the content around the anchor.
///
/// When the anchor sits inside the target, the content is rewound by the
/// same distance so both start at the same logical position. Returns the
/// target slice, the content slice and the target line the slices begin on.
fn align<'a>(
    content: &'a str,
    offset: usize,
    config: &'a PatchConfig,
) -> (&'a str, &'a str, usize) {
    let target = config.target();
    let Some(k) = target.find(config.anchor()) else {
        return (target, &content[offset..], 1);
    };

    match offset.checked_sub(k) {
        Some(start) if content.is_char_boundary(start) => (target, &content[start..], 1),
        _ => (&target[k..], &content[offset..], line_of(target, k)),
    }
}

fn first_divergence(expected: &str, found: &str, first_line: usize) -> Option<Divergence> {
    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let mut found_lines = found.split('\n');
    let last = expected_lines.len() - 1;

    for (idx, want) in expected_lines.iter().enumerate() {
        let target_line = first_line + idx;
        let Some(got) = found_lines.next() else {
            return Some(Divergence {
                target_line,
                expected: want.to_string(),
                found: None,
                whitespace_only: false,
            });
        };

        // The final target line may be followed by more text on the same line.
        let same = if idx == last {
            got.starts_with(want)
        } else {
            got == *want
        };
        if !same {
            return Some(Divergence {
                target_line,
                expected: want.to_string(),
                found: Some(got.to_string()),
                whitespace_only: want.split_whitespace().eq(got.split_whitespace()),
            });
        }
    }

    None
}

fn similarity(expected: &str, found: &str) -> f64 {
    let expected: String = expected.chars().take(SIMILARITY_LIMIT).collect();
    let len = expected.chars().count();
    let found: String = found.chars().take(len).collect();
    strsim::normalized_levenshtein(&expected, &found)
}
