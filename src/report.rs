//! Console rendering for patch outcomes.
//!
//! Everything here returns a `String` so the binary decides which stream it
//! goes to. Colors follow `colored`'s global override.

use crate::applier::{Applied, CheckStatus};
use crate::config::PatchConfig;
use crate::diagnose::{AnchorWindow, Diagnosis};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

pub fn render_applied(name: &str, applied: &Applied) -> String {
    let verb = if applied.written {
        "Applied to"
    } else {
        "Would apply to"
    };
    format!(
        "{} {}: {} {} ({})\n",
        "✓".green(),
        name,
        verb,
        applied.file.display(),
        plural(applied.occurrences, "occurrence")
    )
}

/// Unified line diff between the original and patched content.
pub fn render_diff(file: &Path, original: &str, patched: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    let _ = writeln!(out, "{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);
    for group in diff.grouped_ops(3) {
        let _ = writeln!(out, "{}", "@@".cyan());
        for op in group {
            for change in diff.iter_changes(&op) {
                let line = match change.tag() {
                    ChangeTag::Delete => format!("-{}", change).red(),
                    ChangeTag::Insert => format!("+{}", change).green(),
                    ChangeTag::Equal => format!(" {}", change).normal(),
                };
                let _ = write!(out, "{}", line);
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Failure report for a target block that is not in the file.
pub fn render_no_match(config: &PatchConfig, file: &Path, diagnosis: &Diagnosis) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}: Target text not found in {}",
        "✗".red(),
        config.name(),
        file.display()
    );
    let _ = writeln!(out, "  {}", "File was not modified".dimmed());
    render_diagnosis(&mut out, config, diagnosis);
    out
}

pub fn render_check(config: &PatchConfig, status: &CheckStatus) -> String {
    match status {
        CheckStatus::WouldApply { file, occurrences } => format!(
            "{} {}: Would apply to {} ({})\n",
            "✓".green(),
            config.name(),
            file.display(),
            plural(*occurrences, "occurrence")
        ),
        CheckStatus::NoExactMatch { file, diagnosis } => {
            let mut out = String::new();
            let status = if diagnosis.already_applied {
                "ALREADY APPLIED".yellow().bold()
            } else {
                "NOT APPLICABLE".red().bold()
            };
            let _ = writeln!(
                out,
                "{} {}: {} ({})",
                "⊙".yellow(),
                config.name(),
                status,
                file.display()
            );
            render_diagnosis(&mut out, config, diagnosis);
            out
        }
    }
}

/// Human summary of a patch definition, for `show`.
pub fn render_definition(config: &PatchConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Patch:".bold(), config.name());
    if let Some(description) = config.description() {
        let _ = writeln!(out, "  {}", description.dimmed());
    }
    let _ = writeln!(out, "File: {}", config.file().display());
    let _ = writeln!(out, "Anchor: {:?}", config.anchor());
    let _ = writeln!(
        out,
        "Context window: {} chars",
        config.context_window()
    );
    if config.reapplies() {
        let _ = writeln!(
            out,
            "{}",
            "Note: replacement contains target; every run will match again".yellow()
        );
    }
    let _ = writeln!(out, "\n{}", "Target:".bold());
    let _ = writeln!(out, "{}", config.target().red());
    let _ = writeln!(out, "\n{}", "Replacement:".bold());
    let _ = writeln!(out, "{}", config.replacement().green());
    out
}

fn render_diagnosis(out: &mut String, config: &PatchConfig, diagnosis: &Diagnosis) {
    if diagnosis.already_applied {
        let _ = writeln!(
            out,
            "  {}",
            "Replacement text is already present; the patch looks applied".yellow()
        );
    }

    match &diagnosis.anchor {
        Some(window) => render_window(out, config, window),
        None => {
            let _ = writeln!(
                out,
                "  {}",
                format!("Anchor {:?} not found either", config.anchor()).red()
            );
            let _ = writeln!(
                out,
                "  {}",
                "The file is unrelated or has changed substantially".dimmed()
            );
        }
    }
}

fn render_window(out: &mut String, config: &PatchConfig, window: &AnchorWindow) {
    let _ = writeln!(
        out,
        "  Anchor {:?} found at line {} (byte {})",
        config.anchor(),
        window.line,
        window.offset
    );
    let _ = writeln!(
        out,
        "  Similarity to target: {:.1}%",
        window.similarity * 100.0
    );

    if let Some(divergence) = &window.divergence {
        let kind = if divergence.whitespace_only {
            " (whitespace only)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  First difference at target line {}{}:",
            divergence.target_line, kind
        );
        let _ = writeln!(out, "    {} {:?}", "expected:".dimmed(), divergence.expected);
        match &divergence.found {
            Some(found) => {
                let _ = writeln!(out, "    {} {:?}", "found:   ".dimmed(), found);
            }
            None => {
                let _ = writeln!(out, "    {} end of file", "found:   ".dimmed());
            }
        }
    }

    let suffix = if window.reaches_end {
        " (to end of file)"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "  {}",
        format!(
            "Context ({} chars){}:",
            window.text.chars().count(),
            suffix
        )
        .bold()
    );
    out.push_str(&window.text);
    if !window.text.ends_with('\n') {
        out.push('\n');
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
