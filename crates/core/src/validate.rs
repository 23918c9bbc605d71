//! Structural checks on exported label text.
//!
//! The validator looks only at the bracketing and field balance of the text;
//! it never interprets command parameters. Findings are advisory and never
//! block export.

use serde::Serialize;
use zpl_label_diagnostics::{Diagnostic, Severity, Span, codes};

const FORMAT_START: &str = "^XA";
const FORMAT_END: &str = "^XZ\n";
const FIELD_ORIGIN: &str = "^FO";
const FIELD_SEPARATOR: &str = "^FS";
const EMPTY_FIELD: &str = "^FD^FS";

/// Result of validating label text.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// `true` if no errors were found (warnings are allowed).
    pub ok: bool,
    /// All findings, errors first.
    pub issues: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Findings with [`Severity::Error`].
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.issues.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Findings with [`Severity::Warn`].
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.issues.iter().filter(|d| d.severity == Severity::Warn)
    }

    /// `true` when there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate ZPL text.
///
/// Errors: the text must start with `^XA` and end with `^XZ` plus a newline.
/// Warnings: `^FO` and `^FS` counts differ; `^FD^FS` (empty field data) occurs.
pub fn validate_zpl(text: &str) -> ValidationResult {
    let mut issues = Vec::new();

    // ── Bracketing ──────────────────────────────────────────────────────
    if !text.starts_with(FORMAT_START) {
        issues.push(Diagnostic::error(
            codes::MISSING_FORMAT_START,
            "label must start with ^XA",
            first_line_span(text),
        ));
    }
    if !text.ends_with(FORMAT_END) {
        issues.push(Diagnostic::error(
            codes::MISSING_FORMAT_END,
            "label must end with ^XZ",
            last_line_span(text),
        ));
    }

    // ── Field balance ───────────────────────────────────────────────────
    let fo_count = text.matches(FIELD_ORIGIN).count();
    let fs_count = text.matches(FIELD_SEPARATOR).count();
    if fo_count != fs_count {
        issues.push(
            Diagnostic::warn(
                codes::FIELD_BLOCK_IMBALANCE,
                format!("possible imbalance between ^FO ({fo_count}) and ^FS ({fs_count})"),
                None,
            )
            .with_context(ctx!(
                "fo_count" => fo_count.to_string(),
                "fs_count" => fs_count.to_string(),
            )),
        );
    }

    let empty_count = text.matches(EMPTY_FIELD).count();
    if empty_count > 0 {
        let span = text
            .find(EMPTY_FIELD)
            .map(|start| Span::new(start, start + EMPTY_FIELD.len()));
        issues.push(
            Diagnostic::warn(
                codes::EMPTY_FIELD_DATA,
                format!("found {empty_count} empty text field(s)"),
                span,
            )
            .with_context(ctx!("count" => empty_count.to_string())),
        );
    }

    let ok = !issues.iter().any(Diagnostic::is_error);
    ValidationResult { ok, issues }
}

fn first_line_span(text: &str) -> Option<Span> {
    if text.is_empty() {
        return None;
    }
    let end = text.find('\n').unwrap_or(text.len());
    Some(Span::new(0, end))
}

fn last_line_span(text: &str) -> Option<Span> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let start = trimmed.rfind('\n').map_or(0, |i| i + 1);
    Some(Span::new(start, trimmed.len()))
}
