//! Diagnostics for the ZPL label designer.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`Span`] used to report
//! validation findings on exported label text and advisory notes from the
//! importer. Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants generated from `diagnostics.json`.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// The label text is structurally broken.
    Error,
    /// The label may print, but probably not as intended.
    Warn,
    /// Informational note (import skipped something).
    Info,
}

/// Byte span in the source text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` for zero-width spans.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A diagnostic produced by the validator or the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic code (e.g., `"ZLB1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Byte span in the source text, when the finding has a location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }

    /// `true` when the severity is [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_explain.rs"))
}

/// Returns the catalog severity for a diagnostic code, if known.
pub fn default_severity(id: &str) -> Option<Severity> {
    include!(concat!(env!("OUT_DIR"), "/generated_severity.rs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_valid() {
        let s = Span::new(5, 10);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 10);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn span_empty() {
        let s = Span::empty(7);
        assert!(s.is_empty());
        assert_eq!(s.start, 7);
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::MISSING_FORMAT_START, "missing ^XA", None);
        assert_eq!(format!("{d}"), "error[ZLB1001]: missing ^XA");
        assert!(d.is_error());
    }

    #[test]
    fn warn_and_info_constructors() {
        let w = Diagnostic::warn(codes::EMPTY_FIELD_DATA, "empty", Some(Span::new(0, 6)));
        assert_eq!(w.severity, Severity::Warn);
        assert_eq!(w.span, Some(Span::new(0, 6)));

        let i = Diagnostic::info("CUSTOM", "note", None);
        assert_eq!(i.severity, Severity::Info);
        assert!(!i.is_error());
    }

    #[test]
    fn every_code_has_explanation_and_severity() {
        assert!(!codes::ALL.is_empty());
        for code in codes::ALL {
            assert!(explain(code).is_some(), "{code} has no explain() entry");
            assert!(
                default_severity(code).is_some(),
                "{code} has no catalog severity"
            );
        }
    }

    #[test]
    fn catalog_severities_match_usage() {
        assert_eq!(
            default_severity(codes::MISSING_FORMAT_END),
            Some(Severity::Error)
        );
        assert_eq!(
            default_severity(codes::FIELD_BLOCK_IMBALANCE),
            Some(Severity::Warn)
        );
        assert_eq!(
            default_severity(codes::DECODER_UNRECOGNIZED_LINE),
            Some(Severity::Info)
        );
        assert_eq!(default_severity("ZLB9999"), None);
    }

    #[test]
    fn explain_unknown_code() {
        let d = Diagnostic::error("UNKNOWN_CODE", "test", None);
        assert!(d.explain().is_none());
    }

    #[test]
    fn serde_omits_absent_span_and_context() {
        let d = Diagnostic::error(codes::MISSING_FORMAT_START, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("span"), "{json}");
        assert!(!json.contains("context"), "{json}");
        assert!(json.contains("\"severity\":\"error\""), "{json}");
    }

    #[test]
    fn context_serializes_in_key_order() {
        let d = Diagnostic::warn(codes::FIELD_BLOCK_IMBALANCE, "mismatch", None).with_context(
            BTreeMap::from([
                ("fs_count".into(), "1".into()),
                ("fo_count".into(), "2".into()),
            ]),
        );
        let json = serde_json::to_string(&d).unwrap();
        let fo = json.find("fo_count").unwrap();
        let fs = json.find("fs_count").unwrap();
        assert!(fo < fs, "{json}");

        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
