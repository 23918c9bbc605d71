//! Diagnostic rendering for the terminal.
//!
//! Pretty mode turns each [`Diagnostic`] into an ariadne [`Report`] on
//! stderr, annotated against the label text it came from. JSON mode writes
//! machine-readable documents to stdout and is the default when stdout is
//! piped.

use std::io::{self, IsTerminal};

use anyhow::Result;
use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use clap::ValueEnum;
use serde::Serialize;
use zpl_label_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pick by whether stdout is a terminal.
    pub(crate) fn resolve(explicit: Option<Format>) -> Self {
        explicit.unwrap_or_else(|| {
            if io::stdout().is_terminal() {
                Format::Pretty
            } else {
                Format::Json
            }
        })
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

fn severity_word(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "info",
        _ => "diagnostic",
    }
}

/// `key=value` pairs of a diagnostic's context, if it has any.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics as ariadne reports on stderr.
///
/// Diagnostics without a span print as a single header line plus notes.
pub(crate) fn render_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    let config = Config::default().with_compact(false);
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        let note = context_note(diag);
        let Some(span) = diag.span else {
            eprintln!("{}[{}]: {}", severity_word(diag.severity), diag.id, diag.message);
            if let Some(note) = &note {
                eprintln!("  = note: {note}");
            }
            if let Some(help) = diag.explain() {
                eprintln!("  = help: {help}");
            }
            continue;
        };

        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);
        let label = note.clone().unwrap_or_else(|| diag.message.clone());

        let mut builder = Report::build(report_kind(diag.severity), (filename, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(label)
                    .with_color(severity_color(diag.severity)),
            );
        if let Some(note) = note {
            builder = builder.with_note(note);
        }
        if let Some(help) = diag.explain() {
            builder = builder.with_help(help);
        }
        builder.finish().eprint(&mut cache).ok();
    }
}

/// Print a coloured `N errors, N warnings, N info` line to stderr.
/// Prints nothing when the list is empty.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let mut parts = Vec::new();
    if errors > 0 {
        let text = format!("{errors} error{}", plural(errors));
        parts.push(text.fg(Color::Red).to_string());
    }
    if warnings > 0 {
        let text = format!("{warnings} warning{}", plural(warnings));
        parts.push(text.fg(Color::Yellow).to_string());
    }
    if infos > 0 {
        parts.push(format!("{infos} info").fg(Color::Blue).to_string());
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

// ── JSON ────────────────────────────────────────────────────────────────

/// Write a value as pretty JSON to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render diagnostics in the given format: reports plus summary on stderr,
/// or a JSON document `{ <key>: [...], "ok": bool }` on stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    key: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) -> Result<()> {
    match format {
        Format::Pretty => {
            render_pretty(source, filename, diagnostics);
            print_summary(diagnostics);
            Ok(())
        }
        Format::Json => {
            let mut doc = serde_json::Map::new();
            let ok = !diagnostics.iter().any(Diagnostic::is_error);
            doc.insert("ok".into(), ok.into());
            doc.insert(key.into(), serde_json::to_value(diagnostics)?);
            print_json(&doc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn explicit_format_wins() {
        assert_eq!(Format::resolve(Some(Format::Json)), Format::Json);
        assert_eq!(Format::resolve(Some(Format::Pretty)), Format::Pretty);
    }

    #[test]
    fn context_note_joins_pairs_in_key_order() {
        let mut ctx = BTreeMap::new();
        ctx.insert("fs_count".to_string(), "1".to_string());
        ctx.insert("fo_count".to_string(), "2".to_string());
        let d = Diagnostic::warn("ZLB2001", "unbalanced", None).with_context(ctx);
        assert_eq!(context_note(&d).as_deref(), Some("fo_count=2, fs_count=1"));
    }

    #[test]
    fn empty_context_has_no_note() {
        let d = Diagnostic::info("ZLB3001", "skipped", None).with_context(BTreeMap::new());
        assert!(context_note(&d).is_none());
        assert!(context_note(&Diagnostic::info("ZLB3001", "x", None)).is_none());
    }
}
