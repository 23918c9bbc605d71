//! Best-effort ZPL importer: rebuilds scene objects from command text.
//!
//! The importer understands the small subset of ZPL the designer itself
//! writes, one command per line. It tracks a running field origin (`^FO`)
//! and font (`^A`) and emits:
//!
//! - one text object per `^FD` line, using the running font,
//! - one rectangle per `^GB`, one circle per `^GC`,
//! - one barcode per symbol command (`^BC`, `^B3`, ...), always 120×60;
//!   unknown symbologies come in as Code128.
//!
//! Everything else is dropped. Decoding never fails; what it skipped is
//! reported as informational [`Diagnostic`]s.
//!
//! Known losses: rotation (`^FW`), bar parameters (`^BY`), stored graphics
//! (`^XG`), text geometry, and barcode data (the `^FD` after a barcode
//! becomes a separate text object).

use std::collections::HashSet;

use serde::Serialize;
use zpl_label_diagnostics::{Diagnostic, Span, codes};

use crate::scene::object::{DEFAULT_BORDER_THICKNESS, DEFAULT_FONT, DEFAULT_FONT_SIZE};
use crate::scene::{ObjectId, ObjectKind, ObjectType, SceneObject, Symbology};

/// Size given to every imported text object.
const TEXT_SIZE: (i32, i32) = (100, 30);

/// Commands that are understood but carry nothing the importer keeps.
const IGNORED_PREFIXES: [&str; 7] = ["^XA", "^XZ", "^PO", "^BY", "^FW", "^XG", "^FS"];

/// Result of importing ZPL text.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeResult {
    /// Reconstructed objects in text order.
    pub objects: Vec<SceneObject>,
    /// Notes about skipped lines and commands.
    pub diagnostics: Vec<Diagnostic>,
}

/// Import ZPL text, returning only the reconstructed objects.
pub fn decode(text: &str) -> Vec<SceneObject> {
    decode_zpl(text).objects
}

/// Import ZPL text, returning objects and notes on what was skipped.
pub fn decode_zpl(text: &str) -> DecodeResult {
    let mut decoder = Decoder::default();
    let mut offset = 0usize;

    for (line_no, raw) in text.split('\n').enumerate() {
        let lead = raw.len() - raw.trim_start().len();
        let line = raw.trim();
        if !line.is_empty() {
            let start = offset + lead;
            decoder.line(line, line_no + 1, Span::new(start, start + line.len()));
        }
        offset += raw.len() + 1;
    }

    DecodeResult {
        objects: decoder.objects,
        diagnostics: decoder.diagnostics,
    }
}

// ── Scanner state ───────────────────────────────────────────────────────

struct Decoder {
    x: i32,
    y: i32,
    font: char,
    font_size: u32,
    objects: Vec<SceneObject>,
    diagnostics: Vec<Diagnostic>,
    ids: HashSet<ObjectId>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            font: DEFAULT_FONT,
            font_size: DEFAULT_FONT_SIZE,
            objects: Vec::new(),
            diagnostics: Vec::new(),
            ids: HashSet::new(),
        }
    }
}

impl Decoder {
    fn line(&mut self, line: &str, line_no: usize, span: Span) {
        if line.starts_with("^FO") {
            match digit_runs(line).as_slice() {
                [x, y, ..] => (self.x, self.y) = (*x, *y),
                _ => self.incomplete("^FO", "expected x and y", line_no, span),
            }
        } else if let Some(rest) = line.strip_prefix("^A") {
            match parse_font(rest) {
                Some((font, size)) => (self.font, self.font_size) = (font, size),
                None => self.incomplete("^A", "expected font and height", line_no, span),
            }
        } else if let Some(rest) = line.strip_prefix("^FD") {
            let text = rest.replace("^FS", "");
            let kind = ObjectKind::Text {
                text,
                font: self.font,
                font_size: self.font_size,
            };
            self.emit(kind, TEXT_SIZE);
        } else if line.starts_with("^GB") {
            match digit_runs(line).as_slice() {
                [w, h, rest @ ..] => {
                    let border_thickness = thickness_or_default(rest.first());
                    self.emit(ObjectKind::Rectangle { border_thickness }, (*w, *h));
                }
                _ => self.incomplete("^GB", "expected width and height", line_no, span),
            }
        } else if line.starts_with("^GC") {
            match digit_runs(line).as_slice() {
                [d, rest @ ..] => {
                    let border_thickness = thickness_or_default(rest.first());
                    self.emit(ObjectKind::Circle { border_thickness }, (*d, *d));
                }
                _ => self.incomplete("^GC", "expected diameter", line_no, span),
            }
        } else if IGNORED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            // understood, nothing to keep
        } else if let Some(rest) = line.strip_prefix("^B") {
            let Some(letter) = rest.chars().next() else {
                self.incomplete("^B", "expected a symbology letter", line_no, span);
                return;
            };
            let symbology = match symbology_for_command(letter) {
                Some(symbology) => symbology,
                None => {
                    self.unsupported_symbology(letter, line_no, span);
                    Symbology::Code128
                }
            };
            let mut kind = ObjectKind::default_for(ObjectType::Barcode);
            if let ObjectKind::Barcode { symbology: s, .. } = &mut kind {
                *s = symbology;
            }
            self.emit(kind, ObjectType::Barcode.default_size());
        } else {
            self.diagnostics.push(
                Diagnostic::info(
                    codes::DECODER_UNRECOGNIZED_LINE,
                    format!("line {line_no} skipped: not understood by the importer"),
                    Some(span),
                )
                .with_context(ctx!("line" => line_no.to_string())),
            );
        }
    }

    fn emit(&mut self, kind: ObjectKind, (width, height): (i32, i32)) {
        let mut id = ObjectId::generate();
        while !self.ids.insert(id.clone()) {
            id = ObjectId::generate();
        }
        self.objects.push(SceneObject {
            id,
            x: self.x,
            y: self.y,
            width,
            height,
            rotation: 0,
            kind,
        });
    }

    fn unsupported_symbology(&mut self, letter: char, line_no: usize, span: Span) {
        let command = format!("^B{letter}");
        self.diagnostics.push(
            Diagnostic::info(
                codes::DECODER_INCOMPLETE_COMMAND,
                format!(
                    "line {line_no}: {command} has no supported symbology, imported as Code128"
                ),
                Some(span),
            )
            .with_context(ctx!(
                "command" => command,
                "line" => line_no.to_string(),
            )),
        );
    }

    fn incomplete(&mut self, command: &str, reason: &str, line_no: usize, span: Span) {
        self.diagnostics.push(
            Diagnostic::info(
                codes::DECODER_INCOMPLETE_COMMAND,
                format!("line {line_no}: {command} skipped, {reason}"),
                Some(span),
            )
            .with_context(ctx!(
                "command" => command,
                "line" => line_no.to_string(),
            )),
        );
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Every run of ASCII digits in `s`, in order. Runs that overflow are dropped.
fn digit_runs(s: &str) -> Vec<i32> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}

fn thickness_or_default(value: Option<&i32>) -> u32 {
    value
        .and_then(|v| u32::try_from(*v).ok())
        .unwrap_or(DEFAULT_BORDER_THICKNESS)
}

/// Parse the tail of a font command: `A,N,30,30` or the compact `0N,30,30`.
fn parse_font(rest: &str) -> Option<(char, u32)> {
    let mut chars = rest.chars();
    let font = chars
        .next()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())?;
    let rest = chars.as_str();
    let rest = rest.strip_prefix(',').unwrap_or(rest);
    let rest = rest.strip_prefix(['N', 'R', 'I', 'B'])?;
    let rest = rest.strip_prefix(',')?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let size = digits.parse().ok()?;
    Some((font, size))
}

/// Symbology selected by the letter after `^B`.
fn symbology_for_command(letter: char) -> Option<Symbology> {
    match letter {
        'C' => Some(Symbology::Code128),
        '3' => Some(Symbology::Code39),
        'A' => Some(Symbology::Code93),
        '2' => Some(Symbology::Interleaved2of5),
        'E' => Some(Symbology::Ean13),
        '8' => Some(Symbology::Ean8),
        'U' => Some(Symbology::UpcA),
        '9' => Some(Symbology::UpcE),
        _ => None,
    }
}
