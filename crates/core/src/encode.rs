//! ZPL encoder: renders a scene and its label settings into printer command text.
//!
//! Output is deterministic and line-oriented, one command per line, and
//! always bracketed by `^XA` / `^XZ`.

use std::collections::HashSet;
use std::fmt::Write as _;

use zpl_label_settings::{LabelSettings, Orientation};

use crate::scene::{ObjectKind, ObjectType, Scene, SceneObject, Symbology};

/// Maximum horizontal offset and width difference for a caption to count as
/// the barcode's own human-readable line.
const CAPTION_ALIGN_TOLERANCE: u32 = 2;
/// Gap between the bottom of a barcode and its caption.
const CAPTION_GAP: i64 = 5;
/// Maximum vertical deviation from the expected caption position.
const CAPTION_VERTICAL_TOLERANCE: u64 = 3;
/// Characters kept from a graphic name in `^XG`.
const GRAPHIC_NAME_LEN: usize = 8;

// ── Public API ──────────────────────────────────────────────────────────

/// Encode every object of `scene`, bottom to top, into ZPL.
pub fn encode_scene(scene: &Scene, settings: &LabelSettings) -> String {
    encode_objects(scene.objects(), settings)
}

/// Encode a slice of objects in order into ZPL.
pub fn encode_objects(objects: &[SceneObject], settings: &LabelSettings) -> String {
    let suppressed = suppressed_captions(objects);

    let mut out = String::from("^XA\n");
    if settings.orientation == Orientation::Landscape {
        out.push_str("^POI\n");
    }

    for (index, object) in objects.iter().enumerate() {
        if suppressed.contains(&index) {
            continue;
        }
        emit_object(&mut out, object);
    }

    out.push_str("^XZ\n");
    out
}

/// Indices of text objects that duplicate a barcode's human-readable line.
///
/// For each barcode the first text object with the same content sitting just
/// below it (same left edge and width within 2 dots, top 5 dots under the
/// symbol within 3 dots) is suppressed. A text already claimed by an earlier
/// barcode can be claimed again.
pub fn suppressed_captions(objects: &[SceneObject]) -> HashSet<usize> {
    let mut suppressed = HashSet::new();

    for barcode in objects
        .iter()
        .filter(|o| o.object_type() == ObjectType::Barcode)
    {
        let Some(data) = barcode.text() else {
            continue;
        };
        let caption_y = i64::from(barcode.y) + i64::from(barcode.height) + CAPTION_GAP;

        let caption = objects.iter().position(|t| {
            t.object_type() == ObjectType::Text
                && t.text() == Some(data)
                && t.x.abs_diff(barcode.x) <= CAPTION_ALIGN_TOLERANCE
                && t.width.abs_diff(barcode.width) <= CAPTION_ALIGN_TOLERANCE
                && i64::from(t.y).abs_diff(caption_y) <= CAPTION_VERTICAL_TOLERANCE
        });
        if let Some(index) = caption {
            suppressed.insert(index);
        }
    }

    suppressed
}

// ── Per-object emission ─────────────────────────────────────────────────

fn emit_object(out: &mut String, object: &SceneObject) {
    let _ = writeln!(out, "^FO{},{}", object.x, object.y);

    match &object.kind {
        ObjectKind::Text {
            text,
            font,
            font_size,
        } => {
            let _ = writeln!(out, "^A{font},N,{font_size},{font_size}");
            if object.rotation != 0 {
                out.push_str("^FWR\n");
            }
            let _ = writeln!(out, "^FD{text}^FS");
        }

        ObjectKind::Barcode {
            text,
            symbology,
            module_width,
            ratio,
            bar_height,
            hri_above,
        } => {
            let _ = writeln!(out, "^BY{module_width},{ratio},{bar_height}");
            let hri = if *hri_above { 'Y' } else { 'N' };
            emit_symbol(out, *symbology, object.height, hri);
            let _ = writeln!(out, "^FD{text}^FS");
        }

        ObjectKind::Rectangle { border_thickness } => {
            let _ = writeln!(
                out,
                "^GB{},{},{border_thickness}^FS",
                object.width, object.height
            );
        }

        ObjectKind::Line { stroke_thickness } => {
            let t = (*stroke_thickness).max(1);
            if object.width > object.height {
                let _ = writeln!(out, "^GB{},{t},B^FS", object.width);
            } else {
                let _ = writeln!(out, "^GB{t},{},B^FS", object.height);
            }
        }

        ObjectKind::Circle { border_thickness } => {
            let diameter = object.width.min(object.height);
            let _ = writeln!(out, "^GC{diameter},{border_thickness}^FS");
        }

        ObjectKind::Image { reference } => {
            if let Some(name) = graphic_name(reference) {
                let _ = writeln!(out, "^XG{name},1,1^FS");
            }
        }
    }
}

fn emit_symbol(out: &mut String, symbology: Symbology, height: i32, hri: char) {
    let _ = match symbology {
        Symbology::Code128 => writeln!(out, "^BCN,{height},Y,{hri},Y"),
        Symbology::Code39 => writeln!(out, "^B3N,N,{height},Y,{hri},Y"),
        Symbology::Code93 => writeln!(out, "^BAN,{height},Y,{hri},Y"),
        Symbology::Interleaved2of5 => writeln!(out, "^B2N,N,{height},Y,{hri},Y"),
        Symbology::Ean13 | Symbology::Ean8 => writeln!(out, "^BEN,{height},Y,{hri},Y"),
        Symbology::UpcA | Symbology::UpcE => writeln!(out, "^BUN,{height},Y,{hri},Y"),
    };
}

/// Printer-side graphic name for `^XG`: directory and extension stripped,
/// first 8 characters, uppercased. `None` for an empty reference.
pub fn graphic_name(reference: &str) -> Option<String> {
    let file = reference
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    if file.is_empty() {
        return None;
    }
    let stem = match file.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file,
    };
    Some(
        stem.chars()
            .take(GRAPHIC_NAME_LEN)
            .collect::<String>()
            .to_uppercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphic_name_strips_extension_and_truncates() {
        assert_eq!(graphic_name("image.bmp").as_deref(), Some("IMAGE"));
        assert_eq!(graphic_name("company_logo.grf").as_deref(), Some("COMPANY_"));
        assert_eq!(graphic_name("noext").as_deref(), Some("NOEXT"));
        assert_eq!(graphic_name("/srv/labels/logo.png").as_deref(), Some("LOGO"));
        assert_eq!(graphic_name(".hidden").as_deref(), Some(".HIDDEN"));
        assert_eq!(graphic_name("   "), None);
    }
}
