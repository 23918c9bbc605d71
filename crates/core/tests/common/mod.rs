//! Shared test helpers for `zpl_label_core` integration tests.

#![allow(unreachable_pub)]

use zpl_label_core::{
    Diagnostic, EditorSession, LabelSettings, ObjectId, ObjectKind, ObjectType, SceneObject,
};

// ─── Object builders ─────────────────────────────────────────────────────────

/// Object of type `ty` with defaults at `(x, y)` and a fixed id.
#[allow(dead_code)]
pub fn object(ty: ObjectType, id: &str, x: i32, y: i32) -> SceneObject {
    SceneObject::with_defaults(ty, id.into(), x, y)
}

/// Text object with the given content and size.
#[allow(dead_code)]
pub fn text(id: &str, content: &str, x: i32, y: i32, width: i32) -> SceneObject {
    let mut o = object(ObjectType::Text, id, x, y);
    o.width = width;
    if let ObjectKind::Text { text, .. } = &mut o.kind {
        *text = content.to_string();
    }
    o
}

/// Barcode object with the given data and geometry.
#[allow(dead_code)]
pub fn barcode(id: &str, data: &str, x: i32, y: i32, width: i32, height: i32) -> SceneObject {
    let mut o = object(ObjectType::Barcode, id, x, y);
    o.width = width;
    o.height = height;
    if let ObjectKind::Barcode { text, .. } = &mut o.kind {
        *text = data.to_string();
    }
    o
}

/// Rectangle with the given geometry and border.
#[allow(dead_code)]
pub fn rectangle(id: &str, x: i32, y: i32, w: i32, h: i32, border: u32) -> SceneObject {
    let mut o = object(ObjectType::Rectangle, id, x, y);
    o.width = w;
    o.height = h;
    o.kind = ObjectKind::Rectangle {
        border_thickness: border,
    };
    o
}

// ─── Session helpers ─────────────────────────────────────────────────────────

/// Session with grid snapping enabled at `grid` dots.
#[allow(dead_code)]
pub fn snapping_session(grid: i32) -> EditorSession {
    let settings = LabelSettings {
        snap_to_grid: true,
        grid_size: grid,
        ..Default::default()
    };
    EditorSession::with_settings(settings).unwrap()
}

/// Ids of the session's objects, bottom to top.
#[allow(dead_code)]
pub fn ids(session: &EditorSession) -> Vec<ObjectId> {
    session.scene().iter().map(|o| o.id.clone()).collect()
}

// ─── Diagnostic helpers ──────────────────────────────────────────────────────

/// Collect diagnostic codes in order.
#[allow(dead_code)]
pub fn diag_codes(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.id.to_string()).collect()
}

/// Find the first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(diagnostics: &'a [Diagnostic], code: &str) -> Option<&'a Diagnostic> {
    diagnostics.iter().find(|d| d.id == code)
}

/// Lines of encoded ZPL, without the trailing empty line.
#[allow(dead_code)]
pub fn zpl_lines(zpl: &str) -> Vec<&str> {
    zpl.lines().collect()
}
