//! Editable object properties and text-input parsing.
//!
//! Every value arrives as text from an input field. Values that do not parse
//! are dropped without complaint and leave the object unchanged.

use std::fmt;
use std::str::FromStr;

use crate::scene::{ObjectKind, ObjectType, SceneObject, Symbology};

/// A property the properties panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Left edge.
    X,
    /// Top edge.
    Y,
    /// Width (clamped at 0).
    Width,
    /// Height (clamped at 0).
    Height,
    /// Circle diameter; sets width and height together.
    Diameter,
    /// Rotation in degrees.
    Rotation,
    /// Content of a text object or data of a barcode.
    Text,
    /// Single-character font code of a text object.
    Font,
    /// Font size of a text object.
    FontSize,
    /// Barcode symbology.
    Symbology,
    /// Barcode narrow bar width.
    ModuleWidth,
    /// Barcode wide-to-narrow ratio.
    Ratio,
    /// Barcode bar height; also sets the object height.
    BarHeight,
    /// Barcode human-readable line position.
    HriAbove,
    /// Border thickness of rectangles and circles, stroke of lines.
    Thickness,
    /// Stored graphic name of an image.
    ImageReference,
}

impl Property {
    /// Every property.
    pub const ALL: [Property; 16] = [
        Property::X,
        Property::Y,
        Property::Width,
        Property::Height,
        Property::Diameter,
        Property::Rotation,
        Property::Text,
        Property::Font,
        Property::FontSize,
        Property::Symbology,
        Property::ModuleWidth,
        Property::Ratio,
        Property::BarHeight,
        Property::HriAbove,
        Property::Thickness,
        Property::ImageReference,
    ];

    /// Name used in the properties panel and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Width => "width",
            Property::Height => "height",
            Property::Diameter => "diameter",
            Property::Rotation => "rotation",
            Property::Text => "text",
            Property::Font => "font",
            Property::FontSize => "font_size",
            Property::Symbology => "symbology",
            Property::ModuleWidth => "module_width",
            Property::Ratio => "ratio",
            Property::BarHeight => "bar_height",
            Property::HriAbove => "hri_above",
            Property::Thickness => "thickness",
            Property::ImageReference => "image",
        }
    }

    /// Choice-style properties (pickers and toggles) take effect as one
    /// undoable step as soon as they change. Typed fields wait for focus loss.
    pub fn commits_immediately(self) -> bool {
        matches!(
            self,
            Property::Font | Property::Symbology | Property::HriAbove
        )
    }

    /// `true` when objects of type `ty` have this property.
    pub fn applies_to(self, ty: ObjectType) -> bool {
        match self {
            Property::X | Property::Y | Property::Width | Property::Height | Property::Rotation => {
                true
            }
            Property::Diameter => ty == ObjectType::Circle,
            Property::Text => matches!(ty, ObjectType::Text | ObjectType::Barcode),
            Property::Font | Property::FontSize => ty == ObjectType::Text,
            Property::Symbology
            | Property::ModuleWidth
            | Property::Ratio
            | Property::BarHeight
            | Property::HriAbove => ty == ObjectType::Barcode,
            Property::Thickness => matches!(
                ty,
                ObjectType::Rectangle | ObjectType::Line | ObjectType::Circle
            ),
            Property::ImageReference => ty == ObjectType::Image,
        }
    }

    /// Properties shown for objects of type `ty`, in panel order.
    pub fn for_type(ty: ObjectType) -> impl Iterator<Item = Property> {
        Property::ALL.into_iter().filter(move |p| p.applies_to(ty))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown property '{s}'"))
    }
}

/// Assign `value` to `property` of `object`.
///
/// Returns `false`, leaving the object untouched, when the property does not
/// apply to the object's type or the value does not parse.
pub(crate) fn apply(object: &mut SceneObject, property: Property, value: &str) -> bool {
    if !property.applies_to(object.object_type()) {
        return false;
    }

    match property {
        Property::X => set_int(&mut object.x, value),
        Property::Y => set_int(&mut object.y, value),
        Property::Width => set_extent(&mut object.width, value),
        Property::Height => set_extent(&mut object.height, value),
        Property::Rotation => set_int(&mut object.rotation, value),
        Property::Diameter => match parse_extent(value) {
            Some(d) => {
                object.width = d;
                object.height = d;
                true
            }
            None => false,
        },
        Property::BarHeight => {
            let Some(h) = parse_extent(value) else {
                return false;
            };
            if let ObjectKind::Barcode { bar_height, .. } = &mut object.kind {
                *bar_height = h.unsigned_abs();
            }
            object.height = h;
            true
        }
        _ => apply_kind(&mut object.kind, property, value),
    }
}

fn apply_kind(kind: &mut ObjectKind, property: Property, value: &str) -> bool {
    match (kind, property) {
        (ObjectKind::Text { text, .. } | ObjectKind::Barcode { text, .. }, Property::Text) => {
            *text = value.to_string();
            true
        }
        (ObjectKind::Image { reference }, Property::ImageReference) => {
            *reference = value.trim().to_string();
            true
        }
        (ObjectKind::Text { font, .. }, Property::Font) => match parse_font(value) {
            Some(f) => {
                *font = f;
                true
            }
            None => false,
        },
        (ObjectKind::Text { font_size, .. }, Property::FontSize) => set_count(font_size, value),
        (ObjectKind::Barcode { symbology, .. }, Property::Symbology) => {
            match value.parse::<Symbology>() {
                Ok(s) => {
                    *symbology = s;
                    true
                }
                Err(_) => false,
            }
        }
        (ObjectKind::Barcode { module_width, .. }, Property::ModuleWidth) => {
            set_count(module_width, value)
        }
        (ObjectKind::Barcode { ratio, .. }, Property::Ratio) => set_count(ratio, value),
        (ObjectKind::Barcode { hri_above, .. }, Property::HriAbove) => match parse_flag(value) {
            Some(b) => {
                *hri_above = b;
                true
            }
            None => false,
        },
        (
            ObjectKind::Rectangle { border_thickness }
            | ObjectKind::Circle { border_thickness },
            Property::Thickness,
        ) => set_count(border_thickness, value),
        (ObjectKind::Line { stroke_thickness }, Property::Thickness) => {
            set_count(stroke_thickness, value)
        }
        _ => false,
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────

fn set_int(slot: &mut i32, value: &str) -> bool {
    match value.trim().parse() {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

fn parse_extent(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok().map(|v| v.max(0))
}

fn set_extent(slot: &mut i32, value: &str) -> bool {
    match parse_extent(value) {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// Non-negative count; negative input clamps to 0.
fn set_count(slot: &mut u32, value: &str) -> bool {
    match parse_extent(value) {
        Some(v) => {
            *slot = v.unsigned_abs();
            true
        }
        None => false,
    }
}

fn parse_font(value: &str) -> Option<char> {
    let mut chars = value.trim().chars();
    let c = chars.next()?.to_ascii_uppercase();
    (chars.next().is_none() && c.is_ascii_alphanumeric()).then_some(c)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
