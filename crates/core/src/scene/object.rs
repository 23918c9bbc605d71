//! Placeable label primitives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Length of generated object identifiers.
pub const ID_LEN: usize = 8;

/// Opaque short identifier of a scene object.
///
/// Generated once when the object is created and never reused; a pasted
/// copy receives a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a new random identifier (first [`ID_LEN`] hex digits of a v4 UUID).
    pub fn generate() -> Self {
        let mut token = uuid::Uuid::new_v4().simple().to_string();
        token.truncate(ID_LEN);
        Self(token)
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Object type tag ─────────────────────────────────────────────────────

/// Variant tag of a [`SceneObject`], used for runtime dispatch and in the
/// project file (`obj_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Free text field.
    Text,
    /// One-dimensional barcode.
    Barcode,
    /// Box outline.
    Rectangle,
    /// Horizontal or vertical rule.
    Line,
    /// Circle outline.
    Circle,
    /// Graphic stored on the printer.
    Image,
}

impl ObjectType {
    /// Every object type, in toolbar order.
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Text,
        ObjectType::Barcode,
        ObjectType::Rectangle,
        ObjectType::Line,
        ObjectType::Circle,
        ObjectType::Image,
    ];

    /// Lowercase name used in project files.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::Text => "text",
            ObjectType::Barcode => "barcode",
            ObjectType::Rectangle => "rectangle",
            ObjectType::Line => "line",
            ObjectType::Circle => "circle",
            ObjectType::Image => "image",
        }
    }

    /// Size `(width, height)` given to newly added objects of this type.
    pub fn default_size(self) -> (i32, i32) {
        match self {
            ObjectType::Text => (100, 30),
            ObjectType::Barcode => (120, 60),
            ObjectType::Rectangle => (80, 40),
            ObjectType::Line => (100, 0),
            ObjectType::Circle => (40, 40),
            ObjectType::Image => (60, 60),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown object type '{s}'"))
    }
}

// ── Barcode symbologies ─────────────────────────────────────────────────

/// Barcode symbologies the designer can place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbology {
    /// Code 128 (`^BC`).
    #[default]
    #[serde(rename = "128")]
    Code128,
    /// Code 39 (`^B3`).
    #[serde(rename = "39")]
    Code39,
    /// Code 93 (`^BA`).
    #[serde(rename = "93")]
    Code93,
    /// Interleaved 2 of 5 (`^B2`).
    #[serde(rename = "I25")]
    Interleaved2of5,
    /// EAN-13 (`^BE`).
    #[serde(rename = "EAN13")]
    Ean13,
    /// EAN-8, exported through the EAN-13 command (`^BE`).
    #[serde(rename = "EAN8")]
    Ean8,
    /// UPC-A (`^BU`).
    #[serde(rename = "UPCA")]
    UpcA,
    /// UPC-E, exported through the UPC-A command (`^BU`).
    #[serde(rename = "UPCE")]
    UpcE,
}

impl Symbology {
    /// Every supported symbology, in picker order.
    pub const ALL: [Symbology; 8] = [
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Interleaved2of5,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
    ];

    /// Short code stored in project files (`"128"`, `"I25"`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Symbology::Code128 => "128",
            Symbology::Code39 => "39",
            Symbology::Code93 => "93",
            Symbology::Interleaved2of5 => "I25",
            Symbology::Ean13 => "EAN13",
            Symbology::Ean8 => "EAN8",
            Symbology::UpcA => "UPCA",
            Symbology::UpcE => "UPCE",
        }
    }

    /// Human-readable name.
    pub fn description(self) -> &'static str {
        match self {
            Symbology::Code128 => "Code128",
            Symbology::Code39 => "Code39",
            Symbology::Code93 => "Code93",
            Symbology::Interleaved2of5 => "Interleaved 2/5",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Symbology {
    type Err = String;

    /// Accepts the short code or the human-readable name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Symbology::ALL
            .into_iter()
            .find(|sym| sym.code().eq_ignore_ascii_case(s) || sym.description().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown barcode type '{s}'"))
    }
}

// ── Scene object ────────────────────────────────────────────────────────

/// Text content of a new text object.
pub const DEFAULT_TEXT: &str = "Sample";
/// Data of a new barcode object.
pub const DEFAULT_BARCODE_DATA: &str = "123456789";
/// Graphic name of a new image object.
pub const DEFAULT_IMAGE_REFERENCE: &str = "image.bmp";
/// Font code of new text objects and of the importer's initial state.
pub const DEFAULT_FONT: char = 'A';
/// Font size of new text objects and of the importer's initial state.
pub const DEFAULT_FONT_SIZE: u32 = 30;
/// Border thickness of new rectangles and circles.
pub const DEFAULT_BORDER_THICKNESS: u32 = 2;
/// Stroke thickness of new lines.
pub const DEFAULT_STROKE_THICKNESS: u32 = 3;

/// Variant-specific fields of a [`SceneObject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "obj_type", rename_all = "lowercase")]
pub enum ObjectKind {
    /// Free text.
    Text {
        /// Printed text.
        text: String,
        /// Single-character printer font code (`A`–`Z`, `0`–`9`).
        font: char,
        /// Character height and width in dots.
        font_size: u32,
    },
    /// One-dimensional barcode. `height` of the owning object is the symbol height.
    Barcode {
        /// Encoded data.
        text: String,
        /// Symbology.
        symbology: Symbology,
        /// Narrow bar width in dots.
        module_width: u32,
        /// Wide-to-narrow bar ratio.
        ratio: u32,
        /// Default bar height sent with `^BY`.
        bar_height: u32,
        /// Print the human-readable line above the symbol instead of below.
        hri_above: bool,
    },
    /// Box outline.
    Rectangle {
        /// Border thickness in dots.
        border_thickness: u32,
    },
    /// Straight rule, horizontal when wider than tall.
    Line {
        /// Stroke thickness in dots.
        stroke_thickness: u32,
    },
    /// Circle outline; diameter is the smaller of width and height.
    Circle {
        /// Border thickness in dots.
        border_thickness: u32,
    },
    /// Graphic already stored on the printer, recalled with `^XG`.
    Image {
        /// File name of the stored graphic.
        reference: String,
    },
}

impl ObjectKind {
    /// Variant fields a newly added object of type `ty` starts with.
    pub fn default_for(ty: ObjectType) -> Self {
        match ty {
            ObjectType::Text => ObjectKind::Text {
                text: DEFAULT_TEXT.to_string(),
                font: DEFAULT_FONT,
                font_size: DEFAULT_FONT_SIZE,
            },
            ObjectType::Barcode => ObjectKind::Barcode {
                text: DEFAULT_BARCODE_DATA.to_string(),
                symbology: Symbology::Code128,
                module_width: 3,
                ratio: 2,
                bar_height: 100,
                hri_above: false,
            },
            ObjectType::Rectangle => ObjectKind::Rectangle {
                border_thickness: DEFAULT_BORDER_THICKNESS,
            },
            ObjectType::Line => ObjectKind::Line {
                stroke_thickness: DEFAULT_STROKE_THICKNESS,
            },
            ObjectType::Circle => ObjectKind::Circle {
                border_thickness: DEFAULT_BORDER_THICKNESS,
            },
            ObjectType::Image => ObjectKind::Image {
                reference: DEFAULT_IMAGE_REFERENCE.to_string(),
            },
        }
    }

    /// Variant tag.
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectKind::Text { .. } => ObjectType::Text,
            ObjectKind::Barcode { .. } => ObjectType::Barcode,
            ObjectKind::Rectangle { .. } => ObjectType::Rectangle,
            ObjectKind::Line { .. } => ObjectType::Line,
            ObjectKind::Circle { .. } => ObjectType::Circle,
            ObjectKind::Image { .. } => ObjectType::Image,
        }
    }
}

/// One placeable primitive on the label.
///
/// Coordinates and sizes are in printer dots. `width` and `height` are kept
/// non-negative by every editing operation; for a circle they bound the
/// diameter and for a line they give its run length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique identifier within the scene.
    pub id: ObjectId,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in dots.
    pub width: i32,
    /// Height in dots.
    pub height: i32,
    /// Rotation in degrees (0, 90, 180, 270 by convention).
    pub rotation: i32,
    /// Variant-specific fields.
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl SceneObject {
    /// Build an object of type `ty` at `(x, y)` with that type's default size and fields.
    pub fn with_defaults(ty: ObjectType, id: ObjectId, x: i32, y: i32) -> Self {
        let (width, height) = ty.default_size();
        Self {
            id,
            x,
            y,
            width,
            height,
            rotation: 0,
            kind: ObjectKind::default_for(ty),
        }
    }

    /// Variant tag.
    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    /// Printed text of text and barcode objects.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Text { text, .. } | ObjectKind::Barcode { text, .. } => Some(text),
            _ => None,
        }
    }

    /// `true` when `(px, py)` lies inside the bounding box (edges included).
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        let (px, py) = (i64::from(px), i64::from(py));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        x <= px && px <= x + i64::from(self.width) && y <= py && py <= y + i64::from(self.height)
    }
}
