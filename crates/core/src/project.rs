//! Project files: the saved form of a design.
//!
//! A project is a JSON document with two keys. `label_settings` holds the
//! [`LabelSettings`] fields and `objects` holds one flat record per object,
//! bottom to top. Every record carries every field regardless of object
//! type, unused ones at their defaults.
//!
//! Loading is forgiving: missing or unreadable settings fields take
//! defaults, out-of-range values are repaired, and records that cannot be
//! understood are skipped with a warning instead of failing the whole file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;
use zpl_label_settings::LabelSettings;

use crate::scene::object::{
    DEFAULT_BORDER_THICKNESS, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_STROKE_THICKNESS,
};
use crate::scene::{ObjectId, ObjectKind, ObjectType, Scene, SceneObject, Symbology};

/// Errors raised while reading or writing project files.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The file could not be read or written.
    #[error("cannot access project file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not JSON, or its top level has the wrong shape.
    #[error("invalid project JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Saved design: label settings plus objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectFile {
    /// Label settings.
    pub label_settings: LabelSettings,
    /// Objects, bottom to top.
    pub objects: Vec<ObjectRecord>,
}

/// Flat, type-agnostic form of a [`SceneObject`] as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectRecord {
    /// Object type name (`text`, `barcode`, ...).
    pub obj_type: String,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
    /// Text content, barcode data, or image reference.
    pub text: String,
    /// Font size, stored as text; numbers are accepted on load.
    #[serde(deserialize_with = "string_or_number")]
    pub font_size: String,
    /// Font code.
    pub font_type: String,
    /// Rotation in degrees.
    pub rotation: i32,
    /// Border thickness of rectangles and circles.
    pub thickness: i64,
    /// Barcode symbology code.
    pub barcode_type: String,
    /// Stroke thickness of lines.
    pub line_thickness: i64,
    /// Whether the object was selected when saved.
    pub selected: bool,
    /// Object identifier.
    pub id: String,
    /// Barcode narrow bar width.
    pub bar_module: i64,
    /// Barcode wide-to-narrow ratio.
    pub bar_ratio: i64,
    /// Barcode bar height.
    pub bar_height: i64,
    /// Barcode human-readable line above the symbol.
    pub hri_above: bool,
}

impl Default for ObjectRecord {
    fn default() -> Self {
        Self {
            obj_type: String::new(),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            text: String::new(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
            font_type: DEFAULT_FONT.to_string(),
            rotation: 0,
            thickness: DEFAULT_BORDER_THICKNESS.into(),
            barcode_type: Symbology::Code128.code().to_string(),
            line_thickness: DEFAULT_STROKE_THICKNESS.into(),
            selected: false,
            id: String::new(),
            bar_module: 3,
            bar_ratio: 2,
            bar_height: 100,
            hri_above: false,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

// ── Conversion ──────────────────────────────────────────────────────────

impl ObjectRecord {
    /// Flatten an object for saving.
    pub fn from_object(object: &SceneObject, selected: bool) -> Self {
        let mut record = Self {
            obj_type: object.object_type().as_str().to_string(),
            x: object.x,
            y: object.y,
            width: object.width,
            height: object.height,
            rotation: object.rotation,
            selected,
            id: object.id.to_string(),
            ..Self::default()
        };

        match &object.kind {
            ObjectKind::Text {
                text,
                font,
                font_size,
            } => {
                record.text = text.clone();
                record.font_type = font.to_string();
                record.font_size = font_size.to_string();
            }
            ObjectKind::Barcode {
                text,
                symbology,
                module_width,
                ratio,
                bar_height,
                hri_above,
            } => {
                record.text = text.clone();
                record.barcode_type = symbology.code().to_string();
                record.bar_module = (*module_width).into();
                record.bar_ratio = (*ratio).into();
                record.bar_height = (*bar_height).into();
                record.hri_above = *hri_above;
            }
            ObjectKind::Rectangle { border_thickness } | ObjectKind::Circle { border_thickness } => {
                record.thickness = (*border_thickness).into();
            }
            ObjectKind::Line { stroke_thickness } => {
                record.line_thickness = (*stroke_thickness).into();
            }
            ObjectKind::Image { reference } => {
                record.text = reference.clone();
            }
        }

        record
    }

    /// Rebuild the object this record describes.
    ///
    /// Returns `None` for an unknown `obj_type`. Unparseable font, font size,
    /// or symbology fall back to defaults; negative sizes and thicknesses
    /// clamp to 0; a missing id is generated.
    pub fn to_object(&self) -> Option<SceneObject> {
        let ty = match self.obj_type.parse::<ObjectType>() {
            Ok(ty) => ty,
            Err(reason) => {
                warn!(id = %self.id, %reason, "skipping project record");
                return None;
            }
        };

        let kind = match ty {
            ObjectType::Text => ObjectKind::Text {
                text: self.text.clone(),
                font: self.font(),
                font_size: self.font_size(),
            },
            ObjectType::Barcode => ObjectKind::Barcode {
                text: self.text.clone(),
                symbology: self.symbology(),
                module_width: clamp_u32(self.bar_module),
                ratio: clamp_u32(self.bar_ratio),
                bar_height: clamp_u32(self.bar_height),
                hri_above: self.hri_above,
            },
            ObjectType::Rectangle => ObjectKind::Rectangle {
                border_thickness: clamp_u32(self.thickness),
            },
            ObjectType::Line => ObjectKind::Line {
                stroke_thickness: clamp_u32(self.line_thickness),
            },
            ObjectType::Circle => ObjectKind::Circle {
                border_thickness: clamp_u32(self.thickness),
            },
            ObjectType::Image => ObjectKind::Image {
                reference: self.text.clone(),
            },
        };

        let id = if self.id.trim().is_empty() {
            ObjectId::generate()
        } else {
            ObjectId::from(self.id.trim())
        };

        Some(SceneObject {
            id,
            x: self.x,
            y: self.y,
            width: self.width.max(0),
            height: self.height.max(0),
            rotation: self.rotation,
            kind,
        })
    }

    fn font(&self) -> char {
        let mut chars = self.font_type.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase(),
            _ => {
                warn!(id = %self.id, font = %self.font_type, "unknown font, using default");
                DEFAULT_FONT
            }
        }
    }

    fn font_size(&self) -> u32 {
        self.font_size.trim().parse().unwrap_or_else(|_| {
            warn!(id = %self.id, size = %self.font_size, "unreadable font size, using default");
            DEFAULT_FONT_SIZE
        })
    }

    fn symbology(&self) -> Symbology {
        self.barcode_type.parse().unwrap_or_else(|reason| {
            warn!(id = %self.id, %reason, "using Code128");
            Symbology::Code128
        })
    }
}

/// Settings read field by field; each unreadable field keeps its default.
fn lenient_settings(value: serde_json::Value) -> LabelSettings {
    let mut settings = LabelSettings::default();
    let serde_json::Value::Object(map) = value else {
        warn!("label settings are not an object, using defaults");
        return settings;
    };

    read_field(&map, "width_mm", &mut settings.width_mm);
    read_field(&map, "height_mm", &mut settings.height_mm);
    read_field(&map, "dpi", &mut settings.dpi);
    read_field(&map, "border", &mut settings.border);
    read_field(&map, "orientation", &mut settings.orientation);
    read_field(&map, "snap_to_grid", &mut settings.snap_to_grid);
    read_field(&map, "grid_size", &mut settings.grid_size);
    settings
}

fn read_field<T: DeserializeOwned>(
    map: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    slot: &mut T,
) {
    let Some(value) = map.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(v) => *slot = v,
        Err(e) => warn!(field = key, error = %e, "unreadable label setting, using default"),
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

// ── Document ────────────────────────────────────────────────────────────

/// Top level as read from disk, before per-record checks.
#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    label_settings: Option<serde_json::Value>,
    #[serde(default)]
    objects: Vec<serde_json::Value>,
}

impl ProjectFile {
    /// Capture settings and scene for saving.
    pub fn from_scene(settings: &LabelSettings, scene: &Scene) -> Self {
        Self {
            label_settings: settings.clone(),
            objects: scene
                .iter()
                .map(|o| ObjectRecord::from_object(o, scene.is_selected(&o.id)))
                .collect(),
        }
    }

    /// Settings and scene described by this project. Settings are repaired,
    /// unknown records dropped, duplicate ids renamed, and the saved
    /// selection restored.
    pub fn into_parts(self) -> (LabelSettings, Scene) {
        let settings = self.label_settings.sanitized();
        if settings != self.label_settings {
            warn!("project label settings out of range, repaired with defaults");
        }

        let mut scene = Scene::new();
        let mut selected = None;
        for record in &self.objects {
            if let Some(object) = record.to_object() {
                let id = scene.push(object);
                if record.selected {
                    selected = Some(id);
                }
            }
        }
        if let Some(id) = selected {
            scene.select(&id);
        }

        (settings, scene)
    }

    /// Parse a project document.
    ///
    /// Fails only when the text is not JSON or its top level is not an
    /// object. Unreadable settings fall back to defaults; unreadable records
    /// are skipped.
    pub fn from_json_str(s: &str) -> Result<Self, ProjectError> {
        let raw: RawProject = serde_json::from_str(s)?;

        let label_settings = raw
            .label_settings
            .map(lenient_settings)
            .unwrap_or_default();

        let objects = raw
            .objects
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable project record");
                    None
                }
            })
            .collect();

        Ok(Self {
            label_settings,
            objects,
        })
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a project file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Write a project file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        let mut text = self.to_json_string()?;
        text.push('\n');
        fs::write(path, text).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
