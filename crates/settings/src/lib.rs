//! Label configuration for the ZPL label designer.
//!
//! [`LabelSettings`] carries the physical and print parameters of the label
//! being designed: size in millimetres, print resolution, orientation, and the
//! snapping grid used while placing objects.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Print resolutions the designer supports, in dots per inch.
pub const SUPPORTED_DPI: [u32; 3] = [203, 300, 600];

const MM_PER_INCH: f64 = 25.4;

/// Errors that can occur when loading or validating label settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// JSON deserialization failed.
    #[error("invalid label settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Label orientation.
///
/// Landscape swaps the canvas axes and makes the exported label print
/// inverted (`^POI`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Width along the print head.
    #[default]
    Portrait,
    /// Rotated label; exported with `^POI`.
    Landscape,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "Portrait"),
            Orientation::Landscape => write!(f, "Landscape"),
        }
    }
}

/// Physical and print parameters of the label.
///
/// Missing fields deserialize to their defaults, so older project files
/// keep loading. Use [`load_settings_from_str`] for strict loading or
/// [`LabelSettings::sanitized`] to repair out-of-range values.
///
/// # Example
/// ```
/// use zpl_label_settings::{LabelSettings, Orientation};
///
/// let settings = LabelSettings {
///     width_mm: 60.0,
///     height_mm: 40.0,
///     orientation: Orientation::Landscape,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// assert_eq!(settings.size_in_dots(), (319, 479));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Label width in millimetres.
    pub width_mm: f64,
    /// Label height in millimetres.
    pub height_mm: f64,
    /// Print resolution; one of [`SUPPORTED_DPI`].
    pub dpi: u32,
    /// Draw a border around the label on the canvas.
    pub border: bool,
    /// Label orientation.
    pub orientation: Orientation,
    /// Snap object positions to the grid while editing.
    pub snap_to_grid: bool,
    /// Grid pitch in dots.
    pub grid_size: i32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            width_mm: 100.0,
            height_mm: 50.0,
            dpi: 203,
            border: false,
            orientation: Orientation::Portrait,
            snap_to_grid: false,
            grid_size: 10,
        }
    }
}

impl LabelSettings {
    /// Check every field against its valid range, reporting the first violation.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_length("width_mm", self.width_mm)?;
        check_length("height_mm", self.height_mm)?;

        if !SUPPORTED_DPI.contains(&self.dpi) {
            return Err(SettingsError::InvalidField {
                field: "dpi".into(),
                reason: format!("{} is not one of {SUPPORTED_DPI:?}", self.dpi),
            });
        }

        if self.grid_size <= 0 {
            return Err(SettingsError::InvalidField {
                field: "grid_size".into(),
                reason: format!("{} must be > 0", self.grid_size),
            });
        }

        Ok(())
    }

    /// Copy of `self` with every invalid field replaced by its default.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();
        if check_length("width_mm", out.width_mm).is_err() {
            out.width_mm = defaults.width_mm;
        }
        if check_length("height_mm", out.height_mm).is_err() {
            out.height_mm = defaults.height_mm;
        }
        if !SUPPORTED_DPI.contains(&out.dpi) {
            out.dpi = defaults.dpi;
        }
        if out.grid_size <= 0 {
            out.grid_size = defaults.grid_size;
        }
        out
    }

    /// Convert a length in millimetres to dots at this resolution (truncating).
    pub fn mm_to_dots(&self, mm: f64) -> u32 {
        (mm * f64::from(self.dpi) / MM_PER_INCH) as u32
    }

    /// Canvas size in dots as `(width, height)`; axes swap in landscape.
    pub fn size_in_dots(&self) -> (u32, u32) {
        let w = self.mm_to_dots(self.width_mm);
        let h = self.mm_to_dots(self.height_mm);
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Snap a position to the grid when snapping is enabled; identity otherwise.
    pub fn snap(&self, x: i32, y: i32) -> (i32, i32) {
        if !self.snap_to_grid || self.grid_size <= 0 {
            return (x, y);
        }
        (
            snap_coord(x, self.grid_size),
            snap_coord(y, self.grid_size),
        )
    }
}

/// Round `value` to the nearest multiple of `grid` (halves away from zero).
///
/// Results that would leave the `i32` range clamp to the outermost multiple
/// of `grid` that fits. Panics if `grid` is zero.
pub fn snap_coord(value: i32, grid: i32) -> i32 {
    assert!(grid != 0, "grid size must be non-zero");
    let g = i64::from(grid);
    let steps = (f64::from(value) / f64::from(grid)).round() as i64;
    let lowest = i64::from(i32::MIN) / g * g;
    let highest = i64::from(i32::MAX) / g * g;
    let snapped = (steps * g).clamp(lowest, highest);
    i32::try_from(snapped).unwrap_or(value)
}

fn check_length(field: &str, mm: f64) -> Result<(), SettingsError> {
    if !mm.is_finite() || mm <= 0.0 {
        return Err(SettingsError::InvalidField {
            field: field.into(),
            reason: format!("{mm} must be a positive length in millimetres"),
        });
    }
    Ok(())
}

/// Load and validate [`LabelSettings`] from a JSON string.
///
/// Absent fields take their defaults; present fields must be in range.
pub fn load_settings_from_str(s: &str) -> Result<LabelSettings, SettingsError> {
    let settings: LabelSettings = serde_json::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_valid() {
        let s = LabelSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.dpi, 203);
        assert_eq!(s.grid_size, 10);
        assert_eq!(s.orientation, Orientation::Portrait);
    }

    #[test]
    fn load_full_settings() {
        let json = r#"{
            "width_mm": 60.0,
            "height_mm": 30.0,
            "dpi": 300,
            "border": true,
            "orientation": "Landscape",
            "snap_to_grid": true,
            "grid_size": 5
        }"#;
        let s = load_settings_from_str(json).unwrap();
        assert_eq!(s.dpi, 300);
        assert!(s.border);
        assert_eq!(s.orientation, Orientation::Landscape);
        assert_eq!(s.grid_size, 5);
    }

    #[test]
    fn load_partial_settings_fills_defaults() {
        let s = load_settings_from_str(r#"{ "dpi": 600 }"#).unwrap();
        assert_eq!(s.dpi, 600);
        assert_eq!(s.width_mm, 100.0);
        assert!(!s.snap_to_grid);
    }

    #[test]
    fn load_rejects_unsupported_dpi() {
        let err = load_settings_from_str(r#"{ "dpi": 250 }"#).unwrap_err();
        assert!(err.to_string().contains("dpi"), "{err}");
    }

    #[test]
    fn load_rejects_non_positive_size() {
        let err = load_settings_from_str(r#"{ "height_mm": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("height_mm"), "{err}");
    }

    #[test]
    fn load_rejects_malformed_json() {
        let err = load_settings_from_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidJson(_)));
    }

    #[test]
    fn sanitized_repairs_each_bad_field() {
        let bad = LabelSettings {
            width_mm: -3.0,
            height_mm: f64::NAN,
            dpi: 150,
            grid_size: 0,
            border: true,
            ..Default::default()
        };
        let fixed = bad.sanitized();
        assert!(fixed.validate().is_ok());
        assert_eq!(fixed.width_mm, 100.0);
        assert_eq!(fixed.dpi, 203);
        assert_eq!(fixed.grid_size, 10);
        assert!(fixed.border, "valid fields are kept");
    }

    #[test]
    fn dots_follow_resolution_and_orientation() {
        let mut s = LabelSettings::default();
        assert_eq!(s.size_in_dots(), (799, 399));
        s.orientation = Orientation::Landscape;
        assert_eq!(s.size_in_dots(), (399, 799));
        s.dpi = 300;
        assert_eq!(s.mm_to_dots(25.4), 300);
    }

    #[test]
    fn snap_clamps_at_the_ends_of_the_range() {
        assert_eq!(snap_coord(i32::MAX, 10), 2_147_483_640);
        assert_eq!(snap_coord(i32::MIN, 10), -2_147_483_640);
        assert_eq!(snap_coord(i32::MAX - 2, 10), 2_147_483_640);
        assert_eq!(snap_coord(i32::MAX, 1), i32::MAX);
        assert_eq!(snap_coord(i32::MIN, 1), i32::MIN);
    }

    #[test]
    fn snap_disabled_is_identity() {
        let s = LabelSettings::default();
        assert_eq!(s.snap(53, 47), (53, 47));
    }

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        let s = LabelSettings {
            snap_to_grid: true,
            ..Default::default()
        };
        assert_eq!(s.snap(53, 47), (50, 50));
        assert_eq!(s.snap(55, -14), (60, -10));
    }

    proptest! {
        #[test]
        fn snap_is_idempotent(x in any::<i32>(), y in any::<i32>(), g in 1i32..100) {
            let s = LabelSettings { snap_to_grid: true, grid_size: g, ..Default::default() };
            let once = s.snap(x, y);
            prop_assert_eq!(s.snap(once.0, once.1), once);
            prop_assert_eq!(once.0 % g, 0);
            prop_assert_eq!(once.1 % g, 0);
        }
    }
}
