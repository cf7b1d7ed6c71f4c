use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Highlight for selected race bars.
pub const RACE_BRUSH: Color32 = Color32::from_rgb(70, 130, 180);
/// Highlight for selected education bars.
pub const EDUCATION_BRUSH: Color32 = Color32::from_rgb(250, 128, 114);
/// Bars outside an active brush.
pub const UNSELECTED: Color32 = Color32::from_rgb(211, 211, 211);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.6, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Bar colour for a category under a brush: `highlight` when the brush is
/// empty or contains the category, grey otherwise.
pub fn brush_color(brushed: bool, brush_active: bool, highlight: Color32) -> Color32 {
    if !brush_active || brushed {
        highlight
    } else {
        UNSELECTED
    }
}

// ---------------------------------------------------------------------------
// Color mapping: reason label → Color32
// ---------------------------------------------------------------------------

/// Maps reason labels to distinct colours so the in-slice and out-of-slice
/// charts colour the same reason the same way.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let palette = generate_palette(labels.len());
        ColorMap {
            mapping: labels.into_iter().zip(palette).collect(),
        }
    }

    /// Colour for `label`; unknown labels are grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_distinct() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_color_map_lookup() {
        let cm = ColorMap::new(["cost", "fear"]);
        assert_ne!(cm.color_for("cost"), cm.color_for("fear"));
        assert_eq!(cm.color_for("unknown"), Color32::GRAY);
    }

    #[test]
    fn test_brush_color() {
        assert_eq!(brush_color(false, false, RACE_BRUSH), RACE_BRUSH);
        assert_eq!(brush_color(true, true, RACE_BRUSH), RACE_BRUSH);
        assert_eq!(brush_color(false, true, RACE_BRUSH), UNSELECTED);
    }
}
