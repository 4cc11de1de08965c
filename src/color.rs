use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::catalog::ColumnCatalog;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: measurement key → Color32
// ---------------------------------------------------------------------------

/// One stable colour per catalog measurement, so a measurement keeps its
/// colour across surveys, reloads and exports.
#[derive(Debug, Clone)]
pub struct MeasurementColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl MeasurementColors {
    /// Assign palette slots in catalog order.
    pub fn for_catalog(catalog: &ColumnCatalog) -> Self {
        let palette = generate_palette(catalog.len());
        let mapping: BTreeMap<String, Color32> = catalog
            .entries()
            .iter()
            .zip(palette)
            .map(|(m, c)| (m.key.clone(), c))
            .collect();

        MeasurementColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a measurement key.
    pub fn color_for(&self, key: &str) -> Color32 {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// The same colour as an `(r, g, b)` triple for the file exporters, which do
/// not speak `Color32`.
pub fn rgb_components(color: Color32) -> (u8, u8, u8) {
    (color.r(), color.g(), color.b())
}
