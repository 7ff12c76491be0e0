use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Variant;

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
// Color mapping: item → Color32
// ---------------------------------------------------------------------------

/// Maps every available item to a stable colour, so a line keeps its colour
/// while the selection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(items: &[String]) -> Self {
        let mapping = items
            .iter()
            .cloned()
            .zip(generate_palette(items.len()))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, item: &str) -> Color32 {
        self.mapping
            .get(item)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Percent-change highlighting
// ---------------------------------------------------------------------------

/// Text colour for a percent change, and whether to draw it bold.
///
/// Rising prices are bad news (red); rising stock is good news (green).
pub fn change_color(variant: Variant, percent: Option<f64>) -> (Option<Color32>, bool) {
    let Some(p) = percent else {
        return (None, false);
    };
    match variant {
        Variant::Price => {
            if p > 0.0 {
                (Some(Color32::RED), false)
            } else if p < 0.0 {
                (Some(Color32::GREEN), false)
            } else {
                (None, false)
            }
        }
        Variant::Quantity => {
            if p > 20.0 {
                (Some(Color32::GREEN), true)
            } else if p > 0.0 {
                (Some(Color32::GREEN), false)
            } else if p < -20.0 {
                (Some(Color32::RED), true)
            } else if p < 0.0 {
                (Some(Color32::RED), false)
            } else {
                (Some(Color32::GRAY), false)
            }
        }
    }
}
