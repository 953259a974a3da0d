use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

/// Hue step between consecutive categories, in degrees. The golden angle keeps
/// neighbours in sorted order far apart on the wheel.
const HUE_STEP: f32 = 137.507_77;

/// `n` colours for chart series, alternating lightness so adjacent bars stay
/// readable on both themes.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * HUE_STEP) % 360.0;
            let lightness = if i % 2 == 0 { 0.55 } else { 0.45 };
            let hsl: Hsl = Hsl::new(hue, 0.65, lightness);
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsl).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Category → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per category, so a category keeps its colour in every chart
/// however the filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(categories: &[String]) -> Self {
        let mapping = categories
            .iter()
            .cloned()
            .zip(generate_palette(categories.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_category_is_grey() {
        let map = ColorMap::new(&["GAME".to_string(), "TOOLS".to_string()]);
        assert_ne!(map.color_for("GAME"), map.color_for("TOOLS"));
        assert_eq!(map.color_for("WEATHER"), Color32::GRAY);
    }
}
