use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Species;

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
            // Offset so Adelie lands on a blue rather than a red.
            let hue = (220.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
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
// Species → Color32
// ---------------------------------------------------------------------------

/// Fixed species colours. Keyed by species rather than by position in the
/// current view, so a species keeps its colour when others are filtered out.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPalette {
    colors: [Color32; 3],
}

impl Default for SpeciesPalette {
    fn default() -> Self {
        let generated = generate_palette(Species::ALL.len());
        let mut colors = [Color32::GRAY; 3];
        for (slot, c) in colors.iter_mut().zip(generated) {
            *slot = c;
        }
        SpeciesPalette { colors }
    }
}

impl SpeciesPalette {
    pub fn color_for(&self, species: Species) -> Color32 {
        self.colors[species.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn species_colours_are_distinct_and_stable() {
        let palette = SpeciesPalette::default();
        let a = palette.color_for(Species::Adelie);
        let g = palette.color_for(Species::Gentoo);
        let c = palette.color_for(Species::Chinstrap);
        assert_ne!(a, g);
        assert_ne!(g, c);
        assert_ne!(a, c);
        assert_eq!(SpeciesPalette::default().color_for(Species::Gentoo), g);
    }
}
