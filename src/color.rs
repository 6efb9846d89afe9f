use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

// ---------------------------------------------------------------------------
// Fixed colours of the 3-metric chart
// ---------------------------------------------------------------------------

pub const REPEATABILITY: Color32 = Color32::from_rgb(0x34, 0x98, 0xdb);
pub const REPRODUCIBILITY: Color32 = Color32::from_rgb(0xe6, 0x7e, 0x22);
pub const TOTAL_VARIATION: Color32 = Color32::from_rgb(0x2e, 0xcc, 0x71);

/// Bar colours for [`crate::analysis::gage::GageRrMetrics::entries`].
pub const METRIC_COLORS: [Color32; 3] = [REPEATABILITY, REPRODUCIBILITY, TOTAL_VARIATION];

// ---------------------------------------------------------------------------
// Operator palette
// ---------------------------------------------------------------------------

/// Hue step between consecutive operators, in degrees.
const GOLDEN_ANGLE: f32 = 137.507_77;

/// Offset so the first operator does not sit on the repeatability blue.
const FIRST_HUE: f32 = 350.0;

/// `n` colours stepping round the hue circle by the golden angle, so a
/// newly added operator never recolours the existing ones.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (FIRST_HUE + i as f32 * GOLDEN_ANGLE) % 360.0;
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(Hsl::new(hue, 0.65, 0.5)).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// Colour per operator, in column order.
pub fn operator_colors(operators: &[String]) -> Vec<Color32> {
    generate_palette(operators.len())
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
    fn palette_colours_are_distinct() {
        let p = generate_palette(4);
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn adding_operator_keeps_earlier_colours() {
        let three = generate_palette(3);
        let four = generate_palette(4);
        assert_eq!(&four[..3], &three[..]);
    }

    #[test]
    fn one_colour_per_operator() {
        let ops = vec!["Ann".to_string(), "Bob".to_string()];
        assert_eq!(operator_colors(&ops).len(), 2);
    }
}
