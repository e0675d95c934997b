// src/compose.rs

//! Blending of freshly sampled noise against existing framebuffer content.

use crate::color::Rgb;

/// Blends `incoming` over `existing` with the given opacity.
///
/// Each channel becomes `existing * (1 - opacity) + incoming * opacity`,
/// rounded to the nearest integer and clamped to [0, 255]. An opacity of 0
/// keeps the existing color exactly; 1 replaces it exactly.
pub fn blend(existing: Rgb, incoming: Rgb, opacity: f64) -> Rgb {
    Rgb {
        r: blend_channel(existing.r, incoming.r, opacity),
        g: blend_channel(existing.g, incoming.g, opacity),
        b: blend_channel(existing.b, incoming.b, opacity),
    }
}

fn blend_channel(existing: u8, incoming: u8, opacity: f64) -> u8 {
    let mixed = existing as f64 * (1.0 - opacity) + incoming as f64 * opacity;
    mixed.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_opacity_keeps_existing() {
        let existing = Rgb::new(12, 200, 99);
        let incoming = Rgb::new(255, 0, 17);
        assert_eq!(blend(existing, incoming, 0.0), existing);
    }

    #[test]
    fn full_opacity_replaces_existing() {
        let existing = Rgb::new(12, 200, 99);
        let incoming = Rgb::new(255, 0, 17);
        assert_eq!(blend(existing, incoming, 1.0), incoming);
    }

    #[test]
    fn equal_colors_are_a_fixed_point() {
        let color = Rgb::new(77, 141, 3);
        for step in 0..=10 {
            let opacity = step as f64 / 10.0;
            assert_eq!(blend(color, color, opacity), color);
        }
    }

    #[test]
    fn midpoint_rounds_to_nearest() {
        // (0 * 0.5 + 255 * 0.5) = 127.5, which rounds up.
        assert_eq!(
            blend(Rgb::BLACK, Rgb::WHITE, 0.5),
            Rgb::new(128, 128, 128)
        );
        assert_eq!(
            blend(Rgb::new(100, 100, 100), Rgb::new(101, 101, 101), 0.5),
            Rgb::new(101, 101, 101)
        );
    }

    #[test]
    fn quarter_blend() {
        let existing = Rgb::new(0, 200, 40);
        let incoming = Rgb::new(200, 0, 80);
        assert_eq!(blend(existing, incoming, 0.25), Rgb::new(50, 150, 50));
    }
}
