//! Brightness-compensation color transform (spec §4.2).
//!
//! LEDs crush dark tones as hardware brightness drops; this boosts the
//! already-dim channels of a fill color before it is drawn, so low
//! hardware-brightness settings do not turn near-black colors fully black.
//! The `0.7` scale factor and `0.1` dark-boost weight are tuned constants
//! from the reference implementation, not derived.

use sign_core::values::split_rgb;

/// Applies the brightness-compensation transform to a packed `0xRRGGBB`
/// color. `brightness` is the Renderer's perceptual brightness target in
/// `[1, 100]`.
#[must_use]
pub fn compensate(color: u32, brightness: u8) -> u32 {
    if brightness >= 100 {
        return color;
    }

    let brightness = f64::from(brightness);
    let (r, g, b) = split_rgb(color);
    let (r, g, b) = (r as f64, g as f64, b as f64);

    let scale = 1.0 - 0.7 * (1.0 - brightness / 100.0);
    let avg_channel = (r + g + b) / 3.0;
    let dark_boost = if avg_channel < 100.0 {
        (1.0 - avg_channel / 100.0) * 0.1
    } else {
        0.0
    };
    let scale = scale + dark_boost;

    let adjust = |c: f64| -> u32 { (c * scale).round().clamp(0.0, 255.0) as u32 };
    (adjust(r) << 16) | (adjust(g) << 8) | adjust(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_brightness_is_identity() {
        assert_eq!(compensate(0x123456, 100), 0x123456);
    }

    #[test]
    fn channels_are_monotone_non_decreasing_in_brightness_away_from_dark_boost() {
        // Use a color whose average channel is >= 100 so the dark-boost
        // discontinuity (spec §8) does not apply.
        let color = 0x808080;
        let mut last_r = 0u32;
        for brightness in 1..=100u8 {
            let out = compensate(color, brightness);
            let r = (out >> 16) & 0xFF;
            assert!(r >= last_r, "channel decreased at brightness {brightness}");
            last_r = r;
        }
    }

    #[test]
    fn dark_colors_get_boosted_more_than_the_plain_scale_factor() {
        let color = 0x0A0A0A; // avg channel = 10, well under the 100 threshold
        let brightness = 50u8;
        let plain_scale = 1.0 - 0.7 * (1.0 - f64::from(brightness) / 100.0);
        let plain_channel = (0x0A as f64 * plain_scale).round() as u32;
        let out = compensate(color, brightness);
        let r = (out >> 16) & 0xFF;
        assert!(r >= plain_channel);
    }
}
