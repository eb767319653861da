//! Tweenable attribute values.
//!
//! Every prop, keyframe attribute and movie-data value is an [`AttrValue`].
//! Numbers and colors are continuously interpolated by the tween engine;
//! text and booleans are not interpolatable and simply hold at the value of
//! the last keyframe at or before the playhead.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named bag of attribute values, used for static `props`, keyframe
/// attribute sets, and the movie's opaque `data` bag.
pub type AttrMap = HashMap<String, AttrValue>;

/// A single tweenable (or pass-through) value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// A continuously-interpolated scalar (position, alpha, size, ...).
    Number(f64),
    /// A packed `0xRRGGBB` color, interpolated per channel.
    Color(u32),
    /// A string value (text content, font family, alignment keyword, ...).
    /// Held, not interpolated.
    Text(String),
    /// A boolean flag. Held, not interpolated.
    Bool(bool),
}

impl AttrValue {
    /// Linearly interpolates between `self` (at `t=0`) and `other` (at
    /// `t=1`). Non-numeric variants hold at `self` for `t < 1.0` and jump to
    /// `other` at `t >= 1.0`, matching how a segment's end keyframe takes
    /// over for attributes that cannot be blended.
    #[must_use]
    pub fn lerp(&self, other: &AttrValue, t: f64) -> AttrValue {
        match (self, other) {
            (AttrValue::Number(a), AttrValue::Number(b)) => AttrValue::Number(a + (b - a) * t),
            (AttrValue::Color(a), AttrValue::Color(b)) => {
                AttrValue::Color(lerp_color(*a, *b, t))
            }
            _ => {
                if t >= 1.0 {
                    other.clone()
                } else {
                    self.clone()
                }
            }
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<u32> {
        match self {
            AttrValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Per-channel linear interpolation between two packed `0xRRGGBB` colors.
#[must_use]
pub fn lerp_color(a: u32, b: u32, t: f64) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp_channel = |x: u32, y: u32| -> u32 {
        let xf = x as f64;
        let yf = y as f64;
        (xf + (yf - xf) * t).round().clamp(0.0, 255.0) as u32
    };
    let (ar, ag, ab) = split_rgb(a);
    let (br, bg, bb) = split_rgb(b);
    let r = lerp_channel(ar, br);
    let g = lerp_channel(ag, bg);
    let bch = lerp_channel(ab, bb);
    (r << 16) | (g << 8) | bch
}

/// Splits a packed `0xRRGGBB` color into `(r, g, b)` channel values.
#[must_use]
pub fn split_rgb(color: u32) -> (u32, u32, u32) {
    ((color >> 16) & 0xFF, (color >> 8) & 0xFF, color & 0xFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_lerp_is_linear() {
        let a = AttrValue::Number(0.0);
        let b = AttrValue::Number(10.0);
        assert_eq!(a.lerp(&b, 0.5).as_f64(), Some(5.0));
        assert_eq!(a.lerp(&b, 0.0).as_f64(), Some(0.0));
        assert_eq!(a.lerp(&b, 1.0).as_f64(), Some(10.0));
    }

    #[test]
    fn color_lerp_is_per_channel() {
        let a = AttrValue::Color(0x000000);
        let b = AttrValue::Color(0xFFFFFF);
        assert_eq!(a.lerp(&b, 0.5).as_color(), Some(0x808080));
    }

    #[test]
    fn text_holds_until_segment_end() {
        let a = AttrValue::Text("start".into());
        let b = AttrValue::Text("end".into());
        assert_eq!(a.lerp(&b, 0.5).as_text(), Some("start"));
        assert_eq!(a.lerp(&b, 1.0).as_text(), Some("end"));
    }
}
