//! Drawable dispatch.
//!
//! Design Notes ("Class hierarchy for drawables"): rectangle and text are
//! the entire set, modeled as a tagged variant rather than open-ended
//! subclassing. Attribute lookup checks the tween state first, falling
//! back to the animation's static `props` (spec §4.2 "Attribute lookup").

use smallvec::SmallVec;
use sign_core::{AnimationDescriptor, AttrMap, AttrValue, DrawableKind, RenderBrightness};

use crate::canvas::{Canvas, TextAlign, TextBaseline};
use crate::color;
use crate::tween::TweenTrack;

/// Most screenplays place a small, fixed number of animations on screen at
/// once (the bundled "Hello, World!" movie uses two); this keeps that
/// common case off the heap the same way `myth_scene`'s per-node component
/// lists do.
const INLINE_ANIMATIONS: usize = 8;

/// The per-frame, painter's-order list of compiled animations a [`Player`]
/// walks every call to `play()`.
///
/// [`Player`]: crate::player::Player
pub type AnimationList = SmallVec<[CompiledAnimation; INLINE_ANIMATIONS]>;

/// One descriptor plus its compiled tween track and the scene offset it
/// was produced under.
pub struct CompiledAnimation {
    pub scene_start: f32,
    pub descriptor: AnimationDescriptor,
    pub track: TweenTrack,
}

impl CompiledAnimation {
    #[must_use]
    pub fn new(scene_start: f32, descriptor: AnimationDescriptor) -> Self {
        let track = TweenTrack::new(&descriptor);
        Self { scene_start, descriptor, track }
    }

    /// Absolute start time of this animation within the master timeline.
    #[must_use]
    pub fn absolute_start(&self) -> f32 {
        self.scene_start + self.descriptor.start
    }
}

fn lookup<'a>(track: &'a TweenTrack, props: &'a AttrMap, name: &str) -> Option<&'a AttrValue> {
    track.get(name).or_else(|| props.get(name))
}

fn number(track: &TweenTrack, props: &AttrMap, name: &str, default: f64) -> f64 {
    lookup(track, props, name).and_then(AttrValue::as_f64).unwrap_or(default)
}

fn color_attr(track: &TweenTrack, props: &AttrMap, name: &str, default: u32) -> u32 {
    lookup(track, props, name).and_then(AttrValue::as_color).unwrap_or(default)
}

fn text_attr<'a>(track: &'a TweenTrack, props: &'a AttrMap, name: &str, default: &'a str) -> &'a str {
    lookup(track, props, name).and_then(AttrValue::as_text).unwrap_or(default)
}

/// Draws one active animation onto `canvas` at its current tween state,
/// applying brightness compensation to its fill color.
pub fn draw(canvas: &mut Canvas, anim: &CompiledAnimation, brightness: RenderBrightness) {
    let track = &anim.track;
    let props = &anim.descriptor.props;
    let alpha = number(track, props, "alpha", 1.0);
    canvas.set_global_alpha(alpha);

    let fill = color_attr(track, props, "fill", 0xFFFFFF);
    let fill = color::compensate(fill, brightness.get());

    match anim.descriptor.kind {
        DrawableKind::Rectangle => {
            let x = number(track, props, "x", 0.0).round() as i32;
            let y = number(track, props, "y", 0.0).round() as i32;
            let width = number(track, props, "width", 0.0).round() as i32;
            let height = number(track, props, "height", 0.0).round() as i32;
            canvas.fill_rect(x, y, width, height, fill);
        }
        DrawableKind::Text => {
            let x = number(track, props, "x", 0.0).round() as i32;
            let y = number(track, props, "y", 0.0).round() as i32;
            let font_size = number(track, props, "fontSize", 16.0);
            let text = text_attr(track, props, "text", "");
            let align = TextAlign::parse(text_attr(track, props, "textAlign", "left"));
            let baseline = TextBaseline::parse(text_attr(track, props, "textBaseline", "top"));
            canvas.fill_text(text, x, y, font_size, fill, align, baseline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sign_core::{Dimensions, Keyframe};

    fn rect_descriptor() -> AnimationDescriptor {
        let mut props = AttrMap::default();
        props.insert("width".into(), AttrValue::Number(4.0));
        props.insert("height".into(), AttrValue::Number(4.0));
        let mut kf = AttrMap::default();
        kf.insert("alpha".into(), AttrValue::Number(1.0));
        kf.insert("fill".into(), AttrValue::Color(0xFFFFFF));
        kf.insert("x".into(), AttrValue::Number(0.0));
        kf.insert("y".into(), AttrValue::Number(0.0));
        AnimationDescriptor {
            kind: DrawableKind::Rectangle,
            layer: 0,
            start: 0.0,
            props,
            keyframes: vec![Keyframe { duration: 0.0, attrs: kf }],
        }
    }

    #[test]
    fn draw_uses_props_fallback_for_untweened_attrs() {
        let mut canvas = Canvas::new(Dimensions::new(8, 8));
        let anim = CompiledAnimation::new(0.0, rect_descriptor());
        draw(&mut canvas, &anim, RenderBrightness::default());
        let frame = canvas.get_image_data();
        // width/height come from props, x/y/fill/alpha from the tween state.
        assert_eq!(frame.pixel(3, 3), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(4, 4), Some([0, 0, 0, 0]));
    }
}
