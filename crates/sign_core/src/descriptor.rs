//! Animation descriptors: the output of a timeline function invocation.
//!
//! spec §3 models drawables as a tagged variant (rectangle or text) rather
//! than an open-ended class hierarchy (Design Notes "Class hierarchy for
//! drawables") — there is no extension requirement beyond these two kinds.

use crate::movie::Sign;
use crate::values::AttrMap;

/// The two drawable kinds this system ever needs to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    Rectangle,
    Text,
}

/// One keyframe in an animation's segment list.
///
/// The first keyframe (index 0) is the initial state; consecutive
/// keyframes define the tweened segments between them.
#[derive(Debug, Clone)]
pub struct Keyframe {
    /// Duration of the segment *leading into* this keyframe, in seconds.
    /// Ignored for keyframe 0, which has no segment before it.
    pub duration: f32,
    pub attrs: AttrMap,
}

/// A drawable element placed on the timeline by a timeline function.
#[derive(Debug, Clone)]
pub struct AnimationDescriptor {
    pub kind: DrawableKind,
    /// Painter's-order layer index; animations draw in non-decreasing
    /// layer order (spec §3 Invariant).
    pub layer: i32,
    /// Start offset within the enclosing scene, in seconds.
    pub start: f32,
    /// Static attribute values that never change during the animation.
    pub props: AttrMap,
    /// Ordered keyframes; keyframe 0 is the initial tween state.
    pub keyframes: Vec<Keyframe>,
}

/// Signature every registered timeline function must have (spec §3): a pure
/// function of `(sign, params, movie data, cycle)` returning the
/// descriptors for one cycle of one scene.
pub type TimelineFn =
    fn(&Sign, &AttrMap, &AttrMap, u64) -> Vec<AnimationDescriptor>;
