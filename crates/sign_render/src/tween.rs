//! Per-animation tween state.
//!
//! One [`TweenTrack`] is built per [`AnimationDescriptor`] at compile time.
//! Its state at `t=0` is a deep copy of keyframe 0's attributes (Invariant,
//! spec §3); `seek` re-derives the interpolated attribute map and the
//! `active` flag from scratch on every call rather than integrating
//! incrementally, which is what keeps `reload()` exact (Testable Property
//! 5): there is no mutable carry-over between a discarded compiled movie and
//! a freshly recompiled one.

use sign_core::{AnimationDescriptor, AttrMap, AttrValue};

/// One segment between two consecutive keyframes.
struct Segment {
    /// Cumulative time, relative to the animation's own start, at which
    /// this segment begins.
    start: f32,
    duration: f32,
    from: AttrMap,
    to: AttrMap,
}

/// The compiled, seekable tween track for a single [`AnimationDescriptor`].
pub struct TweenTrack {
    /// Deep copy of keyframe 0's attributes, with `duration` stripped —
    /// this is the pristine value `reload()` must reproduce exactly.
    initial: AttrMap,
    segments: Vec<Segment>,
    /// Total duration of all segments; `0.0` for a single-keyframe
    /// (static) animation.
    total_duration: f32,
    /// Current interpolated attribute state at the last `seek`.
    state: AttrMap,
    /// Whether the animation is currently on-screen.
    active: bool,
}

impl TweenTrack {
    /// Builds a tween track from a descriptor's keyframe list.
    ///
    /// # Panics
    /// Never panics; an empty keyframe list yields a track with an empty
    /// initial state and no segments (callers should reject this shape at
    /// load time per spec §7 "Logic" errors, see
    /// [`crate::player::Player::load`]).
    #[must_use]
    pub fn new(descriptor: &AnimationDescriptor) -> Self {
        let initial = descriptor
            .keyframes
            .first()
            .map(|kf| kf.attrs.clone())
            .unwrap_or_default();

        let mut segments = Vec::with_capacity(descriptor.keyframes.len().saturating_sub(1));
        let mut cursor = 0.0f32;
        let mut prev = initial.clone();
        for kf in descriptor.keyframes.iter().skip(1) {
            segments.push(Segment {
                start: cursor,
                duration: kf.duration.max(0.0),
                from: prev.clone(),
                to: kf.attrs.clone(),
            });
            cursor += kf.duration.max(0.0);
            prev = kf.attrs.clone();
        }

        Self {
            state: initial.clone(),
            initial,
            segments,
            total_duration: cursor,
            active: false,
        }
    }

    /// Updates `state` and `active` for `local_time` (seconds since the
    /// animation's own start, which may be negative before it starts).
    pub fn seek(&mut self, local_time: f32) {
        let has_segments = !self.segments.is_empty();

        if local_time < 0.0 {
            self.state = self.initial.clone();
            self.active = false;
            return;
        }

        if !has_segments {
            // A static, single-keyframe animation is active for its entire
            // (unbounded) lifetime once started.
            self.state = self.initial.clone();
            self.active = true;
            return;
        }

        if local_time > self.total_duration {
            if let Some(last) = self.segments.last() {
                self.state = last.to.clone();
            }
            self.active = false;
            return;
        }

        self.active = true;
        let segment = self
            .segments
            .iter()
            .rev()
            .find(|s| local_time >= s.start)
            .unwrap_or(&self.segments[0]);

        let t = if segment.duration > 1e-6 {
            ((local_time - segment.start) / segment.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.state = lerp_attr_map(&segment.from, &segment.to, f64::from(t));
    }

    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Looks up `name` in the current tween state.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.state.get(name)
    }

    #[must_use]
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }
}

/// Interpolates every key present in `to` (falling back to `from`'s value,
/// or holding `from`'s own value for keys `to` does not mention).
fn lerp_attr_map(from: &AttrMap, to: &AttrMap, t: f64) -> AttrMap {
    let mut out = from.clone();
    for (key, to_value) in to {
        match from.get(key) {
            Some(from_value) => {
                out.insert(key.clone(), from_value.lerp(to_value, t));
            }
            None => {
                out.insert(key.clone(), to_value.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sign_core::{DrawableKind, Keyframe};

    fn descriptor(keyframes: Vec<Keyframe>) -> AnimationDescriptor {
        AnimationDescriptor {
            kind: DrawableKind::Rectangle,
            layer: 0,
            start: 0.0,
            props: AttrMap::default(),
            keyframes,
        }
    }

    fn attrs(pairs: &[(&str, f64)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), AttrValue::Number(*v)))
            .collect()
    }

    #[test]
    fn t0_equals_keyframe_zero_byte_for_byte() {
        let kf0 = attrs(&[("x", 10.0), ("alpha", 1.0)]);
        let desc = descriptor(vec![
            Keyframe { duration: 0.0, attrs: kf0.clone() },
            Keyframe { duration: 2.0, attrs: attrs(&[("x", 50.0), ("alpha", 0.0)]) },
        ]);
        let mut track = TweenTrack::new(&desc);
        track.seek(0.0);
        assert_eq!(track.get("x"), kf0.get("x"));
        assert_eq!(track.get("alpha"), kf0.get("alpha"));
    }

    #[test]
    fn reload_restores_initial_state_after_mutation() {
        let kf0 = attrs(&[("x", 10.0)]);
        let desc = descriptor(vec![
            Keyframe { duration: 0.0, attrs: kf0.clone() },
            Keyframe { duration: 1.0, attrs: attrs(&[("x", 100.0)]) },
        ]);
        let mut track = TweenTrack::new(&desc);
        track.seek(0.5);
        assert_ne!(track.get("x"), kf0.get("x"));

        // Reload: rebuild from the same descriptor.
        let mut reloaded = TweenTrack::new(&desc);
        reloaded.seek(0.0);
        assert_eq!(reloaded.get("x"), kf0.get("x"));
    }

    #[test]
    fn midpoint_is_linear() {
        let desc = descriptor(vec![
            Keyframe { duration: 0.0, attrs: attrs(&[("x", 0.0)]) },
            Keyframe { duration: 2.0, attrs: attrs(&[("x", 10.0)]) },
        ]);
        let mut track = TweenTrack::new(&desc);
        track.seek(1.0);
        assert_eq!(track.get("x"), Some(&AttrValue::Number(5.0)));
    }

    #[test]
    fn single_keyframe_animation_stays_active_indefinitely() {
        let desc = descriptor(vec![Keyframe { duration: 0.0, attrs: attrs(&[("x", 1.0)]) }]);
        let mut track = TweenTrack::new(&desc);
        track.seek(0.0);
        assert!(track.active());
        track.seek(1000.0);
        assert!(track.active());
    }

    #[test]
    fn before_start_is_inactive() {
        let desc = descriptor(vec![
            Keyframe { duration: 0.0, attrs: attrs(&[("x", 0.0)]) },
            Keyframe { duration: 1.0, attrs: attrs(&[("x", 1.0)]) },
        ]);
        let mut track = TweenTrack::new(&desc);
        track.seek(-0.5);
        assert!(!track.active());
    }

    #[test]
    fn after_completion_is_inactive() {
        let desc = descriptor(vec![
            Keyframe { duration: 0.0, attrs: attrs(&[("x", 0.0)]) },
            Keyframe { duration: 1.0, attrs: attrs(&[("x", 1.0)]) },
        ]);
        let mut track = TweenTrack::new(&desc);
        track.seek(5.0);
        assert!(!track.active());
    }
}
