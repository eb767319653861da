//! The top-level Player: movie compilation and per-frame playback
//! (spec §4.2 "Compilation" and "Per-frame rendering").

use sign_core::{registry, Dimensions, Frame, Movie, RenderBrightness, Result, SignError};

use crate::drawable::{self, AnimationList};

/// A compiled, playable movie.
///
/// `load`/`reload` keep a pristine copy of the source [`Movie`] around so
/// that recompilation (on `reload()`, and internally on every cycle wrap)
/// never starts from state the tween engine has already mutated.
pub struct Player {
    canvas: crate::canvas::Canvas,
    fps: u32,
    brightness: RenderBrightness,
    pristine_movie: Option<Movie>,
    animations: AnimationList,
    duration: f32,
    frames: u32,
    frame: u32,
    cycle: u64,
}

impl Player {
    /// Creates a player for a sign of `dims` at `fps` frames per second.
    /// No movie is loaded; call [`Player::load`] before [`Player::play`].
    #[must_use]
    pub fn new(dims: Dimensions, fps: u32) -> Self {
        Self {
            canvas: crate::canvas::Canvas::new(dims),
            fps: fps.max(1),
            brightness: RenderBrightness::default(),
            pristine_movie: None,
            animations: AnimationList::new(),
            duration: 0.0,
            frames: 1,
            frame: 0,
            cycle: 0,
        }
    }

    #[must_use]
    pub fn brightness(&self) -> RenderBrightness {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: RenderBrightness) {
        self.brightness = brightness;
    }

    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Compiles `movie`, deep-copying it first (spec §4.2 step 1), and
    /// resets playback to `frame = 0`, `cycle = 0`.
    ///
    /// # Errors
    /// Returns [`SignError::UnknownTimeline`] if a screenplay entry names
    /// an unregistered timeline, or [`SignError::MalformedKeyframes`] if a
    /// descriptor has no keyframes. Neither error leaves a half-compiled
    /// player behind: the previously loaded movie (if any) keeps playing.
    pub fn load(&mut self, movie: &Movie) -> Result<()> {
        let pristine = movie.deep_copy();
        let animations = Self::compile(&pristine, 0)?;
        self.pristine_movie = Some(pristine);
        self.animations = animations;
        self.recompute_duration();
        self.frame = 0;
        self.cycle = 0;
        Ok(())
    }

    /// Recompiles the currently loaded movie from its pristine copy,
    /// restoring the `t=0` tween state exactly (spec §3 Invariant, Testable
    /// Property 5).
    ///
    /// # Errors
    /// Same as [`Player::load`].
    pub fn reload(&mut self) -> Result<()> {
        let pristine = self
            .pristine_movie
            .clone()
            .ok_or_else(|| SignError::Configuration("reload() called before load()".into()))?;
        let animations = Self::compile(&pristine, 0)?;
        self.animations = animations;
        self.recompute_duration();
        self.frame = 0;
        self.cycle = 0;
        Ok(())
    }

    fn compile(movie: &Movie, cycle: u64) -> Result<AnimationList> {
        let mut animations = AnimationList::new();
        for entry in &movie.screenplay {
            let timeline = registry::resolve(&entry.timeline)?;
            let descriptors = timeline(&movie.sign, &entry.params, &movie.data, cycle);
            for descriptor in descriptors {
                if descriptor.keyframes.is_empty() {
                    return Err(SignError::MalformedKeyframes(format!(
                        "timeline '{}' produced a descriptor with no keyframes",
                        entry.timeline
                    )));
                }
                animations.push(CompiledAnimation::new(entry.start, descriptor));
            }
        }
        // Stable sort: painter's order by ascending layer, ties broken by
        // screenplay declaration order (spec §3 Invariant).
        animations.sort_by_key(|a| a.descriptor.layer);
        Ok(animations)
    }

    fn recompute_duration(&mut self) {
        self.duration = self
            .animations
            .iter()
            .map(|a| a.absolute_start() + a.track.total_duration())
            .fold(0.0f32, f32::max);
        self.frames = ((self.duration * self.fps as f32).ceil() as u32).max(1);
    }

    fn seek_all(&mut self, t: f32) {
        for anim in &mut self.animations {
            let local_time = t - anim.absolute_start();
            anim.track.seek(local_time);
        }
    }

    /// Draws one frame and advances playback (spec §4.2 "Per-frame
    /// rendering"). Returns the rendered frame and whether this call
    /// wrapped the timeline back to `frame = 0`.
    pub fn play(&mut self) -> (Frame, bool) {
        let mut retries = 0u32;
        loop {
            let denom = self.frames.saturating_sub(1).max(1);
            #[allow(clippy::cast_precision_loss)]
            let progress = self.frame as f32 / denom as f32;
            let t = self.duration * progress;

            self.seek_all(t);
            self.canvas.clear();

            let canvas = &mut self.canvas;
            let animations = &self.animations;
            let brightness = self.brightness;
            let mut any_active = false;
            for anim in animations {
                if anim.track.active() {
                    any_active = true;
                    canvas.save();
                    drawable::draw(canvas, anim, brightness);
                    canvas.restore();
                }
            }

            if any_active || retries >= self.frames {
                break;
            }
            retries += 1;
            self.frame = (self.frame + 1) % self.frames;
        }

        let image = self.canvas.get_image_data();

        self.frame += 1;
        let mut wrapped = false;
        if self.frame >= self.frames {
            self.frame = 0;
            self.cycle += 1;
            wrapped = true;
            if let Some(movie) = self.pristine_movie.clone() {
                match Self::compile(&movie, self.cycle) {
                    Ok(animations) => {
                        self.animations = animations;
                        self.recompute_duration();
                    }
                    Err(err) => {
                        log::warn!("recompiling movie for cycle {} failed: {err}", self.cycle);
                    }
                }
            }
        }

        (image, wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sign_core::{AnimationDescriptor, AttrMap, AttrValue, DrawableKind, Keyframe, ScreenplayEntry, Sign};

    fn flash_timeline(
        _sign: &Sign,
        _params: &AttrMap,
        _data: &AttrMap,
        _cycle: u64,
    ) -> Vec<AnimationDescriptor> {
        let mut props = AttrMap::default();
        props.insert("width".into(), AttrValue::Number(4.0));
        props.insert("height".into(), AttrValue::Number(4.0));
        let mut kf0 = AttrMap::default();
        kf0.insert("alpha".into(), AttrValue::Number(1.0));
        kf0.insert("fill".into(), AttrValue::Color(0xFFFFFF));
        kf0.insert("x".into(), AttrValue::Number(0.0));
        kf0.insert("y".into(), AttrValue::Number(0.0));
        vec![AnimationDescriptor {
            kind: DrawableKind::Rectangle,
            layer: 0,
            start: 0.0,
            props,
            keyframes: vec![Keyframe { duration: 0.0, attrs: kf0 }],
        }]
    }

    fn test_movie() -> Movie {
        Movie {
            sign: Sign { width: 8, height: 8, theme: "test".into(), fps: None },
            data: AttrMap::default(),
            screenplay: vec![ScreenplayEntry {
                timeline: "player-test-flash".into(),
                start: 0.0,
                params: AttrMap::default(),
            }],
        }
    }

    #[test]
    fn load_unknown_timeline_is_an_error() {
        let mut player = Player::new(Dimensions::new(8, 8), 30);
        let movie = Movie {
            sign: Sign { width: 8, height: 8, theme: "t".into(), fps: None },
            data: AttrMap::default(),
            screenplay: vec![ScreenplayEntry {
                timeline: "definitely-unregistered".into(),
                start: 0.0,
                params: AttrMap::default(),
            }],
        };
        assert!(player.load(&movie).is_err());
    }

    #[test]
    fn single_keyframe_scene_never_wraps_because_duration_is_zero() {
        registry::register("player-test-flash", flash_timeline);
        let mut player = Player::new(Dimensions::new(8, 8), 30);
        player.load(&test_movie()).expect("load");
        // duration is 0 for an all-static scene, so frames clamps to 1 and
        // every call wraps immediately.
        let (_frame, wrapped) = player.play();
        assert!(wrapped);
        assert_eq!(player.cycle(), 1);
    }

    #[test]
    fn reload_resets_frame_and_cycle_to_zero() {
        registry::register("player-test-flash", flash_timeline);
        let mut player = Player::new(Dimensions::new(8, 8), 30);
        player.load(&test_movie()).expect("load");
        player.play();
        player.play();
        assert!(player.cycle() >= 1);
        player.reload().expect("reload");
        assert_eq!(player.cycle(), 0);
    }
}
