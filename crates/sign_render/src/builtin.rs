//! The bundled default movie ("Hello, World!", spec §8 scenario 1).

use sign_core::{
    registry, AnimationDescriptor, AttrMap, AttrValue, DrawableKind, Keyframe, Movie,
    ScreenplayEntry, Sign,
};

const HELLO_TIMELINE: &str = "hello-world";

/// Registers every timeline function this crate bundles. Binaries call this
/// once at startup, before loading any movie that references these names.
pub fn register_builtin_timelines() {
    registry::register(HELLO_TIMELINE, hello_world_timeline);
}

/// The canonical 320x64 "Hello, World!" movie: a four-second banner fade-in
/// and hold, used as the default when no other movie is configured.
#[must_use]
pub fn hello_world_movie() -> Movie {
    Movie {
        sign: Sign { width: 320, height: 64, theme: "default".into(), fps: Some(240) },
        data: AttrMap::default(),
        screenplay: vec![ScreenplayEntry {
            timeline: HELLO_TIMELINE.into(),
            start: 0.0,
            params: AttrMap::default(),
        }],
    }
}

fn hello_world_timeline(
    sign: &Sign,
    _params: &AttrMap,
    _data: &AttrMap,
    _cycle: u64,
) -> Vec<AnimationDescriptor> {
    let mut backdrop_props = AttrMap::default();
    backdrop_props.insert("width".into(), AttrValue::Number(f64::from(sign.width)));
    backdrop_props.insert("height".into(), AttrValue::Number(f64::from(sign.height)));

    let mut backdrop_start = AttrMap::default();
    backdrop_start.insert("alpha".into(), AttrValue::Number(0.0));
    backdrop_start.insert("fill".into(), AttrValue::Color(0x000000));
    backdrop_start.insert("x".into(), AttrValue::Number(0.0));
    backdrop_start.insert("y".into(), AttrValue::Number(0.0));

    let mut backdrop_end = AttrMap::default();
    backdrop_end.insert("alpha".into(), AttrValue::Number(1.0));

    let backdrop = AnimationDescriptor {
        kind: DrawableKind::Rectangle,
        layer: 0,
        start: 0.0,
        props: backdrop_props,
        keyframes: vec![
            Keyframe { duration: 0.0, attrs: backdrop_start },
            Keyframe { duration: 1.0, attrs: backdrop_end },
        ],
    };

    let mut text_props = AttrMap::default();
    text_props.insert("font".into(), AttrValue::Text("builtin".into()));
    text_props.insert("fontWeight".into(), AttrValue::Text("normal".into()));
    text_props.insert("fontSize".into(), AttrValue::Number(16.0));
    text_props.insert("text".into(), AttrValue::Text("HELLO, WORLD!".into()));
    text_props.insert("textAlign".into(), AttrValue::Text("center".into()));
    text_props.insert("textBaseline".into(), AttrValue::Text("middle".into()));
    text_props.insert("x".into(), AttrValue::Number(f64::from(sign.width) / 2.0));
    text_props.insert("y".into(), AttrValue::Number(f64::from(sign.height) / 2.0));

    let mut text_start = AttrMap::default();
    text_start.insert("alpha".into(), AttrValue::Number(0.0));
    text_start.insert("fill".into(), AttrValue::Color(0xFFFFFF));

    let mut text_end = AttrMap::default();
    text_end.insert("alpha".into(), AttrValue::Number(1.0));

    let mut text_hold = AttrMap::default();
    text_hold.insert("alpha".into(), AttrValue::Number(1.0));

    let banner = AnimationDescriptor {
        kind: DrawableKind::Text,
        layer: 1,
        start: 0.5,
        props: text_props,
        keyframes: vec![
            Keyframe { duration: 0.0, attrs: text_start },
            Keyframe { duration: 1.0, attrs: text_end },
            Keyframe { duration: 2.5, attrs: text_hold },
        ],
    };

    vec![backdrop, banner]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use sign_core::Dimensions;

    #[test]
    fn hello_world_cycles_exactly_once_over_960_calls() {
        register_builtin_timelines();
        let movie = hello_world_movie();
        let mut player = Player::new(Dimensions::new(320, 64), 240);
        player.load(&movie).expect("builtin movie must load cleanly");

        let mut wraps = 0;
        for _ in 0..960 {
            let (_frame, wrapped) = player.play();
            if wrapped {
                wraps += 1;
            }
        }
        assert_eq!(wraps, 1);
        assert_eq!(player.cycle(), 1);
    }
}
