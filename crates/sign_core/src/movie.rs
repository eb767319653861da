//! Movie description: sign metadata, opaque data bag, and the screenplay.
//!
//! A [`Movie`] is pure declarative input (spec §3). It is never mutated by
//! the tween engine; [`sign_render`](../sign_render/index.html) keeps its
//! own deep copy and recompiles from that copy on every `reload()` so that
//! in-place mutation by the compiled tween state can never leak back into
//! the source description (Invariant, spec §3; Design Notes).
//!
//! Movies are authorable data, so this module also derives `serde` support
//! and a JSON loader, the same way the reference pack's asset/scene
//! description types are `serde`-driven rather than built only by hand in
//! Rust (`examples/panxinmiao-myth/src/assets/loaders/gltf.rs`).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignError};
use crate::frame::Dimensions;
use crate::values::AttrMap;

/// Sign metadata carried by a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sign {
    pub width: u16,
    pub height: u16,
    pub theme: String,
    /// Overrides the player's configured frame rate when present.
    #[serde(default)]
    pub fps: Option<u32>,
}

impl Sign {
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// One entry in the screenplay: a named timeline function invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenplayEntry {
    /// Name under which the timeline function is registered (see
    /// [`crate::registry::TimelineRegistry`]).
    pub timeline: String,
    /// Start offset, in seconds, within the enclosing movie.
    pub start: f32,
    /// Parameters passed through to the timeline function.
    #[serde(default)]
    pub params: AttrMap,
}

/// The full declarative movie description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub sign: Sign,
    /// Opaque key/value bag passed through to every timeline function.
    #[serde(default)]
    pub data: AttrMap,
    /// Ordered sequence of timeline-function invocations.
    pub screenplay: Vec<ScreenplayEntry>,
}

impl Movie {
    /// Deep-copies the movie. Used by the Renderer's `load`/`reload` path;
    /// every field here is already owned data, so `Clone` already gives the
    /// deep copy spec §4.2 step 1 requires, but the explicit method name
    /// documents the contract at the call site.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Parses a movie from its JSON description. The screenplay still
    /// names timeline functions by string, resolved against the static
    /// registry at load time (spec §7 "Logic" errors: an unknown name is
    /// surfaced by `Player::load`, not here).
    ///
    /// # Errors
    /// Returns [`SignError::Configuration`] if `json` is not a valid movie
    /// document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| SignError::Configuration(format!("invalid movie JSON: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::AttrValue;

    #[test]
    fn round_trips_through_json() {
        let movie = Movie {
            sign: Sign { width: 320, height: 64, theme: "default".into(), fps: Some(240) },
            data: AttrMap::default(),
            screenplay: vec![ScreenplayEntry {
                timeline: "hello-world".into(),
                start: 0.0,
                params: AttrMap::default(),
            }],
        };
        let json = serde_json::to_string(&movie).expect("serialize");
        let parsed = Movie::from_json(&json).expect("parse");
        assert_eq!(parsed.sign.width, 320);
        assert_eq!(parsed.sign.height, 64);
        assert_eq!(parsed.screenplay.len(), 1);
        assert_eq!(parsed.screenplay[0].timeline, "hello-world");
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{
            "sign": { "width": 8, "height": 8, "theme": "t" },
            "screenplay": [{ "timeline": "x", "start": 0.0 }]
        }"#;
        let movie = Movie::from_json(json).expect("parse");
        assert_eq!(movie.sign.fps, None);
        assert!(movie.data.is_empty());
        assert!(movie.screenplay[0].params.is_empty());
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let err = Movie::from_json("not json").unwrap_err();
        assert!(matches!(err, SignError::Configuration(_)));
    }

    #[test]
    fn attr_value_variants_round_trip() {
        let value = AttrValue::Color(0x112233);
        let json = serde_json::to_string(&value).expect("serialize");
        let parsed: AttrValue = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, value);
    }
}
