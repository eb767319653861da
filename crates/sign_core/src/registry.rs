//! Static timeline-function registry.
//!
//! Design Notes ("Animation registration"): timelines are looked up by
//! string name; a registry initialized once at process startup is
//! sufficient and there is no dynamic-loading requirement (Non-goal:
//! "Dynamic reloading of the rendering engine's plugin library"). Each
//! binary calls `sign_render::register_builtin_timelines()` during startup,
//! which populates this table.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::descriptor::TimelineFn;
use crate::error::{Result, SignError};

static TIMELINES: Lazy<RwLock<FxHashMap<String, TimelineFn>>> =
    Lazy::new(|| RwLock::new(FxHashMap::default()));

/// Registers a timeline function under `name`, overwriting any previous
/// registration (idempotent across repeated startup calls in tests).
pub fn register(name: impl Into<String>, f: TimelineFn) {
    let name = name.into();
    TIMELINES.write().insert(name, f);
}

/// Resolves a timeline function by name.
///
/// # Errors
/// Returns [`SignError::UnknownTimeline`] when `name` was never registered.
/// spec §7 treats this as a Logic error surfaced at load time: the caller
/// should refuse to switch the active movie rather than crash the process.
pub fn resolve(name: &str) -> Result<TimelineFn> {
    TIMELINES
        .read()
        .get(name)
        .copied()
        .ok_or_else(|| SignError::UnknownTimeline(name.to_string()))
}

/// Names currently registered, for diagnostics.
#[must_use]
pub fn registered_names() -> Vec<String> {
    TIMELINES.read().keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AnimationDescriptor;
    use crate::movie::Sign;
    use crate::values::AttrMap;

    fn noop(_: &Sign, _: &AttrMap, _: &AttrMap, _: u64) -> Vec<AnimationDescriptor> {
        Vec::new()
    }

    #[test]
    fn resolve_unknown_is_an_error() {
        let err = resolve("definitely-not-registered-xyz").unwrap_err();
        assert!(matches!(err, SignError::UnknownTimeline(_)));
    }

    #[test]
    fn register_then_resolve_roundtrips() {
        register("test-noop", noop);
        let f = resolve("test-noop").expect("registered");
        let sign = Sign { width: 1, height: 1, theme: "t".into(), fps: None };
        assert!(f(&sign, &AttrMap::default(), &AttrMap::default(), 0).is_empty());
    }
}
