#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Shared data model for the LED sign control system.
//!
//! This crate has no I/O of its own; it defines the [`Frame`], [`Movie`],
//! [`AnimationDescriptor`] and brightness types that every other crate in
//! the workspace builds on, plus the shared [`SignError`] type and the
//! static timeline registry (spec §3, Design Notes "Animation
//! registration").

pub mod brightness;
pub mod descriptor;
pub mod error;
pub mod frame;
pub mod movie;
pub mod registry;
pub mod values;

pub use brightness::{HardwareBrightness, RenderBrightness};
pub use descriptor::{AnimationDescriptor, DrawableKind, Keyframe, TimelineFn};
pub use error::{Result, SignError};
pub use frame::{Dimensions, Frame, BYTES_PER_PIXEL, CANONICAL_HEIGHT, CANONICAL_WIDTH};
pub use movie::{Movie, ScreenplayEntry, Sign};
pub use values::{AttrMap, AttrValue};
