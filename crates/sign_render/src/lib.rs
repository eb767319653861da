#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]

//! The Renderer (Player) engine: movie compilation, the tween/timeline
//! engine, the software canvas, and the brightness-compensation color
//! transform.

mod builtin;
mod canvas;
mod color;
mod drawable;
mod font;
mod player;
mod tween;

pub use builtin::{hello_world_movie, register_builtin_timelines};
pub use canvas::{Canvas, TextAlign, TextBaseline};
pub use color::compensate;
pub use drawable::CompiledAnimation;
pub use player::Player;
pub use tween::TweenTrack;
