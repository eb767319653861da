#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! The BH1750 ambient-light driver and the lux-to-brightness pipeline
//! that feeds the Ambient controller process.

mod bh1750;
mod mapper;

pub use bh1750::{Bh1750, DEFAULT_ADDRESS, DEFAULT_BUS};
pub use mapper::BrightnessMapper;
