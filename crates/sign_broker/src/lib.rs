#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Client for the external key-value + pub/sub broker (spec §6). The
//! broker itself — a "Redis-style queue implementation" — is explicitly
//! out of scope (spec §1); this crate only speaks its RESP wire protocol
//! as a client over a Unix domain socket, via the `redis` crate.

mod client;
mod keys;
mod pubsub;

pub use client::BrokerClient;
pub use keys::{FRAMES_KEY, PLAYER_BRIGHTNESS_CHANNEL, PLAYER_BRIGHTNESS_KEY, SENDER_BRIGHTNESS_KEY};
pub use pubsub::BrightnessSubscription;
