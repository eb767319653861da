//! A dedicated pub/sub connection for render-brightness updates.

use redis::{Connection, PubSub};
use sign_core::{Result, SignError};

use crate::keys;

/// Wraps a connection that has switched into pub/sub mode and subscribed
/// to the render-brightness channel. This connection is exclusive to
/// pub/sub traffic for the rest of the process's life (spec §4.3
/// "Brightness intake"), so it is leaked rather than tracked with a
/// borrow: there is exactly one of these per Director process and it is
/// torn down by process exit, not by drop order.
pub struct BrightnessSubscription {
    pubsub: PubSub<'static>,
}

impl BrightnessSubscription {
    pub(crate) fn new(conn: Connection) -> Result<Self> {
        let conn: &'static mut Connection = Box::leak(Box::new(conn));
        let mut pubsub = conn.as_pubsub();
        pubsub
            .subscribe(keys::PLAYER_BRIGHTNESS_CHANNEL)
            .map_err(|err| SignError::Broker(err.to_string()))?;
        Ok(Self { pubsub })
    }

    /// Blocks for the next brightness update on the channel.
    pub fn next_brightness(&mut self) -> Result<u8> {
        let msg = self.pubsub.get_message().map_err(|err| SignError::Broker(err.to_string()))?;
        let payload: i64 = msg.get_payload().map_err(|err| SignError::Broker(err.to_string()))?;
        Ok(payload.clamp(0, 255) as u8)
    }
}
