//! The broker client (spec §6, §4.1 "Input contract").
//!
//! One [`BrokerClient`] per process, reused for the process lifetime.
//! Every operation reconnects with a 1 s linear backoff on connection loss
//! (spec §4.1 "Failure semantics": "Broker disconnection: reconnect with a
//! 1 s linear backoff, forever") so callers never have to implement that
//! loop themselves.

use std::thread;
use std::time::Duration;

use redis::{Commands, Connection};
use sign_core::{Result, SignError};

use crate::keys;

const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// A connection to the broker's Unix domain socket, speaking RESP via the
/// `redis` crate.
pub struct BrokerClient {
    client: redis::Client,
    conn: Option<Connection>,
}

impl BrokerClient {
    /// Builds a client for `url` (e.g. `redis+unix:///run/sign/broker.sock`).
    /// Does not connect yet; the first operation establishes the connection.
    pub fn new(url: &str) -> Result<Self> {
        let client =
            redis::Client::open(url).map_err(|err| SignError::Broker(err.to_string()))?;
        Ok(Self { client, conn: None })
    }

    /// Blocks until a connection is established, retrying forever with a
    /// fixed 1 s backoff. Call this once at startup so an unreachable
    /// broker surfaces as a stuck-but-alive process rather than a crash
    /// loop (spec §4.1, §7 "Configuration" is for local misconfiguration,
    /// not a broker that simply hasn't started yet).
    pub fn connect_blocking(&mut self) {
        loop {
            match self.client.get_connection() {
                Ok(conn) => {
                    self.conn = Some(conn);
                    return;
                }
                Err(err) => {
                    log::warn!("broker connection failed, retrying in 1s: {err}");
                    thread::sleep(RECONNECT_BACKOFF);
                }
            }
        }
    }

    fn ensure_connected(&mut self) -> &mut Connection {
        if self.conn.is_none() {
            self.connect_blocking();
        }
        self.conn.as_mut().expect("connect_blocking always establishes a connection")
    }

    /// Runs `op` against the live connection; on any I/O error the cached
    /// connection is dropped (the *next* call reconnects with the 1 s
    /// backoff) and the error is surfaced once to the caller, which per
    /// spec §7 logs and continues rather than propagating further.
    fn with_conn<T>(&mut self, op: impl FnOnce(&mut Connection) -> redis::RedisResult<T>) -> Result<T> {
        let conn = self.ensure_connected();
        match op(conn) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.conn = None;
                Err(SignError::Broker(err.to_string()))
            }
        }
    }

    /// Appends `frame` to the frame queue (RPUSH), returning the new queue
    /// length.
    pub fn push_frame(&mut self, frame: &[u8]) -> Result<u64> {
        self.with_conn(|conn| conn.rpush(keys::FRAMES_KEY, frame))
    }

    /// Blocks up to `timeout` for a frame, pipelined with a read of the
    /// current hardware brightness in the same round trip (spec §4.1 "the
    /// two reads are pipelined into one round trip to minimize latency
    /// between wake and transmit").
    pub fn pop_frame_and_brightness(&mut self, timeout: Duration) -> Result<(Option<Vec<u8>>, Option<u8>)> {
        let timeout_secs = timeout.as_secs_f64();
        self.with_conn(|conn| {
            let (popped, brightness): (Option<(String, Vec<u8>)>, Option<u64>) = redis::pipe()
                .cmd("BLPOP")
                .arg(keys::FRAMES_KEY)
                .arg(timeout_secs)
                .cmd("GET")
                .arg(keys::SENDER_BRIGHTNESS_KEY)
                .query(conn)?;
            Ok((popped.map(|(_key, bytes)| bytes), brightness.map(|b| b as u8)))
        })
    }

    /// Current queue length (LLEN).
    pub fn queue_len(&mut self) -> Result<u64> {
        self.with_conn(|conn| conn.llen(keys::FRAMES_KEY))
    }

    /// Atomically empties the frame queue (DEL). Used by the Director's
    /// stall-flush path (spec §4.3 step 3).
    pub fn flush_frames(&mut self) -> Result<()> {
        self.with_conn(|conn| conn.del(keys::FRAMES_KEY))
    }

    /// Reads `sender:brightness`, seeding it to `seed` if absent (spec
    /// §4.1 "Startup": "If brightness is not yet set in the broker, seed
    /// it to 255").
    pub fn sender_brightness_or_seed(&mut self, seed: u8) -> Result<u8> {
        self.with_conn(|conn| {
            let existing: Option<u64> = conn.get(keys::SENDER_BRIGHTNESS_KEY)?;
            match existing {
                Some(value) => Ok(value as u8),
                None => {
                    let _: () = conn.set_nx(keys::SENDER_BRIGHTNESS_KEY, seed)?;
                    Ok(seed)
                }
            }
        })
    }

    /// Reads the persisted render brightness, if any (spec §4.3
    /// "Startup": "read and apply any persisted brightness").
    pub fn player_brightness(&mut self) -> Result<Option<u8>> {
        self.with_conn(|conn| {
            let value: Option<u64> = conn.get(keys::PLAYER_BRIGHTNESS_KEY)?;
            Ok(value.map(|v| v as u8))
        })
    }

    /// Publishes `value` on the render-brightness channel and persists it
    /// under the render-brightness key (spec §4.4 step 6).
    pub fn publish_and_persist_player_brightness(&mut self, value: u8) -> Result<()> {
        self.with_conn(|conn| {
            let _: () = conn.set(keys::PLAYER_BRIGHTNESS_KEY, value)?;
            let _: () = conn.publish(keys::PLAYER_BRIGHTNESS_CHANNEL, value)?;
            Ok(())
        })
    }

    /// Opens a second, dedicated connection in pub/sub mode (a connection
    /// in pub/sub mode cannot issue other commands, spec §4.3 "Brightness
    /// intake").
    pub fn brightness_subscription(&self) -> Result<crate::pubsub::BrightnessSubscription> {
        let conn = self.client.get_connection().map_err(|err| SignError::Broker(err.to_string()))?;
        crate::pubsub::BrightnessSubscription::new(conn)
    }
}
