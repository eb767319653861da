//! Broker keys and channels (spec §6).

/// List of raw BGRA frame byte buffers. Producer: Director (right-push).
/// Consumer: Sender (blocking left-pop).
pub const FRAMES_KEY: &str = "player:frames";
/// Hardware brightness, `[0,255]`, consumed by the Sender. Seeded to 255 if
/// absent at Sender startup.
pub const SENDER_BRIGHTNESS_KEY: &str = "sender:brightness";
/// Perceptual render brightness, `[1,100]`, persisted and read by the
/// Director at startup.
pub const PLAYER_BRIGHTNESS_KEY: &str = "player:brightness";
/// Pub/sub channel carrying `[1,100]` render-brightness updates.
pub const PLAYER_BRIGHTNESS_CHANNEL: &str = "player:brightness:channel";
