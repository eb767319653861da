//! Error Types
//!
//! This module defines the error type shared by every crate in the sign
//! control system.
//!
//! # Overview
//!
//! The main error type [`SignError`] covers all failure modes called out in
//! spec §7: transient I/O, protocol violations, configuration errors and
//! logic errors in movie definitions.
//!
//! # Usage
//!
//! Library APIs return [`Result<T>`], an alias for `std::result::Result<T,
//! SignError>`.

use thiserror::Error;

/// The error type shared across `sign_core`, `sign_render`, `sign_broker`,
/// `sign_transport` and `sign_sensors`.
#[derive(Error, Debug)]
pub enum SignError {
    // ========================================================================
    // Data model / protocol errors
    // ========================================================================
    /// A frame's byte length did not equal `width*height*4`.
    #[error("frame size mismatch: expected {expected} bytes, got {actual}")]
    FrameSizeMismatch {
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },

    // ========================================================================
    // Movie / timeline logic errors (refuse to switch the active movie)
    // ========================================================================
    /// A screenplay entry named a timeline function that was never
    /// registered.
    #[error("unknown timeline function: {0}")]
    UnknownTimeline(String),

    /// A descriptor's keyframe list did not have the shape the tween engine
    /// requires (e.g. empty, or a keyframe missing a required attribute).
    #[error("malformed keyframe shape: {0}")]
    MalformedKeyframes(String),

    // ========================================================================
    // I/O errors
    // ========================================================================
    /// Broker connection or RESP protocol error.
    #[error("broker error: {0}")]
    Broker(String),

    /// Raw-Ethernet transport error (socket open, ioctl lookup, send).
    #[error("transport error: {0}")]
    Transport(String),

    /// I2C sensor bus error.
    #[error("sensor error: {0}")]
    Sensor(String),

    /// Generic filesystem / OS I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Configuration errors (log and exit non-zero; supervisor restarts)
    // ========================================================================
    /// A required piece of startup configuration was missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Alias for `Result<T, SignError>`.
pub type Result<T> = std::result::Result<T, SignError>;
