#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

//! The FPGA wire protocol, the raw-Ethernet socket that emits it, and the
//! hybrid sleep/spin deadline clock that paces the Sender's 240 Hz loop.

mod clock;
mod socket;
mod wire;

pub use clock::DeadlineClock;
pub use socket::{FrameSink, RawEthernetSocket};
pub use wire::{
    CommitBuffer, RowBuffer, COMMIT_PAYLOAD_LEN, DEST_MAC, ETHERTYPE_COMMIT, ETHERTYPE_ROW,
    GAMMA_FLAG, ROW_HEADER_LEN,
};

use std::time::Duration;

use sign_core::{Result, BYTES_PER_PIXEL};

/// Nominal Sender cadence: 240 Hz, i.e. 1/240 s.
pub const PERIOD: Duration = Duration::from_nanos(4_166_667);

/// Emits one frame's worth of row packets in ascending row order onto
/// `sink` (spec §4.1 "Row emission"). `pixels_bgra` must be exactly
/// `height * width * 4` bytes; callers validate frame size against the
/// queue's declared dimensions before reaching this call. The commit
/// packet for the same frame is a separate call ([`emit_commit`]) made
/// only once the deadline clock latches (spec §4.1 "Commit and cadence"
/// step 3) — row and commit emission are never fused into one call so
/// that ordering always reflects the real wait in between.
///
/// A row `send` failure is logged by the caller and does not stop the
/// remaining rows from being attempted (spec §4.1 "Failure semantics":
/// "`send` returning `< 0`: log and continue") — this function collects
/// the first error it sees but still emits every row.
pub fn emit_rows(
    sink: &impl FrameSink,
    row_buffer: &mut RowBuffer,
    src_mac: [u8; 6],
    width: u16,
    height: u16,
    pixels_bgra: &[u8],
) -> Result<()> {
    let mut first_err = None;
    let row_stride = usize::from(width) * BYTES_PER_PIXEL;
    for row in 0..height {
        let start = usize::from(row) * row_stride;
        let frame = row_buffer.encode(row as u8, src_mac, &pixels_bgra[start..start + row_stride]);
        if let Err(err) = sink.send_frame(ETHERTYPE_ROW, frame) {
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Emits the commit packet that latches the previously sent rows onto the
/// LEDs (spec §4.1 "Commit and cadence" step 3; Testable Properties 1, 3).
pub fn emit_commit(
    sink: &impl FrameSink,
    commit_buffer: &mut CommitBuffer,
    src_mac: [u8; 6],
    brightness: u8,
) -> Result<()> {
    let commit_frame = commit_buffer.encode(src_mac, brightness);
    sink.send_frame(ETHERTYPE_COMMIT, commit_frame)
}
