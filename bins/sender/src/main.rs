//! The Transport process (spec §4.1): pops one frame per tick off the
//! broker queue, repackages it into row + commit packets, and emits them
//! on a raw Ethernet socket against a 240 Hz deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sign_core::{HardwareBrightness, BYTES_PER_PIXEL, CANONICAL_HEIGHT, CANONICAL_WIDTH};

/// Pops rendered frames from the broker and drives the FPGA's raw
/// Ethernet link.
#[derive(Parser, Debug)]
#[command(name = "sign-sender", version, about)]
struct Cli {
    /// Raise logging verbosity to debug.
    #[arg(long, env = "SIGN_DEBUG")]
    debug: bool,

    /// Broker connection URL (a `redis+unix://` Unix-socket URL).
    #[arg(long, env = "SIGN_BROKER_URL", default_value = "redis+unix:///run/sign/broker.sock")]
    broker_url: String,

    /// Network interface the FPGA receiver is attached to.
    #[arg(long, env = "SIGN_INTERFACE", default_value = "eth0")]
    interface: String,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn install_shutdown_handler() -> anyhow::Result<Arc<AtomicBool>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;
    Ok(shutdown)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let shutdown = install_shutdown_handler().context("installing signal handlers")?;

    let socket = sign_transport::RawEthernetSocket::open(&cli.interface)
        .context("opening raw Ethernet socket")?;
    log::info!("raw socket bound to interface '{}'", cli.interface);

    let mut broker =
        sign_broker::BrokerClient::new(&cli.broker_url).context("building broker client")?;
    broker.connect_blocking();
    log::info!("connected to broker at {}", cli.broker_url);

    if let Err(err) = broker.sender_brightness_or_seed(HardwareBrightness::SEED.get()) {
        log::warn!("failed to seed sender brightness: {err}");
    }

    run(&shutdown, &socket, &mut broker);

    log::info!("sender shutting down");
    Ok(())
}

/// The Transport's main loop (spec §4.1 "Commit and cadence").
fn run(
    shutdown: &AtomicBool,
    socket: &sign_transport::RawEthernetSocket,
    broker: &mut sign_broker::BrokerClient,
) {
    let width = CANONICAL_WIDTH;
    let height = CANONICAL_HEIGHT;
    let expected_len = usize::from(width) * usize::from(height) * BYTES_PER_PIXEL;

    let mut row_buffer = sign_transport::RowBuffer::new(width);
    let mut commit_buffer = sign_transport::CommitBuffer::new();
    let mut clock = sign_transport::DeadlineClock::new(sign_transport::PERIOD);
    let mut brightness = HardwareBrightness::default();

    while !shutdown.load(Ordering::Relaxed) {
        match broker.pop_frame_and_brightness(Duration::from_secs(1)) {
            Ok((Some(frame_bytes), maybe_brightness)) => {
                if let Some(raw) = maybe_brightness {
                    brightness = HardwareBrightness::clamped(i64::from(raw));
                }

                if frame_bytes.len() != expected_len {
                    log::warn!(
                        "dropping frame of length {} (expected {expected_len})",
                        frame_bytes.len()
                    );
                    continue;
                }

                if let Err(err) = sign_transport::emit_rows(
                    socket,
                    &mut row_buffer,
                    socket.src_mac,
                    width,
                    height,
                    &frame_bytes,
                ) {
                    log::warn!("row emission failed: {err}");
                }

                clock.wait();

                if let Err(err) =
                    sign_transport::emit_commit(socket, &mut commit_buffer, socket.src_mac, brightness.get())
                {
                    log::warn!("commit send failed: {err}");
                }
            }
            Ok((None, _)) => {
                // Queue-empty timeout: retry without touching the deadline
                // clock (spec §4.1 step 4 / §9 Open Question).
                thread::sleep(Duration::from_micros(100));
            }
            Err(err) => {
                log::warn!("broker error: {err}");
                thread::sleep(Duration::from_secs(1));
            }
        }
    }
}
