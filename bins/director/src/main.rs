//! The Orchestrator process (spec §4.3). Embeds and drives the Renderer
//! engine in-process (Architecture Decision AD-1, `SPEC_FULL.md` §0) and
//! feeds the broker's frame queue, applying backpressure when the
//! Transport stalls.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sign_core::RenderBrightness;

#[derive(Parser, Debug)]
#[command(name = "sign-director", version, about)]
struct Cli {
    /// Raise logging verbosity to debug.
    #[arg(long, env = "SIGN_DEBUG")]
    debug: bool,

    /// Broker connection URL (a `redis+unix://` Unix-socket URL).
    #[arg(long, env = "SIGN_BROKER_URL", default_value = "redis+unix:///run/sign/broker.sock")]
    broker_url: String,

    /// Renderer frame rate, in frames per second.
    #[arg(long, env = "SIGN_FPS", default_value_t = 240)]
    fps: u32,

    /// Path to a JSON movie description to load instead of the bundled
    /// "Hello, World!" default.
    #[arg(long, env = "SIGN_MOVIE")]
    movie: Option<std::path::PathBuf>,
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

/// Spawns the brightness-intake listener (spec §4.3 "Brightness intake").
/// A pub/sub connection is exclusive to receiving messages, so it runs on
/// its own thread rather than interleaved into the main loop; the shared
/// atomic is the only channel back to the renderer (never the raw
/// brightness value crossing into the Transport's process, per Design
/// Notes "Shared mutable brightness" — that boundary is the broker, not
/// this in-process atomic, which only ever feeds this one process's
/// renderer).
fn spawn_brightness_listener(broker_url: String, shared: Arc<AtomicU8>) {
    thread::spawn(move || loop {
        let client = match sign_broker::BrokerClient::new(&broker_url) {
            Ok(client) => client,
            Err(err) => {
                log::error!("brightness listener: invalid broker url: {err}");
                return;
            }
        };
        let mut subscription = match client.brightness_subscription() {
            Ok(sub) => sub,
            Err(err) => {
                log::warn!("brightness listener: subscribe failed, retrying in 1s: {err}");
                thread::sleep(Duration::from_secs(1));
                continue;
            }
        };
        loop {
            match subscription.next_brightness() {
                Ok(value) => shared.store(value, Ordering::Relaxed),
                Err(err) => {
                    log::warn!("brightness listener: {err}, reconnecting in 1s");
                    thread::sleep(Duration::from_secs(1));
                    break;
                }
            }
        }
    });
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let shutdown = install_shutdown_handler().context("installing signal handlers")?;

    let mut broker =
        sign_broker::BrokerClient::new(&cli.broker_url).context("building broker client")?;
    broker.connect_blocking();
    log::info!("connected to broker at {}", cli.broker_url);

    let initial_brightness = broker.player_brightness().ok().flatten().unwrap_or(RenderBrightness::default().get());
    let shared_brightness = Arc::new(AtomicU8::new(initial_brightness));
    spawn_brightness_listener(cli.broker_url.clone(), Arc::clone(&shared_brightness));

    sign_render::register_builtin_timelines();
    let movie = match &cli.movie {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading movie file '{}'", path.display()))?;
            sign_core::Movie::from_json(&json)
                .with_context(|| format!("parsing movie file '{}'", path.display()))?
        }
        None => sign_render::hello_world_movie(),
    };

    let dims = movie.sign.dimensions();
    let mut player = sign_render::Player::new(dims, cli.fps);
    player.load(&movie).context("loading the configured movie")?;
    player.set_brightness(RenderBrightness::clamped(i64::from(initial_brightness)));

    run(&shutdown, &mut broker, &mut player, &shared_brightness, cli.fps);

    log::info!("director shutting down");
    Ok(())
}

/// The Orchestrator's main loop (spec §4.3 "Main loop").
fn run(
    shutdown: &AtomicBool,
    broker: &mut sign_broker::BrokerClient,
    player: &mut sign_render::Player,
    shared_brightness: &AtomicU8,
    fps: u32,
) {
    while !shutdown.load(Ordering::Relaxed) {
        player.set_brightness(RenderBrightness::clamped(i64::from(shared_brightness.load(Ordering::Relaxed))));

        let (frame, _wrapped) = player.play();

        match broker.push_frame(frame.as_bytes()) {
            Ok(queue_len) => {
                if queue_len >= u64::from(fps) {
                    thread::sleep(Duration::from_millis(5));
                    match broker.queue_len() {
                        Ok(recheck) if recheck >= u64::from(fps) => {
                            log::warn!("transport appears stalled, flushing queue");
                            if let Err(err) = broker.flush_frames() {
                                log::warn!("failed to flush frame queue: {err}");
                            }
                            thread::sleep(Duration::from_millis(100));
                        }
                        Ok(_) => {}
                        Err(err) => {
                            log::warn!("broker error re-checking queue length: {err}");
                            thread::sleep(Duration::from_secs(1));
                        }
                    }
                }
            }
            Err(err) => {
                log::warn!("broker error pushing frame: {err}");
                thread::sleep(Duration::from_secs(1));
            }
        }
    }
}
