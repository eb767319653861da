//! The Ambient controller process (spec §4.4): samples the BH1750 light
//! sensor, maps lux to a smoothed, rate-limited brightness value, and
//! publishes it to the broker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use sign_core::RenderBrightness;
use sign_sensors::{Bh1750, BrightnessMapper, DEFAULT_ADDRESS, DEFAULT_BUS};

#[derive(Parser, Debug)]
#[command(name = "sign-ambient", version, about)]
struct Cli {
    /// Raise logging verbosity to debug.
    #[arg(long, env = "SIGN_DEBUG")]
    debug: bool,

    /// Broker connection URL (a `redis+unix://` Unix-socket URL).
    #[arg(long, env = "SIGN_BROKER_URL", default_value = "redis+unix:///run/sign/broker.sock")]
    broker_url: String,

    /// I2C bus number the BH1750 is attached to.
    #[arg(long, env = "SIGN_I2C_BUS", default_value_t = DEFAULT_BUS)]
    i2c_bus: u8,

    /// I2C address of the BH1750.
    #[arg(long, env = "SIGN_I2C_ADDRESS", default_value_t = DEFAULT_ADDRESS)]
    i2c_address: u16,
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

    let mut broker =
        sign_broker::BrokerClient::new(&cli.broker_url).context("building broker client")?;
    broker.connect_blocking();
    log::info!("connected to broker at {}", cli.broker_url);

    let starting_brightness = broker.player_brightness().ok().flatten().unwrap_or(RenderBrightness::default().get());
    let mut sensor = Bh1750::new(cli.i2c_bus, cli.i2c_address);
    let mut mapper = BrightnessMapper::new(RenderBrightness::clamped(i64::from(starting_brightness)));

    run(&shutdown, &mut sensor, &mut mapper, &mut broker);

    log::info!("ambient controller shutting down");
    Ok(())
}

/// The Ambient controller's main loop (spec §4.4 "Mapping").
fn run(
    shutdown: &AtomicBool,
    sensor: &mut Bh1750,
    mapper: &mut BrightnessMapper,
    broker: &mut sign_broker::BrokerClient,
) {
    while !shutdown.load(Ordering::Relaxed) {
        match sensor.read_lux() {
            Ok(lux) => match mapper.push_lux(lux) {
                Some(new_brightness) => {
                    if let Err(err) =
                        broker.publish_and_persist_player_brightness(new_brightness.get())
                    {
                        log::warn!("failed to publish brightness: {err}");
                        thread::sleep(Duration::from_secs(1));
                    }
                }
                None => thread::sleep(Duration::from_secs(1)),
            },
            Err(err) => {
                // read_lux already closed the bus handle and slept 1s.
                log::warn!("sensor read failed: {err}");
            }
        }
    }
}
