//! BH1750FVI ambient-light sensor driver (spec §4.4 "Sensor protocol").
//!
//! One-time high-resolution measurement: power the sensor on, trigger a
//! measurement, wait for it to complete, then read the raw 16-bit result.
//! The sensor auto-powers-down after each measurement, so every call
//! re-triggers the full sequence — there is no continuous-mode support
//! here because the mapping pipeline only ever needs one reading at a
//! time (spec §4.4 step cadence).

use std::thread;
use std::time::Duration;

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use sign_core::{Result, SignError};

/// Default bus and address for this system's sensor (spec §6 "I2C").
pub const DEFAULT_BUS: u8 = 1;
pub const DEFAULT_ADDRESS: u16 = 0x23;

const POWER_ON: u8 = 0x01;
const ONE_TIME_HIGH_RES_MODE: u8 = 0x21;
const MEASUREMENT_WAIT: Duration = Duration::from_millis(180);
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// A BH1750 sensor handle, reopened transparently on I2C error.
pub struct Bh1750 {
    bus_path: String,
    address: u16,
    device: Option<LinuxI2CDevice>,
}

impl Bh1750 {
    #[must_use]
    pub fn new(bus: u8, address: u16) -> Self {
        Self { bus_path: format!("/dev/i2c-{bus}"), address, device: None }
    }

    fn device(&mut self) -> Result<&mut LinuxI2CDevice> {
        if self.device.is_none() {
            let dev = LinuxI2CDevice::new(&self.bus_path, self.address)
                .map_err(|err| SignError::Sensor(err.to_string()))?;
            self.device = Some(dev);
        }
        Ok(self.device.as_mut().expect("just populated"))
    }

    /// Takes one high-resolution lux reading. On any I2C error the bus
    /// handle is closed so the next call reopens it, and this call sleeps
    /// 1 s before returning the error (spec §4.4: "On I2C error, close and
    /// reopen the bus handle, then sleep 1 s").
    pub fn read_lux(&mut self) -> Result<u32> {
        match self.try_read_lux() {
            Ok(lux) => Ok(lux),
            Err(err) => {
                self.device = None;
                thread::sleep(ERROR_BACKOFF);
                Err(err)
            }
        }
    }

    fn try_read_lux(&mut self) -> Result<u32> {
        let device = self.device()?;
        device.write(&[POWER_ON]).map_err(|err| SignError::Sensor(err.to_string()))?;
        device
            .write(&[ONE_TIME_HIGH_RES_MODE])
            .map_err(|err| SignError::Sensor(err.to_string()))?;
        thread::sleep(MEASUREMENT_WAIT);

        let mut raw = [0u8; 2];
        device.read(&mut raw).map_err(|err| SignError::Sensor(err.to_string()))?;
        let raw = u16::from_be_bytes(raw);
        Ok((f64::from(raw) / 1.2).floor() as u32)
    }
}
