#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Blocking, `no_std` driver for the onsemi NCV78723 dual-channel LED buck
//! regulator, plus a capacitive slider front-end that turns raw pad readings
//! into swipe gestures.
//!
//! The regulator half speaks the chip's parity-checked 16-bit SPI protocol and
//! exposes analog dimming per channel:
//!
//! - Register payloads are typed ([`BuckCurrent`], [`OffTime`],
//!   [`BuckControl`], [`ThermalRecovery`]) instead of hand-shifted words
//! - The shared buck control word is always rebuilt from the cached state of
//!   both channels, so switching one channel never clobbers the other
//! - Threshold writes are skipped when the code has not changed
//! - Uses the `embedded-hal` 1.0 blocking traits so the driver works across
//!   MCU families
//!
//! The slider half ([`Slider`], [`GestureDetector`]) calibrates a baseline per
//! pad, computes a sub-pad touch position as a weighted centroid and reports
//! continuous swipe motion as well as a summary when the finger lifts.
//!
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
//! use ncv78723::{Channel, Config, Ncv78723};
//!
//! fn example<SPI, RST, D>(spi: SPI, rstb: RST, delay: D) -> Result<(), ncv78723::Error<SPI::Error, RST::Error>>
//! where
//!   SPI: SpiDevice,
//!   RST: OutputPin,
//!   D: DelayNs,
//! {
//!   let mut driver = Ncv78723::new(spi, rstb, delay, Config::default());
//!   driver.begin()?;
//!   driver.set_brightness(Channel::One, 0.5)?;
//!   Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

mod channel;
mod config;
pub mod frame;
mod reg;
mod rw;
mod slider;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

pub use channel::*;
pub use config::*;
pub use reg::{BuckControl, BuckCurrent, OffTime, Payload, Reg, ThermalRecovery};
pub use slider::*;

/// RSTB is held low, then high, for this long during [`Ncv78723::begin`].
const RESET_PULSE_MS: u32 = 5;

/// Errors that can occur while talking to the regulator.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<B, P> {
  /// SPI transaction failed with the underlying driver error.
  Bus(B),
  /// Driving the RSTB line failed.
  Pin(P),
}

/// Driver for the NCV78723.
///
/// Owns the SPI device, the RSTB output and a delay provider, plus the cached
/// state of both channels. Create an instance with [`Ncv78723::new`] and call
/// [`Ncv78723::begin`] once before setting brightness.
pub struct Ncv78723<SPI, RST, D> {
  spi: SPI,
  rstb: RST,
  delay: D,
  config: Config,
  channels: [ChannelState; 2],
}

impl<SPI, RST, D> Ncv78723<SPI, RST, D>
where
  SPI: SpiDevice,
  RST: OutputPin,
  D: DelayNs,
{
  /// Create a new driver instance.
  ///
  /// Nothing is sent to the device until [`Ncv78723::begin`] is called.
  pub fn new(spi: SPI, rstb: RST, delay: D, config: Config) -> Self {
    Self { spi, rstb, delay, config, channels: [ChannelState::new(); 2] }
  }

  /// Reset the regulator and program the static registers.
  ///
  /// Pulses RSTB, writes thermal recovery, off-time and LED select duration,
  /// then leaves both bucks disabled. The LEDCTRL inputs must already be held
  /// high by the caller for analog dimming to take effect.
  pub fn begin(&mut self) -> Result<(), Error<SPI::Error, RST::Error>> {
    info!("resetting regulator");
    self.rstb.set_low().map_err(Error::Pin)?;
    self.delay.delay_ms(RESET_PULSE_MS);
    self.rstb.set_high().map_err(Error::Pin)?;
    self.delay.delay_ms(RESET_PULSE_MS);

    let config = self.config;
    self.write_register(Reg::ThermalRecovery, config.thermal)?;
    self.write_register(Reg::OffTime, config.off_time)?;
    self.write_register(Reg::LedSelectDuration, config.led_select_duration)?;

    self.channels = [ChannelState::new(); 2];
    self.write_register(Reg::BuckControl, BuckControl::pack(config.fso_mode, false, false))?;

    self.set_brightness(Channel::One, 0.0)?;
    self.set_brightness(Channel::Two, 0.0)
  }

  /// Configuration the driver was created with.
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Give back the peripherals.
  pub fn release(self) -> (SPI, RST, D) {
    (self.spi, self.rstb, self.delay)
  }
}


#[cfg(test)]
mod tests {
  use super::mock::{Bus, Delay, Fault, Pin};
  use super::*;
  use crate::frame::WriteFrame;

  fn decoded(bus: &Bus) -> heapless::Vec<(u8, u16), 64> {
    bus
      .frames
      .iter()
      .map(|raw| {
        let frame = WriteFrame::decode(*raw).expect("valid write frame");
        (frame.address(), frame.payload())
      })
      .collect()
  }

  #[test]
  fn begin_resets_and_programs_static_registers() {
    let mut driver = Ncv78723::new(Bus::default(), Pin::default(), Delay::default(), Config::default());
    driver.begin().unwrap();

    let (bus, rstb, delay) = driver.release();
    assert_eq!(&rstb.levels[..], &[false, true]);
    assert!(delay.total_ns >= 10_000_000);

    assert_eq!(
      &decoded(&bus)[..],
      &[(0x05, 0x3B3), (0x03, 0x210), (0x06, 0x088), (0x04, 0x000)],
    );
  }

  #[test]
  fn begin_forgets_previous_channel_state() {
    let mut driver = Ncv78723::new(Bus::default(), Pin::default(), Delay::default(), Config::default());
    driver.begin().unwrap();
    driver.set_brightness(Channel::One, 1.0).unwrap();
    assert!(driver.is_enabled(Channel::One));

    driver.begin().unwrap();
    assert!(!driver.is_enabled(Channel::One));
    assert_eq!(driver.brightness(Channel::One), 0.0);
  }

  #[test]
  fn begin_stops_at_a_failing_reset_line() {
    let rstb = Pin { broken: true, ..Pin::default() };
    let mut driver = Ncv78723::new(Bus::default(), rstb, Delay::default(), Config::default());
    assert!(matches!(driver.begin(), Err(Error::Pin(Fault))));

    let (bus, _, _) = driver.release();
    assert!(bus.frames.is_empty());
  }

  #[test]
  fn begin_reports_bus_errors() {
    let bus = Bus { fail_next: true, ..Bus::default() };
    let mut driver = Ncv78723::new(bus, Pin::default(), Delay::default(), Config::default());
    assert!(matches!(driver.begin(), Err(Error::Bus(Fault))));

    // nothing after the failed thermal write went out
    let (bus, _, _) = driver.release();
    assert_eq!(bus.transactions, 0);
  }
}
