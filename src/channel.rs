use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::reg::{BuckControl, BuckCurrent, Reg};
use crate::{Error, Ncv78723};

/// One of the two buck outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
  One = 0,
  Two = 1,
}

impl Channel {
  pub const fn index(self) -> usize {
    self as usize
  }

  /// The channel sharing the buck control word with this one.
  pub const fn other(self) -> Self {
    match self {
      Channel::One => Channel::Two,
      Channel::Two => Channel::One,
    }
  }

  /// Buck current register driving this channel.
  pub const fn current_register(self) -> Reg {
    match self {
      Channel::One => Reg::Buck1Current,
      Channel::Two => Reg::Buck2Current,
    }
  }
}

/// Host-side mirror of one channel.
///
/// `last_code` is `None` until a threshold has been written, and again after
/// the channel is disabled, so the next enable always reprograms the current.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelState {
  pub value: f32,
  pub enabled: bool,
  pub last_code: Option<u8>,
}

impl ChannelState {
  pub const fn new() -> Self {
    Self { value: 0.0, enabled: false, last_code: None }
  }
}

impl Default for ChannelState {
  fn default() -> Self {
    Self::new()
  }
}

impl<SPI, RST, D> Ncv78723<SPI, RST, D>
where
  SPI: SpiDevice,
  RST: OutputPin,
  D: DelayNs,
{
  /// Set the output level of `channel` using analog dimming.
  ///
  /// `value` is clamped to `[0, 1]`. Zero disables the buck; anything above
  /// enables it if needed and programs the mapped current threshold.
  pub fn set_brightness(&mut self, channel: Channel, value: f32) -> Result<(), Error<SPI::Error, RST::Error>> {
    let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    self.channels[channel.index()].value = value;

    if value <= 0.0 {
      if self.channels[channel.index()].enabled {
        self.set_enabled(channel, false)?;
      }
      return Ok(());
    }

    if !self.channels[channel.index()].enabled {
      self.set_enabled(channel, true)?;
    }

    let code = self.config.range.map(value);
    self.set_current_code(channel, code)
  }

  /// Last brightness set on `channel`. No bus traffic.
  pub fn brightness(&self, channel: Channel) -> f32 {
    self.channels[channel.index()].value
  }

  /// Whether the driver last left `channel` enabled.
  pub fn is_enabled(&self, channel: Channel) -> bool {
    self.channels[channel.index()].enabled
  }

  /// Cached state of `channel`.
  pub fn channel_state(&self, channel: Channel) -> &ChannelState {
    &self.channels[channel.index()]
  }

  /// Program the current threshold of `channel`, skipping the write if the
  /// same code is already on the device.
  pub fn set_current_code(&mut self, channel: Channel, code: u8) -> Result<(), Error<SPI::Error, RST::Error>> {
    if self.channels[channel.index()].last_code == Some(code) {
      trace!("{} threshold {=u8:#x} unchanged", channel, code);
      return Ok(());
    }

    let payload = BuckCurrent::pack(self.config.range.isens, code);
    self.write_register(channel.current_register(), payload)?;
    self.channels[channel.index()].last_code = Some(code);
    Ok(())
  }

  fn set_enabled(&mut self, channel: Channel, enabled: bool) -> Result<(), Error<SPI::Error, RST::Error>> {
    let mut bits = [self.channels[0].enabled, self.channels[1].enabled];
    bits[channel.index()] = enabled;

    debug!("{} {}", channel, if enabled { "enabled" } else { "disabled" });
    self.write_register(Reg::BuckControl, BuckControl::pack(self.config.fso_mode, bits[0], bits[1]))?;

    let state = &mut self.channels[channel.index()];
    state.enabled = enabled;
    if !enabled {
      state.last_code = None;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::frame::WriteFrame;
  use crate::mock::{Bus, Delay, Fault, Pin};
  use crate::{Config, CurrentRange};

  fn driver() -> Ncv78723<Bus, Pin, Delay> {
    let mut driver = Ncv78723::new(Bus::default(), Pin::default(), Delay::default(), Config::default());
    driver.begin().unwrap();
    driver.spi.clear();
    driver
  }

  fn writes(driver: &Ncv78723<Bus, Pin, Delay>) -> heapless::Vec<(u8, u16), 64> {
    driver
      .spi
      .frames
      .iter()
      .map(|raw| {
        let frame = WriteFrame::decode(*raw).expect("valid write frame");
        (frame.address(), frame.payload())
      })
      .collect()
  }

  #[test]
  fn channel_helpers() {
    assert_eq!(Channel::One.other(), Channel::Two);
    assert_eq!(Channel::Two.other(), Channel::One);
    assert_eq!(Channel::One.current_register(), Reg::Buck1Current);
    assert_eq!(Channel::Two.current_register(), Reg::Buck2Current);
  }

  #[test]
  fn first_non_zero_level_enables_then_programs_current() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 1.0).unwrap();

    assert_eq!(&writes(&driver)[..], &[(0x04, 0b10), (0x01, 0x29E)]);
    assert!(driver.is_enabled(Channel::One));
    assert_eq!(driver.channel_state(Channel::One).last_code, Some(0x9E));
  }

  #[test]
  fn repeated_code_is_written_once() {
    let mut driver = driver();
    driver.set_current_code(Channel::Two, 0x40).unwrap();
    driver.set_current_code(Channel::Two, 0x40).unwrap();

    assert_eq!(&writes(&driver)[..], &[(0x02, 0x240)]);
  }

  #[test]
  fn unchanged_brightness_causes_no_traffic() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 0.5).unwrap();
    driver.spi.clear();

    driver.set_brightness(Channel::One, 0.5).unwrap();
    assert!(driver.spi.frames.is_empty());
  }

  #[test]
  fn disabling_one_channel_keeps_the_other_enabled() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 0.5).unwrap();
    driver.set_brightness(Channel::Two, 0.5).unwrap();
    driver.spi.clear();

    driver.set_brightness(Channel::One, 0.0).unwrap();

    // only buck 2 enable bit left
    assert_eq!(&writes(&driver)[..], &[(0x04, 0b01)]);
    assert!(!driver.is_enabled(Channel::One));
    assert!(driver.is_enabled(Channel::Two));
  }

  #[test]
  fn enabling_second_channel_preserves_first() {
    let mut driver = driver();
    driver.set_brightness(Channel::Two, 0.2).unwrap();
    driver.spi.clear();

    driver.set_brightness(Channel::One, 0.2).unwrap();
    assert_eq!(writes(&driver)[0], (0x04, 0b11));
  }

  #[test]
  fn re_enable_rewrites_the_same_code() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 0.5).unwrap();
    driver.set_brightness(Channel::One, 0.0).unwrap();
    assert_eq!(driver.channel_state(Channel::One).last_code, None);
    driver.spi.clear();

    driver.set_brightness(Channel::One, 0.5).unwrap();
    assert_eq!(&writes(&driver)[..], &[(0x04, 0b10), (0x01, 0x200 | 0x4F)]);
  }

  #[test]
  fn zero_on_a_disabled_channel_is_silent() {
    let mut driver = driver();
    driver.set_brightness(Channel::Two, 0.0).unwrap();
    driver.set_brightness(Channel::Two, -1.0).unwrap();
    assert!(driver.spi.frames.is_empty());
  }

  #[test]
  fn brightness_is_clamped_and_remembered() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 4.0).unwrap();
    assert_eq!(driver.brightness(Channel::One), 1.0);

    driver.set_brightness(Channel::One, -0.5).unwrap();
    assert_eq!(driver.brightness(Channel::One), 0.0);
    assert!(!driver.is_enabled(Channel::One));
  }

  #[test]
  fn configured_range_drives_the_threshold_word() {
    let config = Config::default().with_range(CurrentRange::LEGACY).with_fso_mode(0b010);
    let mut driver = Ncv78723::new(Bus::default(), Pin::default(), Delay::default(), config);
    driver.set_brightness(Channel::Two, 1.0).unwrap();

    assert_eq!(&writes(&driver)[..], &[(0x04, 0b01001), (0x02, 0x170)]);
  }

  #[test]
  fn failed_enable_leaves_cache_untouched() {
    let mut driver = driver();
    driver.spi.fail_next = true;

    assert!(matches!(driver.set_brightness(Channel::Two, 0.5), Err(Error::Bus(Fault))));
    assert!(!driver.is_enabled(Channel::Two));
    assert_eq!(driver.channel_state(Channel::Two).last_code, None);
    assert!(driver.spi.frames.is_empty());

    // the retry sends both frames instead of trusting the cache
    driver.set_brightness(Channel::Two, 0.5).unwrap();
    assert_eq!(&writes(&driver)[..], &[(0x04, 0b01), (0x02, 0x200 | 0x4F)]);
    assert!(driver.is_enabled(Channel::Two));
  }

  #[test]
  fn failed_threshold_write_is_retried() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 0.5).unwrap();
    driver.spi.clear();

    driver.spi.fail_next = true;
    assert!(matches!(driver.set_brightness(Channel::One, 1.0), Err(Error::Bus(Fault))));
    assert!(driver.is_enabled(Channel::One));
    assert_eq!(driver.channel_state(Channel::One).last_code, Some(0x4F));

    driver.set_brightness(Channel::One, 1.0).unwrap();
    assert_eq!(&writes(&driver)[..], &[(0x01, 0x29E)]);
    assert_eq!(driver.channel_state(Channel::One).last_code, Some(0x9E));
  }

  #[test]
  fn failed_disable_keeps_channel_on() {
    let mut driver = driver();
    driver.set_brightness(Channel::One, 0.5).unwrap();
    driver.spi.clear();

    driver.spi.fail_next = true;
    assert!(driver.set_brightness(Channel::One, 0.0).is_err());
    assert!(driver.is_enabled(Channel::One));
    assert_eq!(driver.channel_state(Channel::One).last_code, Some(0x4F));

    driver.set_brightness(Channel::One, 0.0).unwrap();
    assert_eq!(&writes(&driver)[..], &[(0x04, 0b00)]);
    assert!(!driver.is_enabled(Channel::One));
  }
}
