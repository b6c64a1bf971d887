use crate::reg::{OffTime, ThermalRecovery};

mod dimming;
mod slider;

pub use dimming::*;
pub use slider::*;

/// Complete regulator configuration applied by [`crate::Ncv78723::begin`].
///
/// One record covers every board variant: they only differ in the current
/// range and in the timing values below, never in the protocol.
///
/// # Example
/// ```no_run
/// use ncv78723::{Config, CurrentRange, OffTime};
///
/// let config = Config::default()
///   .with_range(CurrentRange::LEGACY.with_min_on(0x08))
///   .with_off_time(OffTime::pack(0x12, 0x12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub range: CurrentRange,
  pub off_time: OffTime,
  pub thermal: ThermalRecovery,
  /// Opaque LED select duration payload.
  pub led_select_duration: u16,
  /// FSO_MD\[2:0\] carried in every buck control write.
  pub fso_mode: u8,
}

impl Config {
  pub const fn new() -> Self {
    Self {
      range: CurrentRange::LAMP,
      off_time: OffTime::pack(0x10, 0x10),
      thermal: ThermalRecovery::pack(true, true, 0xB3),
      led_select_duration: (8 << 4) | 8,
      fso_mode: 0,
    }
  }

  pub const fn with_range(mut self, range: CurrentRange) -> Self {
    self.range = range;
    self
  }

  pub const fn with_off_time(mut self, off_time: OffTime) -> Self {
    self.off_time = off_time;
    self
  }

  pub const fn with_thermal(mut self, thermal: ThermalRecovery) -> Self {
    self.thermal = thermal;
    self
  }

  pub const fn with_led_select_duration(mut self, duration: u16) -> Self {
    self.led_select_duration = duration;
    self
  }

  pub const fn with_fso_mode(mut self, fso_mode: u8) -> Self {
    self.fso_mode = fso_mode;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}
