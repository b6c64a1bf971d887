/// Touch detection and calibration settings for the pad array.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderConfig {
  /// Fraction of the baseline a reading has to drop by before the pad counts
  /// as touched. Boards in the field use values between 0.2 and 0.3.
  pub drop_fraction: f32,
  /// Readings averaged per pad during calibration.
  pub calibration_samples: u16,
  /// Pause between calibration rounds, in milliseconds.
  pub calibration_delay_ms: u32,
}

impl SliderConfig {
  pub const fn new() -> Self {
    Self { drop_fraction: 0.30, calibration_samples: 10, calibration_delay_ms: 100 }
  }

  pub const fn with_drop_fraction(mut self, drop_fraction: f32) -> Self {
    self.drop_fraction = drop_fraction;
    self
  }

  pub const fn with_calibration(mut self, samples: u16, delay_ms: u32) -> Self {
    self.calibration_samples = samples;
    self.calibration_delay_ms = delay_ms;
    self
  }
}

impl Default for SliderConfig {
  fn default() -> Self {
    Self::new()
  }
}

/// Swipe recognition settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureConfig {
  /// Minimum time between two accepted polls.
  pub sample_interval_ms: u64,
  /// Velocity, in slider lengths per second, reported as magnitude 1.0.
  pub max_velocity: f32,
  /// Normalised magnitudes below this are reported as no movement.
  pub deadzone: f32,
}

impl GestureConfig {
  pub const fn new() -> Self {
    Self { sample_interval_ms: 10, max_velocity: 3.5, deadzone: 0.05 }
  }

  pub const fn with_sample_interval(mut self, interval_ms: u64) -> Self {
    self.sample_interval_ms = interval_ms;
    self
  }

  pub const fn with_max_velocity(mut self, max_velocity: f32) -> Self {
    self.max_velocity = max_velocity;
    self
  }

  pub const fn with_deadzone(mut self, deadzone: f32) -> Self {
    self.deadzone = deadzone;
    self
  }
}

impl Default for GestureConfig {
  fn default() -> Self {
    Self::new()
  }
}
