//! Capacitive slider built from `N` discrete pads laid out in a line.
//!
//! A finger near a pad lowers its raw reading. After calibration every pad has
//! a baseline; a pad counts as touched once its reading drops below
//! `baseline * (1 - drop_fraction)`, and how far below the threshold it sits
//! becomes its weight in a centroid over the pad positions. That yields a
//! position between `0.0` (first pad) and `1.0` (last pad) with sub-pad
//! resolution.

use embedded_hal::delay::DelayNs;

use crate::SliderConfig;

mod gesture;

pub use gesture::*;

/// Raw capacitance sampling for one pad.
///
/// Implemented by the board support code, e.g. on top of the ESP32 touch
/// peripheral. Readings must fall as the touch gets stronger.
pub trait TouchSense {
  type Error;

  fn sample(&mut self, pad: usize) -> Result<u32, Self::Error>;
}

impl<T: TouchSense + ?Sized> TouchSense for &mut T {
  type Error = T::Error;

  fn sample(&mut self, pad: usize) -> Result<u32, Self::Error> {
    T::sample(self, pad)
  }
}

/// Position estimator for an `N`-pad slider.
pub struct Slider<S, D, const N: usize> {
  sense: S,
  delay: D,
  config: SliderConfig,
  baseline: [f32; N],
}

impl<S, D, const N: usize> Slider<S, D, N>
where
  S: TouchSense,
  D: DelayNs,
{
  /// Create a slider. Positions are meaningless until [`Slider::calibrate`]
  /// has run.
  pub fn new(sense: S, delay: D, config: SliderConfig) -> Self {
    Self { sense, delay, config, baseline: [0.0; N] }
  }

  /// Record the untouched reading of every pad.
  ///
  /// Averages `calibration_samples` rounds over all pads, pausing
  /// `calibration_delay_ms` after each round. Nothing may touch the slider
  /// while this runs.
  pub fn calibrate(&mut self) -> Result<(), S::Error> {
    let rounds = self.config.calibration_samples.max(1);
    let mut sums = [0.0f32; N];

    for _ in 0..rounds {
      for (pad, sum) in sums.iter_mut().enumerate() {
        *sum += self.sense.sample(pad)? as f32;
      }
      self.delay.delay_ms(self.config.calibration_delay_ms);
    }

    for (baseline, sum) in self.baseline.iter_mut().zip(sums) {
      *baseline = sum / rounds as f32;
    }
    debug!("slider calibrated: {}", self.baseline);
    Ok(())
  }

  /// Sample all pads and return the touch position, or `None` when no pad is
  /// below its threshold.
  pub fn sample_position(&mut self) -> Result<Option<f32>, S::Error> {
    let mut readings = [0u32; N];
    for (pad, reading) in readings.iter_mut().enumerate() {
      *reading = self.sense.sample(pad)?;
    }
    Ok(centroid(&self.baseline, &readings, self.config.drop_fraction))
  }

  /// Per-pad reference readings from the last calibration.
  pub fn baseline(&self) -> &[f32; N] {
    &self.baseline
  }

  pub fn config(&self) -> &SliderConfig {
    &self.config
  }

  /// Give back the sensor and delay.
  pub fn release(self) -> (S, D) {
    (self.sense, self.delay)
  }
}

/// Weighted centroid of all pads whose reading is below threshold.
///
/// Pad `i` sits at `i / (N - 1)` and weighs `threshold - reading`.
pub fn centroid<const N: usize>(baseline: &[f32; N], readings: &[u32; N], drop_fraction: f32) -> Option<f32> {
  let span = if N > 1 { (N - 1) as f32 } else { 1.0 };
  let mut weighted = 0.0f32;
  let mut total = 0.0f32;

  for (i, (base, reading)) in baseline.iter().zip(readings).enumerate() {
    let threshold = base * (1.0 - drop_fraction);
    let reading = *reading as f32;
    if reading < threshold {
      let weight = threshold - reading;
      weighted += (i as f32 / span) * weight;
      total += weight;
    }
  }

  if total > 0.0 {
    Some(weighted / total)
  } else {
    None
  }
}

#[cfg(test)]
pub(crate) mod mock {
  use super::TouchSense;

  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct SenseFault;

  /// Pads that always report the same readings.
  pub struct Pads<const N: usize> {
    pub readings: [u32; N],
    pub samples: usize,
    /// Fail the next single-pad read.
    pub fail_next: bool,
  }

  impl<const N: usize> Pads<N> {
    pub fn new(readings: [u32; N]) -> Self {
      Self { readings, samples: 0, fail_next: false }
    }
  }

  impl<const N: usize> TouchSense for Pads<N> {
    type Error = SenseFault;

    fn sample(&mut self, pad: usize) -> Result<u32, Self::Error> {
      if core::mem::take(&mut self.fail_next) {
        return Err(SenseFault);
      }
      self.samples += 1;
      Ok(self.readings[pad])
    }
  }
}
