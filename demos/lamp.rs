//! Touch-dimmed lamp: a five-pad slider steers both LED strings.
#![allow(unused)]
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use ncv78723::{
  Channel, Config, GestureConfig, GestureDetector, GestureEvent, Ncv78723, Slider, SliderConfig, TouchSense,
};

/// Either half of the lamp failing.
#[derive(Debug)]
enum LampError<B, P, S> {
  Driver(ncv78723::Error<B, P>),
  Touch(S),
}

impl<B, P, S> From<ncv78723::Error<B, P>> for LampError<B, P, S> {
  fn from(err: ncv78723::Error<B, P>) -> Self {
    LampError::Driver(err)
  }
}

#[allow(dead_code)]
fn run<SPI, RST, D, T>(
  spi: SPI,
  rstb: RST,
  mut delay: D,
  pads: T,
  mut millis: impl FnMut() -> u64,
) -> Result<(), LampError<SPI::Error, RST::Error, T::Error>>
where
  SPI: SpiDevice,
  RST: OutputPin,
  D: DelayNs + Clone,
  T: TouchSense,
{
  let mut lamp = Ncv78723::new(spi, rstb, delay.clone(), Config::default());
  lamp.begin()?;

  let mut slider: Slider<_, _, 5> = Slider::new(pads, delay.clone(), SliderConfig::default().with_drop_fraction(0.2));
  slider.calibrate().map_err(LampError::Touch)?;
  let mut gestures = GestureDetector::new(slider, GestureConfig::default());

  let mut level = 0.0f32;
  loop {
    match gestures.poll(millis()).map_err(LampError::Touch)? {
      Some(GestureEvent::Motion(swipe)) => {
        level = (level + swipe.signed() * 0.05).clamp(0.0, 1.0);
      }
      Some(GestureEvent::Ended(swipe)) if swipe.magnitude > 0.8 => {
        // fast flick switches fully on or off
        level = if swipe.direction.is_forward() { 1.0 } else { 0.0 };
      }
      Some(GestureEvent::Ended(_)) | None => {}
    }

    lamp.set_brightness(Channel::One, level)?;
    lamp.set_brightness(Channel::Two, level)?;
    delay.delay_ms(1);
  }
}

fn main() {}
