//! Swipe recognition on top of [`Slider`] positions.
//!
//! While a finger stays on the slider every accepted poll compares the new
//! position with the previous one and reports the resulting velocity as a
//! [`GestureEvent::Motion`]. When the finger lifts, the whole stroke from
//! first contact to last position is summarised once as a
//! [`GestureEvent::Ended`].

use embedded_hal::delay::DelayNs;

use super::{Slider, TouchSense};
use crate::GestureConfig;

/// Direction along the slider. Forward runs from the first pad to the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
  Forward,
  Backward,
}

impl Direction {
  pub const fn is_forward(self) -> bool {
    matches!(self, Direction::Forward)
  }

  pub const fn opposite(self) -> Self {
    match self {
      Direction::Forward => Direction::Backward,
      Direction::Backward => Direction::Forward,
    }
  }
}

/// Direction and normalised speed of a movement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Swipe {
  pub direction: Direction,
  /// Speed relative to the configured maximum velocity, in `(0, 1]`.
  pub magnitude: f32,
}

impl Swipe {
  /// Classify a displacement of `dx` slider lengths over `dt_ms`.
  ///
  /// Returns `None` for a zero time span and for speeds inside the deadzone.
  pub fn from_motion(dx: f32, dt_ms: u64, config: &GestureConfig) -> Option<Self> {
    if dt_ms == 0 {
      return None;
    }

    let velocity = dx / (dt_ms as f32 / 1000.0);
    let direction = if velocity >= 0.0 { Direction::Forward } else { Direction::Backward };
    let speed = if velocity < 0.0 { -velocity } else { velocity };

    let mut magnitude = (speed / config.max_velocity).clamp(0.0, 1.0);
    if magnitude < config.deadzone {
      magnitude = 0.0;
    }

    if magnitude > 0.0 {
      Some(Self { direction, magnitude })
    } else {
      None
    }
  }

  /// Magnitude with the sign of the direction.
  pub fn signed(&self) -> f32 {
    match self.direction {
      Direction::Forward => self.magnitude,
      Direction::Backward => -self.magnitude,
    }
  }
}

/// Something worth reporting from a poll.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureEvent {
  /// The finger moved since the previous accepted poll.
  Motion(Swipe),
  /// The finger lifted; net movement of the whole stroke.
  Ended(Swipe),
}

impl GestureEvent {
  pub fn swipe(&self) -> Swipe {
    match self {
      GestureEvent::Motion(swipe) | GestureEvent::Ended(swipe) => *swipe,
    }
  }

  pub fn is_motion(&self) -> bool {
    matches!(self, GestureEvent::Motion(_))
  }

  pub fn is_ended(&self) -> bool {
    matches!(self, GestureEvent::Ended(_))
  }
}

/// Anchor points of the stroke in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stroke {
  pub start_position: f32,
  pub start_ms: u64,
  pub previous_position: f32,
  pub previous_ms: u64,
}

impl Stroke {
  const fn begin(position: f32, now_ms: u64) -> Self {
    Self { start_position: position, start_ms: now_ms, previous_position: position, previous_ms: now_ms }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureState {
  Idle,
  Active(Stroke),
}

/// Rate-limited swipe detector driving a [`Slider`].
pub struct GestureDetector<S, D, const N: usize> {
  slider: Slider<S, D, N>,
  config: GestureConfig,
  state: GestureState,
  last_poll_ms: Option<u64>,
}

impl<S, D, const N: usize> GestureDetector<S, D, N>
where
  S: TouchSense,
  D: DelayNs,
{
  /// Wrap a slider. The slider should already be calibrated.
  pub fn new(slider: Slider<S, D, N>, config: GestureConfig) -> Self {
    Self { slider, config, state: GestureState::Idle, last_poll_ms: None }
  }

  /// Sample the slider and advance the gesture state.
  ///
  /// Calls arriving sooner than `sample_interval_ms` after the last accepted
  /// one return `Ok(None)` without touching the pads. A `now_ms` earlier than
  /// the last accepted poll is taken as a clock reset: the sample is accepted
  /// and any stroke in progress is dropped without an event.
  ///
  /// If sampling fails the error is returned and neither the stroke nor the
  /// rate limit history changes.
  pub fn poll(&mut self, now_ms: u64) -> Result<Option<GestureEvent>, S::Error> {
    let mut rewound = false;
    if let Some(last) = self.last_poll_ms {
      if now_ms < last {
        rewound = true;
      } else if now_ms - last < self.config.sample_interval_ms {
        return Ok(None);
      }
    }

    let position = self.slider.sample_position()?;
    self.last_poll_ms = Some(now_ms);
    if rewound {
      debug!("clock went back to {}, dropping stroke", now_ms);
      self.state = GestureState::Idle;
    }
    Ok(self.advance(position, now_ms))
  }

  /// Feed one position sample (`None` for no touch) taken at `now_ms`.
  ///
  /// This is the state machine behind [`GestureDetector::poll`], without the
  /// rate limit or the pad sampling.
  pub fn advance(&mut self, position: Option<f32>, now_ms: u64) -> Option<GestureEvent> {
    match (self.state, position) {
      (GestureState::Idle, None) => None,

      (GestureState::Idle, Some(position)) => {
        debug!("touch down at {}", position);
        self.state = GestureState::Active(Stroke::begin(position, now_ms));
        None
      }

      (GestureState::Active(mut stroke), Some(position)) => {
        let dx = position - stroke.previous_position;
        let dt_ms = now_ms.saturating_sub(stroke.previous_ms);
        stroke.previous_position = position;
        stroke.previous_ms = now_ms;
        self.state = GestureState::Active(stroke);

        Swipe::from_motion(dx, dt_ms, &self.config).map(GestureEvent::Motion)
      }

      (GestureState::Active(stroke), None) => {
        self.state = GestureState::Idle;
        let dx = stroke.previous_position - stroke.start_position;
        let dt_ms = now_ms.saturating_sub(stroke.start_ms);
        let event = Swipe::from_motion(dx, dt_ms, &self.config).map(GestureEvent::Ended);
        debug!("touch released, {}", event);
        event
      }
    }
  }

  /// Whether a finger is currently on the slider.
  pub fn is_active(&self) -> bool {
    matches!(self.state, GestureState::Active(_))
  }

  pub fn state(&self) -> &GestureState {
    &self.state
  }

  /// Drop any stroke in progress and the rate limit history.
  pub fn reset(&mut self) {
    self.state = GestureState::Idle;
    self.last_poll_ms = None;
  }

  pub fn slider(&self) -> &Slider<S, D, N> {
    &self.slider
  }

  pub fn slider_mut(&mut self) -> &mut Slider<S, D, N> {
    &mut self.slider
  }

  /// Give back the slider.
  pub fn release(self) -> Slider<S, D, N> {
    self.slider
  }
}
