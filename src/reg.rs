/******************************************************************************
 * Refer to the NCV78723 datasheet for more information, available here:     *
 * - https://www.onsemi.com/                                                  *
 * ========================================================================== *
 *                     NCV78723 - Registers & Payload Layout                  *
*******************************************************************************/

use bitfield_struct::bitfield;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
  Nop = 0x00,
  Buck1Current = 0x01,
  Buck2Current = 0x02,
  OffTime = 0x03,
  BuckControl = 0x04,
  ThermalRecovery = 0x05,
  LedSelectDuration = 0x06,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

/// Buck current register (0x01 / 0x02).
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuckCurrent {
  /// VTHR\[7:0\], regulated current threshold.
  #[bits(8)]
  pub threshold: u8,
  /// ISENS_THR\[1:0\], current sense range.
  #[bits(2)]
  pub isens: u8,
  #[bits(6)]
  __: u8,
}

impl BuckCurrent {
  pub const fn pack(isens: u8, threshold: u8) -> Self {
    Self::new().with_isens(isens & 0x03).with_threshold(threshold)
  }
}

/// Off-time register (0x03). Five bits per buck.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OffTime {
  #[bits(5)]
  pub toff2: u8,
  #[bits(5)]
  pub toff1: u8,
  #[bits(6)]
  __: u8,
}

impl OffTime {
  pub const fn pack(toff1: u8, toff2: u8) -> Self {
    Self::new().with_toff1(toff1 & 0x1F).with_toff2(toff2 & 0x1F)
  }
}

/// Buck control register (0x04).
///
/// Holds the enable bits of both bucks in one word, so every write has to
/// carry the state of the channel that is not being changed.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BuckControl {
  pub buck2_enable: bool,
  pub buck1_enable: bool,
  #[bits(3)]
  pub fso_mode: u8,
  // upper bits only exist on the -2 variant, written as zero
  #[bits(11)]
  __: u16,
}

impl BuckControl {
  pub const fn pack(fso_mode: u8, buck1_enable: bool, buck2_enable: bool) -> Self {
    Self::new()
      .with_fso_mode(fso_mode & 0x07)
      .with_buck1_enable(buck1_enable)
      .with_buck2_enable(buck2_enable)
  }
}

/// Thermal shutdown recovery register (0x05).
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ThermalRecovery {
  /// Thermal warning threshold.
  #[bits(8)]
  pub warning_threshold: u8,
  pub buck2_auto_recover: bool,
  pub buck1_auto_recover: bool,
  #[bits(6)]
  __: u8,
}

impl ThermalRecovery {
  pub const fn pack(buck1_auto_recover: bool, buck2_auto_recover: bool, warning_threshold: u8) -> Self {
    Self::new()
      .with_buck1_auto_recover(buck1_auto_recover)
      .with_buck2_auto_recover(buck2_auto_recover)
      .with_warning_threshold(warning_threshold)
  }
}

/// Register payloads are always ten bits wide.
pub trait Payload {
  fn payload(self) -> u16;
}

macro_rules! impl_payload {
  ($($ty:ty),*) => {
    $(impl Payload for $ty {
      #[inline]
      fn payload(self) -> u16 {
        self.into_bits() & crate::frame::PAYLOAD_MASK
      }
    })*
  };
}

impl_payload!(BuckCurrent, OffTime, BuckControl, ThermalRecovery);

impl Payload for u16 {
  #[inline]
  fn payload(self) -> u16 {
    self & crate::frame::PAYLOAD_MASK
  }
}
