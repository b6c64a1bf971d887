//! 16-bit SPI frames understood by the NCV78723.
//!
//! Every transaction is a single word, clocked most-significant bit first:
//!
//! | bits   | write frame     | read frame      |
//! |--------|-----------------|-----------------|
//! | 15     | `1`             | `0`             |
//! | 14..11 | address\[3:0\]  | address\[4:0\] (14..10) |
//! | parity | bit 10          | bit 9           |
//! | data   | payload\[9:0\]  | zero (8..0)     |
//!
//! The parity bit is chosen so the whole word carries an odd number of ones.

use bitfield_struct::bitfield;

/// Mask for the 10-bit register payload.
pub const PAYLOAD_MASK: u16 = 0x03FF;

const WRITE_PARITY_BIT: u8 = 10;
const READ_PARITY_BIT: u8 = 9;

/// Parity bit value that makes `word` odd once inserted at `parity_bit`.
///
/// The current content of `parity_bit` inside `word` is ignored.
#[inline]
pub const fn odd_parity(word: u16, parity_bit: u8) -> bool {
  (word & !(1 << parity_bit)).count_ones() % 2 == 0
}

/// Returns `true` if `raw` holds an odd number of set bits.
#[inline]
pub const fn parity_ok(raw: u16) -> bool {
  raw.count_ones() % 2 == 1
}

/// Register write frame.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteFrame {
  #[bits(10)]
  pub payload: u16,
  pub parity: bool,
  #[bits(4)]
  pub address: u8,
  pub write: bool,
}

impl WriteFrame {
  /// Build a write frame. Address and payload are masked to 4 and 10 bits.
  pub const fn encode(address: u8, payload: u16) -> Self {
    let frame = Self::new()
      .with_write(true)
      .with_address(address & 0x0F)
      .with_payload(payload & PAYLOAD_MASK);
    frame.with_parity(odd_parity(frame.into_bits(), WRITE_PARITY_BIT))
  }

  /// Interpret a captured word as a write frame.
  ///
  /// Returns `None` if the direction bit is clear or the parity check fails.
  pub const fn decode(raw: u16) -> Option<Self> {
    let frame = Self::from_bits(raw);
    if frame.write() && parity_ok(raw) {
      Some(frame)
    } else {
      None
    }
  }
}

/// Diagnostic read-back frame.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadFrame {
  #[bits(9)]
  __: u16,
  pub parity: bool,
  #[bits(5)]
  pub address: u8,
  pub write: bool,
}

impl ReadFrame {
  /// Build a read frame for a 5-bit address; the remaining bits are zero.
  pub const fn encode(address: u8) -> Self {
    let frame = Self::new().with_address(address & 0x1F);
    frame.with_parity(odd_parity(frame.into_bits(), READ_PARITY_BIT))
  }

  /// Interpret a captured word as a read frame.
  pub const fn decode(raw: u16) -> Option<Self> {
    let frame = Self::from_bits(raw);
    if !frame.write() && raw & 0x01FF == 0 && parity_ok(raw) {
      Some(frame)
    } else {
      None
    }
  }
}

/// Encode a register write as the raw word put on the wire.
#[inline]
pub const fn encode_write(address: u8, payload: u16) -> u16 {
  WriteFrame::encode(address, payload).into_bits()
}

/// Encode a register read as the raw word put on the wire.
#[inline]
pub const fn encode_read(address: u8) -> u16 {
  ReadFrame::encode(address).into_bits()
}
