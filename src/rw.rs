use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::frame::{encode_read, encode_write};
use crate::reg::{Payload, Reg};
use crate::{Error, Ncv78723};

/// Settle time between CSB falling and the first clock edge.
const CS_SETUP_NS: u32 = 1_000;
/// Settle time between the last clock edge and CSB rising.
const CS_HOLD_NS: u32 = 1_000;
/// Minimum CSB high time before the next frame.
const CS_IDLE_NS: u32 = 2_000;

impl<SPI, RST, D> Ncv78723<SPI, RST, D>
where
  SPI: SpiDevice,
  RST: OutputPin,
  D: DelayNs,
{
  /// Write a register payload. The payload is masked to ten bits.
  ///
  /// Goes straight to the device and leaves the cached channel state alone;
  /// use the brightness API for the buck current and control registers.
  pub fn write_register<P: Payload>(&mut self, reg: Reg, payload: P) -> Result<(), Error<SPI::Error, RST::Error>> {
    let payload = payload.payload();
    trace!("write reg {=u8:#x} <- {=u16:#x}", reg as u8, payload);
    self.transfer(encode_write(reg.into(), payload)).map(|_| ())
  }

  /// Diagnostic read-back.
  ///
  /// Sends a read frame for the 5-bit `address` and returns the word clocked
  /// back during the same transfer, undecoded.
  pub fn read_register(&mut self, address: u8) -> Result<u16, Error<SPI::Error, RST::Error>> {
    self.transfer(encode_read(address))
  }

  /// One full-duplex 16-bit exchange inside a single chip-select bracket.
  fn transfer(&mut self, frame: u16) -> Result<u16, Error<SPI::Error, RST::Error>> {
    let tx = frame.to_be_bytes();
    let mut rx = [0u8; 2];
    self
      .spi
      .transaction(&mut [
        Operation::DelayNs(CS_SETUP_NS),
        Operation::Transfer(&mut rx, &tx),
        Operation::DelayNs(CS_HOLD_NS),
      ])
      .map_err(Error::Bus)?;
    self.delay.delay_ns(CS_IDLE_NS);
    Ok(u16::from_be_bytes(rx))
  }
}
