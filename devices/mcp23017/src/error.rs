use core::fmt;

use embedded_hal::digital;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// I2C communication error
    I2c(E),
    /// The reset line could not be driven during bring-up
    Reset(digital::ErrorKind),
    /// Address is not a register bit operations may target in the active bank
    InvalidRegister(u8),
    /// Address is not the GPIOA or GPIOB register of the active bank
    InvalidPort(u8),
    /// IOCON did not report Bank1 addressing after bring-up (holds the value read back)
    BankMismatch(u8),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {e:?}"),
            Error::Reset(kind) => write!(f, "reset line error: {kind:?}"),
            Error::InvalidRegister(address) => write!(f, "invalid register 0x{address:02X}"),
            Error::InvalidPort(address) => write!(f, "invalid port 0x{address:02X}"),
            Error::BankMismatch(iocon) => {
                write!(f, "bank switch not applied (IOCON = 0x{iocon:02X})")
            }
        }
    }
}
