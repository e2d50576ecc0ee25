#![no_std]

//! MCP23017 I2C GPIO expander driver
//!
//! The MCP23017 provides 16 GPIO pins in two 8-bit ports, A and B. The
//! driver brings the chip up in Bank1 addressing (port A registers at
//! `0x00..=0x0A`, port B registers at `0x10..=0x1A`) and resolves every
//! logical [`Register`] through the active [`Bank`], so callers never deal
//! with raw addresses unless they want to.
//!
//! The bus is any [`embedded_hal::i2c::I2c`]; use an `embedded-hal-bus`
//! device to share it with other chips.

use embedded_hal::digital::PinState;

mod bring_up;
mod device;
mod error;
mod pins;
mod registers;

pub use bring_up::RESET_SETTLE_MS;
pub use device::{DumpEntry, Mcp23017, RegisterDump, DUMP_LEN};
pub use error::Error;
pub use pins::{Pins, PIN0, PIN1, PIN2, PIN3, PIN4, PIN5, PIN6, PIN7};
pub use registers::{Bank, IoCon, Port, Register, UnknownRegisterName};

/// Full-port fill bytes
pub const HIGH: u8 = 0xFF;
pub const LOW: u8 = 0x00;
pub const INPUT: u8 = 0xFF;
pub const OUTPUT: u8 = 0x00;

/// I2C device address
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Address(u8);

impl From<u8> for Address {
    fn from(a: u8) -> Self {
        Address(a)
    }
}

impl Default for Address {
    fn default() -> Self {
        Address(Address::BASE)
    }
}

impl Address {
    /// Address with A2..A0 strapped low
    pub const BASE: u8 = 0b010_0000;

    /// Address from the levels of the A0, A1 and A2 strap pins
    pub fn from_pins(a0: PinState, a1: PinState, a2: PinState) -> Self {
        let bit = |state: PinState| -> u8 {
            match state {
                PinState::Low => 0,
                PinState::High => 1,
            }
        };
        Address(Self::BASE | bit(a2) << 2 | bit(a1) << 1 | bit(a0))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Pin direction, as stored in IODIR (1 = input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// IODIR value putting a whole port in this direction
    pub const fn fill(self) -> u8 {
        match self {
            Direction::Input => INPUT,
            Direction::Output => OUTPUT,
        }
    }
}
