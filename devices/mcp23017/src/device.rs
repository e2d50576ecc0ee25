use core::fmt;
use core::ops::Deref;

use embedded_hal::digital::PinState;
use embedded_hal::i2c::I2c;
use heapless::Vec;

use crate::error::Error;
use crate::pins::Pins;
use crate::registers::{Bank, Port, Register};
use crate::{Address, Direction};

/// Number of named register slots, identical for both banks
pub const DUMP_LEN: usize = 22;

/// MCP23017 I2C GPIO expander driver
///
/// The MCP23017 is a 16-bit I2C GPIO expander organised as two 8-bit ports.
/// A handle is created through [`Mcp23017::new`] or
/// [`Mcp23017::new_with_reset`], which leave the chip in Bank1 addressing.
///
/// Bit and pin operations are read-modify-write sequences of two bus
/// transactions. They are not atomic: another handle writing the same
/// register in between is overwritten. Share a handle behind a mutex when
/// several contexts drive the same chip.
pub struct Mcp23017<I2C> {
    i2c: I2C,
    address: u8,
    bank: Bank,
}

impl<I2C> Mcp23017<I2C> {
    /// Handle assuming the reset default addressing. Only bring-up uses it.
    pub(crate) fn unconfigured(i2c: I2C, address: Address) -> Self {
        Self {
            i2c,
            address: address.value(),
            bank: Bank::Bank0,
        }
    }

    pub(crate) fn set_bank(&mut self, bank: Bank) {
        self.bank = bank;
    }

    pub fn address(&self) -> Address {
        Address::from(self.address)
    }

    /// Active register bank
    pub fn bank(&self) -> Bank {
        self.bank
    }

    /// Byte address of `register` in the active bank
    pub fn resolve(&self, register: Register) -> u8 {
        register.address(self.bank)
    }

    /// Byte address of a register given by datasheet name, `None` if the name is unknown
    pub fn register_address(&self, name: &str) -> Option<u8> {
        Register::lookup(name).map(|register| self.resolve(register))
    }

    /// Register at `address` in the active bank
    pub fn register_at(&self, address: u8) -> Option<Register> {
        Register::at(address, self.bank)
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Mcp23017<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Write one register
    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), Error<E>> {
        log::trace!("MCP23017 0x{:02X}: [0x{address:02X}] <- 0x{value:02X}", self.address);
        self.i2c
            .write(self.address, &[address, value])
            .map_err(Error::I2c)
    }

    /// Read one register
    pub fn read_register(&mut self, address: u8) -> Result<u8, Error<E>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[address], &mut buffer)
            .map_err(Error::I2c)?;
        log::trace!("MCP23017 0x{:02X}: [0x{address:02X}] -> 0x{:02X}", self.address, buffer[0]);
        Ok(buffer[0])
    }

    pub fn read(&mut self, register: Register) -> Result<u8, Error<E>> {
        self.read_register(self.resolve(register))
    }

    pub fn write(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        self.write_register(self.resolve(register), value)
    }

    /// Set (`High`) or clear (`Low`) the masked bits of the register at `address`
    ///
    /// Bits outside `pins` keep their value. Fails with
    /// [`Error::InvalidRegister`] without touching the bus when `address` is
    /// not a register of the active bank up to and including `OLATB`.
    pub fn set_bit(&mut self, pins: Pins, address: u8, state: PinState) -> Result<(), Error<E>> {
        // Bank1 also has a gap below IODIRB
        if address > self.bank.last_output_latch() || Register::at(address, self.bank).is_none() {
            return Err(Error::InvalidRegister(address));
        }

        let current = self.read_register(address)?;
        let value = match state {
            PinState::Low => pins.clear_in(current),
            PinState::High => pins.set_in(current),
        };
        self.write_register(address, value)
    }

    /// [`set_bit`](Self::set_bit) on a logical register
    pub fn update(&mut self, register: Register, pins: Pins, state: PinState) -> Result<(), Error<E>> {
        self.set_bit(pins, self.resolve(register), state)
    }

    /// Port whose GPIO register sits at `address` in the active bank
    pub fn port_at(&self, address: u8) -> Result<Port, Error<E>> {
        Port::from_gpio_address(address, self.bank).ok_or(Error::InvalidPort(address))
    }

    /// Configure the masked pins of `port` as inputs or outputs
    ///
    /// Mutates the port's IODIR register exactly once.
    pub fn set_pin_mode(&mut self, pins: Pins, port: Port, direction: Direction) -> Result<(), Error<E>> {
        let address = self.resolve(Register::direction(port));
        let current = self.read_register(address)?;
        let value = match direction {
            Direction::Output => pins.clear_in(current),
            Direction::Input => pins.set_in(current),
        };
        self.write_register(address, value)
    }

    /// Configure all 16 pins as outputs
    pub fn set_all_output(&mut self) -> Result<(), Error<E>> {
        self.set_all(Direction::Output)
    }

    /// Configure all 16 pins as inputs
    pub fn set_all_input(&mut self) -> Result<(), Error<E>> {
        self.set_all(Direction::Input)
    }

    fn set_all(&mut self, direction: Direction) -> Result<(), Error<E>> {
        // Same fill byte for both ports: IODIRB gets 0xFF on all-input, never 0x00
        for port in [Port::A, Port::B] {
            self.write(Register::direction(port), direction.fill())?;
        }
        Ok(())
    }

    /// Read the pin levels of `port`
    pub fn read_port(&mut self, port: Port) -> Result<u8, Error<E>> {
        self.read(Register::gpio(port))
    }

    /// Write the output latches of `port`
    pub fn write_port(&mut self, port: Port, value: u8) -> Result<(), Error<E>> {
        self.write(Register::output_latch(port), value)
    }

    /// Drive the masked output pins of `port` high or low
    pub fn digital_write(&mut self, pins: Pins, port: Port, state: PinState) -> Result<(), Error<E>> {
        self.update(Register::output_latch(port), pins, state)
    }

    /// `true` if any of the masked pins of `port` reads high
    pub fn digital_read(&mut self, pins: Pins, port: Port) -> Result<bool, Error<E>> {
        Ok(self.read_port(port)? & pins.as_u8() != 0)
    }

    /// Invert the masked output latches of `port`
    pub fn toggle(&mut self, pins: Pins, port: Port) -> Result<(), Error<E>> {
        let address = self.resolve(Register::output_latch(port));
        let outputs = self.read_register(address)?;
        self.write_register(address, outputs ^ pins.as_u8())
    }

    /// Enable or disable the internal pull-ups of the masked pins
    pub fn set_pull_up(&mut self, pins: Pins, port: Port, enabled: bool) -> Result<(), Error<E>> {
        self.update(Register::pull_up(port), pins, PinState::from(enabled))
    }

    /// Invert (or restore) the input polarity of the masked pins
    pub fn set_polarity(&mut self, pins: Pins, port: Port, inverted: bool) -> Result<(), Error<E>> {
        self.update(Register::polarity(port), pins, PinState::from(inverted))
    }

    /// Read both ports, port B in the upper byte
    pub fn read_gpio(&mut self) -> Result<u16, Error<E>> {
        let a = self.read_port(Port::A)?;
        let b = self.read_port(Port::B)?;
        Ok(u16::from_le_bytes([a, b]))
    }

    /// Write both output latches, port B in the upper byte
    pub fn write_gpio(&mut self, value: u16) -> Result<(), Error<E>> {
        let [a, b] = value.to_le_bytes();
        self.write_port(Port::A, a)?;
        self.write_port(Port::B, b)
    }

    /// Read every named register of the active bank in address order
    ///
    /// Slots that fail to read are kept with no value; the dump never aborts.
    pub fn dump_registers(&mut self) -> RegisterDump {
        let mut dump = RegisterDump::default();
        for (address, slot) in self.bank.layout().iter().enumerate() {
            let Some(register) = *slot else {
                continue;
            };
            let address = address as u8;
            let value = match self.read_register(address) {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!(
                        "MCP23017 0x{:02X}: could not read {register} at 0x{address:02X}",
                        self.address
                    );
                    None
                }
            };
            let entry = DumpEntry {
                register,
                address,
                value,
            };
            if dump.entries.push(entry).is_err() {
                break;
            }
        }
        dump
    }
}

/// One line of a [`RegisterDump`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpEntry {
    pub register: Register,
    pub address: u8,
    /// `None` when the read failed
    pub value: Option<u8>,
}

impl fmt::Display for DumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} (0x{:02X}) = 0x{value:02X}", self.register, self.address),
            None => write!(f, "{} (0x{:02X}) = --", self.register, self.address),
        }
    }
}

/// Register snapshot produced by [`Mcp23017::dump_registers`]
///
/// Derefs to the entries in layout order.
#[derive(Debug, Clone, Default)]
pub struct RegisterDump {
    entries: Vec<DumpEntry, DUMP_LEN>,
}

impl Deref for RegisterDump {
    type Target = [DumpEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl RegisterDump {
    /// First value read for `register`
    pub fn value_of(&self, register: Register) -> Option<u8> {
        self.entries
            .iter()
            .filter(|entry| entry.register == register)
            .find_map(|entry| entry.value)
    }
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--------------------")?;
        for entry in self.iter() {
            writeln!(f, "{entry}")?;
        }
        write!(f, "--------------------")
    }
}
