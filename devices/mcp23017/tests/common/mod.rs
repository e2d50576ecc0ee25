//! Simulated MCP23017 chips behind an I2C bus
//!
//! Registers are stored in Bank0 order. Addresses are decoded from the
//! chip's own IOCON.BANK bit, so a driver that loses track of the bank
//! hits the wrong register here as it would on hardware.

#![allow(dead_code)]

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

const IOCON: usize = 0x0A;
const IOCON_MIRROR: usize = 0x0B;
const BANK: u8 = 0x80;
const SEQOP: u8 = 0x20;

pub struct FakeChip {
    pub address: u8,
    registers: [u8; 22],
    pointer: u8,
    /// Reads of this raw address fail
    pub fail_read_at: Option<u8>,
}

impl FakeChip {
    pub fn new(address: u8) -> Self {
        let mut registers = [0u8; 22];
        // IODIRA / IODIRB reset to inputs
        registers[0x00] = 0xFF;
        registers[0x01] = 0xFF;
        Self {
            address,
            registers,
            pointer: 0,
            fail_read_at: None,
        }
    }

    fn bank1(&self) -> bool {
        self.registers[IOCON] & BANK != 0
    }

    fn sequential(&self) -> bool {
        self.registers[IOCON] & SEQOP == 0
    }

    /// Bank0 index of a raw address, `None` for unused addresses
    fn decode(&self, address: u8) -> Option<usize> {
        if self.bank1() {
            let port = usize::from(address >> 4);
            let offset = usize::from(address & 0x0F);
            (port < 2 && offset <= 0x0A).then_some(offset * 2 + port)
        } else {
            let index = usize::from(address);
            (index < self.registers.len()).then_some(index)
        }
    }

    pub fn peek(&self, address: u8) -> Option<u8> {
        self.decode(address).map(|index| self.registers[index])
    }

    /// Register value by Bank0 address, whatever the active bank
    pub fn register(&self, bank0_address: usize) -> u8 {
        self.registers[bank0_address]
    }

    pub fn set_register(&mut self, bank0_address: usize, value: u8) {
        self.registers[bank0_address] = value;
    }

    fn store(&mut self, value: u8) {
        if let Some(index) = self.decode(self.pointer) {
            if index == IOCON || index == IOCON_MIRROR {
                self.registers[IOCON] = value;
                self.registers[IOCON_MIRROR] = value;
            } else {
                self.registers[index] = value;
            }
        }
        self.advance();
    }

    fn load(&mut self) -> Result<u8, ErrorKind> {
        if self.fail_read_at == Some(self.pointer) {
            return Err(ErrorKind::Other);
        }
        let value = self.peek(self.pointer).unwrap_or(0);
        self.advance();
        Ok(value)
    }

    fn advance(&mut self) {
        if self.sequential() {
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

#[derive(Default)]
pub struct FakeBus {
    pub chips: Vec<FakeChip>,
    pub transactions: usize,
}

impl FakeBus {
    pub fn new(addresses: &[u8]) -> Self {
        Self {
            chips: addresses.iter().copied().map(FakeChip::new).collect(),
            transactions: 0,
        }
    }

    pub fn chip(&self, address: u8) -> &FakeChip {
        self.chips
            .iter()
            .find(|chip| chip.address == address)
            .expect("no chip at this address")
    }

    pub fn chip_mut(&mut self, address: u8) -> &mut FakeChip {
        self.chips
            .iter_mut()
            .find(|chip| chip.address == address)
            .expect("no chip at this address")
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        self.transactions += 1;
        let chip = self
            .chips
            .iter_mut()
            .find(|chip| chip.address == address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&pointer, data)) = bytes.split_first() else {
                        continue;
                    };
                    chip.pointer = pointer;
                    for &value in data {
                        chip.store(value);
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = chip.load()?;
                    }
                }
            }
        }
        Ok(())
    }
}
