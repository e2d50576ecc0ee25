//! MCP23017 register map
//!
//! The chip exposes the same 22 registers through two address layouts,
//! selected by `IOCON.BANK`:
//!
//! * [`Bank::Bank0`] interleaves port A and port B registers in pairs
//!   (`IODIRA = 0x00`, `IODIRB = 0x01`, ...). This is the layout after reset.
//! * [`Bank::Bank1`] places all port A registers at `0x00..=0x0A` and all
//!   port B registers at `0x10..=0x1A`, leaving `0x0B..=0x0F` unused.
//!
//! `IOCON` is reachable at two addresses in both layouts, so it is a single
//! logical [`Register`].

use core::fmt;
use core::str::FromStr;

use bitfield::bitfield;

/// Register addressing mode of the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Port A/B registers interleaved (reset default)
    Bank0,
    /// Port A block at 0x00, port B block at 0x10
    Bank1,
}

/// One of the two 8-bit GPIO ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    A,
    B,
}

/// Logical register, independent of the active [`Bank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// I/O direction: 1 = input, 0 = output
    IoDirA,
    IoDirB,
    /// Input polarity: 1 = GPIO reads the inverted pin level
    IPolA,
    IPolB,
    /// Interrupt-on-change enable
    GpIntEnA,
    GpIntEnB,
    /// Compare value for interrupt-on-change
    DefValA,
    DefValB,
    /// Interrupt-on-change control
    IntConA,
    IntConB,
    /// Chip configuration, see [`IoCon`]
    IoCon,
    /// Weak 100k pull-ups
    GpPuA,
    GpPuB,
    /// Interrupt flags
    IntFA,
    IntFB,
    /// Interrupt captured port value
    IntCapA,
    IntCapB,
    /// Port value (reads reflect the pins)
    GpioA,
    GpioB,
    /// Output latches
    OLatA,
    OLatB,
}

/// Returned when a register name is not part of the register map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownRegisterName;

impl fmt::Display for UnknownRegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown register name")
    }
}

const BANK0_LAYOUT: [Option<Register>; 22] = [
    Some(Register::IoDirA),
    Some(Register::IoDirB),
    Some(Register::IPolA),
    Some(Register::IPolB),
    Some(Register::GpIntEnA),
    Some(Register::GpIntEnB),
    Some(Register::DefValA),
    Some(Register::DefValB),
    Some(Register::IntConA),
    Some(Register::IntConB),
    Some(Register::IoCon),
    Some(Register::IoCon),
    Some(Register::GpPuA),
    Some(Register::GpPuB),
    Some(Register::IntFA),
    Some(Register::IntFB),
    Some(Register::IntCapA),
    Some(Register::IntCapB),
    Some(Register::GpioA),
    Some(Register::GpioB),
    Some(Register::OLatA),
    Some(Register::OLatB),
];

const BANK1_LAYOUT: [Option<Register>; 27] = [
    Some(Register::IoDirA),
    Some(Register::IPolA),
    Some(Register::GpIntEnA),
    Some(Register::DefValA),
    Some(Register::IntConA),
    Some(Register::IoCon),
    Some(Register::GpPuA),
    Some(Register::IntFA),
    Some(Register::IntCapA),
    Some(Register::GpioA),
    Some(Register::OLatA),
    None,
    None,
    None,
    None,
    None,
    Some(Register::IoDirB),
    Some(Register::IPolB),
    Some(Register::GpIntEnB),
    Some(Register::DefValB),
    Some(Register::IntConB),
    Some(Register::IoCon),
    Some(Register::GpPuB),
    Some(Register::IntFB),
    Some(Register::IntCapB),
    Some(Register::GpioB),
    Some(Register::OLatB),
];

impl Bank {
    /// Address-ordered layout of the bank. `None` marks unused addresses.
    pub fn layout(self) -> &'static [Option<Register>] {
        match self {
            Bank::Bank0 => &BANK0_LAYOUT,
            Bank::Bank1 => &BANK1_LAYOUT,
        }
    }

    /// Address of `OLATB`, the highest register bit operations may target
    pub const fn last_output_latch(self) -> u8 {
        Register::OLatB.address(self)
    }
}

impl Port {
    /// Map a raw `GPIOx` register address of `bank` to its port
    pub fn from_gpio_address(address: u8, bank: Bank) -> Option<Port> {
        match Register::at(address, bank)? {
            Register::GpioA => Some(Port::A),
            Register::GpioB => Some(Port::B),
            _ => None,
        }
    }
}

impl Register {
    /// Every logical register, in Bank0 address order
    pub const ALL: [Register; 21] = [
        Register::IoDirA,
        Register::IoDirB,
        Register::IPolA,
        Register::IPolB,
        Register::GpIntEnA,
        Register::GpIntEnB,
        Register::DefValA,
        Register::DefValB,
        Register::IntConA,
        Register::IntConB,
        Register::IoCon,
        Register::GpPuA,
        Register::GpPuB,
        Register::IntFA,
        Register::IntFB,
        Register::IntCapA,
        Register::IntCapB,
        Register::GpioA,
        Register::GpioB,
        Register::OLatA,
        Register::OLatB,
    ];

    /// Byte address of the register in `bank`
    ///
    /// `IOCON` resolves to its port A alias (0x0A in Bank0, 0x05 in Bank1).
    pub const fn address(self, bank: Bank) -> u8 {
        let (bank0, bank1) = match self {
            Register::IoDirA => (0x00, 0x00),
            Register::IoDirB => (0x01, 0x10),
            Register::IPolA => (0x02, 0x01),
            Register::IPolB => (0x03, 0x11),
            Register::GpIntEnA => (0x04, 0x02),
            Register::GpIntEnB => (0x05, 0x12),
            Register::DefValA => (0x06, 0x03),
            Register::DefValB => (0x07, 0x13),
            Register::IntConA => (0x08, 0x04),
            Register::IntConB => (0x09, 0x14),
            Register::IoCon => (0x0A, 0x05),
            Register::GpPuA => (0x0C, 0x06),
            Register::GpPuB => (0x0D, 0x16),
            Register::IntFA => (0x0E, 0x07),
            Register::IntFB => (0x0F, 0x17),
            Register::IntCapA => (0x10, 0x08),
            Register::IntCapB => (0x11, 0x18),
            Register::GpioA => (0x12, 0x09),
            Register::GpioB => (0x13, 0x19),
            Register::OLatA => (0x14, 0x0A),
            Register::OLatB => (0x15, 0x1A),
        };
        match bank {
            Bank::Bank0 => bank0,
            Bank::Bank1 => bank1,
        }
    }

    /// Register found at `address` in `bank`, if any
    pub fn at(address: u8, bank: Bank) -> Option<Register> {
        bank.layout().get(usize::from(address)).copied().flatten()
    }

    /// Look a register up by its datasheet name (`"GPIOB"`, `"iodira"`)
    pub fn lookup(name: &str) -> Option<Register> {
        name.parse().ok()
    }

    /// Datasheet name
    pub const fn name(self) -> &'static str {
        match self {
            Register::IoDirA => "IODIRA",
            Register::IoDirB => "IODIRB",
            Register::IPolA => "IPOLA",
            Register::IPolB => "IPOLB",
            Register::GpIntEnA => "GPINTENA",
            Register::GpIntEnB => "GPINTENB",
            Register::DefValA => "DEFVALA",
            Register::DefValB => "DEFVALB",
            Register::IntConA => "INTCONA",
            Register::IntConB => "INTCONB",
            Register::IoCon => "IOCON",
            Register::GpPuA => "GPPUA",
            Register::GpPuB => "GPPUB",
            Register::IntFA => "INTFA",
            Register::IntFB => "INTFB",
            Register::IntCapA => "INTCAPA",
            Register::IntCapB => "INTCAPB",
            Register::GpioA => "GPIOA",
            Register::GpioB => "GPIOB",
            Register::OLatA => "OLATA",
            Register::OLatB => "OLATB",
        }
    }

    pub const fn direction(port: Port) -> Register {
        match port {
            Port::A => Register::IoDirA,
            Port::B => Register::IoDirB,
        }
    }

    pub const fn polarity(port: Port) -> Register {
        match port {
            Port::A => Register::IPolA,
            Port::B => Register::IPolB,
        }
    }

    pub const fn pull_up(port: Port) -> Register {
        match port {
            Port::A => Register::GpPuA,
            Port::B => Register::GpPuB,
        }
    }

    pub const fn gpio(port: Port) -> Register {
        match port {
            Port::A => Register::GpioA,
            Port::B => Register::GpioB,
        }
    }

    pub const fn output_latch(port: Port) -> Register {
        match port {
            Port::A => Register::OLatA,
            Port::B => Register::OLatB,
        }
    }
}

impl FromStr for Register {
    type Err = UnknownRegisterName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        // Longest name is GPINTENA / GPINTENB
        let mut upper = [0u8; 8];
        let name = name.as_bytes();
        if name.len() > upper.len() {
            return Err(UnknownRegisterName);
        }
        for (dst, src) in upper.iter_mut().zip(name) {
            *dst = src.to_ascii_uppercase();
        }

        match &upper[..name.len()] {
            b"IODIRA" => Ok(Register::IoDirA),
            b"IODIRB" => Ok(Register::IoDirB),
            b"IPOLA" => Ok(Register::IPolA),
            b"IPOLB" => Ok(Register::IPolB),
            b"GPINTENA" => Ok(Register::GpIntEnA),
            b"GPINTENB" => Ok(Register::GpIntEnB),
            b"DEFVALA" => Ok(Register::DefValA),
            b"DEFVALB" => Ok(Register::DefValB),
            b"INTCONA" => Ok(Register::IntConA),
            b"INTCONB" => Ok(Register::IntConB),
            b"IOCON" => Ok(Register::IoCon),
            b"GPPUA" => Ok(Register::GpPuA),
            b"GPPUB" => Ok(Register::GpPuB),
            b"INTFA" => Ok(Register::IntFA),
            b"INTFB" => Ok(Register::IntFB),
            b"INTCAPA" => Ok(Register::IntCapA),
            b"INTCAPB" => Ok(Register::IntCapB),
            b"GPIOA" => Ok(Register::GpioA),
            b"GPIOB" => Ok(Register::GpioB),
            b"OLATA" => Ok(Register::OLatA),
            b"OLATB" => Ok(Register::OLatB),
            _ => Err(UnknownRegisterName),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitfield! {
    /// IOCON configuration register
    ///
    /// `BANK | MIRROR | SEQOP | DISSLW | HAEN | ODR | INTPOL | -`
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct IoCon(u8);
    impl Debug;

    /// Interrupt pins active-high
    pub intpol, set_intpol: 1;
    /// Interrupt pins open-drain
    pub odr, set_odr: 2;
    /// Hardware address enable (MCP23S17 only)
    pub haen, set_haen: 3;
    /// SDA slew rate control disabled
    pub disslw, set_disslw: 4;
    /// Address pointer does not increment
    pub seqop, set_seqop: 5;
    /// INTA and INTB are internally connected
    pub mirror, set_mirror: 6;
    /// Bank1 addressing
    pub bank, set_bank: 7;
}

impl From<u8> for IoCon {
    fn from(value: u8) -> Self {
        IoCon(value)
    }
}

impl From<IoCon> for u8 {
    fn from(iocon: IoCon) -> u8 {
        iocon.0
    }
}

impl IoCon {
    /// Addressing mode selected by this value
    pub fn bank_mode(&self) -> Bank {
        if self.bank() {
            Bank::Bank1
        } else {
            Bank::Bank0
        }
    }
}
