use core::ops::{BitOr, BitOrAssign};

use bitfield::bitfield;

bitfield! {
    /// Pin mask within a single 8-bit port
    ///
    /// Bit `n` selects pin `n` of the port. A mask never spans both ports:
    /// every operation taking a `Pins` is scoped to one port register.
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Pins(u8);
    impl Debug;

    pub p0, set_p0: 0;
    pub p1, set_p1: 1;
    pub p2, set_p2: 2;
    pub p3, set_p3: 3;
    pub p4, set_p4: 4;
    pub p5, set_p5: 5;
    pub p6, set_p6: 6;
    pub p7, set_p7: 7;
}

pub const PIN0: Pins = Pins(0x01);
pub const PIN1: Pins = Pins(0x02);
pub const PIN2: Pins = Pins(0x04);
pub const PIN3: Pins = Pins(0x08);
pub const PIN4: Pins = Pins(0x10);
pub const PIN5: Pins = Pins(0x20);
pub const PIN6: Pins = Pins(0x40);
pub const PIN7: Pins = Pins(0x80);

impl Pins {
    pub const NONE: Pins = Pins(0x00);
    pub const ALL: Pins = Pins(0xFF);

    /// Mask selecting only `pin`, or `None` if `pin` is not 0-7
    pub fn pin(pin: u8) -> Option<Self> {
        if pin < 8 {
            Some(Pins(1 << pin))
        } else {
            None
        }
    }

    pub fn from_u8(value: u8) -> Self {
        Pins(value)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// `value` with the masked bits cleared
    pub fn clear_in(&self, value: u8) -> u8 {
        value & !self.0
    }

    /// `value` with the masked bits set
    pub fn set_in(&self, value: u8) -> u8 {
        value | self.0
    }
}

impl Default for Pins {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<u8> for Pins {
    fn from(value: u8) -> Self {
        Pins(value)
    }
}

impl From<Pins> for u8 {
    fn from(pins: Pins) -> u8 {
        pins.0
    }
}

impl BitOr for Pins {
    type Output = Pins;

    fn bitor(self, rhs: Pins) -> Pins {
        Pins(self.0 | rhs.0)
    }
}

impl BitOrAssign for Pins {
    fn bitor_assign(&mut self, rhs: Pins) {
        self.0 |= rhs.0;
    }
}
