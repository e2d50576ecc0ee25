//! One-time bring-up: reset the chip and move it to Bank1 addressing

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};
use embedded_hal::i2c::I2c;

use crate::device::Mcp23017;
use crate::error::Error;
use crate::registers::{Bank, IoCon, Register};
use crate::Address;

/// Time the reset line is held low, then high, in milliseconds
pub const RESET_SETTLE_MS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BringUpState {
    Unreset,
    Resetting,
    /// Bank unknown to the host, but the chip answers IOCON on its Bank0 address
    BankUnknown,
    Bank1Active,
}

struct BringUp {
    address: Address,
    state: BringUpState,
}

impl BringUp {
    fn new(address: Address) -> Self {
        Self {
            address,
            state: BringUpState::Unreset,
        }
    }

    fn enter(&mut self, next: BringUpState) {
        log::debug!(
            "MCP23017 0x{:02X}: {:?} -> {:?}",
            self.address.value(),
            self.state,
            next
        );
        self.state = next;
    }

    /// Pulse the active-low reset line and leave it idle-high
    fn reset<RST, D>(&mut self, reset: &mut RST, delay: &mut D) -> Result<(), ErrorKind>
    where
        RST: OutputPin,
        D: DelayNs,
    {
        self.enter(BringUpState::Resetting);
        reset.set_low().map_err(|e| e.kind())?;
        delay.delay_ms(RESET_SETTLE_MS);
        reset.set_high().map_err(|e| e.kind())?;
        delay.delay_ms(RESET_SETTLE_MS);
        self.enter(BringUpState::BankUnknown);
        Ok(())
    }

    /// Set IOCON.BANK and IOCON.SEQOP, then check the chip took it
    fn select_bank1<I2C, E>(&mut self, device: &mut Mcp23017<I2C>) -> Result<(), Error<E>>
    where
        I2C: I2c<Error = E>,
    {
        if self.state == BringUpState::Unreset {
            self.enter(BringUpState::BankUnknown);
        }

        // The switching write still goes to the Bank0 address
        let iocon_address = Register::IoCon.address(Bank::Bank0);
        let mut iocon = IoCon::from(device.read_register(iocon_address)?);
        iocon.set_bank(true);
        iocon.set_seqop(true);
        device.write_register(iocon_address, u8::from(iocon))?;
        device.set_bank(Bank::Bank1);

        let readback = IoCon::from(device.read(Register::IoCon)?);
        if readback.bank_mode() != Bank::Bank1 || !readback.seqop() {
            log::error!(
                "MCP23017 0x{:02X}: IOCON reads 0x{:02X} after bank switch",
                self.address.value(),
                u8::from(readback)
            );
            return Err(Error::BankMismatch(readback.into()));
        }

        self.enter(BringUpState::Bank1Active);
        Ok(())
    }
}

impl<I2C, E> Mcp23017<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Create a new MCP23017 instance without a reset line
    ///
    /// The chip must be in its power-on state (Bank0). On error the handle is
    /// dropped: the chip may be left half configured, and an owned `i2c` is
    /// dropped with it. Pass `&mut bus` or a shared bus device to keep the bus.
    ///
    /// # Arguments
    /// * `i2c` - I2C bus, usually a shared bus device
    /// * `address` - I2C address of the MCP23017 (0x20-0x27)
    pub fn new(i2c: I2C, address: Address) -> Result<Self, Error<E>> {
        let mut device = Self::unconfigured(i2c, address);
        BringUp::new(address).select_bank1(&mut device)?;
        Ok(device)
    }

    /// Create a new MCP23017 instance, pulsing its `/RESET` line first
    ///
    /// Blocks for 2 x [`RESET_SETTLE_MS`]. A reset line failure aborts before
    /// any bus traffic. As with [`new`](Self::new), `i2c` is lost on error.
    pub fn new_with_reset<RST, D>(
        i2c: I2C,
        address: Address,
        reset: &mut RST,
        delay: &mut D,
    ) -> Result<Self, Error<E>>
    where
        RST: OutputPin,
        D: DelayNs,
    {
        let mut bring_up = BringUp::new(address);
        bring_up.reset(reset, delay).map_err(Error::Reset)?;

        let mut device = Self::unconfigured(i2c, address);
        bring_up.select_bank1(&mut device)?;
        Ok(device)
    }
}
