//! 4-bit pulse protocol over the PCF8574 expander.
//!
//! Expander pin mapping, as found on the usual backpacks:
//!
//! | P7..P4 | P3        | P2 | P1 | P0 |
//! |--------|-----------|----|----|----|
//! | D7..D4 | backlight | EN | RW | RS |
//!
//! RW is never driven high, the display is write-only from the driver's point of view.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::state::{four_bit_nibble, reset_nibble};
use crate::{Backlight, Mode};

const ENABLE: u8 = 0x04;

/// Hold time between the rising and falling enable edge.
pub const SETTLE_DELAY_US: u32 = 600;

const POWER_ON_DELAY_MS: u32 = 80;
const RESET_PULSE_DELAY_MS: u32 = 5;

/// Byte put on the expander for one nibble with the enable line low.
pub(crate) fn expander_byte(nibble: u8, mode: Mode, backlight: Backlight) -> u8 {
    (nibble & 0xf0) | mode as u8 | backlight as u8
}

/// Low layer of the driver, owns the device address and borrows the bus and delay.
pub struct PulseTransport<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    i2c: &'a mut I,
    delay: &'a mut D,
    address: u8,
    backlight: Backlight,
}

impl<'a, I, D> PulseTransport<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// `address` is the 7-bit address, the HAL adds the direction bit.
    pub fn new(i2c: &'a mut I, delay: &'a mut D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: Backlight::On,
        }
    }

    pub(crate) fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub(crate) fn with_backlight(mut self, backlight: Backlight) -> Self {
        self.backlight = backlight;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Address byte of a read transfer, for buses that take it pre-shifted.
    pub fn read_address(&self) -> u8 {
        (self.address << 1) | 1
    }

    /// Address byte of a write transfer, for buses that take it pre-shifted.
    pub fn write_address(&self) -> u8 {
        self.address << 1
    }

    pub fn backlight(&self) -> Backlight {
        self.backlight
    }

    /// Changes the backlight line used by every following pulse and latches it right away.
    pub fn set_backlight(&mut self, backlight: Backlight) -> Result<(), I::Error> {
        self.backlight = backlight;
        self.i2c.write(self.address, &[backlight as u8])
    }

    /// Forces the controller into 4-bit mode whatever state it was left in.
    ///
    /// Three 8-bit function sets, then the switch to 4 bits, see figure 24 of the [datasheet].
    ///
    /// [datasheet]: https://www.sparkfun.com/datasheets/LCD/HD44780.pdf
    pub fn initialize(&mut self) -> Result<(), I::Error> {
        // Initial delay to wait for init after power on.
        self.delay.delay_ms(POWER_ON_DELAY_MS);

        for _ in 0..3 {
            self.pulse(reset_nibble(), Mode::Cmd)?;
            self.delay.delay_ms(RESET_PULSE_DELAY_MS);
        }
        self.pulse(four_bit_nibble(), Mode::Cmd)
    }

    /// Sends `value` as two nibbles, high nibble first.
    pub fn send_byte(&mut self, value: u8, mode: Mode) -> Result<(), I::Error> {
        let high_bits: u8 = value & 0xf0;
        let low_bits: u8 = (value << 4) & 0xf0;
        self.pulse(high_bits, mode)?;
        self.pulse(low_bits, mode)
    }

    /// Clocks the upper 4 bits of `nibble` into the controller.
    pub fn pulse(&mut self, nibble: u8, mode: Mode) -> Result<(), I::Error> {
        let data = expander_byte(nibble, mode, self.backlight);
        self.i2c.write(self.address, &[data])?;
        self.i2c.write(self.address, &[data | ENABLE])?;
        self.delay.delay_us(SETTLE_DELAY_US);
        self.i2c.write(self.address, &[data])
    }

    /// Raw write to the expander.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), I::Error> {
        self.i2c.write(self.address, bytes)
    }

    /// Raw read of the expander port.
    pub fn read_raw(&mut self, buffer: &mut [u8]) -> Result<(), I::Error> {
        self.i2c.read(self.address, buffer)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(feature = "async")]
pub use self::nonblocking::AsyncPulseTransport;

#[cfg(feature = "async")]
mod nonblocking {
    use embedded_hal_async::{delay::DelayNs, i2c::I2c};

    use super::{expander_byte, ENABLE, POWER_ON_DELAY_MS, RESET_PULSE_DELAY_MS, SETTLE_DELAY_US};
    use crate::state::{four_bit_nibble, reset_nibble};
    use crate::{Backlight, Mode};

    /// Async flavour of [`PulseTransport`](super::PulseTransport).
    pub struct AsyncPulseTransport<'a, I, D>
    where
        I: I2c,
        D: DelayNs,
    {
        i2c: &'a mut I,
        delay: &'a mut D,
        address: u8,
        backlight: Backlight,
    }

    impl<'a, I, D> AsyncPulseTransport<'a, I, D>
    where
        I: I2c,
        D: DelayNs,
    {
        pub fn new(i2c: &'a mut I, delay: &'a mut D, address: u8) -> Self {
            Self {
                i2c,
                delay,
                address,
                backlight: Backlight::On,
            }
        }

        pub(crate) fn with_address(mut self, address: u8) -> Self {
            self.address = address;
            self
        }

        pub(crate) fn with_backlight(mut self, backlight: Backlight) -> Self {
            self.backlight = backlight;
            self
        }

        pub fn address(&self) -> u8 {
            self.address
        }

        pub fn backlight(&self) -> Backlight {
            self.backlight
        }

        pub async fn set_backlight(&mut self, backlight: Backlight) -> Result<(), I::Error> {
            self.backlight = backlight;
            self.i2c.write(self.address, &[backlight as u8]).await
        }

        pub async fn initialize(&mut self) -> Result<(), I::Error> {
            self.delay.delay_ms(POWER_ON_DELAY_MS).await;

            for _ in 0..3 {
                self.pulse(reset_nibble(), Mode::Cmd).await?;
                self.delay.delay_ms(RESET_PULSE_DELAY_MS).await;
            }
            self.pulse(four_bit_nibble(), Mode::Cmd).await
        }

        pub async fn send_byte(&mut self, value: u8, mode: Mode) -> Result<(), I::Error> {
            let high_bits: u8 = value & 0xf0;
            let low_bits: u8 = (value << 4) & 0xf0;
            self.pulse(high_bits, mode).await?;
            self.pulse(low_bits, mode).await
        }

        pub async fn pulse(&mut self, nibble: u8, mode: Mode) -> Result<(), I::Error> {
            let data = expander_byte(nibble, mode, self.backlight);
            self.i2c.write(self.address, &[data]).await?;
            self.i2c.write(self.address, &[data | ENABLE]).await?;
            self.delay.delay_us(SETTLE_DELAY_US).await;
            self.i2c.write(self.address, &[data]).await
        }

        pub async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), I::Error> {
            self.i2c.write(self.address, bytes).await
        }

        pub async fn read_raw(&mut self, buffer: &mut [u8]) -> Result<(), I::Error> {
            self.i2c.read(self.address, buffer).await
        }

        pub async fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms).await;
        }
    }
}
