#![no_std]
//! Driver for HD44780 character LCDs connected through a PCF8574 I/O expander ("I2C backpack"),
//! like the common 16x2 and 20x4 modules. It requires an I2C instance implementing
//! [`embedded_hal::i2c::I2c`] and an instance to delay execution with
//! [`embedded_hal::delay::DelayNs`]. Enable the `async` feature for the
//! [`embedded_hal_async`] flavour in `async_lcd`.
//!
//! The driver is split in two layers:
//! - [`transport::PulseTransport`] turns a command or data byte into the 4-bit pulse protocol,
//!   three expander writes per nibble.
//! - [`sync_lcd::Lcd`] mirrors the function-set and display-control registers and composes the
//!   controller commands.
//!
//! Usage:
//! ```ignore
//! // The bus must run at 100 kHz, see `BUS_FREQUENCY_HZ`.
//! let mut i2c = hal::I2c::new(/* ... */, lcd_hd44780_pcf8574::BUS_FREQUENCY_HZ);
//! let mut delay = hal::Delay::new();
//!
//! let mut lcd = lcd_hd44780_pcf8574::Lcd::new(&mut i2c, &mut delay)
//!     .with_address(0x27)
//!     .with_rows(2)
//!     .with_font(Font::Font5x8)
//!     .init()?;
//!
//! lcd.set_cursor(0, 1)?;
//! lcd.write_text("Hello")?;
//! ```

pub mod clock;
mod error;
pub mod state;
pub mod sync_lcd;
pub mod transport;

#[cfg(feature = "async")]
pub mod async_lcd;

#[cfg(test)]
mod test_support;

pub use error::Error;
pub use state::{CursorDirection, DisplayControl, Font, FunctionSet, Lines};
pub use sync_lcd::Lcd;

/// Address most PCF8574 backpacks ship with. PCF8574A boards usually answer on 0x3F.
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Clock rate the bus has to be configured with before it is handed to the driver.
pub const BUS_FREQUENCY_HZ: u32 = 100_000;

/// Backlight line of the expander.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backlight {
    Off = 0x00,
    On = 0x08,
}

/// Register select line, decides whether a byte is a command or character data.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Cmd = 0x00,
    Data = 0x01,
}

/// Controller instruction opcodes. Flags are OR'd into the low bits.
#[repr(u8)]
#[derive(Copy, Clone)]
enum Commands {
    Clear = 0x01,
    ReturnHome = 0x02,
    EntrySet = 0x04,
    DisplayControl = 0x08,
    CursorShift = 0x10,
    FunctionSet = 0x20,
    DDRAMAddr = 0x80,
}

/// Flags of the cursor/display shift instruction.
#[repr(u8)]
#[derive(Copy, Clone)]
enum Shift {
    CursorLeft = 0x00,
    CursorRight = 0x04,
    DisplayLeft = 0x08,
    DisplayRight = 0x08 | 0x04,
}

/// Datasheet execution time of clear and return home is 1.52 ms.
const LONG_COMMAND_DELAY_MS: u32 = 2;
