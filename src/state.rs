//! Mirrored controller registers.
//!
//! The controller cannot be read back through the backpack, so the driver keeps its own copy of
//! the function-set and display-control registers. The structs are turned into wire bits only
//! when a command is composed.

use crate::Commands;

/// Start of each row in DDRAM, valid for 16x2, 20x2 and 20x4 modules.
pub const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

const EIGHT_BIT_MODE: u8 = 0x10;

const DISPLAY_ON: u8 = 0x04;
const CURSOR_ON: u8 = 0x02;
const BLINK_ON: u8 = 0x01;

const ENTRY_SHIFT: u8 = 0x01;

/// Number of display lines the controller is driven with.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lines {
    One = 0x00,
    Two = 0x08,
}

impl Lines {
    /// Anything taller than one row is driven in two-line mode, 4-row modules included.
    pub fn from_rows(rows: u8) -> Self {
        if rows > 1 {
            Lines::Two
        } else {
            Lines::One
        }
    }
}

/// Dot matrix of a character cell.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    Font5x8 = 0x00,
    Font5x10 = 0x04,
}

impl Font {
    /// Zero selects 5x8 dots, any other value 5x10.
    pub fn from_dot_size(dot_size: u8) -> Self {
        if dot_size > 0 {
            Font::Font5x10
        } else {
            Font::Font5x8
        }
    }
}

/// Direction the address counter moves after a character is written.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CursorDirection {
    Left = 0x00,
    Right = 0x02,
}

/// Function-set register. The interface is always 4 bits wide behind the expander.
///
/// Fixed once the display is initialized: most controllers ignore a later function set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FunctionSet {
    pub lines: Lines,
    pub font: Font,
}

impl FunctionSet {
    pub fn new(rows: u8, font: Font) -> Self {
        Self {
            lines: Lines::from_rows(rows),
            font,
        }
    }

    /// Register bits without the opcode.
    pub fn bits(&self) -> u8 {
        self.lines as u8 | self.font as u8
    }

    pub(crate) fn command(&self) -> u8 {
        Commands::FunctionSet as u8 | self.bits()
    }
}

impl Default for FunctionSet {
    fn default() -> Self {
        Self::new(2, Font::Font5x8)
    }
}

/// Display-control register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayControl {
    pub display_on: bool,
    pub cursor_on: bool,
    pub blink_on: bool,
}

impl DisplayControl {
    /// Register bits without the opcode.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.display_on {
            bits |= DISPLAY_ON;
        }
        if self.cursor_on {
            bits |= CURSOR_ON;
        }
        if self.blink_on {
            bits |= BLINK_ON;
        }
        bits
    }

    pub(crate) fn command(&self) -> u8 {
        Commands::DisplayControl as u8 | self.bits()
    }
}

impl Default for DisplayControl {
    /// Display on, cursor and blink off.
    fn default() -> Self {
        Self {
            display_on: true,
            cursor_on: false,
            blink_on: false,
        }
    }
}

/// Nibble of the 8-bit function set sent three times during the reset sequence.
pub(crate) const fn reset_nibble() -> u8 {
    Commands::FunctionSet as u8 | EIGHT_BIT_MODE
}

/// Nibble switching the controller to the 4-bit interface.
pub(crate) const fn four_bit_nibble() -> u8 {
    Commands::FunctionSet as u8
}

/// Set DDRAM address command for `(col, row)`. Columns are not checked, an oversized column
/// lands wherever the controller maps it.
pub(crate) fn set_ddram_command(col: u8, row: u8) -> Option<u8> {
    let offset = ROW_OFFSETS.get(usize::from(row))?;
    Some(Commands::DDRAMAddr as u8 | col.wrapping_add(*offset))
}

pub(crate) fn entry_mode_command(direction: CursorDirection, shift: bool) -> u8 {
    let shift = if shift { ENTRY_SHIFT } else { 0x00 };
    Commands::EntrySet as u8 | direction as u8 | shift
}

/// Character code for `c`. Code points up to U+00FF go out as their byte value, so the upper
/// half of the ROM (katakana, 0xDF degree sign on A00 parts) stays reachable. Anything wider
/// becomes `?`.
pub(crate) fn char_code(c: char) -> u8 {
    u8::try_from(c).unwrap_or(b'?')
}
