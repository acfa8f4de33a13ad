use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use ufmt_write::uWrite;

use crate::state::{char_code, entry_mode_command, set_ddram_command};
use crate::transport::PulseTransport;
use crate::{
    Backlight, Commands, CursorDirection, DisplayControl, Error, Font, FunctionSet, Mode, Shift,
    DEFAULT_ADDRESS, LONG_COMMAND_DELAY_MS,
};

/// API to write to the LCD.
///
/// The function-set and display-control registers are mirrored in memory. Toggles update the
/// mirror before the command goes out, so after a transport error the mirror holds the wanted
/// state and the display the last one that made it. Call [`Lcd::send_display_control`] to
/// resynchronize.
pub struct Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    transport: PulseTransport<'a, I, D>,
    function_set: FunctionSet,
    display_control: DisplayControl,
}

impl<'a, I, D> Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Create new instance with only the I2C and delay instance.
    ///
    /// Defaults to [`DEFAULT_ADDRESS`], two rows, 5x8 font, display on, cursor and blink off.
    pub fn new(i2c: &'a mut I, delay: &'a mut D) -> Self {
        Self {
            transport: PulseTransport::new(i2c, delay, DEFAULT_ADDRESS),
            function_set: FunctionSet::default(),
            display_control: DisplayControl::default(),
        }
    }

    /// Number of rows of the module, anything above one selects two-line mode.
    pub fn with_rows(mut self, rows: u8) -> Self {
        self.function_set = FunctionSet::new(rows, self.function_set.font);
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.function_set.font = font;
        self
    }

    /// Set the 7-bit I2C address of the expander.
    pub fn with_address(mut self, address: u8) -> Self {
        self.transport = self.transport.with_address(address);
        self
    }

    pub fn with_cursor_on(mut self, on: bool) -> Self {
        self.display_control.cursor_on = on;
        self
    }

    pub fn with_cursor_blink(mut self, blink: bool) -> Self {
        self.display_control.blink_on = blink;
        self
    }

    /// Backlight level used from the first pulse on. Nothing is written until [`Lcd::init`].
    pub fn with_backlight(mut self, backlight: Backlight) -> Self {
        self.transport = self.transport.with_backlight(backlight);
        self
    }

    /// Initializes the hardware.
    ///
    /// Reset sequence, then function set, display control and clear, in the order the
    /// [datasheet] initialization flow asks for.
    ///
    /// [datasheet]: https://www.sparkfun.com/datasheets/LCD/HD44780.pdf
    pub fn init(mut self) -> Result<Self, Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "lcd: init at {=u8:#x}, {}, {}",
            self.transport.address(),
            self.function_set,
            self.display_control
        );

        self.transport.initialize()?;
        self.send_function_set()?;
        self.send_display_control()?;
        self.clear()?;
        Ok(self)
    }

    fn command(&mut self, data: u8) -> Result<(), Error<I::Error>> {
        self.transport.send_byte(data, Mode::Cmd).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("lcd: command {=u8:#x} failed", data);
            Error::Transport(e)
        })
    }

    fn data(&mut self, byte: u8) -> Result<(), Error<I::Error>> {
        self.transport.send_byte(byte, Mode::Data).map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("lcd: data {=u8:#x} failed", byte);
            Error::Transport(e)
        })
    }

    /// Mirrored function-set register.
    pub fn function_set(&self) -> FunctionSet {
        self.function_set
    }

    /// Mirrored display-control register.
    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn backlight_state(&self) -> Backlight {
        self.transport.backlight()
    }

    /// Sends the mirrored function-set register.
    pub fn send_function_set(&mut self) -> Result<(), Error<I::Error>> {
        self.command(self.function_set.command())
    }

    /// Sends the mirrored display-control register.
    pub fn send_display_control(&mut self) -> Result<(), Error<I::Error>> {
        self.command(self.display_control.command())
    }

    /// Write string to display, starting at the cursor.
    ///
    /// Characters already sent stay on the display when a later one fails.
    pub fn write_text(&mut self, text: &str) -> Result<(), Error<I::Error>> {
        for c in text.chars() {
            self.data(char_code(c))?;
        }
        Ok(())
    }

    /// Write raw character codes, e.g. 0xDF for the degree sign of the A00 ROM.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error<I::Error>> {
        for &byte in bytes {
            self.data(byte)?;
        }
        Ok(())
    }

    /// Set the cursor to (col, row). Coordinates are zero-based, rows go up to 3.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error<I::Error>> {
        let command = set_ddram_command(col, row).ok_or(Error::InvalidRow(row))?;
        self.command(command)
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::Clear as u8)?;
        self.transport.delay_ms(LONG_COMMAND_DELAY_MS);
        Ok(())
    }

    /// Return cursor to upper left corner, i.e. (0,0).
    pub fn return_home(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::ReturnHome as u8)?;
        self.transport.delay_ms(LONG_COMMAND_DELAY_MS);
        Ok(())
    }

    pub fn set_display(&mut self, on: bool) -> Result<(), Error<I::Error>> {
        self.display_control.display_on = on;
        self.send_display_control()
    }

    // Set the cursor visibility
    pub fn set_cursor_visible(&mut self, on: bool) -> Result<(), Error<I::Error>> {
        self.display_control.cursor_on = on;
        self.send_display_control()
    }

    // Set if the cursor is blinking
    pub fn set_blink(&mut self, blink: bool) -> Result<(), Error<I::Error>> {
        self.display_control.blink_on = blink;
        self.send_display_control()
    }

    pub fn set_backlight(&mut self, backlight: Backlight) -> Result<(), Error<I::Error>> {
        Ok(self.transport.set_backlight(backlight)?)
    }

    /// Direction the cursor moves after each character, and whether the display shifts along.
    pub fn set_entry_mode(
        &mut self,
        direction: CursorDirection,
        shift: bool,
    ) -> Result<(), Error<I::Error>> {
        self.command(entry_mode_command(direction, shift))
    }

    /// Scrolls the display one char to the left
    pub fn scroll_display_left(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::DisplayLeft as u8)
    }

    /// Scrolls the display one char to the right
    pub fn scroll_display_right(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::DisplayRight as u8)
    }

    /// Moves the cursor one char to the left
    pub fn move_cursor_left(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::CursorLeft as u8)
    }

    /// Moves the cursor one char to the right
    pub fn move_cursor_right(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::CursorRight as u8)
    }
}

impl<'a, I, D> uWrite for Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = Error<I::Error>;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_text(s)
    }
}

impl<'a, I, D> fmt::Write for Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s).map_err(|_| fmt::Error)
    }
}
