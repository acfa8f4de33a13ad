use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use crate::state::{char_code, entry_mode_command, set_ddram_command};
use crate::transport::AsyncPulseTransport;
use crate::{
    Backlight, Commands, CursorDirection, DisplayControl, Error, Font, FunctionSet, Mode, Shift,
    DEFAULT_ADDRESS, LONG_COMMAND_DELAY_MS,
};

/// API to write to the LCD, async flavour of [`crate::sync_lcd::Lcd`].
pub struct Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    transport: AsyncPulseTransport<'a, I, D>,
    function_set: FunctionSet,
    display_control: DisplayControl,
}

impl<'a, I, D> Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Create new instance with only the I2C and delay instance.
    pub fn new(i2c: &'a mut I, delay: &'a mut D) -> Self {
        Self {
            transport: AsyncPulseTransport::new(i2c, delay, DEFAULT_ADDRESS),
            function_set: FunctionSet::default(),
            display_control: DisplayControl::default(),
        }
    }

    pub fn with_rows(mut self, rows: u8) -> Self {
        self.function_set = FunctionSet::new(rows, self.function_set.font);
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.function_set.font = font;
        self
    }

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

    pub fn with_backlight(mut self, backlight: Backlight) -> Self {
        self.transport = self.transport.with_backlight(backlight);
        self
    }

    /// Initializes the hardware, same sequence as the blocking driver.
    pub async fn init(mut self) -> Result<Self, Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "lcd: init at {=u8:#x}, {}, {}",
            self.transport.address(),
            self.function_set,
            self.display_control
        );

        self.transport.initialize().await?;
        self.send_function_set().await?;
        self.send_display_control().await?;
        self.clear().await?;
        Ok(self)
    }

    async fn command(&mut self, data: u8) -> Result<(), Error<I::Error>> {
        self.transport.send_byte(data, Mode::Cmd).await.map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("lcd: command {=u8:#x} failed", data);
            Error::Transport(e)
        })
    }

    async fn data(&mut self, byte: u8) -> Result<(), Error<I::Error>> {
        self.transport.send_byte(byte, Mode::Data).await.map_err(|e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("lcd: data {=u8:#x} failed", byte);
            Error::Transport(e)
        })
    }

    pub fn function_set(&self) -> FunctionSet {
        self.function_set
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn backlight_state(&self) -> Backlight {
        self.transport.backlight()
    }

    pub async fn send_function_set(&mut self) -> Result<(), Error<I::Error>> {
        let command = self.function_set.command();
        self.command(command).await
    }

    pub async fn send_display_control(&mut self) -> Result<(), Error<I::Error>> {
        let command = self.display_control.command();
        self.command(command).await
    }

    /// Write string to display.
    pub async fn write_text(&mut self, text: &str) -> Result<(), Error<I::Error>> {
        for c in text.chars() {
            self.data(char_code(c)).await?;
        }
        Ok(())
    }

    /// Write raw character codes.
    pub async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error<I::Error>> {
        for &byte in bytes {
            self.data(byte).await?;
        }
        Ok(())
    }

    /// Set the cursor to (col, row). Coordinates are zero-based.
    pub async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error<I::Error>> {
        let command = set_ddram_command(col, row).ok_or(Error::InvalidRow(row))?;
        self.command(command).await
    }

    /// Clear the display
    pub async fn clear(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::Clear as u8).await?;
        self.transport.delay_ms(LONG_COMMAND_DELAY_MS).await;
        Ok(())
    }

    /// Return cursor to upper left corner, i.e. (0,0).
    pub async fn return_home(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::ReturnHome as u8).await?;
        self.transport.delay_ms(LONG_COMMAND_DELAY_MS).await;
        Ok(())
    }

    pub async fn set_display(&mut self, on: bool) -> Result<(), Error<I::Error>> {
        self.display_control.display_on = on;
        self.send_display_control().await
    }

    pub async fn set_cursor_visible(&mut self, on: bool) -> Result<(), Error<I::Error>> {
        self.display_control.cursor_on = on;
        self.send_display_control().await
    }

    pub async fn set_blink(&mut self, blink: bool) -> Result<(), Error<I::Error>> {
        self.display_control.blink_on = blink;
        self.send_display_control().await
    }

    pub async fn set_backlight(&mut self, backlight: Backlight) -> Result<(), Error<I::Error>> {
        Ok(self.transport.set_backlight(backlight).await?)
    }

    pub async fn set_entry_mode(
        &mut self,
        direction: CursorDirection,
        shift: bool,
    ) -> Result<(), Error<I::Error>> {
        self.command(entry_mode_command(direction, shift)).await
    }

    /// Scrolls the display one char to the left
    pub async fn scroll_display_left(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::DisplayLeft as u8).await
    }

    /// Scrolls the display one char to the right
    pub async fn scroll_display_right(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::DisplayRight as u8).await
    }

    /// Moves the cursor one char to the left
    pub async fn move_cursor_left(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::CursorLeft as u8).await
    }

    /// Moves the cursor one char to the right
    pub async fn move_cursor_right(&mut self) -> Result<(), Error<I::Error>> {
        self.command(Commands::CursorShift as u8 | Shift::CursorRight as u8).await
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::test_support::{command, data, data_bytes, init_sequence, ADDRESS};
    use embassy_futures::block_on;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        i2c::{Mock as I2cMock, Transaction as I2cTransaction},
    };
    use std::vec::Vec;

    fn after_init(rest: &[Vec<I2cTransaction>]) -> Vec<I2cTransaction> {
        let mut transactions = init_sequence(FunctionSet::default(), DisplayControl::default());
        for part in rest {
            transactions.extend(part.iter().cloned());
        }
        transactions
    }

    #[test]
    fn init_then_text() {
        let expected = after_init(&[command(0x80 | 0x45), data("AB")]);

        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            lcd.set_cursor(5, 1).await.unwrap();
            lcd.write_text("AB").await.unwrap();
            assert_eq!(lcd.set_cursor(0, 7).await, Err(Error::InvalidRow(7)));
        });
        i2c.done();
    }

    #[test]
    fn init_one_line_large_font_with_cursor() {
        let function_set = FunctionSet::new(1, Font::Font5x10);
        let display_control = DisplayControl {
            display_on: true,
            cursor_on: true,
            blink_on: false,
        };
        let expected = init_sequence(function_set, display_control);

        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let lcd = Lcd::new(&mut i2c, &mut delay)
                .with_address(ADDRESS)
                .with_rows(1)
                .with_font(Font::Font5x10)
                .with_cursor_on(true)
                .init()
                .await
                .unwrap();
            assert_eq!(lcd.function_set(), function_set);
            assert_eq!(lcd.display_control(), display_control);
        });
        i2c.done();
    }

    #[test]
    fn display_toggle_restores_state() {
        let expected = after_init(&[command(0x08), command(0x0C)]);
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            let original = lcd.display_control();

            lcd.set_display(false).await.unwrap();
            assert!(!lcd.display_control().display_on);
            assert!(!lcd.display_control().cursor_on);
            assert!(!lcd.display_control().blink_on);

            lcd.set_display(true).await.unwrap();
            assert_eq!(lcd.display_control(), original);
        });
        i2c.done();
    }

    #[test]
    fn cursor_and_blink_toggles() {
        let expected = after_init(&[command(0x0E), command(0x0F), command(0x0D), command(0x0C)]);
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            lcd.set_cursor_visible(true).await.unwrap();
            lcd.set_blink(true).await.unwrap();
            lcd.set_cursor_visible(false).await.unwrap();
            lcd.set_blink(false).await.unwrap();
        });
        i2c.done();
    }

    #[test]
    fn failed_toggle_leaves_mirror_ahead() {
        let mut failing = command(0x0D);
        failing.truncate(1);
        failing[0] = failing[0].clone().with_error(ErrorKind::Bus);
        let expected = after_init(&[failing, command(0x0D)]);

        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            assert_eq!(
                lcd.set_blink(true).await,
                Err(Error::Transport(ErrorKind::Bus))
            );
            assert!(lcd.display_control().blink_on);

            // resend brings the device in line with the mirror
            lcd.send_display_control().await.unwrap();
        });
        i2c.done();
    }

    #[test]
    fn clear_and_home() {
        let expected = after_init(&[command(0x01), command(0x02)]);
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            lcd.clear().await.unwrap();
            lcd.return_home().await.unwrap();
        });
        i2c.done();
    }

    #[test]
    fn shifts_and_entry_mode() {
        let expected = after_init(&[
            command(0x18),
            command(0x1C),
            command(0x10),
            command(0x14),
            command(0x05),
        ]);
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            lcd.scroll_display_left().await.unwrap();
            lcd.scroll_display_right().await.unwrap();
            lcd.move_cursor_left().await.unwrap();
            lcd.move_cursor_right().await.unwrap();
            lcd.set_entry_mode(CursorDirection::Left, true).await.unwrap();
        });
        i2c.done();
    }

    #[test]
    fn backlight_off_and_upper_rom_codes() {
        let expected = after_init(&[
            std::vec![I2cTransaction::write(ADDRESS, std::vec![0x00])],
            // 0xDF as data with the backlight bit cleared
            std::vec![
                I2cTransaction::write(ADDRESS, std::vec![0xD1]),
                I2cTransaction::write(ADDRESS, std::vec![0xD5]),
                I2cTransaction::write(ADDRESS, std::vec![0xD1]),
                I2cTransaction::write(ADDRESS, std::vec![0xF1]),
                I2cTransaction::write(ADDRESS, std::vec![0xF5]),
                I2cTransaction::write(ADDRESS, std::vec![0xF1]),
            ],
            std::vec![I2cTransaction::write(ADDRESS, std::vec![0x08])],
            data_bytes(&[0xB1]),
        ]);
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        block_on(async {
            let mut lcd = Lcd::new(&mut i2c, &mut delay).init().await.unwrap();
            lcd.set_backlight(Backlight::Off).await.unwrap();
            assert_eq!(lcd.backlight_state(), Backlight::Off);
            lcd.write_text("\u{DF}").await.unwrap();
            lcd.set_backlight(Backlight::On).await.unwrap();
            lcd.write_bytes(&[0xB1]).await.unwrap();
        });
        i2c.done();
    }
}
