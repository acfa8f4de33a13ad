//! Clock face drawn on a two-row display.
//!
//! The time source and the periodic trigger belong to the application: implement [`WallClock`]
//! for the RTC or network time at hand and call [`ClockFace::tick`] from whatever ticker fires
//! about once a second.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use ufmt::uwrite;

use crate::{Error, Lcd};

/// Broken down wall-clock time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Source of the current time.
pub trait WallClock {
    fn now(&mut self) -> DateTime;
}

/// Draws `HH:MM:SS` and `DD/MM/YYYY` on two rows.
#[derive(Copy, Clone, Debug)]
pub struct ClockFace {
    time_row: u8,
    date_row: u8,
    column: u8,
}

impl Default for ClockFace {
    fn default() -> Self {
        Self {
            time_row: 0,
            date_row: 1,
            column: 0,
        }
    }
}

impl ClockFace {
    pub fn new(time_row: u8, date_row: u8, column: u8) -> Self {
        Self {
            time_row,
            date_row,
            column,
        }
    }

    /// Reads the clock and redraws.
    pub fn tick<I, D, C>(
        &self,
        lcd: &mut Lcd<'_, I, D>,
        clock: &mut C,
    ) -> Result<(), Error<I::Error>>
    where
        I: I2c,
        D: DelayNs,
        C: WallClock,
    {
        let now = clock.now();
        self.redraw(lcd, &now)
    }

    /// Overwrites both lines in place, no clear, so the display does not flicker.
    pub fn redraw<I, D>(
        &self,
        lcd: &mut Lcd<'_, I, D>,
        now: &DateTime,
    ) -> Result<(), Error<I::Error>>
    where
        I: I2c,
        D: DelayNs,
    {
        lcd.set_cursor(self.column, self.time_row)?;
        uwrite!(
            lcd,
            "{}{}:{}{}:{}{}",
            now.hour / 10,
            now.hour % 10,
            now.minute / 10,
            now.minute % 10,
            now.second / 10,
            now.second % 10
        )?;

        lcd.set_cursor(self.column, self.date_row)?;
        uwrite!(
            lcd,
            "{}{}/{}{}/{}{}{}{}",
            now.day / 10,
            now.day % 10,
            now.month / 10,
            now.month % 10,
            now.year / 1000 % 10,
            now.year / 100 % 10,
            now.year / 10 % 10,
            now.year % 10
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::test_support::{command, data, init_sequence};
    use crate::{DisplayControl, FunctionSet};
    use embedded_hal_mock::eh1::{delay::NoopDelay, i2c::Mock as I2cMock};

    struct FixedClock(DateTime);

    impl WallClock for FixedClock {
        fn now(&mut self) -> DateTime {
            self.0
        }
    }

    #[test]
    fn draws_time_and_date() {
        let mut expected = init_sequence(FunctionSet::default(), DisplayControl::default());
        expected.extend(command(0x80));
        expected.extend(data("09:05:59"));
        expected.extend(command(0x80 | 0x40));
        expected.extend(data("01/12/2024"));

        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        let mut lcd = Lcd::new(&mut i2c, &mut delay).init().unwrap();
        let mut clock = FixedClock(DateTime {
            year: 2024,
            month: 12,
            day: 1,
            hour: 9,
            minute: 5,
            second: 59,
        });
        ClockFace::default().tick(&mut lcd, &mut clock).unwrap();
        i2c.done();
    }

    #[test]
    fn year_is_padded_to_four_digits() {
        let mut expected = init_sequence(FunctionSet::default(), DisplayControl::default());
        expected.extend(command(0x80 | 0x14 + 4));
        expected.extend(data("00:00:00"));
        expected.extend(command(0x80 | 0x54 + 4));
        expected.extend(data("01/01/0005"));

        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        let mut lcd = Lcd::new(&mut i2c, &mut delay).with_rows(4).init().unwrap();
        let now = DateTime {
            year: 5,
            month: 1,
            day: 1,
            ..DateTime::default()
        };
        ClockFace::new(2, 3, 4).redraw(&mut lcd, &now).unwrap();
        i2c.done();
    }

    #[test]
    fn invalid_row_is_reported() {
        let expected = init_sequence(FunctionSet::default(), DisplayControl::default());
        let mut i2c = I2cMock::new(&expected);
        let mut delay = NoopDelay::new();
        let mut lcd = Lcd::new(&mut i2c, &mut delay).init().unwrap();
        let face = ClockFace::new(5, 1, 0);
        assert_eq!(
            face.redraw(&mut lcd, &DateTime::default()),
            Err(Error::InvalidRow(5))
        );
        i2c.done();
    }
}
