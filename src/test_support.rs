//! Expected bus traffic for the mock based tests.

extern crate std;

use embedded_hal_mock::eh1::i2c::Transaction as I2cTransaction;
use std::vec::Vec;

use crate::{DisplayControl, FunctionSet, Mode};

pub const ADDRESS: u8 = 0x27;
pub const BL: u8 = 0x08;

/// The three writes of one nibble pulse with the backlight on.
pub fn pulse(nibble: u8, mode: Mode) -> [I2cTransaction; 3] {
    let data = (nibble & 0xf0) | mode as u8 | BL;
    [
        I2cTransaction::write(ADDRESS, std::vec![data]),        // enable=0
        I2cTransaction::write(ADDRESS, std::vec![data | 0x04]), // enable=1
        I2cTransaction::write(ADDRESS, std::vec![data]),        // enable=0
    ]
}

/// Both nibble pulses of a byte.
pub fn send(value: u8, mode: Mode) -> Vec<I2cTransaction> {
    let mut transactions = Vec::new();
    transactions.extend(pulse(value & 0xf0, mode));
    transactions.extend(pulse((value << 4) & 0xf0, mode));
    transactions
}

pub fn command(value: u8) -> Vec<I2cTransaction> {
    send(value, Mode::Cmd)
}

/// Data pulses of an ASCII string.
pub fn data(text: &str) -> Vec<I2cTransaction> {
    data_bytes(text.as_bytes())
}

pub fn data_bytes(bytes: &[u8]) -> Vec<I2cTransaction> {
    bytes.iter().flat_map(|&b| send(b, Mode::Data)).collect()
}

/// Reset pulses, function set, display control and clear.
pub fn init_sequence(function_set: FunctionSet, display_control: DisplayControl) -> Vec<I2cTransaction> {
    let mut transactions = Vec::new();
    for _ in 0..3 {
        transactions.extend(pulse(0x30, Mode::Cmd));
    }
    transactions.extend(pulse(0x20, Mode::Cmd));
    transactions.extend(command(0x20 | function_set.bits()));
    transactions.extend(command(0x08 | display_control.bits()));
    transactions.extend(command(0x01));
    transactions
}
