use core::fmt;

/// Errors reported by the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus write or read failed. Nothing is retried, and a toggle that failed leaves the
    /// mirrored display control ahead of the device until the next successful send.
    Transport(E),
    /// Row outside of the four DDRAM row offsets.
    InvalidRow(u8),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Transport(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "i2c transport error: {:?}", e),
            Error::InvalidRow(row) => write!(f, "row {} is out of range (0..=3)", row),
        }
    }
}
