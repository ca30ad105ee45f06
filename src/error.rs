use std::{error, fmt, convert};
use rppal::gpio;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// No usable pin assignment for scl and sda.
    InvalidPins,
    /// The address is not a usable 7-bit address.
    InvalidAddress(u8),
    /// The presence check did not see the device acknowledge its address.
    DeviceNotFound,
    InvalidCalibration { low: u16, high: u16 },
    /// The code does not fit into the 12-bit resolution.
    OutOfRange(u16),
    Gpio(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidPins => f.write_str("scl or sda pin is invalid"),
            Error::InvalidAddress(address) => write!(f, "invalid 7-bit address {:#04x}", address),
            Error::DeviceNotFound => f.write_str("device not found, check the wiring"),
            Error::InvalidCalibration { low, high } => {
                write!(f, "invalid calibration points {} (4 mA) and {} (20 mA)", low, high)
            }
            Error::OutOfRange(code) => write!(f, "code {} exceeds the 12-bit resolution", code),
            Error::Gpio(ref descr) => write!(f, "PinError: {}", descr),
        }
    }
}

impl convert::From<gpio::Error> for Error {
    fn from(prev: gpio::Error) -> Self {
        Error::Gpio(format!("{}", prev))
    }
}
