use crate::bit_layer::Line;
use crate::dac::Calibration;
use crate::error::Error;

/// Factory address of the GP8302.
pub const DEFAULT_ADDRESS: u8 = 0x58;
/// BCM pins of the Raspberry Pi's hardware two-wire bus.
pub const DEFAULT_SCL: u8 = 3;
pub const DEFAULT_SDA: u8 = 2;

/// Everything fixed at start-up.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// 7-bit bus address.
    pub address: u8,
    pub scl: Option<u8>,
    pub sda: Option<u8>,
    /// Applied right after a successful start-up.
    pub calibration: Option<Calibration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: DEFAULT_ADDRESS,
            scl: Some(DEFAULT_SCL),
            sda: Some(DEFAULT_SDA),
            calibration: None,
        }
    }
}

impl Config {
    /// Both lines, or `InvalidPins` if one is missing or they coincide.
    pub fn pins(&self) -> Result<(Line, Line), Error> {
        match (self.scl, self.sda) {
            (Some(scl), Some(sda)) if scl != sda => Ok((Line(scl), Line(sda))),
            _ => Err(Error::InvalidPins),
        }
    }

    pub fn validate_address(&self) -> Result<(), Error> {
        if validate_address_7b(self.address) {
            Ok(())
        } else {
            Err(Error::InvalidAddress(self.address))
        }
    }
}

/// Rejects addresses outside 7 bits and the ones I²C reserves.
pub fn validate_address_7b(address: u8) -> bool {
    if address >= (1 << 7) {
        return false;
    }

    match address {
        0b0000_0000..=0b0000_0111 | 0b0111_1000..=0b0111_1111 => false,
        _ => true,
    }
}
