use std::convert;
use std::fmt;

impl fmt::Display for RWBit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RWBit::Write => f.write_str("Write"),
            RWBit::Read => f.write_str("Read"),
        }
    }
}

/// Direction bit following the 7-bit address, seen from the bus master.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RWBit {
    Write,
    Read,
}

impl RWBit {
    /// The first byte of a transfer: the address followed by the direction bit.
    pub fn address_byte(self, address: u8) -> u8 {
        (address << 1) | u8::from(self)
    }
}

impl convert::From<RWBit> for u8 {
    fn from(bit: RWBit) -> Self {
        match bit {
            RWBit::Write => 0,
            RWBit::Read => 1,
        }
    }
}
