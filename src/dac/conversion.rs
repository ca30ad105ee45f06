use std::fmt;

use crate::error::Error;

/// Full scale output, reached at code 0xFFF.
pub const MAX_CURRENT_MA: f32 = 25.0;

const CAL_LOW_MA: f32 = 4.0;
const CAL_HIGH_MA: f32 = 20.0;

/// A 12-bit DAC code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Code(u16);

impl Code {
    pub const ZERO: Code = Code(0);
    pub const MAX: Code = Code(0x0FFF);

    pub fn new(value: u16) -> Result<Self, Error> {
        if value > Code::MAX.0 {
            Err(Error::OutOfRange(value))
        } else {
            Ok(Code(value))
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Low nibble in the upper half of a byte, as the chip expects it first.
    pub fn low_nibble_byte(self) -> u8 {
        ((self.0 << 4) & 0xF0) as u8
    }

    /// Upper eight of the twelve bits.
    pub fn high_byte(self) -> u8 {
        ((self.0 >> 4) & 0xFF) as u8
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// Measured codes for 4 mA and 20 mA.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Calibration {
    low: u16,
    high: u16,
}

impl Calibration {
    /// Typical points of an uncalibrated module. The real ones have to be
    /// measured per device.
    pub const NOMINAL: Calibration = Calibration { low: 655, high: 3277 };

    pub fn new(low: u16, high: u16) -> Result<Self, Error> {
        if low >= high || high > Code::MAX.0 {
            return Err(Error::InvalidCalibration { low, high });
        }
        Ok(Calibration { low, high })
    }

    /// Code measured at 4 mA.
    pub fn low(&self) -> u16 {
        self.low
    }

    /// Code measured at 20 mA.
    pub fn high(&self) -> u16 {
        self.high
    }
}

pub fn code_to_current(code: Code) -> f32 {
    (f32::from(code.value()) / f32::from(Code::MAX.value())) * MAX_CURRENT_MA
}

/// Converts a current in mA to the code that produces it.
///
/// The input is clamped to 0-25 mA. Inside 4-20 mA a calibration, if given,
/// interpolates between its two points; everywhere else the scale is linear
/// over the full range.
pub fn current_to_code(current_ma: f32, calibration: Option<&Calibration>) -> Code {
    let current = if current_ma.is_nan() {
        0.0
    } else {
        current_ma.clamp(0.0, MAX_CURRENT_MA)
    };

    let exact = match calibration {
        Some(cal) if (CAL_LOW_MA..=CAL_HIGH_MA).contains(&current) => {
            let span = f32::from(cal.high - cal.low);
            f32::from(cal.low) + (current - CAL_LOW_MA) * span / (CAL_HIGH_MA - CAL_LOW_MA)
        }
        _ => current * f32::from(Code::MAX.value()) / MAX_CURRENT_MA,
    };

    Code(round_half_up(exact).min(Code::MAX.0))
}

/// Rounds up when the first decimal of the fraction is 5 or more.
fn round_half_up(exact: f32) -> u16 {
    let whole = exact as u16;
    if (exact - f32::from(whole)) * 10.0 >= 5.0 {
        whole + 1
    } else {
        whole
    }
}
