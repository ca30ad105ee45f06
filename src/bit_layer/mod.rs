mod bit_layer;
mod rw_bit;
mod rpi;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::ops;

pub use self::bit_layer::{Ack, BitLayer, ACK_POLL_LIMIT};
pub use self::rw_bit::RWBit;
pub use self::rpi::RpiLines;

/// A GPIO line, numbered the way the platform numbers its pins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Line(pub u8);

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

impl ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Level::Low => "low",
            Level::High => "high",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Output,
    InputPullUp,
}

/// Everything the bit layer needs from the platform: two digital lines and
/// a way to burn time.
///
/// None of these calls can fail. A line that misbehaves only ever shows up
/// as an unexpected level on a later read.
pub trait Lines {
    fn set_mode(&mut self, line: Line, mode: Mode);

    fn write(&mut self, line: Line, level: Level);

    fn read(&mut self, line: Line) -> Level;

    /// Busy-waits for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);

    fn delay_ms(&mut self, ms: u32);

    /// Whether this platform can drive `line` at all.
    fn claims(&self, _line: Line) -> bool {
        true
    }
}
