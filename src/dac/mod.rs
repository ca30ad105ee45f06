//! Everything GP8302 specific on top of the bit layer.

mod command;
mod conversion;
mod device;

pub use self::command::{probe, store, write_code, CONFIG_CURRENT_REG};
pub use self::conversion::{code_to_current, current_to_code, Calibration, Code, MAX_CURRENT_MA};
pub use self::device::Gp8302;
