//! Driver for the GP8302 0-25 mA current output DAC.
//!
//! The chip speaks a two-wire protocol that is close to, but not quite, I²C:
//! its store sequence relies on transfers that skip the acknowledgment phase
//! entirely. The bus is therefore bit-banged on two plain GPIO lines instead
//! of going through a hardware controller.

#[macro_use]
extern crate log;
extern crate rppal;

pub mod bit_layer;
pub mod config;
pub mod dac;
mod error;

pub use bit_layer::{Level, Line, Lines, Mode, RpiLines};
pub use config::Config;
pub use dac::{Calibration, Code, Gp8302};
pub use error::Error;
