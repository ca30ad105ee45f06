use crate::bit_layer::{BitLayer, Lines};
use crate::config::Config;
use crate::error::Error;
use super::command;
use super::conversion::{code_to_current, current_to_code, Calibration, Code};

/// A GP8302 that answered its presence check.
///
/// Only [`Gp8302::begin`] creates one, so every value of this type is a
/// ready device.
pub struct Gp8302<L> where L: Lines {
    bus: BitLayer<L>,
    address: u8,
    code: Code,
    calibration: Option<Calibration>,
}

impl<L> Gp8302<L> where L: Lines {
    /// Resolves the pins, parks the bus and checks that the device
    /// acknowledges its address.
    pub fn begin(lines: L, config: Config) -> Result<Self, Error> {
        let (scl, sda) = config.pins()?;
        if !lines.claims(scl) || !lines.claims(sda) {
            error!("scl {} or sda {} is not available on this platform", scl, sda);
            return Err(Error::InvalidPins);
        }
        config.validate_address()?;

        let mut bus = BitLayer::new(lines, scl, sda);
        bus.idle();

        if !command::probe(&mut bus, config.address) {
            warn!("Device not found at {:#04x}, check the connection", config.address);
            return Err(Error::DeviceNotFound);
        }
        info!("Found GP8302 at {:#04x} (scl {}, sda {})", config.address, scl, sda);

        Ok(Gp8302 {
            bus,
            address: config.address,
            code: Code::ZERO,
            calibration: config.calibration,
        })
    }

    /// Enables two-point calibration with the codes measured at 4 mA and 20 mA.
    ///
    /// Rejected points leave the previous calibration in place.
    pub fn set_calibration(&mut self, low: u16, high: u16) -> Result<(), Error> {
        match Calibration::new(low, high) {
            Ok(calibration) => {
                debug!("Calibration set to {} (4 mA) and {} (20 mA)", low, high);
                self.calibration = Some(calibration);
                Ok(())
            }
            Err(e) => {
                warn!("Ignoring calibration: {}", e);
                Err(e)
            }
        }
    }

    pub fn clear_calibration(&mut self) {
        self.calibration = None;
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Outputs the raw `code` and returns the current it should produce.
    ///
    /// A code beyond 12 bits is not sent; the current of the code already
    /// active comes back instead.
    pub fn write_code(&mut self, code: u16) -> f32 {
        match Code::new(code) {
            Ok(code) => self.output(code),
            Err(e) => warn!("Keeping code {}: {}", self.code, e),
        }
        self.current()
    }

    /// Outputs `current_ma`, clamped to 0-25 mA, and returns the code used.
    pub fn write_current(&mut self, current_ma: f32) -> u16 {
        let code = current_to_code(current_ma, self.calibration.as_ref());
        self.output(code);
        code.value()
    }

    /// Makes the active output survive a power cycle.
    pub fn persist(&mut self) {
        info!("Storing code {} in nonvolatile memory", self.code);
        command::store(&mut self.bus, self.address);
    }

    /// The code last sent to the device.
    pub fn code(&self) -> u16 {
        self.code.value()
    }

    /// Current corresponding to [`code`](Gp8302::code), in mA.
    pub fn current(&self) -> f32 {
        code_to_current(self.code)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn lines(&self) -> &L {
        self.bus.lines()
    }

    pub fn release(self) -> L {
        self.bus.release()
    }

    fn output(&mut self, code: Code) {
        // the device gives no reliable feedback, so the code counts as
        // written either way
        if !command::write_code(&mut self.bus, self.address, code) {
            warn!("Code {} was not acknowledged", code);
        }
        self.code = code;
    }
}
