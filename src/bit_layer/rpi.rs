use std::thread;
use std::time::{Duration, Instant};
use rppal::gpio::{self, Gpio, IoPin, PullUpDown};

use super::{Level, Line, Lines, Mode};
use crate::error::Error;

/// The two bus lines on a Raspberry Pi header, driven through `rppal`.
pub struct RpiLines {
    scl: IoPin,
    sda: IoPin,
    scl_num: u8,
    sda_num: u8,
}

impl RpiLines {
    /// Claims both pins (BCM numbering) as outputs.
    ///
    /// A shared or nonexistent pin is `InvalidPins`, anything else the GPIO
    /// peripheral refuses is `Gpio`.
    pub fn open(scl_num: u8, sda_num: u8) -> Result<Self, Error> {
        if scl_num == sda_num {
            error!("scl and sda cannot share GPIO{}", scl_num);
            return Err(Error::InvalidPins);
        }

        let gpio = Gpio::new()?;
        info!("Claiming scl on GPIO{} and sda on GPIO{}", scl_num, sda_num);

        Ok(RpiLines {
            scl: claim(&gpio, scl_num)?,
            sda: claim(&gpio, sda_num)?,
            scl_num,
            sda_num,
        })
    }

    fn pin(&mut self, line: Line) -> Option<&mut IoPin> {
        if line.0 == self.scl_num {
            Some(&mut self.scl)
        } else if line.0 == self.sda_num {
            Some(&mut self.sda)
        } else {
            error!("{} is neither scl nor sda, ignoring", line);
            None
        }
    }
}

fn claim(gpio: &Gpio, pin: u8) -> Result<IoPin, Error> {
    match gpio.get(pin) {
        Ok(claimed) => Ok(claimed.into_io(gpio::Mode::Output)),
        Err(gpio::Error::PinNotAvailable(_)) => {
            error!("GPIO{} does not exist on this board", pin);
            Err(Error::InvalidPins)
        }
        Err(e) => Err(e.into()),
    }
}

impl Lines for RpiLines {
    fn set_mode(&mut self, line: Line, mode: Mode) {
        if let Some(pin) = self.pin(line) {
            trace!("Setting {} to {:?}", line, mode);
            match mode {
                Mode::Output => {
                    pin.set_pullupdown(PullUpDown::Off);
                    pin.set_mode(gpio::Mode::Output);
                }
                Mode::InputPullUp => {
                    pin.set_mode(gpio::Mode::Input);
                    pin.set_pullupdown(PullUpDown::PullUp);
                }
            }
        }
    }

    fn write(&mut self, line: Line, level: Level) {
        if let Some(pin) = self.pin(line) {
            pin.write(match level {
                Level::Low => gpio::Level::Low,
                Level::High => gpio::Level::High,
            });
        }
    }

    fn read(&mut self, line: Line) -> Level {
        match self.pin(line) {
            Some(pin) => match pin.read() {
                gpio::Level::Low => Level::Low,
                gpio::Level::High => Level::High,
            },
            // an unclaimed line floats high like a released bus line
            None => Level::High,
        }
    }

    fn delay_us(&mut self, us: u32) {
        // sleeping overshoots by far more than a bus phase lasts
        let deadline = Instant::now() + Duration::from_micros(u64::from(us));
        while Instant::now() < deadline {
            ::std::hint::spin_loop();
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn claims(&self, line: Line) -> bool {
        line.0 == self.scl_num || line.0 == self.sda_num
    }
}
