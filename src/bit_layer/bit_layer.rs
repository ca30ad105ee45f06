use super::{Level, Line, Lines, Mode};

/// Setup time before a clock edge, in µs.
const CYCLE_BEFORE: u32 = 2;
/// Hold time after a clock edge, in µs.
const CYCLE_AFTER: u32 = 3;
/// A full clock phase, in µs. Never shorter than before + after.
const CYCLE_TOTAL: u32 = 5;

/// Upper bound on acknowledgment polls, 1 µs apart.
pub const ACK_POLL_LIMIT: u32 = 250;

/// What to do after the data bits of a transfer went out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ack {
    /// Release sda, clock once and wait for the device to drive this level.
    Expect(Level),
    /// No acknowledgment phase. Leaves sda low and scl high, which is what
    /// the chip expects between the header and the stop of its store
    /// sequence. This is not an I²C construct.
    Skip,
}

pub struct BitLayer<L> where L: Lines {
    lines: L,
    scl: Line,
    sda: Line,
}

impl<L> BitLayer<L> where L: Lines {
    pub fn new(lines: L, scl: Line, sda: Line) -> Self {
        BitLayer {
            lines,
            scl,
            sda,
        }
    }

    /// Configures both lines as outputs and parks the bus idle high.
    pub fn idle(&mut self) {
        trace!("Parking bus idle on scl {} and sda {}", self.scl, self.sda);
        self.lines.set_mode(self.scl, Mode::Output);
        self.lines.set_mode(self.sda, Mode::Output);
        self.lines.write(self.scl, Level::High);
        self.lines.write(self.sda, Level::High);
    }

    /// Start condition: sda falls while scl is high.
    pub fn start(&mut self) {
        self.lines.write(self.scl, Level::High);
        self.lines.write(self.sda, Level::High);
        self.lines.delay_us(CYCLE_BEFORE);
        self.lines.write(self.sda, Level::Low);
        self.lines.delay_us(CYCLE_AFTER);
        self.lines.write(self.scl, Level::Low);
        self.lines.delay_us(CYCLE_TOTAL);
    }

    /// Stop condition: sda rises while scl is high.
    pub fn stop(&mut self) {
        self.lines.write(self.sda, Level::Low);
        self.lines.delay_us(CYCLE_BEFORE);
        self.lines.write(self.scl, Level::High);
        self.lines.delay_us(CYCLE_TOTAL);
        self.lines.write(self.sda, Level::High);
        self.lines.delay_us(CYCLE_TOTAL);
    }

    /// Shifts out the lowest `bits` bits of `data`, most significant first.
    /// `bits` is clamped to 1..=8.
    ///
    /// Returns the sampled acknowledgment level, or `None` when the
    /// acknowledgment phase was skipped.
    pub fn send(&mut self, data: u8, bits: u8, ack: Ack) -> Option<Level> {
        if !(1..=8).contains(&bits) {
            warn!("Bit width {} out of range, clamping to 1..=8", bits);
        }
        let bits = bits.clamp(1, 8);
        trace!("Sending {:#04x} ({} bits, {:?})", data, bits, ack);

        self.shift_out(data, bits);

        match ack {
            Ack::Expect(expected) => Some(self.recv_ack(expected)),
            Ack::Skip => {
                self.lines.write(self.sda, Level::Low);
                self.lines.write(self.scl, Level::High);
                None
            }
        }
    }

    /// Plain eight bit transfer acknowledged by a low sda.
    pub fn write_byte(&mut self, data: u8) -> Level {
        trace!("Sending {:#04x}", data);
        self.shift_out(data, 8);
        self.recv_ack(Level::Low)
    }

    fn shift_out(&mut self, data: u8, bits: u8) {
        for i in (0..bits).rev() {
            // sda may only change while scl is low
            self.lines.write(self.sda, Level::from(data & (1 << i) != 0));
            self.lines.delay_us(CYCLE_BEFORE);
            self.lines.write(self.scl, Level::High);
            self.lines.delay_us(CYCLE_TOTAL);
            self.lines.write(self.scl, Level::Low);
            self.lines.delay_us(CYCLE_AFTER);
        }
    }

    /// Clocks the acknowledgment bit and returns whatever sda settled to.
    ///
    /// Polls until sda reads `expected` or [`ACK_POLL_LIMIT`] polls have
    /// passed. A timeout is not reported separately, the caller only sees
    /// the level.
    pub fn recv_ack(&mut self, expected: Level) -> Level {
        // the pull-up releases sda high, no separate write needed
        self.lines.set_mode(self.sda, Mode::InputPullUp);
        self.lines.delay_us(CYCLE_BEFORE);
        self.lines.write(self.scl, Level::High);
        self.lines.delay_us(CYCLE_AFTER);

        let mut polls = 0;
        while polls < ACK_POLL_LIMIT && self.lines.read(self.sda) != expected {
            self.lines.delay_us(1);
            polls += 1;
        }

        let level = self.lines.read(self.sda);
        if level == expected {
            trace!("Got ack {} after {} polls", level, polls);
        } else {
            trace!("No ack: sda stayed {} for {} polls", level, polls);
        }

        self.lines.delay_us(CYCLE_BEFORE);
        self.lines.write(self.scl, Level::Low);
        self.lines.delay_us(CYCLE_AFTER);
        self.lines.set_mode(self.sda, Mode::Output);

        level
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.lines.delay_ms(ms);
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn release(self) -> L {
        self.lines
    }
}
