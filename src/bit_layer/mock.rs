//! Recording `Lines` for tests, and a decoder that turns the recorded
//! waveform back into frames.

use super::{Level, Line, Lines, Mode};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Mode(Line, Mode),
    Write(Line, Level),
    Read(Line, Level),
    DelayUs(u32),
    DelayMs(u32),
}

pub struct MockLines {
    scl: Line,
    sda: Line,
    ack: Level,
    ack_after: usize,
    sda_mode: Mode,
    sda_out: Level,
    sda_reads: usize,
    events: Vec<Event>,
}

impl MockLines {
    /// The device answers every acknowledgment poll with `ack`.
    pub fn new(scl: Line, sda: Line, ack: Level) -> Self {
        MockLines {
            scl,
            sda,
            ack,
            ack_after: 0,
            sda_mode: Mode::Output,
            sda_out: Level::High,
            sda_reads: 0,
            events: Vec::new(),
        }
    }

    /// The device only drives `ack` from the `reads`-th read of sda on,
    /// and the opposite level before that.
    pub fn ack_after(mut self, reads: usize) -> Self {
        self.ack_after = reads;
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn writes(&self) -> Vec<(Line, Level)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                Event::Write(line, level) => Some((line, level)),
                _ => None,
            })
            .collect()
    }

    pub fn sda_reads(&self) -> usize {
        self.sda_reads
    }

    pub fn delays_of(&self, us: u32) -> usize {
        self.events.iter().filter(|e| **e == Event::DelayUs(us)).count()
    }
}

impl Lines for MockLines {
    fn set_mode(&mut self, line: Line, mode: Mode) {
        if line == self.sda {
            self.sda_mode = mode;
        }
        self.events.push(Event::Mode(line, mode));
    }

    fn write(&mut self, line: Line, level: Level) {
        if line == self.sda {
            self.sda_out = level;
        }
        self.events.push(Event::Write(line, level));
    }

    fn read(&mut self, line: Line) -> Level {
        let level = if line != self.sda {
            Level::High
        } else if self.sda_mode == Mode::Output {
            self.sda_out
        } else {
            self.sda_reads += 1;
            if self.sda_reads > self.ack_after {
                self.ack
            } else {
                !self.ack
            }
        };
        self.events.push(Event::Read(line, level));
        level
    }

    fn delay_us(&mut self, us: u32) {
        self.events.push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::DelayMs(ms));
    }

    fn claims(&self, line: Line) -> bool {
        line == self.scl || line == self.sda
    }
}

/// One transfer unit as seen on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub value: u8,
    pub bits: u8,
    /// Whether an acknowledgment clock followed the data bits.
    pub ack: bool,
}

impl Unit {
    pub fn byte(value: u8) -> Self {
        Unit { value, bits: 8, ack: true }
    }

    pub fn partial(value: u8, bits: u8) -> Self {
        Unit { value, bits, ack: false }
    }
}

enum Token {
    Bit(bool),
    Ack,
}

/// Splits the recorded waveform into start/stop delimited frames.
///
/// Every scl rising edge inside a frame is a data bit, or an acknowledgment
/// clock when sda is an input. The stop condition clocks scl once more
/// before releasing sda, that last edge is dropped.
pub fn decode(events: &[Event]) -> Vec<Vec<Unit>> {
    let (scl, sda) = match lines_of(events) {
        Some(lines) => lines,
        None => return Vec::new(),
    };

    let mut frames = Vec::new();
    let mut tokens = Vec::new();
    let mut in_frame = false;
    let mut scl_level = Level::High;
    let mut sda_level = Level::High;
    let mut sda_input = false;

    for event in events {
        match *event {
            Event::Mode(line, mode) if line == sda => sda_input = mode == Mode::InputPullUp,
            Event::Write(line, level) if line == scl => {
                if in_frame && scl_level == Level::Low && level == Level::High {
                    tokens.push(if sda_input { Token::Ack } else { Token::Bit(sda_level.into()) });
                }
                scl_level = level;
            }
            Event::Write(line, level) if line == sda && !sda_input => {
                if scl_level == Level::High && sda_level != level {
                    if level == Level::Low {
                        in_frame = true;
                        tokens.clear();
                    } else if in_frame {
                        if let Some(&Token::Bit(_)) = tokens.last() {
                            tokens.pop();
                        }
                        frames.push(units(&tokens));
                        in_frame = false;
                    }
                }
                sda_level = level;
            }
            _ => {}
        }
    }

    frames
}

/// Reads of sda during each acknowledgment phase, in bus order.
///
/// Against a device that always answers one level, a phase waiting for that
/// level takes two reads (the matching poll and the sample), a phase waiting
/// for the other level times out after `ACK_POLL_LIMIT + 1`.
pub fn ack_reads(events: &[Event]) -> Vec<usize> {
    let sda = match lines_of(events) {
        Some((_, sda)) => sda,
        None => return Vec::new(),
    };

    let mut phases = Vec::new();
    let mut reads = None;
    for event in events {
        match *event {
            Event::Mode(line, Mode::InputPullUp) if line == sda => reads = Some(0),
            Event::Read(line, _) if line == sda => {
                if let Some(ref mut n) = reads {
                    *n += 1;
                }
            }
            Event::Mode(line, Mode::Output) if line == sda => {
                if let Some(n) = reads.take() {
                    phases.push(n);
                }
            }
            _ => {}
        }
    }

    phases
}

fn lines_of(events: &[Event]) -> Option<(Line, Line)> {
    // the bus parks scl first, then sda
    let mut outputs = events.iter().filter_map(|e| match *e {
        Event::Mode(line, Mode::Output) => Some(line),
        _ => None,
    });
    Some((outputs.next()?, outputs.next()?))
}

fn units(tokens: &[Token]) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut value = 0u8;
    let mut bits = 0u8;

    for token in tokens {
        match *token {
            Token::Bit(bit) => {
                value = (value << 1) | bit as u8;
                bits += 1;
            }
            Token::Ack => {
                units.push(Unit::byte(value));
                value = 0;
                bits = 0;
            }
        }
    }
    if bits > 0 {
        units.push(Unit::partial(value, bits));
    }

    units
}
