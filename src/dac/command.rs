//! Command sequences of the GP8302.

use crate::bit_layer::{Ack, BitLayer, Level, Lines, RWBit};
use super::Code;

/// Register taking the output code.
pub const CONFIG_CURRENT_REG: u8 = 0x02;

// store sequence, as documented by the vendor
const STORE_HEAD: u8 = 0x02;
const STORE_HEAD_BITS: u8 = 3;
const STORE_ADDR: u8 = 0x10;
const STORE_CMD_ENTER: u8 = 0x03;
const STORE_CMD_EXIT: u8 = 0x00;
const STORE_UNLOCK_BYTES: usize = 8;
/// The chip needs at least 7 ms to commit.
const STORE_DELAY_MS: u32 = 10;

/// Addresses the device and reports whether it acknowledged.
pub fn probe<L: Lines>(bus: &mut BitLayer<L>, address: u8) -> bool {
    bus.start();
    let ack = bus.write_byte(RWBit::Write.address_byte(address));
    bus.stop();

    ack == Level::Low
}

/// Writes `code` to the current register.
///
/// The transfer always runs to the end, missing acknowledgments included;
/// the return value only says whether every byte was acknowledged.
pub fn write_code<L: Lines>(bus: &mut BitLayer<L>, address: u8, code: Code) -> bool {
    debug!("Writing code {} to {:#04x}", code, address);

    bus.start();
    let acks = [
        bus.write_byte(RWBit::Write.address_byte(address)),
        bus.write_byte(CONFIG_CURRENT_REG),
        bus.write_byte(code.low_nibble_byte()),
        bus.write_byte(code.high_byte()),
    ];
    bus.stop();

    acks.iter().all(|ack| *ack == Level::Low)
}

/// Commits the active output into the chip's nonvolatile memory.
pub fn store<L: Lines>(bus: &mut BitLayer<L>, address: u8) {
    debug!("Entering store sequence on {:#04x}", address);
    store_header(bus, STORE_CMD_ENTER);

    // unlock: the chip answers these with a high level
    bus.start();
    bus.send(RWBit::Write.address_byte(address), 8, Ack::Expect(Level::High));
    for _ in 0..STORE_UNLOCK_BYTES {
        bus.send(STORE_CMD_EXIT, 8, Ack::Expect(Level::High));
    }
    bus.stop();

    bus.delay_ms(STORE_DELAY_MS);

    store_header(bus, STORE_CMD_EXIT);
    debug!("Store sequence done");
}

fn store_header<L: Lines>(bus: &mut BitLayer<L>, command: u8) {
    bus.start();
    bus.send(STORE_HEAD, STORE_HEAD_BITS, Ack::Skip);
    bus.stop();

    bus.start();
    bus.write_byte(STORE_ADDR);
    bus.write_byte(command);
    bus.stop();
}
