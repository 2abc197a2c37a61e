//! Write a synthetic coredump and symbol file to try ramtrace by hand
//!
//! The ring buffer holds the string "modem trace wraps around!" split across
//! the physical end of a 32-byte array.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example make-fixture -- /tmp/fixture
//! cargo run -- -c /tmp/fixture/core.elf -s /tmp/fixture/zephyr.elf -o /tmp/fixture/trace.bin
//! cat /tmp/fixture/trace.bin
//! ```

use anyhow::{Context, Result};
use ramtrace::{fixture, RingBufferControl, DEFAULT_SYMBOL};
use std::path::PathBuf;

const CONTROL_ADDR: u32 = 0x2000_8000;
const ARRAY_ADDR: u32 = 0x2000_8100;
const CAPACITY: u32 = 32;

fn main() -> Result<()> {
    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "fixture".to_string()));
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let message = b"modem trace wraps around!";
    let start = 20usize;

    let len = CAPACITY as usize;
    let mut array = vec![b'.'; len];
    for (i, byte) in message.iter().enumerate() {
        array[(start + i) % len] = *byte;
    }

    // Cursors after several laps around the buffer
    let get_base = 3 * CAPACITY as i32;
    let get_head = get_base + start as i32;
    let put_tail = get_head + message.len() as i32;
    let control = RingBufferControl {
        buffer: ARRAY_ADDR,
        put_head: put_tail,
        put_tail,
        put_base: get_base,
        get_head,
        get_tail: get_head,
        get_base,
        capacity: CAPACITY,
    };

    let core = fixture::ring_buffer_core(CONTROL_ADDR, &control, &array);
    let symbols = fixture::symbol_file(&[("_kernel", 0x2000_0000), (DEFAULT_SYMBOL, CONTROL_ADDR)]);

    std::fs::write(dir.join("core.elf"), core)?;
    std::fs::write(dir.join("zephyr.elf"), symbols)?;

    println!("wrote {}/core.elf and {}/zephyr.elf", dir.display(), dir.display());
    Ok(())
}
