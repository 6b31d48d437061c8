#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use zpipe_driver::{DriverConfig, StreamDriver};
use zpipe_zstd::ZstdDecoder;

// Fuzz target: full driver run over arbitrary input bytes.
//
// Catches bugs in:
// - Frame/magic validation surfacing as panics instead of errors
// - Cursor bookkeeping across suspension and compaction
// - Stall/truncation detection (every input must terminate)
// - Buffer invariant violations under tiny capacities
fuzz_target!(|data: &[u8]| {
    let Ok(decoder) = ZstdDecoder::new() else {
        return;
    };
    let mut out = Vec::new();
    let driver = StreamDriver::new(
        DriverConfig::new(64, 64),
        decoder,
        Cursor::new(data.to_vec()),
        &mut out,
    );
    let _ = driver.run();
});
