//! Fuzz target: parsing a gate id from an arbitrary path segment.
//!
//! Parsing must never panic, and anything it accepts must be one of the
//! four gates and print back to a canonical number.

#![no_main]

use gate_core::GateId;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(gate) = raw.parse::<GateId>() {
        assert!((1..=4).contains(&gate.number()));
        assert_eq!(gate.to_string().parse::<GateId>().ok(), Some(gate));
    }
});
