//! Fuzz target: JSON deserialization of `OpenGateBody`.
//!
//! Arbitrary bytes fed to the decoder must never panic; errors are expected.

#![no_main]

use gate_phone::OpenGateBody;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = serde_json::from_slice::<OpenGateBody>(data) {
        let _ = serde_json::to_vec(&body);
    }
});
