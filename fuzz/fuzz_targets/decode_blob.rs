#![no_main]

use std::io::Read;

use arbitrary::{Arbitrary, Unstructured};
use genesis_decoder::{open_genesis_with, DecoderConfig, GenesisError};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    window: u16,
    chunk: u16,
    allow_trailing_data: bool,
    blob: Vec<u8>,
}

// Fuzz target: the full base64 → gzip pipeline over arbitrary blobs.
//
// Catches bugs in:
// - Base64 error classification and position reporting
// - Gzip header / body / trailer error propagation
// - Trailing data detection
// - The poisoned-stream guarantee: after an error, no read may succeed
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };

    let config = DecoderConfig {
        buffer_capacity: usize::from(input.window),
        max_decoded_size: Some(1 << 20),
        allow_trailing_data: input.allow_trailing_data,
    };
    let Ok(mut stream) = open_genesis_with(&input.blob, &config) else {
        assert!(input.blob.is_empty());
        return;
    };

    let mut buf = vec![0u8; usize::from(input.chunk).max(1)];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                let first = GenesisError::from(err);
                let again = GenesisError::from(stream.read(&mut buf).unwrap_err());
                assert_eq!(first, again);
                return;
            }
        }
    }
    assert!(stream.is_finished());
});
