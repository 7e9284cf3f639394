#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use genesis_decoder::open_genesis;
use genesis_encoder::{pack_with, PackOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    level: u8,
    file_name: Option<String>,
    mtime: u32,
    document: Vec<u8>,
}

// Fuzz target: pack → decode roundtrip.
//
// Anything the encoder produces must decode back to the exact input.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };

    let options = PackOptions {
        level: u32::from(input.level % 10),
        file_name: input.file_name,
        mtime: input.mtime,
    };
    let Ok(blob) = pack_with(&input.document, &options) else {
        return;
    };

    let decoded = open_genesis(blob.as_bytes())
        .and_then(genesis_decoder::GenesisStream::read_all)
        .expect("decoder failed on valid encoder output");
    assert_eq!(decoded, input.document);
});
