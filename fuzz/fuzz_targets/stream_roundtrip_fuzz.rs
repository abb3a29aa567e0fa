// fuzz/fuzz_targets/stream_roundtrip_fuzz.rs
#![no_main]
use compress::{Compressor, Decompressor};
use fuzz::helpers;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut c = Compressor::new(6).unwrap();
    let mut compressed = Vec::new();
    for chunk in helpers::chunks(data) {
        compressed.extend(c.compress_stream(chunk).unwrap());
    }
    compressed.extend(c.close().unwrap());

    let expected: Vec<u8> = data.iter().skip(1).copied().collect();
    let out = Decompressor::new()
        .unwrap()
        .decompress(&compressed, Vec::new())
        .unwrap();
    assert_eq!(out, expected);
});
