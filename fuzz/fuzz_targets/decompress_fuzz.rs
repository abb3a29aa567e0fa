// fuzz/fuzz_targets/decompress_fuzz.rs
#![no_main]
use compress::Decompressor;
use fuzz::helpers;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut d) = Decompressor::new() {
        let _ = d.decompress(data, Vec::new());
    }
    if let Ok(mut d) = Decompressor::with_window_bits(-15) {
        for chunk in helpers::chunks(data) {
            match d.decompress_stream(chunk) {
                Ok((consumed, _)) => assert!(consumed <= chunk.len()),
                Err(_) => break,
            }
        }
        let _ = d.close();
    }
});
