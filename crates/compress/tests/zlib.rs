// crates/compress/tests/zlib.rs
use compress::engine::Z_DATA_ERROR;
use compress::{
    Compressor, Decompressor, Error, STRATEGY_MEM_LEVEL, Z_BEST_COMPRESSION, Z_DEFAULT_COMPRESSION,
    Z_DEFAULT_STRATEGY, Z_FILTERED, Z_FIXED, Z_HUFFMAN_ONLY, Z_NO_COMPRESSION, Z_RLE,
};

const DATA: &[u8] = b"The quick brown fox jumps over the lazy dog, again and again and again";

fn roundtrip(c: &mut Compressor, d: &mut Decompressor) -> Vec<u8> {
    let compressed = c.compress(DATA, Vec::new()).expect("compress");
    let out = d.decompress(&compressed, Vec::new()).expect("decompress");
    assert_eq!(out, DATA);
    compressed
}

#[test]
fn every_level_roundtrips() {
    for level in Z_DEFAULT_COMPRESSION..=Z_BEST_COMPRESSION {
        let mut c = Compressor::new(level).expect("compressor");
        assert_eq!(c.level(), level);
        roundtrip(&mut c, &mut Decompressor::new().unwrap());
    }
}

fn words(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491u32;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if i % 7 == 6 { b' ' } else { b'a' + (state % 26) as u8 }
        })
        .collect()
}

fn compressed(mut c: Compressor, data: &[u8]) -> Vec<u8> {
    let out = c.compress(data, Vec::new()).unwrap();
    let back = Decompressor::new().unwrap().decompress(&out, Vec::new()).unwrap();
    assert_eq!(back, data);
    out
}

#[test]
fn strategies_reach_the_engine() {
    let data = b"abc".repeat(2000);
    let default = compressed(Compressor::with_strategy(9, Z_DEFAULT_STRATEGY).unwrap(), &data);
    let huffman = compressed(Compressor::with_strategy(9, Z_HUFFMAN_ONLY).unwrap(), &data);
    let rle = compressed(Compressor::with_strategy(9, Z_RLE).unwrap(), &data);
    assert_ne!(default, huffman);
    assert_ne!(default, rle);
    assert!(huffman.len() > default.len());
    for strategy in [Z_FILTERED, Z_FIXED] {
        let c = Compressor::with_strategy(6, strategy).unwrap();
        assert_eq!(c.params().strategy, strategy);
        compressed(c, &data);
    }
}

#[test]
fn mem_level_reaches_the_engine() {
    let data = words(20_000);
    let small = compressed(Compressor::raw(9, Z_DEFAULT_STRATEGY, 15, 1).unwrap(), &data);
    let large = compressed(Compressor::raw(9, Z_DEFAULT_STRATEGY, 15, 9).unwrap(), &data);
    assert_ne!(small, large);
    assert!(small.len() > large.len());
}

#[test]
fn strategy_constructor_matches_raw_settings() {
    let data = words(10_000);
    let via_strategy = compressed(Compressor::with_strategy(6, Z_FILTERED).unwrap(), &data);
    let via_raw = compressed(
        Compressor::raw(6, Z_FILTERED, 15, STRATEGY_MEM_LEVEL).unwrap(),
        &data,
    );
    assert_eq!(via_strategy, via_raw);
}

#[test]
fn small_inflate_window_survives_reset() {
    let narrow = Compressor::raw(6, Z_DEFAULT_STRATEGY, 9, 8)
        .unwrap()
        .compress(DATA, Vec::new())
        .unwrap();
    let wide = Compressor::new(6).unwrap().compress(DATA, Vec::new()).unwrap();

    let mut d = Decompressor::with_window_bits(9).unwrap();
    assert_eq!(d.decompress(&narrow, Vec::new()).unwrap(), DATA);
    assert_eq!(
        d.decompress(&wide, Vec::new()),
        Err(Error::EngineFailure { code: Z_DATA_ERROR })
    );
    d.reset().unwrap();
    assert_eq!(d.decompress(&narrow, Vec::new()).unwrap(), DATA);
}

#[test]
fn level_zero_stores_data() {
    let mut c = Compressor::new(Z_NO_COMPRESSION).unwrap();
    let compressed = roundtrip(&mut c, &mut Decompressor::new().unwrap());
    assert!(compressed.len() > DATA.len());
}

#[test]
fn raw_deflate_has_no_header() {
    let mut c = Compressor::raw(6, Z_DEFAULT_STRATEGY, -15, 8).unwrap();
    let mut d = Decompressor::with_window_bits(-15).unwrap();
    let compressed = roundtrip(&mut c, &mut d);
    assert_ne!(compressed[0], 0x78);
}

#[test]
fn gzip_wrapper_roundtrips_repeatedly() {
    let mut c = Compressor::raw(6, Z_DEFAULT_STRATEGY, 31, 8).unwrap();
    let mut d = Decompressor::with_window_bits(31).unwrap();
    for _ in 0..3 {
        let compressed = roundtrip(&mut c, &mut d);
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
    }
}

#[test]
fn small_window_roundtrips() {
    let mut c = Compressor::raw(6, Z_DEFAULT_STRATEGY, 9, 1).unwrap();
    let mut d = Decompressor::with_window_bits(0).unwrap();
    roundtrip(&mut c, &mut d);
}

#[test]
fn invalid_configuration_is_rejected() {
    let attempts = [
        Compressor::new(10),
        Compressor::new(-2),
        Compressor::with_strategy(6, 5),
        Compressor::with_strategy(6, -1),
        Compressor::raw(6, Z_DEFAULT_STRATEGY, 7, 8),
        Compressor::raw(6, Z_DEFAULT_STRATEGY, 16, 8),
        Compressor::raw(6, Z_DEFAULT_STRATEGY, 15, 0),
        Compressor::raw(6, Z_DEFAULT_STRATEGY, 15, 10),
    ];
    for attempt in attempts {
        let err = attempt.unwrap_err();
        assert!(matches!(err, Error::InitializationFailed { .. }), "{err:?}");
        assert!(err.to_string().contains("compression level might be invalid"));
    }
}

#[test]
fn flate2_decoders_read_our_output() {
    use std::io::Read;
    let mut c = Compressor::new(6).unwrap();
    let compressed = c.compress(DATA, Vec::new()).unwrap();
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out, DATA);
}
