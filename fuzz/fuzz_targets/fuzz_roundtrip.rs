#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    let Ok(reencoded) = encode(&decoded, enough::Unstoppable) else {
        return;
    };
    let Ok(decoded2) = decode(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());
    assert_eq!(decoded.bit_depth(), decoded2.bit_depth());

    match decoded.bit_depth() {
        BitDepth::TwentyFour | BitDepth::ThirtyTwo => {
            assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
        }
        _ => {
            // Palettes may hold duplicates and 16-bit masks are normalized to
            // 5-5-5, so only the bytes written the second time are stable.
            let again = encode(&decoded2, enough::Unstoppable).unwrap();
            assert_eq!(reencoded, again, "re-encode not idempotent");
        }
    }
});
