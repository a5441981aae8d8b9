#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic, whatever the input
    let _ = zenbmp::BitmapInfo::from_bytes(data);

    let limits = zenbmp::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let Ok(bitmap) = zenbmp::DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Accessors and rescaling on whatever came out
    let _ = bitmap.pixel_clamped(-1, i32::MAX);
    let _ = zenbmp::rescale(&bitmap, zenbmp::RescaleMode::FitLongestSide, 16);
});
