#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: i32, height: i32, bpp: u16, compression: u32, extra: &[u8], rows: usize) -> Vec<u8> {
    let data_offset = 54 + extra.len();
    let mut bmp = vec![0u8; data_offset];
    bmp[0] = b'B';
    bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&((data_offset + rows) as u32).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&(data_offset as u32).to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // info header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp[30..34].copy_from_slice(&compression.to_le_bytes());
    bmp[34..38].copy_from_slice(&(rows as u32).to_le_bytes()); // image size
    bmp[54..].copy_from_slice(extra);
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit
    let mut bmp = header(1, 1, 24, 0, &[], 4);
    bmp.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
    fs::write(format!("{dir}/bmp24_1x1.bmp"), bmp).unwrap();

    // 2x2 32-bit, top-down
    let mut bmp = header(2, -2, 32, 0, &[], 16);
    bmp.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
    fs::write(format!("{dir}/bmp32_2x2_topdown.bmp"), bmp).unwrap();

    // 3x1 1-bit, two-entry palette
    let mut bmp = header(3, 1, 1, 0, &[0, 0, 0, 0, 255, 255, 255, 0], 4);
    bmp.extend_from_slice(&[0b1010_0000, 0, 0, 0]);
    fs::write(format!("{dir}/bmp1_3x1.bmp"), bmp).unwrap();

    // 2x1 8-bit, short palette
    let mut bmp = header(2, 1, 8, 0, &[10, 20, 30, 0], 4);
    bmp.extend_from_slice(&[0, 200, 0, 0]);
    fs::write(format!("{dir}/bmp8_short_palette.bmp"), bmp).unwrap();

    // 1x1 16-bit, 5-6-5 masks
    let mut masks = Vec::new();
    for m in [0xF800u32, 0x07E0, 0x001F] {
        masks.extend_from_slice(&m.to_le_bytes());
    }
    let mut bmp = header(1, 1, 16, 3, &masks, 4);
    bmp.extend_from_slice(&[0xE0, 0x07, 0, 0]);
    fs::write(format!("{dir}/bmp16_565.bmp"), bmp).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut rle = header(1, 1, 8, 1, &[], 4);
    rle.extend_from_slice(&[0; 4]);
    fs::write(format!("{dir}/bmp_rle8.bin"), rle).unwrap();
    fs::write(format!("{dir}/bmp_no_pixels.bin"), header(4, 4, 24, 0, &[], 48)).unwrap();

    println!("Generated seed corpus in {dir}/");
}
