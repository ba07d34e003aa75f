#![allow(clippy::needless_range_loop)]

mod support;

use satjpeg_rs::{
    Bits, Channel, ChannelLayout, CodeTableSet, ColorMatrix, DecodeError, DecodeOptions,
    FrameAssembler, TableId, TableLayout, decode, decode_with_tables,
};
use support::PayloadWriter;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn single_codeword_tables_decode_a_flat_mcu() {
    const ONE_BIT: [u8; 17] = [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    // DC tables only know a one-bit value, AC tables only know end-of-block.
    let layouts = [
        TableLayout { counts: &ONE_BIT, symbols: &[0x01] },
        TableLayout { counts: &ONE_BIT, symbols: &[0x00] },
        TableLayout { counts: &ONE_BIT, symbols: &[0x01] },
        TableLayout { counts: &ONE_BIT, symbols: &[0x00] },
    ];
    // Every codeword is "0", padded with zeros.
    let tables = CodeTableSet::load_with_layouts(&[0x00][..], &layouts).unwrap();

    // Per channel: DC codeword, value bit "0", end-of-block.
    let frame =
        decode_with_tables(&tables, &[0x00, 0x00][..], &DecodeOptions::with_mcu_count(1)).unwrap();
    assert_eq!((frame.width(), frame.height(), frame.channels()), (8, 8, 3));

    let expected = ColorMatrix::Studio.to_rgb(0.0, 0.0, 0.0);
    for pixel in frame.samples().chunks(3) {
        for c in 0..3 {
            assert!(close(pixel[c], expected[c]), "{pixel:?}");
        }
    }
}

#[test]
fn dc_differences_resolve_to_absolute_values() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Color);
    // Differences 5, -2, 3 on every channel.
    for dc in [5, 3, 6, 6] {
        writer.flat_mcu(dc);
    }
    let payload = writer.finish();

    let mut assembler =
        FrameAssembler::new(&tables, &payload[..], DecodeOptions::with_mcu_count(4)).unwrap();
    let mut levels = Vec::new();
    while let Some(mcu) = assembler.next_mcu().unwrap() {
        levels.push([Channel::Y, Channel::Cb, Channel::Cr].map(|c| mcu.block(c).unwrap()[0]));
    }
    assert_eq!(levels, vec![[5; 3], [3; 3], [6; 3], [6; 3]]);
}

#[test]
fn flat_color_frame_from_codes_source() {
    let tables = CodeTableSet::standard();
    let codes = tables.to_bytes();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Color);
    for _ in 0..4 {
        writer.flat_mcu(0);
    }
    let payload = writer.finish();

    let frame = decode(&codes[..], &payload[..], &DecodeOptions::with_mcu_count(4)).unwrap();
    assert_eq!((frame.width(), frame.height(), frame.channels()), (16, 16, 3));

    let expected = ColorMatrix::Studio.to_rgb(0.0, 0.0, 0.0);
    for y in 0..16 {
        for x in 0..16 {
            let pixel = frame.pixel(x, y).unwrap();
            for c in 0..3 {
                assert!(close(pixel[c], expected[c]), "({x}, {y}): {pixel:?}");
            }
        }
    }
}

#[test]
fn dc_levels_chain_across_tiles() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Greyscale);
    for dc in [2, -1, 0, 3] {
        writer.flat_mcu(dc);
    }
    let payload = writer.finish();

    let frame = decode_with_tables(
        &tables,
        &payload[..],
        &DecodeOptions::with_mcu_count(4).greyscale(),
    )
    .unwrap();

    // Luminance DC step is 16 and a flat block holds DC / 8.
    assert!(close(frame.pixel(3, 3).unwrap()[0], 132.0));
    assert!(close(frame.pixel(12, 1).unwrap()[0], 126.0));
    assert!(close(frame.pixel(0, 15).unwrap()[0], 128.0));
    assert!(close(frame.pixel(15, 15).unwrap()[0], 134.0));
}

#[test]
fn first_ac_coefficient_is_a_horizontal_cosine() {
    let tables = CodeTableSet::standard();
    let mut block = [0; 64];
    block[1] = 4;
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Greyscale);
    writer.mcu(&[block]);
    let payload = writer.finish();

    let frame = decode_with_tables(
        &tables,
        &payload[..],
        &DecodeOptions::with_mcu_count(1).greyscale(),
    )
    .unwrap();

    // 4 * 11 scaled by c(0) * c(1) / 4.
    let amplitude = 44.0 * std::f32::consts::FRAC_1_SQRT_2 / 4.0;
    for x in 0..8 {
        let expected = 128.0 + amplitude * ((2 * x + 1) as f32 * std::f32::consts::PI / 16.0).cos();
        for y in 0..8 {
            assert!(
                (frame.pixel(x, y).unwrap()[0] - expected).abs() < 1e-3,
                "({x}, {y}): {} vs {expected}",
                frame.pixel(x, y).unwrap()[0]
            );
        }
    }
}

#[test]
fn long_zero_runs_and_late_coefficients() {
    let tables = CodeTableSet::standard();
    let mut block = [0; 64];
    block[0] = 1;
    block[40] = -3;
    block[63] = 2;
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Color);
    writer.mcu(&[block, block, block]);
    let payload = writer.finish();

    let options = DecodeOptions::with_mcu_count(1);
    let mut assembler = FrameAssembler::new(&tables, &payload[..], options).unwrap();
    let mcu = assembler.next_mcu().unwrap().unwrap();
    for channel in [Channel::Y, Channel::Cb, Channel::Cr] {
        assert_eq!(mcu.block(channel).unwrap(), &block);
    }
    assert!(assembler.next_mcu().unwrap().is_none());
}

#[test]
fn dimensions_cover_the_grid_and_crop_trims_it() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Color);
    writer.flat_mcu(1).flat_mcu(1);
    let payload = writer.finish();

    let frame =
        decode_with_tables(&tables, &payload[..], &DecodeOptions::with_dimensions(12, 5)).unwrap();
    assert_eq!((frame.width(), frame.height()), (16, 8));

    let cropped = frame.crop(12, 5).unwrap();
    assert_eq!((cropped.width(), cropped.height()), (12, 5));
    assert_eq!(cropped.samples().len(), 12 * 5 * 3);
    assert_eq!(cropped.pixel(11, 4), frame.pixel(11, 4));
    assert_eq!(cropped.pixel(12, 4), None);
}

#[test]
fn oversized_dimensions_are_rejected_before_decoding() {
    let tables = CodeTableSet::standard();
    let options = DecodeOptions::with_dimensions(1 << 40, 1 << 40).greyscale();
    let err = decode_with_tables(&tables, &[0x4a; 4][..], &options).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidArgument(_)), "{err}");
}

#[test]
fn until_exhausted_reads_every_mcu() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Greyscale);
    for _ in 0..9 {
        writer.flat_mcu(0);
    }
    // A flat greyscale MCU is "010" "0" "1010" with the standard tables.
    assert_eq!(writer.bit_len(), 9 * 8);
    let payload = writer.finish();
    assert_eq!(payload, vec![0x4a; 9]);

    let frame = decode_with_tables(
        &tables,
        &payload[..],
        &DecodeOptions::until_exhausted().greyscale(),
    )
    .unwrap();
    assert_eq!((frame.width(), frame.height()), (24, 24));
}

#[test]
fn truncated_payload_fails_with_mcu_context() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Color);
    for _ in 0..4 {
        writer.flat_mcu(3);
    }
    let payload = writer.finish();

    let err = decode_with_tables(
        &tables,
        &payload[..payload.len() / 2],
        &DecodeOptions::with_mcu_count(4),
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::Mcu { .. }), "{err}");
    assert!(matches!(err.root(), DecodeError::StreamExhausted { .. }), "{err}");
}

#[test]
fn unknown_codeword_is_reported() {
    let tables = CodeTableSet::standard();
    let err = decode_with_tables(&tables, &[0xff, 0xff][..], &DecodeOptions::with_mcu_count(1))
        .unwrap_err();
    match err {
        DecodeError::Mcu {
            index: 0,
            channel: Channel::Y,
            source,
        } => match *source {
            DecodeError::UnknownCode { table, bits } => {
                assert_eq!(table, TableId::LumDc);
                assert_eq!(bits, Bits::parse("111111111").unwrap());
            }
            other => panic!("unexpected error {other:?}"),
        },
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn trailing_payload_is_ignored_in_count_mode() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Greyscale);
    writer.flat_mcu(0).flat_mcu(0);
    let payload = writer.finish();

    let frame = decode_with_tables(
        &tables,
        &payload[..],
        &DecodeOptions::with_mcu_count(1).greyscale(),
    )
    .unwrap();
    assert_eq!(frame.samples().len(), 64);
}

#[test]
fn full_range_matrix_is_selectable() {
    let tables = CodeTableSet::standard();
    let mut writer = PayloadWriter::new(&tables, ChannelLayout::Color);
    writer.flat_mcu(0);
    let payload = writer.finish();

    let options = DecodeOptions::with_mcu_count(1).color_matrix(ColorMatrix::FullRange);
    let frame = decode_with_tables(&tables, &payload[..], &options).unwrap();
    assert!(frame.samples().iter().all(|&s| close(s, 128.0)));
}

#[test]
fn custom_codes_source_round_trips() {
    let tables = CodeTableSet::standard();
    let mut codes = Vec::new();
    tables.write_codes(&mut codes).unwrap();
    let loaded = CodeTableSet::load(&codes[..]).unwrap();

    let mut writer = PayloadWriter::new(&loaded, ChannelLayout::Greyscale);
    writer.flat_mcu(-5);
    let payload = writer.finish();
    let frame = decode_with_tables(
        &loaded,
        &payload[..],
        &DecodeOptions::with_mcu_count(1).greyscale(),
    )
    .unwrap();
    assert!(close(frame.pixel(0, 0).unwrap()[0], 118.0));
}
