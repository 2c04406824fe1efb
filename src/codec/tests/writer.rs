// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Writer tests
use super::*;

fn sequential(count: u8) -> CompressedRecord {
    encode(&PackedRecord::from_groups([Group::Sequential(count)]).expect("Could not build"))
}

#[test]
fn odd_nybbles_padded() {
    let mut buffer = [0xffu8; 4];
    let mut writer = builder().writer(buffer.as_mut_slice());
    writer.write(&sequential(3)).expect("Could not write");
    writer.write(&sequential(2)).expect("Could not write");
    writer.write(&sequential(1)).expect("Could not write");
    assert_eq!(writer.nybbles(), 3);
    let (_, len) = writer.finish();
    assert_eq!(len, 2);
    assert_eq!(buffer, [0x23, 0x01, 0xff, 0xff]);
}

#[test]
fn empty_records_write_nothing() {
    let mut writer = builder().writer([0u8; 1]);
    writer.write(&encode(&PackedRecord::default())).expect("Could not write");
    assert_eq!(writer.finish().1, 0);
}

#[test]
fn buffer_too_small() {
    let record = PackedRecord::from_groups([Group::Data(Data::pc(0x1234_5678))])
        .expect("Could not build");
    let mut writer = builder().writer([0u8; 4]);
    writer.write(&sequential(1)).expect("Could not write");
    assert_eq!(writer.write(&encode(&record)), Err(Error::BufferTooSmall));
    assert_eq!(writer.nybbles(), 1);
    writer.write(&sequential(4)).expect("Could not write");
    let (buffer, len) = writer.finish();
    assert_eq!(&buffer[..len], &[0x41u8]);
}

#[cfg(feature = "alloc")]
#[test]
fn growing_buffer() {
    let encoder = builder().with_skip_fill(true).encoder();
    let mut writer = builder().writer(Vec::new());
    for _ in 0..5 {
        writer
            .write(&encoder.encode(&PackedRecord::default()))
            .expect("Could not write");
    }
    let (buffer, len) = writer.finish();
    assert_eq!(len, 3);
    assert_eq!(buffer, [0u8; 3]);
}
