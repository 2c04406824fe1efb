// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Decoder tests
use super::*;

macro_rules! decode_test {
    ($n:ident, [$($b:literal),*], $( $r:expr ),*) => {
        #[test]
        fn $n() {
            let stream: &[u8] = &[$($b),*];
            let data = pack_nybbles(stream);
            let mut decoder = builder().decoder(&data).with_len(stream.len());
            $(
                let (expected, consumed): (DecompressedRecord, usize) = $r;
                let pos = decoder.nybble_pos();
                assert_eq!(decoder.decode_record(), Ok(expected));
                assert_eq!(decoder.nybble_pos() - pos, consumed);
            )*
            assert_eq!(decoder.nybbles_left(), 0);
        }
    };
}

macro_rules! decode_fault_test {
    ($n:ident, [$($b:literal),*], $skip:literal, $e:expr) => {
        #[test]
        fn $n() {
            let stream: &[u8] = &[$($b),*];
            let data = pack_nybbles(stream);
            let mut decoder = builder().decoder(&data).with_len(stream.len());
            for _ in 0..$skip {
                decoder.decode_record().expect("Could not decode leading record");
            }
            let pos = decoder.nybble_pos();
            assert_eq!(decoder.decode_record(), Err($e));
            assert_eq!(decoder.nybble_pos(), pos);
        }
    };
}

fn record() -> DecompressedRecord {
    Default::default()
}

decode_test!(
    skip,
    [0b0000, 0b0000],
    (record(), 1),
    (record(), 1)
);
decode_test!(
    trap_scenario,
    [0b0011, 0b1000, 0b1100, 0b0010, 0x0, 0x0, 0x0, 0x1],
    (
        DecompressedRecord {
            sequential: Some(3),
            nonsequential: Some(Nonsequential::Trap),
            pc: Some(0x1000),
            ..record()
        },
        8
    )
);
decode_test!(
    consecutive_sequential,
    [0b0111, 0b0111, 0b0001],
    (DecompressedRecord { sequential: Some(7), ..record() }, 1),
    (DecompressedRecord { sequential: Some(7), ..record() }, 1),
    (DecompressedRecord { sequential: Some(1), ..record() }, 1)
);
decode_test!(
    stops_at_skip,
    [0b0010, 0b0000, 0b1011],
    (DecompressedRecord { sequential: Some(2), ..record() }, 1),
    (record(), 1),
    (DecompressedRecord { nonsequential: Some(Nonsequential::Branch), ..record() }, 1)
);
decode_test!(
    stops_after_data,
    [0b1100, 0b0000, 0b1100, 0b1001, 0x1, 0x0],
    (DecompressedRecord { pc: Some(0), ..record() }, 2),
    (
        DecompressedRecord {
            writeback: Some(Writeback { register: 1, value: 0 }),
            ..record()
        },
        4
    )
);
decode_test!(
    breakpoint_then_sequential,
    [0b1101, 0b0100, 0b0101],
    (DecompressedRecord { breakpoint: Some(4), ..record() }, 2),
    (DecompressedRecord { sequential: Some(5), ..record() }, 1)
);
decode_test!(
    all_groups,
    [0b0001, 0b1001, 0b1101, 0b1111, 0b1100, 0b0001, 0xe, 0xf],
    (
        DecompressedRecord {
            sequential: Some(1),
            nonsequential: Some(Nonsequential::Return),
            pc: Some(0xfe),
            breakpoint: Some(0xf),
            ..record()
        },
        8
    )
);
decode_test!(
    writeback,
    [0b1100, 0b1101, 0x1, 0x1, 0xf, 0xe, 0xe, 0xb, 0xd, 0xa, 0xe, 0xd],
    (
        DecompressedRecord {
            writeback: Some(Writeback { register: 17, value: 0xdead_beef }),
            ..record()
        },
        12
    )
);
decode_test!(
    reserved_nybble_in_payload,
    [0b1100, 0b0001, 0b1110, 0b1111],
    (DecompressedRecord { pc: Some(0xfe), ..record() }, 4)
);

decode_fault_test!(empty, [], 0, Error::Truncated(NonZeroUsize::MIN));
decode_fault_test!(reserved_tag, [0b1110, 0b0001], 0, Error::ReservedTag(0b1110));
decode_fault_test!(
    reserved_tag_after_groups,
    [0b0001, 0b1111, 0b0001],
    1,
    Error::ReservedTag(0b1111)
);
decode_fault_test!(
    truncated_breakpoint,
    [0b0001, 0b1101],
    0,
    Error::Truncated(NonZeroUsize::MIN)
);
decode_fault_test!(
    truncated_data_length,
    [0b1100],
    0,
    Error::Truncated(NonZeroUsize::MIN)
);
decode_fault_test!(
    truncated_payload,
    [0b1100, 0b0011, 0x1, 0x2],
    0,
    Error::Truncated(NonZeroUsize::new(4).unwrap())
);
decode_fault_test!(data_too_long, [0b1100, 0b0110], 0, Error::DataTooLong(6));
decode_fault_test!(
    pc_too_wide,
    [0b1100, 0b0101, 0, 0, 0, 0, 0, 0, 0, 0, 0x1, 0],
    0,
    Error::BadPayload(DataReason::Pc, 1 << 32)
);
decode_fault_test!(
    bad_register,
    [0b1100, 0b1001, 0x0, 0x2],
    0,
    Error::BadPayload(DataReason::Writeback, 0x20)
);

#[test]
fn reserved_tag_not_passed() {
    let data = pack_nybbles(&[0b0011, 0b1110]);
    let mut decoder = builder().decoder(&data);
    assert_eq!(
        decoder.decode_record().map(|r| r.sequential),
        Ok(Some(3))
    );
    assert_eq!(decoder.nybble_pos(), 1);
    for _ in 0..2 {
        assert_eq!(decoder.decode_record(), Err(Error::ReservedTag(0b1110)));
        assert_eq!(decoder.nybble_pos(), 1);
    }
}

#[test]
fn decode_at_cursor() {
    let stream = b"\x83\x2c\x00\x10\x07";
    let (first, consumed) = decode(stream, 0).expect("Could not decode");
    assert!(first.trap());
    assert_eq!(consumed, 8);
    let (second, consumed) = decode(stream, 8).expect("Could not decode");
    assert_eq!(second.sequential, Some(7));
    assert_eq!(consumed, 1);
    let (third, consumed) = decode(stream, 9).expect("Could not decode");
    assert!(third.is_empty());
    assert_eq!(consumed, 1);
    assert_eq!(decode(stream, 10), Err(Error::Truncated(NonZeroUsize::MIN)));
}

#[test]
fn decode_packed() {
    let data = pack_nybbles(&[0b1100, 0b1001, 0x0, 0x2]);
    let mut decoder = builder().decoder(&data);
    let packed = decoder.decode_packed().expect("Could not decode");
    assert_eq!(packed.data(), Some(Data::new(DataReason::Writeback, 0x20)));
    assert_eq!(decoder.nybbles_left(), 0);
}

#[test]
fn reset() {
    let mut decoder = builder().decoder(b"\x21");
    decoder.decode_record().expect("Could not decode");
    assert_eq!(decoder.nybble_pos(), 1);
    decoder.reset(b"\x07");
    assert_eq!(decoder.nybble_pos(), 0);
    assert_eq!(decoder.nybbles_left(), 2);
    assert_eq!(
        decoder.decode_record().map(|r| r.sequential),
        Ok(Some(7))
    );
}
