// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Properties of the packer and codec over generated traces
use proptest::prelude::*;

use super::strategies::{packed_record, raw_record, trace_control};
use super::*;

use crate::codec::Error;

proptest! {
    #[test]
    fn trace_survives_compression(
        records in prop::collection::vec(raw_record(), 0..64),
        control in trace_control(),
    ) {
        let (stream, nybbles) = compress_with(&records, &control, false);
        let mut summary = Summary::default();
        decompress(&stream, nybbles)
            .iter()
            .for_each(|(r, _)| summary.add(r));
        prop_assert_eq!(summary, Summary::from_raw(&records, &control));
    }

    #[test]
    fn sequential_never_saturates(
        records in prop::collection::vec(raw_record(), 0..64),
        control in trace_control(),
    ) {
        let (stream, nybbles) = compress_with(&records, &control, true);
        for (record, _) in decompress(&stream, nybbles) {
            prop_assert!(record.sequential.is_none_or(|s| (1..=7).contains(&s)));
        }
    }

    #[test]
    fn single_record_round_trip(record in packed_record()) {
        let encoder = codec::builder().with_skip_fill(true).encoder();
        let compressed = encoder.encode(&record);
        prop_assert!(compressed.valid() <= codec::CompressedRecord::CAPACITY);
        prop_assert_eq!(compressed.valid(), record.nybbles().max(1));

        let mut writer = codec::builder().writer([0u8; 8]);
        writer.write(&compressed).expect("Could not write record");
        let (buffer, _) = writer.finish();
        let mut decoder = codec::builder()
            .decoder(&buffer)
            .with_len(compressed.valid().into());
        prop_assert_eq!(decoder.decode_packed(), Ok(record));
        prop_assert_eq!(decoder.nybbles_left(), 0);

        let expected = DecompressedRecord::try_from(&record).expect("Bad payload");
        prop_assert_eq!(codec::decode(&buffer, 0).map(|(r, _)| r), Ok(expected));
    }

    #[test]
    fn reserved_tag_surfaces(
        records in prop::collection::vec(packed_record(), 0..16),
        index in any::<prop::sample::Index>(),
        reserved in 0b1110u8..=0b1111,
    ) {
        let encoder = codec::builder().with_skip_fill(true).encoder();
        let position = index.index(records.len() + 1);
        let mut nybbles: Vec<u8> = Vec::new();
        let mut boundary = 0;
        for (i, record) in records.iter().enumerate() {
            if i == position {
                boundary = nybbles.len();
                nybbles.push(reserved);
            }
            nybbles.extend(encoder.encode(record).nybbles());
        }
        if position == records.len() {
            boundary = nybbles.len();
            nybbles.push(reserved);
        }

        let stream: Vec<u8> = nybbles
            .chunks(2)
            .map(|c| c[0] | c.get(1).map(|n| n << 4).unwrap_or(0))
            .collect();
        let mut decoder = codec::builder().decoder(&stream).with_len(nybbles.len());
        let error = loop {
            match decoder.decode_record() {
                Ok(_) => prop_assert!(decoder.nybble_pos() <= boundary),
                Err(e) => break e,
            }
        };
        prop_assert_eq!(error, Error::ReservedTag(reserved));
        prop_assert_eq!(decoder.nybble_pos(), boundary);
    }
}
