// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Record encoder

use super::compressed::CompressedRecord;
use super::record::{Group, MAX_NYBBLES, PackedRecord};
use super::tag;

/// An encoder for [`PackedRecord`]s
///
/// An encoder serializes a single [`PackedRecord`] into a [`CompressedRecord`]
/// by emitting the tagged groups in order. Encoding can not fail: every
/// [`PackedRecord`] fits into a [`CompressedRecord`] by construction.
///
/// Encoders are created via a [`Builder`][super::Builder].
///
/// # Example
///
/// ```
/// use nybble_trace::codec::{self, Group, PackedRecord};
///
/// let record = PackedRecord::from_groups([Group::Sequential(5)]).unwrap();
/// let encoder = codec::builder().encoder();
/// assert_eq!(encoder.encode(&record).nybbles().collect::<Vec<_>>(), [0b0101]);
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Encoder {
    skip_fill: bool,
}

impl Encoder {
    /// Create a new encoder
    pub(super) fn new(skip_fill: bool) -> Self {
        Self { skip_fill }
    }

    /// Encode a single record
    ///
    /// A skip record encodes to either no nybbles at all or a single skip
    /// nybble, depending on the configuration.
    pub fn encode(&self, record: &PackedRecord) -> CompressedRecord {
        let mut res = CompressedRecord::default();
        if record.is_skip() {
            if self.skip_fill {
                res.push(tag::SKIP);
            }
            return res;
        }

        for group in record.groups() {
            match group {
                Group::Sequential(count) => res.push(*count),
                Group::Nonsequential(reason) => res.push(tag::NONSEQUENTIAL | reason.code()),
                Group::Breakpoint(reason) => {
                    res.push(tag::BREAKPOINT);
                    res.push(*reason);
                }
                Group::Data(data) => {
                    res.push(tag::DATA);
                    res.push((u8::from(data.reason().bit()) << 3) | data.pairs());
                    debug_assert_eq!(
                        record.data_layout().map(|l| l.offset),
                        Some(res.valid()),
                        "Data payload placed at unexpected offset",
                    );
                    (0..data.payload_nybbles())
                        .for_each(|i| res.push((data.value() >> (4 * u32::from(i))) as u8));
                }
            }
        }

        debug_assert_eq!(res.valid(), record.nybbles());
        debug_assert!(res.valid() <= MAX_NYBBLES);
        res
    }
}
