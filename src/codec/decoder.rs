// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Nybble stream decoder

use core::num::NonZeroUsize;

use crate::types::Nonsequential;

use super::error::Error;
use super::record::{Data, DataReason, DecompressedRecord, Group, PackedRecord};
use super::tag::{self, Tag};

/// A decoder for nybble streams
///
/// The decoder operates on a byte slice holding two nybbles per byte, the
/// first one in the lower half. Each call to
/// [`decode_record`][Self::decode_record] parses one logical record: all
/// groups that follow each other in the fixed emission order. A leading skip
/// nybble is consumed on its own and yields an empty record.
///
/// The decoder only advances if a record was decoded successfully. If a record
/// could not be decoded due to insufficient data, the decoder will report
/// this by emitting an [`Error::Truncated`] error. A reserved tag at the start
/// of a record is reported as [`Error::ReservedTag`].
///
/// Decoders are created via a [`Builder`][super::Builder].
///
/// # Example
///
/// ```
/// use nybble_trace::codec;
///
/// # let trace_data = b"\x83\x2c\x00\x10";
/// let mut decoder = codec::builder().decoder(trace_data);
/// while decoder.nybbles_left() > 0 {
///     let record = decoder.decode_record().unwrap();
///     println!("{record}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Decoder<'d> {
    data: &'d [u8],
    len: usize,
    nybble_pos: usize,
}

impl<'d> Decoder<'d> {
    /// Create a new decoder
    pub(super) fn new(data: &'d [u8]) -> Self {
        Self {
            data,
            len: data.len() * 2,
            nybble_pos: 0,
        }
    }

    /// Restrict the stream to the given number of nybbles
    ///
    /// Use this fn if the stream ends in the middle of a byte. The length is
    /// capped at the number of nybbles in the underlying data.
    pub fn with_len(self, len: usize) -> Self {
        Self {
            len: len.min(self.data.len() * 2),
            ..self
        }
    }

    /// Move the cursor to the given nybble position
    pub fn seek(&mut self, nybble_pos: usize) {
        self.nybble_pos = nybble_pos;
    }

    /// Retrieve the number of nybbles left in this decoder's data
    pub fn nybbles_left(&self) -> usize {
        self.len.saturating_sub(self.nybble_pos)
    }

    /// Retrieve the current nybble position
    pub fn nybble_pos(&self) -> usize {
        self.nybble_pos
    }

    /// Reset the inner data to the given byte slice
    pub fn reset(&mut self, data: &'d [u8]) {
        *self = Self::new(data);
    }

    /// Decode a single [`DecompressedRecord`]
    ///
    /// On success, the decoder is advanced past the record. On failure, the
    /// position is left unchanged.
    pub fn decode_record(&mut self) -> Result<DecompressedRecord, Error> {
        let (record, consumed) = self.parse()?;
        let res = DecompressedRecord::try_from(&record).inspect_err(|e| {
            log::debug!("Bad payload at nybble {}: {e}", self.nybble_pos);
        })?;
        self.nybble_pos += consumed;
        Ok(res)
    }

    /// Decode a single [`PackedRecord`]
    ///
    /// Decodes the groups of a single record without interpreting data
    /// payloads. On success, the decoder is advanced past the record. On
    /// failure, the position is left unchanged.
    pub fn decode_packed(&mut self) -> Result<PackedRecord, Error> {
        let (record, consumed) = self.parse()?;
        self.nybble_pos += consumed;
        Ok(record)
    }

    /// Parse a single record at the current position
    ///
    /// Returns the record and the number of nybbles it occupies.
    fn parse(&self) -> Result<(PackedRecord, usize), Error> {
        let mut pos = self.nybble_pos;
        let mut record = PackedRecord::default();

        if self.read(&mut pos)? == tag::SKIP {
            return Ok((record, 1));
        }
        pos = self.nybble_pos;

        while let Some(nybble) = self.nybble(pos) {
            let tag = Tag::classify(nybble);
            let rank = match tag {
                Tag::Skip => break,
                Tag::Reserved(t) if record.is_skip() => {
                    log::debug!("Reserved tag {t:#06b} at nybble {pos}");
                    return Err(Error::ReservedTag(t));
                }
                Tag::Reserved(_) => break,
                Tag::Sequential(_) => 0,
                Tag::Nonsequential(_) => 1,
                Tag::Breakpoint => 2,
                Tag::Data => 3,
            };
            if record.groups().last().is_some_and(|g| g.rank() >= rank) {
                break;
            }

            let mut next = pos + 1;
            let group = match tag {
                Tag::Sequential(count) => Group::Sequential(count),
                Tag::Nonsequential(code) => Group::Nonsequential(Nonsequential::from_code(code)),
                Tag::Breakpoint => Group::Breakpoint(self.read(&mut next)?),
                Tag::Data => Group::Data(self.read_data(&mut next)?),
                Tag::Skip | Tag::Reserved(_) => break,
            };
            record.push(group)?;
            pos = next;
        }

        log::trace!("Decoded {record:?} at nybble {}", self.nybble_pos);
        Ok((record, pos - self.nybble_pos))
    }

    /// Read the length field and payload of a data item
    fn read_data(&self, pos: &mut usize) -> Result<Data, Error> {
        let len = self.read(pos)?;
        let pairs = len & 0b111;
        if pairs > tag::MAX_DATA_PAIRS {
            log::debug!("Data item of {pairs} pairs at nybble {}", *pos - 1);
            return Err(Error::DataTooLong(pairs));
        }

        let nybbles = usize::from(pairs) * 2;
        if let Some(missing) = NonZeroUsize::new(nybbles.saturating_sub(self.len - *pos)) {
            return Err(Error::Truncated(missing));
        }
        let value = (0..nybbles)
            .filter_map(|i| self.nybble(*pos + i))
            .rev()
            .fold(0u64, |acc, n| (acc << 4) | u64::from(n));
        *pos += nybbles;

        Ok(Data::new(DataReason::from_bit(len & 0b1000 != 0), value))
    }

    /// Read the nybble at the given position and advance it
    fn read(&self, pos: &mut usize) -> Result<u8, Error> {
        let res = self
            .nybble(*pos)
            .ok_or(Error::Truncated(NonZeroUsize::MIN))?;
        *pos += 1;
        Ok(res)
    }

    /// Retrieve the nybble at the given position
    fn nybble(&self, pos: usize) -> Option<u8> {
        if pos >= self.len {
            return None;
        }
        self.data.get(pos >> 1).map(|b| (b >> (4 * (pos & 1))) & 0xf)
    }
}

/// Decode a single record from a nybble stream
///
/// Decodes the record starting at the nybble position `cursor` in `stream`.
/// Returns the record and the number of nybbles consumed, by which the caller
/// should advance its cursor.
///
/// # Example
///
/// ```
/// use nybble_trace::codec;
///
/// let stream = b"\x83\x2c\x00\x10";
/// let (record, consumed) = codec::decode(stream, 0).unwrap();
/// assert_eq!(consumed, 8);
/// assert_eq!(record.sequential, Some(3));
/// assert!(record.trap());
/// assert_eq!(record.pc, Some(0x1000));
/// ```
pub fn decode(stream: &[u8], cursor: usize) -> Result<(DecompressedRecord, usize), Error> {
    let mut decoder = Decoder::new(stream);
    decoder.seek(cursor);
    decoder.decode_record().map(|r| (r, decoder.nybble_pos() - cursor))
}
