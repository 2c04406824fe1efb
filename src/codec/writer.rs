// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Nybble stream writer

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use super::compressed::CompressedRecord;
use super::error::Error;
use super::tag;

/// Byte buffer a [`Writer`] can write to
pub trait Buffer {
    /// Retrieve the byte at the given position for writing
    ///
    /// Growable buffers may grow by one byte if `pos` is equal to the current
    /// length. Returns [`None`] if the position is not available.
    fn byte_mut(&mut self, pos: usize) -> Option<&mut u8>;
}

impl Buffer for &mut [u8] {
    fn byte_mut(&mut self, pos: usize) -> Option<&mut u8> {
        self.get_mut(pos)
    }
}

impl<const N: usize> Buffer for [u8; N] {
    fn byte_mut(&mut self, pos: usize) -> Option<&mut u8> {
        self.get_mut(pos)
    }
}

#[cfg(feature = "alloc")]
impl Buffer for Vec<u8> {
    fn byte_mut(&mut self, pos: usize) -> Option<&mut u8> {
        if pos == self.len() {
            self.push(0);
        }
        self.get_mut(pos)
    }
}

/// A writer for nybble streams
///
/// The writer concatenates the valid nybbles of [`CompressedRecord`]s into a
/// [`Buffer`], two nybbles per byte with the first one in the lower half.
///
/// # Example
///
/// ```
/// use nybble_trace::codec::{self, Group, PackedRecord};
///
/// let encoder = codec::builder().encoder();
/// let mut writer = codec::builder().writer([0u8; 4]);
/// for count in [3, 2, 1] {
///     let record = PackedRecord::from_groups([Group::Sequential(count)]).unwrap();
///     writer.write(&encoder.encode(&record)).unwrap();
/// }
/// let (buffer, len) = writer.finish();
/// assert_eq!(&buffer[..len], &[0x23, 0x01]);
/// ```
#[derive(Clone, Debug)]
pub struct Writer<B: Buffer> {
    buffer: B,
    nybble_pos: usize,
}

impl<B: Buffer> Writer<B> {
    /// Create a new writer
    pub(super) fn new(buffer: B) -> Self {
        Self {
            buffer,
            nybble_pos: 0,
        }
    }

    /// Retrieve the number of nybbles written so far
    pub fn nybbles(&self) -> usize {
        self.nybble_pos
    }

    /// Write the valid nybbles of a single record
    ///
    /// If the record does not fit into the buffer, an error is returned and
    /// the writer is left at its previous position.
    pub fn write(&mut self, record: &CompressedRecord) -> Result<(), Error> {
        let start = self.nybble_pos;
        record
            .nybbles()
            .try_for_each(|n| self.write_nybble(n))
            .inspect_err(|_| self.nybble_pos = start)
    }

    /// Finish writing
    ///
    /// If an odd number of nybbles was written, the last byte is padded with a
    /// skip nybble. Returns the buffer and the number of bytes written.
    pub fn finish(self) -> (B, usize) {
        (self.buffer, self.nybble_pos.div_ceil(2))
    }

    /// Write a single nybble
    fn write_nybble(&mut self, nybble: u8) -> Result<(), Error> {
        let byte = self
            .buffer
            .byte_mut(self.nybble_pos >> 1)
            .ok_or(Error::BufferTooSmall)?;
        let nybble = nybble & 0xf;
        *byte = if self.nybble_pos & 1 == 0 {
            (tag::SKIP << 4) | nybble
        } else {
            (*byte & 0xf) | (nybble << 4)
        };
        self.nybble_pos += 1;
        Ok(())
    }
}
