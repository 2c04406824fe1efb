// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Compressed trace records

use core::fmt;

/// Compressed trace record
///
/// A compressed record holds up to 16 nybbles in a single `u64`, nybble 0
/// being the least significant one. Only the first [`valid`][Self::valid]
/// nybbles carry information. All other nybbles are zero.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompressedRecord {
    valid: u8,
    data: u64,
}

impl CompressedRecord {
    /// Maximum number of nybbles a record can hold
    pub const CAPACITY: u8 = 16;

    /// Create a record from raw parts
    ///
    /// Nybbles past `valid` are cleared. Returns [`None`] if `valid` exceeds
    /// the [`CAPACITY`][Self::CAPACITY].
    pub fn from_raw(valid: u8, data: u64) -> Option<Self> {
        let mask = 1u64
            .checked_shl(4 * u32::from(valid))
            .map(|b| b - 1)
            .unwrap_or(u64::MAX);
        (valid <= Self::CAPACITY).then_some(Self {
            valid,
            data: data & mask,
        })
    }

    /// Retrieve the number of valid nybbles
    pub fn valid(&self) -> u8 {
        self.valid
    }

    /// Retrieve the raw data, including trailing zero nybbles
    pub fn data(&self) -> u64 {
        self.data
    }

    /// Retrieve the nybble at the given index if it is valid
    pub fn get(&self, index: u8) -> Option<u8> {
        (index < self.valid).then(|| ((self.data >> (4 * index)) & 0xf) as u8)
    }

    /// Iterate over the valid nybbles
    pub fn nybbles(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.valid).filter_map(|i| self.get(i))
    }

    /// Determine whether the record holds no nybbles
    pub fn is_empty(&self) -> bool {
        self.valid == 0
    }

    /// Append a nybble
    ///
    /// # Note
    ///
    /// Panics if the record is already full.
    pub(super) fn push(&mut self, nybble: u8) {
        assert!(self.valid < Self::CAPACITY, "Compressed record overflow");
        self.data |= u64::from(nybble & 0xf) << (4 * self.valid);
        self.valid += 1;
    }
}

impl fmt::Debug for CompressedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedRecord")
            .field("valid", &self.valid)
            .field("data", &format_args!("{:#018x}", self.data))
            .finish()
    }
}

impl fmt::Display for CompressedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for nybble in self.nybbles() {
            write!(f, "{sep}{nybble:04b}")?;
            sep = " ";
        }
        Ok(())
    }
}
