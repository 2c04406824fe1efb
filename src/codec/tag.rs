// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Tag space of the nybble stream
//!
//! | Tag pattern        | Meaning                                        |
//! |--------------------|------------------------------------------------|
//! | `0000`             | skip                                           |
//! | `0SSS`             | `SSS` (1 to 7) sequential retirements          |
//! | `10RR`             | nonsequential event with reason `RR`           |
//! | `1100 RNNN {DDDD}` | data item, reason `R`, `2 * NNN` data nybbles  |
//! | `1101 NNNN`        | breakpoint with reason `NNNN`                  |
//! | `111x`             | reserved                                       |

/// Skip nybble
pub const SKIP: u8 = 0b0000;

/// Nonsequential tag, reason in the lower two bits
pub const NONSEQUENTIAL: u8 = 0b1000;

/// Data item tag
pub const DATA: u8 = 0b1100;

/// Breakpoint tag
pub const BREAKPOINT: u8 = 0b1101;

/// Maximum number of nybble pairs a data item may carry
pub const MAX_DATA_PAIRS: u8 = 5;

/// Classification of a leading nybble
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    /// Skip nybble, ending the current record
    Skip,
    /// Sequential group with the given count
    Sequential(u8),
    /// Nonsequential group with the given two-bit reason code
    Nonsequential(u8),
    /// Data item tag, followed by a length nybble and the payload
    Data,
    /// Breakpoint tag, followed by the reason nybble
    Breakpoint,
    /// Reserved tag
    Reserved(u8),
}

impl Tag {
    /// Classify the given nybble
    ///
    /// Only the lower four bits of `nybble` are considered.
    pub fn classify(nybble: u8) -> Self {
        match nybble & 0xf {
            SKIP => Self::Skip,
            n @ 0b0001..=0b0111 => Self::Sequential(n),
            n @ 0b1000..=0b1011 => Self::Nonsequential(n & 0b11),
            DATA => Self::Data,
            BREAKPOINT => Self::Breakpoint,
            n => Self::Reserved(n),
        }
    }
}
