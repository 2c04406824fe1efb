// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Codec-specific error types

use core::fmt;
use core::num::NonZeroUsize;

use super::record::{DataReason, Group};

/// Record construction, encoding and decoding errors
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Error {
    /// A reserved tag was encountered where a record starts
    ReservedTag(u8),
    /// Some more nybbles of data are required for the operation to succeed
    Truncated(NonZeroUsize),
    /// A data item's length field requests more nybble pairs than allowed
    DataTooLong(u8),
    /// A data item's payload does not fit its reason
    BadPayload(DataReason, u64),
    /// A group was added out of order or more than once
    GroupOrder(Group),
    /// A group's value exceeds the width of its field
    InvalidGroup(Group),
    /// The target buffer is too small for the encoded data
    BufferTooSmall,
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedTag(t) => write!(f, "Reserved tag {t:#06b}"),
            Self::Truncated(n) => write!(f, "At least {n} more nybbles of data are required"),
            Self::DataTooLong(n) => write!(f, "Data item of {n} nybble pairs is too long"),
            Self::BadPayload(r, v) => write!(f, "Payload {v:#x} is not a valid {r} payload"),
            Self::GroupOrder(g) => write!(f, "Group {g:?} out of order"),
            Self::InvalidGroup(g) => write!(f, "Invalid group {g:?}"),
            Self::BufferTooSmall => write!(f, "Reached end of buffer while writing"),
        }
    }
}
