// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Packing errors

use core::fmt;

/// Errors that may be emitted for raw trace records violating their contract
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The writeback register index does not fit into 5 bits
    RegisterOutOfRange(u8),
    /// The breakpoint reason does not fit into 4 bits
    BreakpointReasonOutOfRange(u8),
    /// Both a branch target and a register writeback would need reporting
    ConflictingData,
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegisterOutOfRange(r) => write!(f, "register index {r} out of range"),
            Self::BreakpointReasonOutOfRange(r) => write!(f, "breakpoint reason {r} out of range"),
            Self::ConflictingData => write!(f, "more than one data item in a single cycle"),
        }
    }
}
