// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Types not specific to the [packer][crate::packer] or [codec][crate::codec]


use core::fmt;

/// RISC-V priviledge levels
#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Hash)]
pub enum Privilege {
    #[default]
    User,
    Supervisor,
    Machine,
}

impl TryFrom<u8> for Privilege {
    type Error = u8;

    fn try_from(num: u8) -> Result<Self, Self::Error> {
        match num {
            0b00 => Ok(Self::User),
            0b01 => Ok(Self::Supervisor),
            0b11 => Ok(Self::Machine),
            err => Err(err),
        }
    }
}

impl From<Privilege> for u8 {
    fn from(p: Privilege) -> Self {
        match p {
            Privilege::User => 0b00,
            Privilege::Supervisor => 0b01,
            Privilege::Machine => 0b11,
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privilege::User => write!(f, "U"),
            Privilege::Supervisor => write!(f, "S"),
            Privilege::Machine => write!(f, "M"),
        }
    }
}

/// Reason for a nonsequential event
///
/// A nonsequential event is any change of control flow that is not explained
/// by a simple increment of the program counter. The discriminant is the
/// two-bit reason code used in the trace stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Nonsequential {
    /// A trap (exception or interrupt) was taken
    Trap,
    /// A trap return (`xret`) was executed
    Return,
    /// An indirect jump (`jalr`) was taken
    IndirectJump,
    /// Any other taken branch
    Branch,
}

impl Nonsequential {
    /// All reasons, ordered by their reason code
    pub const ALL: [Self; 4] = [Self::Trap, Self::Return, Self::IndirectJump, Self::Branch];

    /// Create a reason from the lower two bits of `code`
    pub fn from_code(code: u8) -> Self {
        Self::ALL[usize::from(code & 0b11)]
    }

    /// Retrieve the two-bit reason code
    pub fn code(self) -> u8 {
        match self {
            Self::Trap => 0b00,
            Self::Return => 0b01,
            Self::IndirectJump => 0b10,
            Self::Branch => 0b11,
        }
    }
}

impl fmt::Display for Nonsequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trap => write!(f, "trap"),
            Self::Return => write!(f, "ret"),
            Self::IndirectJump => write!(f, "jalr"),
            Self::Branch => write!(f, "branch"),
        }
    }
}
