// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Packed and decompressed trace records

use core::fmt;

use crate::types::Nonsequential;

use super::error::Error;
use super::tag;

/// A single group of trace information
///
/// Groups are the units a [`PackedRecord`] is composed of. Each kind of group
/// may appear at most once per record, and groups always appear in the order
/// of the variants of this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    /// Number of consecutive plain retirements (1 to 7)
    Sequential(u8),
    /// Nonsequential event
    Nonsequential(Nonsequential),
    /// Breakpoint with a 4-bit reason
    Breakpoint(u8),
    /// Data item
    Data(Data),
}

impl Group {
    /// Maximum number of consecutive retirements in a sequential group
    pub const MAX_SEQUENTIAL: u8 = 7;

    /// Position of this group in the fixed emission order
    pub fn rank(&self) -> u8 {
        match self {
            Self::Sequential(_) => 0,
            Self::Nonsequential(_) => 1,
            Self::Breakpoint(_) => 2,
            Self::Data(_) => 3,
        }
    }

    /// Number of nybbles this group occupies in the encoded stream
    pub fn nybbles(&self) -> u8 {
        match self {
            Self::Sequential(_) | Self::Nonsequential(_) => 1,
            Self::Breakpoint(_) => 2,
            Self::Data(d) => 2 + d.payload_nybbles(),
        }
    }

    /// Determine whether this group's values fit their fields
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Sequential(s) => (1..=Self::MAX_SEQUENTIAL).contains(s),
            Self::Nonsequential(_) => true,
            Self::Breakpoint(r) => *r <= 0xf,
            Self::Data(d) => d.value() <= Data::MAX_VALUE,
        }
    }
}

/// Reason for a data item
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataReason {
    /// The data is a program counter value
    Pc,
    /// The data is a register writeback
    Writeback,
}

impl DataReason {
    /// Retrieve the reason bit
    pub fn bit(self) -> bool {
        self == Self::Writeback
    }

    /// Create a reason from its reason bit
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::Writeback } else { Self::Pc }
    }
}

impl fmt::Display for DataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pc => write!(f, "PC"),
            Self::Writeback => write!(f, "writeback"),
        }
    }
}

/// Data item
///
/// A data item carries a payload of up to 40 bits. A program counter is
/// carried as is. A register writeback is carried as the register index in
/// the lowest byte and the written value in the 32 bits above.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Data {
    reason: DataReason,
    value: u64,
}

impl Data {
    /// Largest payload value
    pub const MAX_VALUE: u64 = (1 << 40) - 1;

    /// Create a new data item from its raw parts
    pub fn new(reason: DataReason, value: u64) -> Self {
        Self { reason, value }
    }

    /// Create a data item carrying a program counter
    pub fn pc(pc: u32) -> Self {
        Self::new(DataReason::Pc, pc.into())
    }

    /// Create a data item carrying a writeback of `value` to register `rd`
    pub fn writeback(rd: u8, value: u32) -> Self {
        Self::new(DataReason::Writeback, (u64::from(value) << 8) | u64::from(rd))
    }

    /// Retrieve the reason of this item
    pub fn reason(&self) -> DataReason {
        self.reason
    }

    /// Retrieve the raw payload value
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Number of nybble pairs needed for carrying the payload
    ///
    /// Leading zero pairs are not transmitted. A payload of zero thus needs
    /// no pairs at all.
    pub fn pairs(&self) -> u8 {
        (u64::BITS - self.value.leading_zeros()).div_ceil(8) as u8
    }

    /// Number of nybbles needed for carrying the payload
    pub fn payload_nybbles(&self) -> u8 {
        self.pairs() * 2
    }

    /// Interpret the payload according to this item's reason
    pub fn payload(&self) -> Result<Payload, Error> {
        let bad = || Error::BadPayload(self.reason, self.value);
        match self.reason {
            DataReason::Pc => u32::try_from(self.value).map(Payload::Pc).map_err(|_| bad()),
            DataReason::Writeback => {
                let register = (self.value & 0xff) as u8;
                if register > crate::trace::Record::MAX_REGISTER {
                    return Err(bad());
                }
                let value = u32::try_from(self.value >> 8).map_err(|_| bad())?;
                Ok(Payload::Writeback(Writeback { register, value }))
            }
        }
    }
}

/// Interpreted payload of a [`Data`] item
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Program counter value
    Pc(u32),
    /// Register writeback
    Writeback(Writeback),
}

/// A register writeback
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Writeback {
    /// Index of the register written
    pub register: u8,
    /// Value written
    pub value: u32,
}

/// Layout of a data payload within the encoded record
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Nybble at which the payload starts
    pub offset: u8,
    /// Number of payload nybbles
    pub nybbles: u8,
}

/// Packed trace record
///
/// A packed record consists of an ordered list of [`Group`]s to report for a
/// single cycle. A record without any groups denotes a skip. Records are
/// built by [`push`][Self::push]ing groups in order, which guarantees that
/// the encoded record fits into a [`CompressedRecord`][super::CompressedRecord].
///
/// # Example
///
/// ```
/// use nybble_trace::codec::{Data, Group, PackedRecord};
/// use nybble_trace::types::Nonsequential;
///
/// let record = PackedRecord::from_groups([
///     Group::Sequential(3),
///     Group::Nonsequential(Nonsequential::Trap),
///     Group::Data(Data::pc(0x1000)),
/// ])
/// .unwrap();
/// assert_eq!(record.nybbles(), 8);
/// assert_eq!(record.data_layout().map(|l| l.offset), Some(4));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedRecord {
    groups: [Option<Group>; 4],
    nybbles: u8,
    layout: Option<Layout>,
}

impl PackedRecord {
    /// Create a record from the given groups
    pub fn from_groups(groups: impl IntoIterator<Item = Group>) -> Result<Self, Error> {
        groups.into_iter().try_fold(Self::default(), Self::with)
    }

    /// Add a group, consuming and returning the record
    pub fn with(mut self, group: Group) -> Result<Self, Error> {
        self.push(group).map(|_| self)
    }

    /// Add a group to this record
    ///
    /// The group must come after all groups already present in the fixed
    /// emission order.
    pub fn push(&mut self, group: Group) -> Result<(), Error> {
        if !group.is_valid() {
            return Err(Error::InvalidGroup(group));
        }
        if self.groups().last().is_some_and(|g| g.rank() >= group.rank()) {
            return Err(Error::GroupOrder(group));
        }
        let slot = self
            .groups
            .iter_mut()
            .find(|g| g.is_none())
            .ok_or(Error::GroupOrder(group))?;

        if let Group::Data(data) = group {
            self.layout = Some(Layout {
                offset: self.nybbles + 2,
                nybbles: data.payload_nybbles(),
            });
        }
        self.nybbles += group.nybbles();
        *slot = Some(group);
        Ok(())
    }

    /// Retrieve the groups present, in emission order
    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.iter().map_while(Option::as_ref)
    }

    /// Determine whether this record is a skip, i.e. contains no groups
    pub fn is_skip(&self) -> bool {
        self.groups[0].is_none()
    }

    /// Number of nybbles this record encodes to, not counting skip filler
    pub fn nybbles(&self) -> u8 {
        self.nybbles
    }

    /// Retrieve the layout of the data payload, if any
    pub fn data_layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Retrieve the sequential count, if present
    pub fn sequential(&self) -> Option<u8> {
        self.groups().find_map(|g| match g {
            Group::Sequential(s) => Some(*s),
            _ => None,
        })
    }

    /// Retrieve the nonsequential reason, if present
    pub fn nonsequential(&self) -> Option<Nonsequential> {
        self.groups().find_map(|g| match g {
            Group::Nonsequential(n) => Some(*n),
            _ => None,
        })
    }

    /// Retrieve the breakpoint reason, if present
    pub fn breakpoint(&self) -> Option<u8> {
        self.groups().find_map(|g| match g {
            Group::Breakpoint(b) => Some(*b),
            _ => None,
        })
    }

    /// Retrieve the data item, if present
    pub fn data(&self) -> Option<Data> {
        self.groups().find_map(|g| match g {
            Group::Data(d) => Some(*d),
            _ => None,
        })
    }
}

/// Decompressed trace record
///
/// This record holds the information reconstructed from a single parsed unit
/// of the nybble stream. The timing of the original events is not preserved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecompressedRecord {
    /// Number of consecutive plain retirements
    pub sequential: Option<u8>,
    /// Nonsequential event
    pub nonsequential: Option<Nonsequential>,
    /// Program counter following the nonsequential event
    pub pc: Option<u32>,
    /// Register writeback
    pub writeback: Option<Writeback>,
    /// Breakpoint reason
    pub breakpoint: Option<u8>,
}

impl DecompressedRecord {
    /// Determine whether no information at all is present
    pub fn is_empty(&self) -> bool {
        *self == Default::default()
    }

    /// A branch other than a trap, return or jump was taken
    pub fn branch_taken(&self) -> bool {
        self.nonsequential == Some(Nonsequential::Branch)
    }

    /// A trap was taken
    pub fn trap(&self) -> bool {
        self.nonsequential == Some(Nonsequential::Trap)
    }

    /// A trap return was taken
    pub fn is_return(&self) -> bool {
        self.nonsequential == Some(Nonsequential::Return)
    }

    /// An indirect jump was taken
    pub fn is_indirect_jump(&self) -> bool {
        self.nonsequential == Some(Nonsequential::IndirectJump)
    }
}

impl TryFrom<&PackedRecord> for DecompressedRecord {
    type Error = Error;

    fn try_from(record: &PackedRecord) -> Result<Self, Self::Error> {
        let mut res = Self {
            sequential: record.sequential(),
            nonsequential: record.nonsequential(),
            breakpoint: record.breakpoint(),
            ..Default::default()
        };
        match record.data().map(|d| d.payload()).transpose()? {
            Some(Payload::Pc(pc)) => res.pc = Some(pc),
            Some(Payload::Writeback(w)) => res.writeback = Some(w),
            None => (),
        }
        Ok(res)
    }
}

impl fmt::Display for DecompressedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "skip");
        }
        let mut sep = "";
        if let Some(seq) = self.sequential {
            write!(f, "seq={seq}")?;
            sep = " ";
        }
        if let Some(reason) = self.nonsequential {
            write!(f, "{sep}{reason}")?;
            sep = " ";
        }
        if let Some(pc) = self.pc {
            write!(f, "{sep}pc={pc:#010x}")?;
            sep = " ";
        }
        if let Some(Writeback { register, value }) = self.writeback {
            write!(f, "{sep}x{register}={value:#010x}")?;
            sep = " ";
        }
        if let Some(reason) = self.breakpoint {
            write!(f, "{sep}bkpt={reason}")?;
        }
        Ok(())
    }
}

/// The highest number of nybbles a single packed record may encode to
pub(super) const MAX_NYBBLES: u8 = 1 + 1 + 2 + 2 + 2 * tag::MAX_DATA_PAIRS;
