// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Packing of raw trace records

pub mod error;


use crate::codec::{Data, Group, PackedRecord};
use crate::config::Control;
use crate::trace;

pub use error::Error;

/// Create a new [`Builder`] for [`Packer`]s
pub fn builder() -> Builder {
    Default::default()
}

/// Builder for [`Packer`]s
#[derive(Copy, Clone, Debug, Default)]
pub struct Builder {
    control: Control,
}

impl Builder {
    /// Create a new builder
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the [`Control`]
    pub fn with_control(self, control: Control) -> Self {
        Self { control }
    }

    /// Build a [`Packer`] for this configuration
    pub fn build(self) -> Packer {
        Packer {
            control: self.control,
            pending: 0,
        }
    }
}

/// Packer for raw trace records
///
/// A packer maps [raw records][trace::Record] to [`PackedRecord`]s, one per
/// cycle. Plain retirements are not reported individually. Instead, they are
/// accumulated into a sequential count which is flushed once it reaches
/// [`Group::MAX_SEQUENTIAL`] or when a cycle carries other information worth
/// reporting. Records must thus be fed in the order in which they occur.
///
/// # Example
///
/// ```
/// use nybble_trace::{packer, trace};
/// use nybble_trace::codec::Group;
/// use nybble_trace::types::Nonsequential;
///
/// let mut packer = packer::builder().build();
/// for pc in [0x100, 0x104, 0x108] {
///     assert!(packer.pack(&trace::Record::retirement(pc)).unwrap().is_skip());
/// }
/// let trap = trace::Record::default().with_nonsequential(Nonsequential::Trap, 0x1000);
/// let packed = packer.pack(&trap).unwrap();
/// assert_eq!(packed.sequential(), Some(3));
/// assert_eq!(packed.nonsequential(), Some(Nonsequential::Trap));
/// assert_eq!(packer.pending(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Packer {
    control: Control,
    pending: u8,
}

impl Packer {
    /// Pack a single raw record
    ///
    /// If tracing is globally disabled, every record packs to a skip.
    /// Otherwise, the record is checked first, rejecting records violating
    /// their contract. The packing itself cannot fail.
    pub fn pack(&mut self, raw: &trace::Record) -> Result<PackedRecord, Error> {
        let mut res = PackedRecord::default();
        if !self.control.enable {
            return Ok(res);
        }

        raw.check(&self.control)
            .inspect_err(|e| log::debug!("Rejecting {raw:?}: {e}"))?;

        let control = &self.control;
        let nonsequential = raw.nonsequential(control);
        let breakpoint = raw.breakpoint(control);
        let data = raw
            .target(control)
            .map(Data::pc)
            .or_else(|| raw.writeback(control).map(|(rd, v)| Data::writeback(rd, v)));

        if nonsequential.is_none() && breakpoint.is_none() && data.is_none() {
            if raw.retire {
                self.pending += 1;
                if self.pending >= Group::MAX_SEQUENTIAL {
                    self.flush_into(&mut res);
                }
            }
            return Ok(res);
        }

        // The nonsequential group represents a retiring branch or jump
        if raw.retire && nonsequential.is_none() {
            self.pending += 1;
        }
        self.flush_into(&mut res);
        let groups = [
            nonsequential.map(Group::Nonsequential),
            breakpoint.map(Group::Breakpoint),
            data.map(Group::Data),
        ];
        for group in groups.into_iter().flatten() {
            let pushed = res.push(group);
            debug_assert!(pushed.is_ok(), "Could not add {group:?}: {pushed:?}");
        }

        Ok(res)
    }

    /// Flush any pending sequential count
    ///
    /// Use this fn at the end of a trace. Returns a record holding the
    /// sequential group if any plain retirements were pending.
    pub fn flush(&mut self) -> Option<PackedRecord> {
        let mut res = PackedRecord::default();
        self.flush_into(&mut res);
        (!res.is_skip()).then_some(res)
    }

    /// Retrieve the number of plain retirements not yet reported
    pub fn pending(&self) -> u8 {
        self.pending
    }

    /// Retrieve the [`Control`] this packer operates under
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Push the pending sequential group, if any, and reset the count
    fn flush_into(&mut self, record: &mut PackedRecord) {
        let pending = core::mem::take(&mut self.pending);
        if pending > 0 {
            log::trace!("Flushing {pending} sequential retirements");
            let pushed = record.push(Group::Sequential(pending));
            debug_assert!(pushed.is_ok(), "Could not flush {pending}: {pushed:?}");
        }
    }
}
