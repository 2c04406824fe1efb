// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Raw per-cycle trace records
//!
//! This module defines the [`Record`] a trace source emits for every active
//! cycle. Fields prefixed with `rfw` originate from the register file write
//! stage of the pipeline, the instruction and control flow fields from the
//! commit stage.

use crate::config::Control;
use crate::packer::Error;
use crate::types::{Nonsequential, Privilege};

/// Raw trace record for a single cycle
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// The instruction related fields are valid
    pub instr_valid: bool,
    /// Privilege mode of the instruction
    pub mode: Privilege,
    /// Program counter of the instruction
    pub pc: u32,
    /// Instruction word
    pub instruction: u32,
    /// A branch is being taken
    pub branch_taken: bool,
    /// Target of the branch, jump or trap if one is taken
    pub branch_target: u32,
    /// A trap (including interrupts) is being taken
    pub trap: bool,
    /// An `xret` instruction is being taken
    pub ret: bool,
    /// A `jalr` instruction is being taken
    pub jalr: bool,
    /// An instruction is being retired
    pub retire: bool,
    /// The register file is being written
    pub rfw_valid: bool,
    /// Register being written
    pub rfw_rd: u8,
    /// Value written to the register
    pub rfw_data: u32,
    /// A breakpoint was hit
    pub bkpt_valid: bool,
    /// Reason for the breakpoint
    pub bkpt_reason: u8,
}

impl Record {
    /// Highest register index
    pub const MAX_REGISTER: u8 = 31;

    /// Highest breakpoint reason
    pub const MAX_BREAKPOINT_REASON: u8 = 0xf;

    /// Create a record for a plain retirement of the instruction at `pc`
    pub fn retirement(pc: u32) -> Self {
        Self {
            instr_valid: true,
            pc,
            retire: true,
            ..Default::default()
        }
    }

    /// Add a register writeback to this record
    pub fn with_writeback(self, rd: u8, data: u32) -> Self {
        Self {
            rfw_valid: true,
            rfw_rd: rd,
            rfw_data: data,
            ..self
        }
    }

    /// Add a breakpoint to this record
    pub fn with_breakpoint(self, reason: u8) -> Self {
        Self {
            bkpt_valid: true,
            bkpt_reason: reason,
            ..self
        }
    }

    /// Add a nonsequential event with the given `target` to this record
    pub fn with_nonsequential(self, reason: Nonsequential, target: u32) -> Self {
        let mut res = Self {
            instr_valid: true,
            branch_target: target,
            ..self
        };
        match reason {
            Nonsequential::Trap => {
                res.trap = true;
                res.retire = false;
            }
            Nonsequential::Return => res.ret = true,
            Nonsequential::IndirectJump => res.jalr = true,
            Nonsequential::Branch => res.branch_taken = true,
        }
        res
    }

    /// Determine the nonsequential event reported under the given control
    ///
    /// Traps take precedence over returns, returns over indirect jumps and
    /// those over other taken branches.
    pub fn nonsequential(&self, control: &Control) -> Option<Nonsequential> {
        if !(control.enable && self.instr_valid && control.enable_control) {
            return None;
        }
        if self.trap {
            Some(Nonsequential::Trap)
        } else if self.ret {
            Some(Nonsequential::Return)
        } else if self.jalr {
            Some(Nonsequential::IndirectJump)
        } else if self.branch_taken {
            Some(Nonsequential::Branch)
        } else {
            None
        }
    }

    /// Determine the breakpoint reason reported under the given control
    pub fn breakpoint(&self, control: &Control) -> Option<u8> {
        (control.enable && self.bkpt_valid && control.enable_breakpoint).then_some(self.bkpt_reason)
    }

    /// Determine the branch target reported under the given control
    pub fn target(&self, control: &Control) -> Option<u32> {
        self.nonsequential(control)
            .filter(|_| control.enable_pc)
            .map(|_| self.branch_target)
    }

    /// Determine the register writeback reported under the given control
    pub fn writeback(&self, control: &Control) -> Option<(u8, u32)> {
        (control.enable && self.retire && self.rfw_valid && control.enable_rfd)
            .then_some((self.rfw_rd, self.rfw_data))
    }

    /// Check whether this record may be packed under the given control
    ///
    /// A record is rejected if a field exceeds its bit width or if it would
    /// require more than one data item to be reported.
    pub fn check(&self, control: &Control) -> Result<(), Error> {
        if self.rfw_valid && self.rfw_rd > Self::MAX_REGISTER {
            return Err(Error::RegisterOutOfRange(self.rfw_rd));
        }
        if self.bkpt_valid && self.bkpt_reason > Self::MAX_BREAKPOINT_REASON {
            return Err(Error::BreakpointReasonOutOfRange(self.bkpt_reason));
        }
        if self.target(control).is_some() && self.writeback(control).is_some() {
            return Err(Error::ConflictingData);
        }
        Ok(())
    }
}
