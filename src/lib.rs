// Copyright (C) 2024 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

//! # Nybble-stream compression of RISC-V execution traces
//!
//! This crate implements a compact, self-describing encoding for per-cycle
//! instruction retirement traces of a pipelined RISC-V core. A trace source
//! emits one [raw record][trace::Record] per active cycle. The
//! [packer][packer::Packer] condenses those records into
//! [packed records][codec::PackedRecord], which the [codec] encodes into a
//! stream of 4-bit symbols (nybbles) and decodes back into
//! [decompressed records][codec::DecompressedRecord].
//!
//! The stream carries no framing beyond the tags leading every group of
//! information. All loggable information is preserved, with the exception of
//! the timing between events. Sequential counts count retirements, not cycles.
//!
//! # no_std
//! This crate is not dependent on the standard library and only uses the Core
//! Library. It can therefore even be used in bare metal environments. The
//! `alloc` feature enables writing streams to growable buffers.
//!
//! # Example
//!
//! The following example demonstrates compression of a short trace into a
//! single buffer and its decompression.
//!
//! ```
//! use nybble_trace::{codec, packer, trace};
//! use nybble_trace::types::Nonsequential;
//!
//! let source = [
//!     trace::Record::retirement(0x8000_0000),
//!     trace::Record::retirement(0x8000_0004),
//!     trace::Record::retirement(0x8000_0008),
//!     trace::Record::default().with_nonsequential(Nonsequential::Trap, 0x1000),
//! ];
//!
//! let mut packer = packer::builder().build();
//! let encoder = codec::builder().encoder();
//! let mut writer = codec::builder().writer([0u8; 16]);
//! for raw in &source {
//!     let packed = packer.pack(raw).unwrap();
//!     writer.write(&encoder.encode(&packed)).unwrap();
//! }
//! let (buffer, len) = writer.finish();
//! assert_eq!(&buffer[..len], b"\x83\x2c\x00\x10");
//!
//! let mut decoder = codec::builder().decoder(&buffer[..len]);
//! let record = decoder.decode_record().unwrap();
//! assert_eq!(record.sequential, Some(3));
//! assert!(record.trap());
//! assert_eq!(record.pc, Some(0x1000));
//! assert_eq!(decoder.nybbles_left(), 0);
//! ```
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod codec;
pub mod config;
pub mod packer;
pub mod trace;
pub mod types;
