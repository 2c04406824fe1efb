// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Nybble stream codec and the records it operates on
//!
//! This module provides the [`PackedRecord`] produced by the
//! [packer][crate::packer], an [`encoder`] turning those into
//! [`CompressedRecord`]s, a [`writer`] for concatenating them into a byte
//! stream and a [`decoder`] reconstructing [`DecompressedRecord`]s from such a
//! stream.
//!
//! The stream is self-describing: every group of information starts with a
//! [tag][tag] identifying it, and no framing exists beyond those tags.

pub mod compressed;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod record;
pub mod tag;
pub mod writer;


pub use compressed::CompressedRecord;
pub use decoder::decode;
pub use error::Error;
pub use record::{Data, DataReason, DecompressedRecord, Group, Layout, PackedRecord, Writeback};

/// Create a new [`Builder`] for codec components
pub fn builder() -> Builder {
    Default::default()
}

/// Encode a single [`PackedRecord`] with the default configuration
pub fn encode(record: &PackedRecord) -> CompressedRecord {
    builder().encoder().encode(record)
}

/// Builder for [`Encoder`][encoder::Encoder]s, [`Writer`][writer::Writer]s
/// and [`Decoder`][decoder::Decoder]s
///
/// [`Builder`] implements [`Copy`], so a single configuration may be used for
/// building any number of components.
#[derive(Copy, Clone, Debug, Default)]
pub struct Builder {
    skip_fill: bool,
}

impl Builder {
    /// Create a new builder
    pub fn new() -> Self {
        Default::default()
    }

    /// Activate or deactivate skip filling for [`Encoder`][encoder::Encoder]s
    ///
    /// If activated, a skip record is encoded as a single skip nybble rather
    /// than not at all. This allows emitting one symbol per cycle. Skip
    /// filling is deactivated by default.
    pub fn with_skip_fill(self, skip_fill: bool) -> Self {
        Self { skip_fill }
    }

    /// Build an [`Encoder`][encoder::Encoder] for this configuration
    pub fn encoder(self) -> encoder::Encoder {
        encoder::Encoder::new(self.skip_fill)
    }

    /// Build a [`Writer`][writer::Writer] for the given buffer
    pub fn writer<B: writer::Buffer>(self, buffer: B) -> writer::Writer<B> {
        writer::Writer::new(buffer)
    }

    /// Build a [`Decoder`][decoder::Decoder] for the given data
    pub fn decoder(self, data: &[u8]) -> decoder::Decoder<'_> {
        decoder::Decoder::new(data)
    }
}
