//! Platform request envelopes: bit-exact Windows storage structures and the
//! aligned heap buffer they are laid out in.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// I/O control codes used by the submission paths.
pub mod ioctl;
/// IOCTL_STORAGE_QUERY_PROPERTY / IOCTL_STORAGE_SET_PROPERTY structures.
pub mod property;
/// IOCTL_STORAGE_PROTOCOL_COMMAND structures.
pub mod protocol_command;
/// IOCTL_SCSI_PASS_THROUGH_DIRECT structures.
pub mod scsi_pass_through;

/// Offsets inside an envelope must be pointer aligned.
pub const ENVELOPE_ALIGN: usize = align_of::<usize>();

/// Zeroed, pointer-aligned request buffer handed to exactly one platform
/// call.
///
/// Backed by `u64` words so that every typed header view is aligned; only
/// the first `len` bytes are ever exposed or submitted.
pub struct RequestEnvelope {
    words: Vec<u64>,
    len: usize,
}

impl RequestEnvelope {
    /// Allocate `len` zeroed bytes, reporting allocation failure instead of
    /// aborting.
    pub fn zeroed(len: usize) -> Result<Self> {
        let n_words = len.div_ceil(size_of::<u64>());
        let mut words = Vec::new();
        words
            .try_reserve_exact(n_words)
            .map_err(|_| Error::Alloc(len))?;
        words.resize(n_words, 0);
        Ok(Self { words, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.words.as_bytes()[..self.len]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.words.as_mut_bytes()[..self.len]
    }

    /// Ensure `offset..offset + len` is a pointer-aligned region inside the
    /// envelope.
    pub fn check_region(&self, offset: usize, len: usize) -> Result<()> {
        if offset % ENVELOPE_ALIGN != 0 {
            return Err(Error::InvalidArgument(format!(
                "envelope offset {offset} is not {ENVELOPE_ALIGN}-byte aligned"
            )));
        }
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(Error::InvalidArgument(format!(
                "envelope region {offset}+{len} exceeds {} bytes",
                self.len
            ))),
        }
    }

    pub fn region(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_region(offset, len)?;
        Ok(&self.as_bytes()[offset..offset + len])
    }

    pub fn region_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        self.check_region(offset, len)?;
        Ok(&mut self.as_bytes_mut()[offset..offset + len])
    }

    /// Typed view of the structure stored at `offset`.
    pub fn view_at<H>(&self, offset: usize) -> Result<&H>
    where H: FromBytes + KnownLayout + Immutable {
        let bytes = self.region(offset, size_of::<H>())?;
        H::ref_from_bytes(bytes).map_err(|e| {
            Error::InvalidArgument(format!("failed to view envelope at {offset}: {e}"))
        })
    }

    /// Mutable typed view of the structure stored at `offset`.
    pub fn view_mut_at<H>(&mut self, offset: usize) -> Result<&mut H>
    where H: FromBytes + IntoBytes + KnownLayout {
        let bytes = self.region_mut(offset, size_of::<H>())?;
        H::mut_from_bytes(bytes).map_err(|e| {
            Error::InvalidArgument(format!("failed to view envelope at {offset}: {e}"))
        })
    }
}

/// Convert a buffer length into a 32-bit envelope field.
pub(crate) fn len_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| Error::InvalidArgument(format!("{what} of {len} bytes exceeds u32")))
}
