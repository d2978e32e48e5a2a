//! SCSI 10-byte read/write command descriptor blocks used by the block
//! pass-through fallback.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::error::{Error, Result};

pub mod read;
pub mod write;

/// Width of the CDB field in a pass-through envelope; READ(10) and WRITE(10)
/// only use the first 10 bytes.
pub const CDB_FIELD_LEN: usize = 16;

/// NVMe addressing re-expressed in the fields of a 10-byte CDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cdb10Range {
    pub lba: u32,
    /// TRANSFER LENGTH field: the low 16 bits of the one-based block count.
    pub blocks: u16,
}

impl Cdb10Range {
    /// `nlb` is NVMe's zero-based block count. An LBA past 32 bits has no
    /// 10-byte encoding and is rejected rather than truncated.
    pub fn from_nvme(slba: u64, nlb: u16) -> Result<Self> {
        let lba = u32::try_from(slba).map_err(|_| {
            Error::InvalidArgument(format!("LBA {slba:#x} does not fit a 10-byte CDB"))
        })?;
        let count = nlb as u32 + 1;
        Ok(Self {
            lba,
            blocks: count as u16,
        })
    }
}
