// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::mem::offset_of;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    envelope::len_u32,
    error::Result,
    models::scsi_status::ScsiStatus,
};

/// Bytes reserved for sense data behind the pass-through header.
pub const SPT_SENSE_LENGTH: usize = 32;
/// `CDB10GENERIC_LENGTH`.
pub const CDB10_GENERIC_LENGTH: u8 = 10;
/// Seconds the platform waits for a block read or write.
pub const BLOCK_PASSTHROUGH_TIMEOUT_SECS: u32 = 5;

/// `SCSI_IOCTL_DATA_OUT` / `SCSI_IOCTL_DATA_IN`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirection {
    Out = 0,
    In = 1,
}

/// Bus address of the logical unit a pass-through targets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScsiAddress {
    pub path_id: u8,
    pub target_id: u8,
    pub lun: u8,
}

/// `SCSI_PASS_THROUGH_DIRECT` as laid out on 64-bit Windows.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ScsiPassThroughDirect {
    pub length: u16,               // 0..2
    pub scsi_status: u8,           // 2
    pub path_id: u8,               // 3
    pub target_id: u8,             // 4
    pub lun: u8,                   // 5
    pub cdb_length: u8,            // 6
    pub sense_info_length: u8,     // 7
    pub data_in: u8,               // 8
    _pad0: [u8; 3],                // 9..12
    pub data_transfer_length: u32, // 12..16
    pub time_out_value: u32,       // 16..20
    _pad1: [u8; 4],                // 20..24
    /// Address of the caller's data buffer.
    pub data_buffer: u64, // 24..32
    /// Relative to the start of this structure.
    pub sense_info_offset: u32, // 32..36
    pub cdb: [u8; 16],             // 36..52
    _pad2: [u8; 4],                // 52..56
}

/// Pass-through header followed by its sense buffer, submitted as one
/// envelope.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ScsiPassThroughDirectWithBuffer {
    pub sptd: ScsiPassThroughDirect,
    /// realigns the sense buffer to a dword boundary
    filler: u32,
    pub sense_buf: [u8; SPT_SENSE_LENGTH],
    _pad: [u8; 4],
}

const _: () = assert!(size_of::<ScsiPassThroughDirect>() == 56);
const _: () = assert!(offset_of!(ScsiPassThroughDirect, data_buffer) == 24);
const _: () = assert!(offset_of!(ScsiPassThroughDirect, cdb) == 36);
const _: () = assert!(size_of::<ScsiPassThroughDirectWithBuffer>() == 96);

impl ScsiPassThroughDirectWithBuffer {
    /// Sense buffer offset, taken from this struct's own layout.
    pub const SENSE_INFO_OFFSET: usize = offset_of!(Self, sense_buf);

    /// Build a direct pass-through of `cdb` moving `data` in `direction`.
    ///
    /// The envelope records the address of `data`; it must not outlive the
    /// borrow it was built from.
    pub fn new(
        address: ScsiAddress,
        direction: DataDirection,
        cdb: &[u8; 16],
        data: &mut [u8],
    ) -> Result<Self> {
        let mut spt = Self::default();
        let sptd = &mut spt.sptd;
        sptd.length = size_of::<ScsiPassThroughDirect>() as u16;
        sptd.path_id = address.path_id;
        sptd.target_id = address.target_id;
        sptd.lun = address.lun;
        sptd.cdb_length = CDB10_GENERIC_LENGTH;
        sptd.sense_info_length = SPT_SENSE_LENGTH as u8;
        sptd.sense_info_offset = Self::SENSE_INFO_OFFSET as u32;
        sptd.data_in = direction as u8;
        sptd.data_transfer_length = len_u32(data.len(), "block transfer")?;
        sptd.time_out_value = BLOCK_PASSTHROUGH_TIMEOUT_SECS;
        sptd.data_buffer = data.as_mut_ptr() as usize as u64;
        sptd.cdb = *cdb;
        Ok(spt)
    }

    pub fn scsi_status(&self) -> ScsiStatus {
        ScsiStatus::from(self.sptd.scsi_status)
    }

    /// Sense bytes the platform reported, bounded by the buffer size.
    pub fn sense(&self) -> &[u8] {
        let len = (self.sptd.sense_info_length as usize).min(SPT_SENSE_LENGTH);
        &self.sense_buf[..len]
    }
}
