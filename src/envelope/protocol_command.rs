// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Storage protocol command envelope.
//!
//! ```text
//! 0                              80            144               144+N
//! +------------------------------+-------------+-----------------+
//! | STORAGE_PROTOCOL_COMMAND     | NVMe command| data from device|
//! +------------------------------+-------------+-----------------+
//! ```
//!
//! No error-info or data-to-device regions are used.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    envelope::{RequestEnvelope, len_u32, property::PROTOCOL_TYPE_NVME},
    error::Result,
    models::command::{NVME_COMMAND_LEN, NvmeCommand},
};

/// `STORAGE_PROTOCOL_STRUCTURE_VERSION`.
pub const STORAGE_PROTOCOL_STRUCTURE_VERSION: u32 = 0x1;
/// `STORAGE_PROTOCOL_COMMAND_LENGTH_NVME`.
pub const STORAGE_PROTOCOL_COMMAND_LENGTH_NVME: u32 = 0x40;
/// Seconds the platform waits for a vendor-specific command.
pub const VENDOR_SPECIFIC_TIMEOUT_SECS: u32 = 10;

/// `sizeof(STORAGE_PROTOCOL_COMMAND)`: the fixed header plus the one-byte
/// `Command` placeholder, padded to a DWORD.
pub const STORAGE_PROTOCOL_COMMAND_DECLARED_LEN: u32 =
    (size_of::<StorageProtocolCommand>() + size_of::<u32>()) as u32;

bitflags::bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    /// `STORAGE_PROTOCOL_COMMAND` flags
    pub struct ProtocolCommandFlags: u32 {
        /// Request targets the adapter instead of the device.
        const ADAPTER_REQUEST = 0x8000_0000;
    }
}

/// `STORAGE_PROTOCOL_STATUS_*` values written back into `return_status`.
pub mod return_status {
    pub const PENDING: u32 = 0x0;
    pub const SUCCESS: u32 = 0x1;
    pub const ERROR: u32 = 0x2;
    pub const INVALID_REQUEST: u32 = 0x3;
    pub const NO_DEVICE: u32 = 0x4;
    pub const BUSY: u32 = 0x5;
    pub const DATA_OVERRUN: u32 = 0x6;
    pub const INSUFFICIENT_RESOURCES: u32 = 0x7;
    pub const THROTTLED_REQUEST: u32 = 0x8;
    pub const NOT_SUPPORTED: u32 = 0xFF;
}

/// Which NVMe queue a vendor-specific command belongs to
/// (`STORAGE_PROTOCOL_SPECIFIC_NVME_*_COMMAND`).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvmeCommandSet {
    Admin = 0x01,
    Nvm = 0x02,
}

/// `STORAGE_PROTOCOL_COMMAND` up to `Command`.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct StorageProtocolCommand {
    pub version: u32,
    pub length: u32,
    pub protocol_type: u32,
    pub flags: u32,
    pub return_status: u32,
    pub error_code: u32,
    pub command_length: u32,
    pub error_info_length: u32,
    pub data_to_device_transfer_length: u32,
    pub data_from_device_transfer_length: u32,
    pub time_out_value: u32,
    pub error_info_offset: u32,
    pub data_to_device_buffer_offset: u32,
    pub data_from_device_buffer_offset: u32,
    pub command_specific: u32,
    pub reserved0: u32,
    pub fixed_protocol_return_data: u32,
    pub reserved1: [u32; 3],
}

const _: () = assert!(size_of::<StorageProtocolCommand>() == 80);

pub struct ProtocolCommandEnvelope {
    buf: RequestEnvelope,
    response_len: usize,
}

impl ProtocolCommandEnvelope {
    pub const COMMAND_OFFSET: usize = size_of::<StorageProtocolCommand>();
    pub const RESPONSE_OFFSET: usize = Self::COMMAND_OFFSET + NVME_COMMAND_LEN;

    /// Total bytes of an envelope with a `response_len`-byte response region.
    pub const fn total_len(response_len: usize) -> usize {
        Self::RESPONSE_OFFSET + response_len
    }

    /// Embed `cmd` as an adapter request, reserving `response_len` bytes for
    /// data returned by the device.
    pub fn new(cmd: &NvmeCommand, set: NvmeCommandSet, response_len: usize) -> Result<Self> {
        let mut buf = RequestEnvelope::zeroed(Self::total_len(response_len))?;
        buf.check_region(Self::COMMAND_OFFSET, NVME_COMMAND_LEN)?;
        buf.check_region(Self::RESPONSE_OFFSET, response_len)?;

        let hdr = buf.view_mut_at::<StorageProtocolCommand>(0)?;
        hdr.version = STORAGE_PROTOCOL_STRUCTURE_VERSION;
        hdr.length = STORAGE_PROTOCOL_COMMAND_DECLARED_LEN;
        hdr.protocol_type = PROTOCOL_TYPE_NVME;
        hdr.flags = ProtocolCommandFlags::ADAPTER_REQUEST.bits();
        hdr.command_length = STORAGE_PROTOCOL_COMMAND_LENGTH_NVME;
        hdr.error_info_length = 0;
        hdr.error_info_offset = 0;
        hdr.data_from_device_transfer_length = len_u32(response_len, "response region")?;
        hdr.data_from_device_buffer_offset = Self::RESPONSE_OFFSET as u32;
        hdr.time_out_value = VENDOR_SPECIFIC_TIMEOUT_SECS;
        hdr.command_specific = set as u32;

        buf.region_mut(Self::COMMAND_OFFSET, NVME_COMMAND_LEN)?
            .copy_from_slice(cmd.as_bytes());

        Ok(Self { buf, response_len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_bytes_mut()
    }

    pub fn header(&self) -> Result<&StorageProtocolCommand> {
        self.buf.view_at::<StorageProtocolCommand>(0)
    }

    /// Data the device returned in the response region.
    pub fn response(&self) -> Result<&[u8]> {
        self.buf.region(Self::RESPONSE_OFFSET, self.response_len)
    }
}
