// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Windows I/O control codes, built the way `CTL_CODE` builds them:
//!
//! ```text
//!  31            16 15  14 13              2 1    0
//! +----------------+------+-----------------+------+
//! |  DeviceType    |Access|    Function     |Method|
//! +----------------+------+-----------------+------+
//! ```

/// `IOCTL_STORAGE_BASE` (`FILE_DEVICE_MASS_STORAGE`).
const IOCTL_STORAGE_BASE: u32 = 0x0000_002D;
/// `IOCTL_SCSI_BASE` (`FILE_DEVICE_CONTROLLER`).
const IOCTL_SCSI_BASE: u32 = 0x0000_0004;

const METHOD_BUFFERED: u32 = 0;

const FILE_ANY_ACCESS: u32 = 0;
const FILE_READ_ACCESS: u32 = 0x0001;
const FILE_WRITE_ACCESS: u32 = 0x0002;

#[inline]
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoctlCode {
    StorageQueryProperty =
        ctl_code(IOCTL_STORAGE_BASE, 0x0500, METHOD_BUFFERED, FILE_ANY_ACCESS),
    StorageSetProperty =
        ctl_code(IOCTL_STORAGE_BASE, 0x0503, METHOD_BUFFERED, FILE_WRITE_ACCESS),
    StorageProtocolCommand = ctl_code(
        IOCTL_STORAGE_BASE,
        0x04F0,
        METHOD_BUFFERED,
        FILE_READ_ACCESS | FILE_WRITE_ACCESS,
    ),
    StorageReinitializeMedia =
        ctl_code(IOCTL_STORAGE_BASE, 0x0590, METHOD_BUFFERED, FILE_WRITE_ACCESS),
    ScsiPassThroughDirect = ctl_code(
        IOCTL_SCSI_BASE,
        0x0405,
        METHOD_BUFFERED,
        FILE_READ_ACCESS | FILE_WRITE_ACCESS,
    ),
}

impl IoctlCode {
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

const _: () = assert!(IoctlCode::StorageQueryProperty.raw() == 0x002D_1400);
const _: () = assert!(IoctlCode::StorageSetProperty.raw() == 0x002D_940C);
const _: () = assert!(IoctlCode::StorageProtocolCommand.raw() == 0x002D_D3C0);
const _: () = assert!(IoctlCode::StorageReinitializeMedia.raw() == 0x002D_9640);
const _: () = assert!(IoctlCode::ScsiPassThroughDirect.raw() == 0x0004_D014);
