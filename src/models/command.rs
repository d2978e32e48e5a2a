// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::models::opcode::{AdminOpcode, IoOpcode};

/// Length of every NVMe submission-queue entry.
pub const NVME_COMMAND_LEN: usize = 64;

/// Portable 64-byte NVMe command (submission-queue entry).
///
/// The layout follows the NVMe base specification, so the raw bytes of this
/// struct are exactly what a protocol pass-through embeds as `Command`.
#[repr(C)]
#[derive(Default, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct NvmeCommand {
    pub opcode: u8,     // 0
    pub flags: u8,      // 1
    pub cid: u16,       // 2..4
    pub nsid: u32,      // 4..8
    pub cdw2: u32,      // 8..12
    pub cdw3: u32,      // 12..16
    pub mptr: u64,      // 16..24
    pub dptr: [u64; 2], // 24..40
    pub cdw10: u32,     // 40..44
    pub cdw11: u32,     // 44..48
    pub cdw12: u32,     // 48..52
    pub cdw13: u32,     // 52..56
    pub cdw14: u32,     // 56..60
    pub cdw15: u32,     // 60..64
}

const _: () = assert!(size_of::<NvmeCommand>() == NVME_COMMAND_LEN);

impl NvmeCommand {
    pub fn new(opcode: u8) -> Self {
        Self {
            opcode,
            ..Default::default()
        }
    }

    /// Identify with the given CNS selector.
    pub fn identify(cns: u8, nsid: u32) -> Self {
        Self {
            nsid,
            cdw10: cns as u32,
            ..Self::new(AdminOpcode::Identify as u8)
        }
    }

    /// Get Log Page for `nbytes` bytes of log `lid`.
    ///
    /// NUMD is zero-based and counted in dwords; it is split across the
    /// upper half of CDW10 (NUMDL) and the lower half of CDW11 (NUMDU).
    pub fn get_log_page(lid: u8, nsid: u32, nbytes: u32) -> Self {
        let numd = (nbytes / 4).saturating_sub(1);
        Self {
            nsid,
            cdw10: lid as u32 | ((numd & 0xFFFF) << 16),
            cdw11: numd >> 16,
            ..Self::new(AdminOpcode::GetLogPage as u8)
        }
    }

    /// Get Features; `sel` lands in CDW10 bits 10:08.
    pub fn get_feature(fid: u8, sel: u8, cdw11: u32) -> Self {
        Self {
            cdw10: fid as u32 | (((sel & 0x7) as u32) << 8),
            cdw11,
            ..Self::new(AdminOpcode::GetFeatures as u8)
        }
    }

    /// Set Features; `value` is the feature-specific CDW11.
    pub fn set_feature(fid: u8, value: u32, save: bool) -> Self {
        Self {
            cdw10: fid as u32 | ((save as u32) << 31),
            cdw11: value,
            ..Self::new(AdminOpcode::SetFeatures as u8)
        }
    }

    pub fn format(nsid: u32, lbaf: u8) -> Self {
        Self {
            nsid,
            cdw10: (lbaf & 0xF) as u32,
            ..Self::new(AdminOpcode::FormatNvm as u8)
        }
    }

    /// Read `nlb + 1` blocks starting at `slba`.
    pub fn read(nsid: u32, slba: u64, nlb: u16) -> Self {
        Self::rw(IoOpcode::Read, nsid, slba, nlb)
    }

    /// Write `nlb + 1` blocks starting at `slba`.
    pub fn write(nsid: u32, slba: u64, nlb: u16) -> Self {
        Self::rw(IoOpcode::Write, nsid, slba, nlb)
    }

    fn rw(opcode: IoOpcode, nsid: u32, slba: u64, nlb: u16) -> Self {
        Self {
            nsid,
            cdw10: slba as u32,
            cdw11: (slba >> 32) as u32,
            cdw12: nlb as u32,
            ..Self::new(opcode as u8)
        }
    }

    /// Identify CNS selector (CDW10 bits 07:00).
    #[inline]
    pub const fn cns(&self) -> u8 {
        (self.cdw10 & 0xFF) as u8
    }

    /// Log page identifier (CDW10 bits 07:00).
    #[inline]
    pub const fn lid(&self) -> u8 {
        (self.cdw10 & 0xFF) as u8
    }

    /// Feature identifier (CDW10 bits 07:00).
    #[inline]
    pub const fn fid(&self) -> u8 {
        (self.cdw10 & 0xFF) as u8
    }

    /// Starting LBA (CDW11:CDW10).
    #[inline]
    pub const fn slba(&self) -> u64 {
        ((self.cdw11 as u64) << 32) | self.cdw10 as u64
    }

    /// Zero-based number of logical blocks (CDW12 bits 15:00).
    #[inline]
    pub const fn nlb(&self) -> u16 {
        (self.cdw12 & 0xFFFF) as u16
    }
}

impl fmt::Debug for NvmeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NvmeCommand")
            .field("opcode", &format_args!("{:#04x}", self.opcode))
            .field("nsid", &self.nsid)
            .field("cdw10", &format_args!("{:#010x}", self.cdw10))
            .field("cdw11", &format_args!("{:#010x}", self.cdw11))
            .field("cdw12", &format_args!("{:#010x}", self.cdw12))
            .finish_non_exhaustive()
    }
}
