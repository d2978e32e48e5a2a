// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! NVMe opcodes understood by the pass-through layer, and the closed set of
//! commands each submission entry point can translate.
//!
//! ```text
//!  admin   0x02 Get Log Page   ─┐
//!          0x06 Identify        ├─ storage property query / set
//!          0x09 Set Features    │
//!          0x0A Get Features   ─┘
//!          0x80 Format NVM     ── reinitialize media
//!  nvm     0x01 Write          ─┐
//!          0x02 Read           ─┴ SCSI READ(10)/WRITE(10) pass-through
//!  both    0xC0..=0xFF         ── storage protocol command (vendor specific)
//! ```

use core::ops::RangeInclusive;

use thiserror::Error;

use crate::models::command::NvmeCommand;

/// Opcodes reserved for vendor-specific commands in both command sets.
pub const VENDOR_SPECIFIC_OPCODES: RangeInclusive<u8> = 0xC0..=0xFF;

/// Identify CNS value selecting the Identify Namespace data structure.
pub const CNS_NAMESPACE: u8 = 0x00;
/// Identify CNS value selecting the Identify Controller data structure.
pub const CNS_CONTROLLER: u8 = 0x01;

/// Feature identifier of the Volatile Write Cache feature.
pub const FEATURE_VOLATILE_WRITE_CACHE: u8 = 0x06;

/// Admin opcodes with a translation on this backend.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOpcode {
    GetLogPage = 0x02,
    Identify = 0x06,
    SetFeatures = 0x09,
    GetFeatures = 0x0A,
    FormatNvm = 0x80,
}

impl AdminOpcode {
    #[inline]
    pub fn from_raw(v: u8) -> Option<Self> {
        Some(match v {
            0x02 => Self::GetLogPage,
            0x06 => Self::Identify,
            0x09 => Self::SetFeatures,
            0x0A => Self::GetFeatures,
            0x80 => Self::FormatNvm,
            _ => return None,
        })
    }
}

/// NVM command set opcodes with a translation on this backend.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOpcode {
    Write = 0x01,
    Read = 0x02,
}

impl IoOpcode {
    #[inline]
    pub fn from_raw(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::Write,
            0x02 => Self::Read,
            _ => return None,
        })
    }
}

/// Returned when a command carries an opcode with no translation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported opcode: 0x{0:02x}")]
pub struct UnsupportedOpcode(pub u8);

/// Admin command decoded into the fields its translation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Identify { cns: u8, nsid: u32 },
    GetLogPage { lid: u8, nsid: u32 },
    GetFeature { cdw10: u32, cdw11: u32 },
    SetFeature { fid: u8, cdw10: u32, cdw11: u32 },
    Format,
    VendorSpecific { opcode: u8 },
}

impl TryFrom<&NvmeCommand> for AdminCommand {
    type Error = UnsupportedOpcode;

    fn try_from(cmd: &NvmeCommand) -> Result<Self, Self::Error> {
        let opcode = cmd.opcode;
        if VENDOR_SPECIFIC_OPCODES.contains(&opcode) {
            return Ok(Self::VendorSpecific { opcode });
        }
        let known = AdminOpcode::from_raw(opcode).ok_or(UnsupportedOpcode(opcode))?;
        Ok(match known {
            AdminOpcode::Identify => Self::Identify {
                cns: cmd.cns(),
                nsid: cmd.nsid,
            },
            AdminOpcode::GetLogPage => Self::GetLogPage {
                lid: cmd.lid(),
                nsid: cmd.nsid,
            },
            AdminOpcode::GetFeatures => Self::GetFeature {
                cdw10: cmd.cdw10,
                cdw11: cmd.cdw11,
            },
            AdminOpcode::SetFeatures => Self::SetFeature {
                fid: cmd.fid(),
                cdw10: cmd.cdw10,
                cdw11: cmd.cdw11,
            },
            AdminOpcode::FormatNvm => Self::Format,
        })
    }
}

/// NVM command decoded into the fields its translation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCommand {
    Read { slba: u64, nlb: u16 },
    Write { slba: u64, nlb: u16 },
    VendorSpecific { opcode: u8 },
}

impl TryFrom<&NvmeCommand> for IoCommand {
    type Error = UnsupportedOpcode;

    fn try_from(cmd: &NvmeCommand) -> Result<Self, Self::Error> {
        let opcode = cmd.opcode;
        if VENDOR_SPECIFIC_OPCODES.contains(&opcode) {
            return Ok(Self::VendorSpecific { opcode });
        }
        match IoOpcode::from_raw(opcode).ok_or(UnsupportedOpcode(opcode))? {
            IoOpcode::Read => Ok(Self::Read {
                slba: cmd.slba(),
                nlb: cmd.nlb(),
            }),
            IoOpcode::Write => Ok(Self::Write {
                slba: cmd.slba(),
                nlb: cmd.nlb(),
            }),
        }
    }
}
