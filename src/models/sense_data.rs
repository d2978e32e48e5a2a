// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

/// Fixed-format sense data needs at least this many bytes.
pub const FIXED_MIN_LEN: usize = 18;

/// Response codes of fixed-format sense data (current / deferred).
const FIXED_CURRENT: u8 = 0x70;
const FIXED_DEFERRED: u8 = 0x71;

/// SPC-4 Table 43: the fields of fixed-format sense data worth reporting.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SenseData {
    pub valid: bool,        // bit7 of byte0
    pub response_code: u8,  // low-7 bits of byte0
    pub sense_key: u8,      // low-4 bits of byte2
    pub filemark: bool,     // bit7 of byte2
    pub eom: bool,          // bit6 of byte2
    pub ili: bool,          // bit5 of byte2
    pub information: u32,   // bytes 3-6
    pub additional_len: u8, // byte7
    pub cmd_specific: u32,  // bytes 8-11
    pub asc: u8,
    pub ascq: u8,
}

impl SenseData {
    /// Parse fixed-format sense data (SPC-4 § 4.5.3) out of the sense buffer
    /// of a pass-through envelope.
    ///
    /// Returns `None` for short buffers and for descriptor-format or empty
    /// sense data, which carry nothing this layer reports.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < FIXED_MIN_LEN {
            return None;
        }
        let response_code = buf[0] & 0x7F;
        if response_code != FIXED_CURRENT && response_code != FIXED_DEFERRED {
            return None;
        }

        Some(Self {
            valid: buf[0] & 0x80 != 0,
            response_code,
            sense_key: buf[2] & 0x0F,
            filemark: buf[2] & 0x80 != 0,
            eom: buf[2] & 0x40 != 0,
            ili: buf[2] & 0x20 != 0,
            information: u32::from_be_bytes([buf[3], buf[4], buf[5], buf[6]]),
            additional_len: buf[7],
            cmd_specific: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
            asc: buf[12],
            ascq: buf[13],
        })
    }

    pub fn description(&self) -> &'static str {
        asc_ascq_to_str(self.asc, self.ascq)
    }
}

impl fmt::Debug for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenseData")
            .field("valid", &self.valid)
            .field(
                "response_code",
                &format_args!("{:#04x}", self.response_code),
            )
            .field("sense_key", &format_args!("{:#x}", self.sense_key))
            .field("filemark", &self.filemark)
            .field("eom", &self.eom)
            .field("ili", &self.ili)
            .field("information", &self.information)
            .field("additional_len", &self.additional_len)
            .field("cmd_specific", &self.cmd_specific)
            .field("asc", &format_args!("{:#04x}", self.asc))
            .field("ascq", &format_args!("{:#04x}", self.ascq))
            .field("description", &self.description())
            .finish()
    }
}

/// SPC-4 description of an ASC/ASCQ pair, limited to what a block read or
/// write through a disk class driver realistically reports.
#[inline]
pub fn asc_ascq_to_str(asc: u8, ascq: u8) -> &'static str {
    match (asc, ascq) {
        (0x00, 0x00) => "No additional sense information",
        (0x04, 0x00) => "Logical unit not ready, cause not reportable",
        (0x04, 0x01) => "Logical unit is in process of becoming ready",
        (0x04, 0x04) => "Logical unit not ready, format in progress",
        (0x0C, 0x00) => "Write error",
        (0x11, 0x00) => "Unrecovered read error",
        (0x20, 0x00) => "Invalid command operation code",
        (0x21, 0x00) => "Logical block address out of range",
        (0x24, 0x00) => "Invalid field in CDB",
        (0x25, 0x00) => "Logical unit not supported",
        (0x27, 0x00) => "Write protected",
        (0x29, 0x00) => "Power on, reset, or bus device reset occurred",
        (0x3A, 0x00) => "Medium not present",
        (0x44, 0x00) => "Internal target failure",
        _ => "UNSPECIFIED / vendor specific",
    }
}
