// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::control_block::{CDB_FIELD_LEN, Cdb10Range};

/// `SCSIOP_READ`.
pub const READ10_OPCODE: u8 = 0x28;

/// Build a padded 16-byte **SCSI READ(10)** CDB.
///
/// Layout (SBC):
/// - byte 0      : OPERATION CODE = 0x28
/// - byte 1      : RDPROTECT / DPO / FUA, left 0
/// - bytes 2..5  : LBA (big-endian, 32-bit)
/// - byte 6      : GROUP NUMBER, left 0
/// - bytes 7..8  : TRANSFER LENGTH (big-endian, 16-bit)
/// - byte 9      : CONTROL, left 0
#[inline]
pub fn build_read10(cdb: &mut [u8; CDB_FIELD_LEN], range: Cdb10Range) {
    cdb.fill(0);
    cdb[0] = READ10_OPCODE;
    cdb[2..6].copy_from_slice(&range.lba.to_be_bytes());
    cdb[7..9].copy_from_slice(&range.blocks.to_be_bytes());
}
