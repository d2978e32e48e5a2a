// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::control_block::{CDB_FIELD_LEN, Cdb10Range};

/// `SCSIOP_WRITE`.
pub const WRITE10_OPCODE: u8 = 0x2A;

/// Build a padded 16-byte SCSI **WRITE(10)** CDB.
///
/// Same layout as READ(10) with OPERATION CODE = 0x2A; WRPROTECT, DPO, FUA,
/// GROUP NUMBER and CONTROL are left 0.
#[inline]
pub fn build_write10(cdb: &mut [u8; CDB_FIELD_LEN], range: Cdb10Range) {
    cdb.fill(0);
    cdb[0] = WRITE10_OPCODE;
    cdb[2..6].copy_from_slice(&range.lba.to_be_bytes());
    cdb[7..9].copy_from_slice(&range.blocks.to_be_bytes());
}
