//! Portable command model: the NVMe command and completion the caller owns,
//! plus the SCSI status and sense data the block fallback reports back.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// The 64-byte NVMe submission-queue entry.
pub mod command;
/// Completion slot and the caller-owned command context.
pub mod completion;
/// Supported opcodes and the decoded admin / I/O command sets.
pub mod opcode;
/// SCSI status byte returned by block pass-through.
pub mod scsi_status;
/// Fixed-format SCSI sense data.
pub mod sense_data;
