//! One mapper per translation path. Each builds its envelope, issues exactly
//! one platform request and releases the envelope before returning.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Block READ(10)/WRITE(10) pass-through for NVM read and write.
pub mod block_passthrough;
/// Media reinitialization for Format NVM.
pub mod format;
/// Storage protocol command for vendor-specific opcodes.
pub mod protocol_command;
/// Storage property query / set for Identify, Get Log Page and features.
pub mod storage_property;
