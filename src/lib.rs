//! This crate translates portable NVMe admin and I/O commands into Windows
//! storage pass-through requests, submits them synchronously and maps the
//! outcome back into an NVMe-shaped completion.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

#[cfg(not(target_pointer_width = "64"))]
compile_error!("block pass-through envelopes are laid out for 64-bit hosts only");

/// Handles configuration and logging.
pub mod cfg;
/// Builds SCSI READ(10)/WRITE(10) command descriptor blocks.
pub mod control_block;
/// Bit-exact platform request structures and the buffers they live in.
pub mod envelope;
/// Error type and portable status codes.
pub mod error;
/// One mapper per translation path.
pub mod handlers;
/// Portable NVMe command, completion and SCSI diagnostics models.
pub mod models;
/// The synchronous platform request primitive.
pub mod platform;
/// Admin and I/O submission entry points.
pub mod submit;

pub use error::{Error, Result};
pub use submit::{submit_admin, submit_io};
