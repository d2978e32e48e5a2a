// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Error type shared by every submission path.

use std::io;

use thiserror::Error;

use crate::models::{opcode::UnsupportedOpcode, scsi_status::ScsiStatus, sense_data::SenseData};

/// `-ENOMEM` equivalent.
pub const ENOMEM: i32 = 12;
/// `-EIO` equivalent.
pub const EIO: i32 = 5;
/// `-EINVAL` equivalent.
pub const EINVAL: i32 = 22;
/// `-ENOSYS` equivalent.
pub const ENOSYS: i32 = 38;

/// Result type for submission operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request envelope could not be allocated; nothing was submitted.
    #[error("failed to allocate a {0}-byte request envelope")]
    Alloc(usize),

    /// The platform call itself failed. Carries the raw OS error.
    #[error("platform request failed: {0}")]
    Platform(#[source] io::Error),

    /// The property descriptor returned by the platform did not pass
    /// validation, so none of its payload was trusted.
    #[error("malformed property descriptor: {0}")]
    MalformedResponse(String),

    /// The platform call completed but returned fewer bytes than submitted.
    #[error("short transfer: submitted {submitted} bytes, {returned} returned")]
    ShortTransfer { submitted: usize, returned: usize },

    /// The block pass-through completed with a non-GOOD SCSI status.
    #[error("block pass-through finished with SCSI status {status:?}")]
    ScsiStatus {
        status: ScsiStatus,
        sense: Option<SenseData>,
    },

    /// A caller-supplied value cannot be expressed in the platform request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The opcode has no translation on this backend.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedOpcode),
}

impl Error {
    /// Portable integer status for this error.
    ///
    /// Platform failures hand back the raw OS error code unchanged; the
    /// crate's own failure kinds map onto negative errno values.
    pub fn status(&self) -> i32 {
        match self {
            Error::Platform(e) => e.raw_os_error().unwrap_or(-EIO),
            Error::Alloc(_) => -ENOMEM,
            Error::InvalidArgument(_) => -EINVAL,
            Error::Unsupported(_) => -ENOSYS,
            Error::MalformedResponse(_)
            | Error::ShortTransfer { .. }
            | Error::ScsiStatus { .. } => -EIO,
        }
    }

    /// `true` when the opcode was rejected before any platform call.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}
