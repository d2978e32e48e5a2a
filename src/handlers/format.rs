// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    envelope::ioctl::IoctlCode,
    error::Result,
    platform::{StorageDevice, submit},
};

/// Reinitialize the media. Carries no envelope, offsets or payload.
pub fn submit_format<D: StorageDevice + ?Sized>(dev: &D) -> Result<()> {
    submit(dev, IoctlCode::StorageReinitializeMedia, &mut [], 0)?;
    debug!("media reinitialized");
    Ok(())
}
