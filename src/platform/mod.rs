//! The synchronous platform request primitive every submission path goes
//! through.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io;

use tracing::{debug, trace};

use crate::{
    envelope::{ioctl::IoctlCode, scsi_pass_through::ScsiAddress},
    error::{Error, Result},
};

#[cfg(windows)]
/// `DeviceIoControl` on a borrowed Windows handle.
pub mod windows;

/// An already-open storage device accepting I/O control requests.
///
/// Implementations must complete each call before returning; this layer
/// never overlaps requests and keeps no state between them.
pub trait StorageDevice {
    /// Issue one synchronous I/O control request.
    ///
    /// The first `input_len` bytes of `buffer` are the request; the platform
    /// may overwrite all of `buffer` with its response. Returns the number of
    /// bytes written back.
    fn device_io_control(
        &self,
        code: IoctlCode,
        buffer: &mut [u8],
        input_len: usize,
    ) -> io::Result<usize>;

    /// Address used by block pass-through requests.
    fn scsi_address(&self) -> ScsiAddress {
        ScsiAddress::default()
    }
}

impl<T: StorageDevice + ?Sized> StorageDevice for &T {
    fn device_io_control(
        &self,
        code: IoctlCode,
        buffer: &mut [u8],
        input_len: usize,
    ) -> io::Result<usize> {
        (**self).device_io_control(code, buffer, input_len)
    }

    fn scsi_address(&self) -> ScsiAddress {
        (**self).scsi_address()
    }
}

/// Send `buffer` down as a single request, passing the platform error
/// through untouched.
pub(crate) fn submit<D: StorageDevice + ?Sized>(
    dev: &D,
    code: IoctlCode,
    buffer: &mut [u8],
    input_len: usize,
) -> Result<usize> {
    trace!(
        ?code,
        len = buffer.len(),
        request = %hex::encode(&buffer[..input_len.min(buffer.len())]),
        "DeviceIoControl"
    );
    dev.device_io_control(code, buffer, input_len)
        .map_err(|e| {
            debug!(?code, err = %e, "FAILED: DeviceIoControl()");
            Error::Platform(e)
        })
}
