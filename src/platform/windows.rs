// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    ffi::c_void,
    io,
    os::windows::io::{AsRawHandle, BorrowedHandle},
    ptr,
};

use windows_sys::Win32::System::IO::DeviceIoControl;

use crate::{
    cfg::config::PassthroughConfig,
    envelope::{ioctl::IoctlCode, scsi_pass_through::ScsiAddress},
    platform::StorageDevice,
};

/// A Windows storage device handle opened by the caller.
///
/// Only borrowed: the handle is never duplicated, reopened or closed here.
#[derive(Debug)]
pub struct WindowsDevice<'h> {
    handle: BorrowedHandle<'h>,
    address: ScsiAddress,
}

impl<'h> WindowsDevice<'h> {
    pub fn new(handle: BorrowedHandle<'h>) -> Self {
        Self {
            handle,
            address: ScsiAddress::default(),
        }
    }

    pub fn with_passthrough(mut self, cfg: &PassthroughConfig) -> Self {
        self.address = cfg.address();
        self
    }
}

impl StorageDevice for WindowsDevice<'_> {
    fn device_io_control(
        &self,
        code: IoctlCode,
        buffer: &mut [u8],
        input_len: usize,
    ) -> io::Result<usize> {
        let out_len = u32::try_from(buffer.len())
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        let in_len = u32::try_from(input_len.min(buffer.len()))
            .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
        let data: *mut c_void = if buffer.is_empty() {
            ptr::null_mut()
        } else {
            buffer.as_mut_ptr().cast()
        };
        let mut returned: u32 = 0;

        // SAFETY: `data` is valid for `out_len` bytes for the whole call, the
        // call is synchronous (no OVERLAPPED) and the handle is borrowed for
        // longer than this function.
        let ok = unsafe {
            DeviceIoControl(
                self.handle.as_raw_handle(),
                code.raw(),
                data,
                in_len,
                data,
                out_len,
                &mut returned,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(returned as usize)
    }

    fn scsi_address(&self) -> ScsiAddress {
        self.address
    }
}
