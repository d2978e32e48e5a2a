// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::models::command::NvmeCommand;

/// NVMe Status Code Type values.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatusCodeType {
    #[default]
    Generic = 0x0,
    CommandSpecific = 0x1,
    MediaAndDataIntegrity = 0x2,
    Path = 0x3,
    /// Vendor specific. Used whenever `sc` holds a platform error instead of
    /// an NVMe status code.
    Vendor = 0x7,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// Status code. Holds the raw platform error when `sct` is
    /// [`StatusCodeType::Vendor`].
    pub sc: i32,
    pub sct: StatusCodeType,
}

/// NVMe-shaped completion populated by the submit functions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Command specific DW0.
    pub result: u32,
    pub status: Status,
}

impl Completion {
    /// Record a failure whose error space is not NVMe's own.
    pub fn set_platform_error(&mut self, raw: i32) {
        self.result = 0;
        self.status.sc = raw;
        self.status.sct = StatusCodeType::Vendor;
    }

    pub fn is_error(&self) -> bool {
        self.status.sc != 0
    }
}

/// Caller-owned command context: a borrowed device, the command to submit
/// and the completion slot the submit functions fill in.
///
/// The device is never opened, closed or retained past the borrow.
#[derive(Debug)]
pub struct CommandContext<'d, D: ?Sized> {
    pub dev: &'d D,
    pub cmd: NvmeCommand,
    pub cpl: Completion,
}

impl<'d, D: ?Sized> CommandContext<'d, D> {
    pub fn new(dev: &'d D, cmd: NvmeCommand) -> Self {
        Self {
            dev,
            cmd,
            cpl: Completion::default(),
        }
    }
}
