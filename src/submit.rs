// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Public submission entry points, one per command class.

use tracing::debug;

use crate::{
    envelope::{property::PropertyRequest, protocol_command::NvmeCommandSet},
    error::Result,
    handlers::{
        block_passthrough::{submit_read, submit_write},
        format::submit_format,
        protocol_command::submit_vendor_specific,
        storage_property::submit_property,
    },
    models::{
        completion::CommandContext,
        opcode::{AdminCommand, IoCommand},
    },
    platform::StorageDevice,
};

/// Submit an admin command synchronously.
///
/// Identify, Get Log Page, Get Features and Set Features go through storage
/// properties, Format NVM reinitializes the media and the vendor-specific
/// range is passed through as a protocol command (`meta` sizes its
/// response). Any other opcode fails with [`Error::Unsupported`] without
/// touching the device or the completion.
///
/// On success `ctx.cpl.result` carries the DW0 the platform reported, if any.
///
/// [`Error::Unsupported`]: crate::error::Error::Unsupported
pub fn submit_admin<D: StorageDevice + ?Sized>(
    ctx: &mut CommandContext<'_, D>,
    data: &mut [u8],
    meta: &mut [u8],
) -> Result<()> {
    let cmd = AdminCommand::try_from(&ctx.cmd).inspect_err(|e| {
        debug!("FAILED: ENOSYS {e}");
    })?;

    let request = match cmd {
        AdminCommand::Identify { cns, nsid } => PropertyRequest::identify(cns, nsid),
        AdminCommand::GetLogPage { lid, nsid } => PropertyRequest::log_page(lid, nsid),
        AdminCommand::GetFeature { cdw10, cdw11 } => PropertyRequest::get_feature(cdw10, cdw11),
        AdminCommand::SetFeature { fid, cdw10, cdw11 } => {
            PropertyRequest::set_feature(fid, cdw10, cdw11)
        },
        AdminCommand::Format => return submit_format(ctx.dev),
        AdminCommand::VendorSpecific { .. } => {
            ctx.cpl.result = submit_vendor_specific(ctx.dev, &ctx.cmd, NvmeCommandSet::Admin, meta)?;
            return Ok(());
        },
    };

    ctx.cpl.result = submit_property(ctx.dev, request, data)?;
    Ok(())
}

/// Submit an NVM command synchronously.
///
/// Read and Write fall back to SCSI READ(10)/WRITE(10) pass-through over
/// `data`; the vendor-specific range is passed through as a protocol command
/// with `meta` as its response buffer. Any other opcode fails with
/// [`Error::Unsupported`] and leaves the completion untouched.
///
/// Every other failure is mirrored into the completion: `result` is reset,
/// `status.sc` holds [`Error::status`] and `status.sct` is
/// [`StatusCodeType::Vendor`].
///
/// [`Error::Unsupported`]: crate::error::Error::Unsupported
/// [`Error::status`]: crate::error::Error::status
/// [`StatusCodeType::Vendor`]: crate::models::completion::StatusCodeType::Vendor
pub fn submit_io<D: StorageDevice + ?Sized>(
    ctx: &mut CommandContext<'_, D>,
    data: &mut [u8],
    meta: &mut [u8],
) -> Result<()> {
    let cmd = IoCommand::try_from(&ctx.cmd).inspect_err(|e| {
        debug!("FAILED: nosys {e}");
    })?;

    let outcome = match cmd {
        IoCommand::Read { slba, nlb } => submit_read(ctx.dev, slba, nlb, data),
        IoCommand::Write { slba, nlb } => submit_write(ctx.dev, slba, nlb, data),
        IoCommand::VendorSpecific { .. } => {
            submit_vendor_specific(ctx.dev, &ctx.cmd, NvmeCommandSet::Nvm, meta)
        },
    };

    match outcome {
        Ok(result) => {
            ctx.cpl.result = result;
            Ok(())
        },
        Err(err) => {
            debug!(?cmd, status = err.status(), "FAILED: {err}");
            ctx.cpl.set_platform_error(err.status());
            Err(err)
        },
    }
}
