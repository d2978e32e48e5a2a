// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::{debug, warn};

use crate::{
    envelope::{
        ioctl::IoctlCode,
        protocol_command::{NvmeCommandSet, ProtocolCommandEnvelope, return_status},
    },
    error::{Error, Result},
    models::command::NvmeCommand,
    platform::{StorageDevice, submit},
};

/// Pass a vendor-specific command through as a storage protocol command.
///
/// The device's response region is sized by `meta` and copied into it on
/// success. Success means the platform call succeeded *and* handed back the
/// whole envelope; a shorter return is [`Error::ShortTransfer`]. Returns the
/// completion DW0.
pub fn submit_vendor_specific<D: StorageDevice + ?Sized>(
    dev: &D,
    cmd: &NvmeCommand,
    set: NvmeCommandSet,
    meta: &mut [u8],
) -> Result<u32> {
    let mut envelope = ProtocolCommandEnvelope::new(cmd, set, meta.len())?;
    let submitted = envelope.len();

    let returned = submit(
        dev,
        IoctlCode::StorageProtocolCommand,
        envelope.as_bytes_mut(),
        submitted,
    )
    .inspect_err(|e| {
        debug!(?set, opcode = cmd.opcode, "NVMe VendorSpecific Command failed: {e}");
    })?;

    let hdr = envelope.header()?;
    if returned != submitted {
        warn!(
            ?set,
            opcode = cmd.opcode,
            submitted,
            returned,
            return_status = hdr.return_status,
            error_code = hdr.error_code,
            "NVMe VendorSpecific Command failed"
        );
        return Err(Error::ShortTransfer {
            submitted,
            returned,
        });
    }
    if hdr.return_status != return_status::SUCCESS {
        debug!(
            return_status = hdr.return_status,
            "protocol command reported a non-success status with a full return"
        );
    }
    let dw0 = hdr.fixed_protocol_return_data;
    debug!(?set, opcode = cmd.opcode, dw0, "NVMe VendorSpecific Command passed");

    meta.copy_from_slice(envelope.response()?);
    Ok(dw0)
}
