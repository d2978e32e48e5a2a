// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    envelope::property::{PropertyAction, PropertyEnvelope, PropertyRequest},
    error::Result,
    platform::{StorageDevice, submit},
};

/// Submit a property query or set.
///
/// A query fills all of `data` from the returned descriptor's payload; a set
/// sends `data` to the device and leaves it untouched. `data` is not written
/// at all unless the descriptor validates. Returns the completion DW0 the
/// platform reported.
pub fn submit_property<D: StorageDevice + ?Sized>(
    dev: &D,
    request: PropertyRequest,
    data: &mut [u8],
) -> Result<u32> {
    let mut envelope = PropertyEnvelope::new(request, data)?;
    let input_len = envelope.len();
    debug!(
        ?request,
        len = input_len,
        "storage property request"
    );

    let returned = submit(dev, request.ioctl_code(), envelope.as_bytes_mut(), input_len)?;

    let response = envelope.response()?;
    if request.action == PropertyAction::Query {
        data.copy_from_slice(response.payload);
    }
    debug!(returned, dw0 = response.fixed_return, "storage property completed");

    Ok(response.fixed_return)
}
