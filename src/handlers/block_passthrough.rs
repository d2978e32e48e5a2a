// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::{debug, warn};
use zerocopy::IntoBytes;

use crate::{
    control_block::{CDB_FIELD_LEN, Cdb10Range, read::build_read10, write::build_write10},
    envelope::{
        ioctl::IoctlCode,
        scsi_pass_through::{DataDirection, ScsiPassThroughDirectWithBuffer},
    },
    error::{Error, Result},
    models::sense_data::SenseData,
    platform::{StorageDevice, submit},
};

/// Read `nlb + 1` blocks at `slba` into `data` through a READ(10) pass-through.
pub fn submit_read<D: StorageDevice + ?Sized>(
    dev: &D,
    slba: u64,
    nlb: u16,
    data: &mut [u8],
) -> Result<u32> {
    let range = Cdb10Range::from_nvme(slba, nlb)?;
    let mut cdb = [0u8; CDB_FIELD_LEN];
    build_read10(&mut cdb, range);
    pass_through(dev, DataDirection::In, &cdb, data)
}

/// Write `nlb + 1` blocks at `slba` from `data` through a WRITE(10)
/// pass-through.
pub fn submit_write<D: StorageDevice + ?Sized>(
    dev: &D,
    slba: u64,
    nlb: u16,
    data: &mut [u8],
) -> Result<u32> {
    let range = Cdb10Range::from_nvme(slba, nlb)?;
    let mut cdb = [0u8; CDB_FIELD_LEN];
    build_write10(&mut cdb, range);
    pass_through(dev, DataDirection::Out, &cdb, data)
}

fn pass_through<D: StorageDevice + ?Sized>(
    dev: &D,
    direction: DataDirection,
    cdb: &[u8; CDB_FIELD_LEN],
    data: &mut [u8],
) -> Result<u32> {
    let mut spt =
        ScsiPassThroughDirectWithBuffer::new(dev.scsi_address(), direction, cdb, data)?;
    let len = size_of::<ScsiPassThroughDirectWithBuffer>();
    debug!(?direction, cdb = %hex::encode(&cdb[..10]), transfer = data.len(), "block pass-through");

    submit(dev, IoctlCode::ScsiPassThroughDirect, spt.as_mut_bytes(), len)?;

    let status = spt.scsi_status();
    if !status.is_good() {
        let sense = SenseData::parse(spt.sense());
        warn!(?status, ?sense, "block pass-through check condition");
        return Err(Error::ScsiStatus { status, sense });
    }
    Ok(0)
}
