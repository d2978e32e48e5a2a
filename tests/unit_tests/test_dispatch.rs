// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use nvme_passthru_rs::{
    Error, submit_admin, submit_io,
    envelope::ioctl::IoctlCode,
    error::ENOSYS,
    models::{
        command::NvmeCommand,
        completion::{CommandContext, Completion},
        opcode::UnsupportedOpcode,
    },
};

use super::common::StubDevice;

fn admin_code(cmd: NvmeCommand, data_len: usize) -> Result<IoctlCode> {
    let dev = StubDevice::property(vec![0u8], 0);
    let mut ctx = CommandContext::new(&dev, cmd);
    let mut data = vec![0u8; data_len];
    submit_admin(&mut ctx, &mut data, &mut [])?;
    assert_eq!(dev.call_count(), 1, "exactly one platform request");
    Ok(dev.calls()[0].code)
}

#[test]
fn test_admin_routing() -> Result<()> {
    assert_eq!(
        admin_code(NvmeCommand::identify(1, 0), 4096)?,
        IoctlCode::StorageQueryProperty
    );
    assert_eq!(
        admin_code(NvmeCommand::get_log_page(0x02, 0xFFFF_FFFF, 512), 512)?,
        IoctlCode::StorageQueryProperty
    );
    assert_eq!(
        admin_code(NvmeCommand::get_feature(0x07, 0, 0), 0)?,
        IoctlCode::StorageQueryProperty
    );
    assert_eq!(
        admin_code(NvmeCommand::set_feature(0x06, 1, false), 0)?,
        IoctlCode::StorageSetProperty
    );
    assert_eq!(
        admin_code(NvmeCommand::format(1, 0), 0)?,
        IoctlCode::StorageReinitializeMedia
    );
    Ok(())
}

#[test]
fn test_admin_vendor_specific_range() -> Result<()> {
    for opcode in [0xC0u8, 0xD5, 0xFF] {
        let dev = StubDevice::echo();
        let mut ctx = CommandContext::new(&dev, NvmeCommand::new(opcode));
        let mut meta = [0u8; 16];
        submit_admin(&mut ctx, &mut [], &mut meta)?;

        let calls = dev.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].code, IoctlCode::StorageProtocolCommand);
    }
    Ok(())
}

#[test]
fn test_admin_unsupported_never_reaches_device() -> Result<()> {
    // Delete SQ, Create SQ, Abort, Namespace Management, last non-vendor.
    for opcode in [0x00u8, 0x01, 0x08, 0x0D, 0x7F, 0x81, 0xBF] {
        let dev = StubDevice::echo();
        let mut ctx = CommandContext::new(&dev, NvmeCommand::new(opcode));
        ctx.cpl.result = 0xDEAD_BEEF;
        let before = ctx.cpl;

        let err = match submit_admin(&mut ctx, &mut [0u8; 8], &mut []) {
            Err(e) => e,
            Ok(()) => anyhow::bail!("opcode {opcode:#04x} must be rejected"),
        };

        assert!(err.is_unsupported());
        assert!(matches!(err, Error::Unsupported(UnsupportedOpcode(o)) if o == opcode));
        assert_eq!(err.status(), -ENOSYS);
        assert_eq!(dev.call_count(), 0, "no platform request for {opcode:#04x}");
        assert_eq!(ctx.cpl, before, "completion must stay untouched");
    }
    Ok(())
}

#[test]
fn test_io_routing() -> Result<()> {
    let mut data = vec![0u8; 512];

    let dev = StubDevice::echo();
    let mut ctx = CommandContext::new(&dev, NvmeCommand::read(1, 0, 0));
    submit_io(&mut ctx, &mut data, &mut [])?;
    assert_eq!(dev.calls()[0].code, IoctlCode::ScsiPassThroughDirect);

    let dev = StubDevice::echo();
    let mut ctx = CommandContext::new(&dev, NvmeCommand::write(1, 0, 0));
    submit_io(&mut ctx, &mut data, &mut [])?;
    assert_eq!(dev.calls()[0].code, IoctlCode::ScsiPassThroughDirect);

    let dev = StubDevice::echo();
    let mut ctx = CommandContext::new(&dev, NvmeCommand::new(0xC1));
    submit_io(&mut ctx, &mut [], &mut [0u8; 8])?;
    assert_eq!(dev.calls()[0].code, IoctlCode::StorageProtocolCommand);

    Ok(())
}

#[test]
fn test_io_unsupported_leaves_completion() -> Result<()> {
    // Flush, Compare, Write Zeroes, Dataset Management.
    for opcode in [0x00u8, 0x05, 0x08, 0x09, 0xBF] {
        let dev = StubDevice::echo();
        let mut ctx = CommandContext::new(&dev, NvmeCommand::new(opcode));

        let err = match submit_io(&mut ctx, &mut [0u8; 512], &mut []) {
            Err(e) => e,
            Ok(()) => anyhow::bail!("opcode {opcode:#04x} must be rejected"),
        };

        assert_eq!(err.status(), -ENOSYS);
        assert_eq!(dev.call_count(), 0);
        assert_eq!(ctx.cpl, Completion::default());
    }
    Ok(())
}

#[test]
fn test_admin_result_carries_dw0() -> Result<()> {
    let dev = StubDevice::property(vec![0u8], 0x0000_0001);
    let mut ctx = CommandContext::new(&dev, NvmeCommand::get_feature(0x06, 0, 0));
    submit_admin(&mut ctx, &mut [], &mut [])?;

    assert_eq!(ctx.cpl.result, 1);
    assert!(!ctx.cpl.is_error());
    Ok(())
}
