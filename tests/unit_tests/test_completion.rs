// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use nvme_passthru_rs::{
    Error, submit_admin, submit_io,
    envelope::ioctl::IoctlCode,
    error::{EINVAL, EIO, ENOMEM, ENOSYS},
    models::{
        command::NvmeCommand,
        completion::{CommandContext, Completion, Status, StatusCodeType},
        opcode::UnsupportedOpcode,
    },
};

use super::common::StubDevice;

/// ERROR_GEN_FAILURE
const GEN_FAILURE: i32 = 31;

#[test]
fn test_io_failure_remaps_completion() -> Result<()> {
    let commands = [
        NvmeCommand::read(1, 0, 0),
        NvmeCommand::write(1, 0, 0),
        NvmeCommand::new(0xC2),
    ];

    for cmd in commands {
        let dev = StubDevice::failing(GEN_FAILURE);
        let mut ctx = CommandContext::new(&dev, cmd);
        ctx.cpl.result = 0xDEAD_BEEF;

        let res = submit_io(&mut ctx, &mut [0u8; 512], &mut [0u8; 16]);
        assert!(matches!(res, Err(Error::Platform(_))));
        assert_eq!(dev.call_count(), 1);
        assert_eq!(
            ctx.cpl,
            Completion {
                result: 0,
                status: Status {
                    sc: GEN_FAILURE,
                    sct: StatusCodeType::Vendor,
                },
            },
            "{cmd:?}"
        );
    }
    Ok(())
}

#[test]
fn test_io_success_keeps_status_clear() -> Result<()> {
    let dev = StubDevice::echo();
    let mut ctx = CommandContext::new(&dev, NvmeCommand::read(1, 0, 0));
    submit_io(&mut ctx, &mut [0u8; 512], &mut [])?;

    assert_eq!(ctx.cpl.status, Status::default());
    assert_eq!(ctx.cpl.status.sct, StatusCodeType::Generic);
    Ok(())
}

#[test]
fn test_admin_failure_leaves_completion() -> Result<()> {
    let dev = StubDevice::failing(GEN_FAILURE);
    let mut ctx = CommandContext::new(&dev, NvmeCommand::format(1, 0));

    let err = match submit_admin(&mut ctx, &mut [], &mut []) {
        Err(e) => e,
        Ok(()) => anyhow::bail!("failing device must fail the format"),
    };
    assert_eq!(err.status(), GEN_FAILURE);
    assert_eq!(dev.calls()[0].code, IoctlCode::StorageReinitializeMedia);
    assert_eq!(dev.calls()[0].buffer_len, 0);
    assert_eq!(ctx.cpl, Completion::default());
    Ok(())
}

#[test]
fn test_error_status_values() {
    assert_eq!(Error::Alloc(1 << 40).status(), -ENOMEM);
    assert_eq!(Error::InvalidArgument("x".into()).status(), -EINVAL);
    assert_eq!(Error::Unsupported(UnsupportedOpcode(0x00)).status(), -ENOSYS);
    assert_eq!(Error::MalformedResponse("x".into()).status(), -EIO);
    assert_eq!(
        Error::ShortTransfer {
            submitted: 2,
            returned: 1
        }
        .status(),
        -EIO
    );
    assert_eq!(
        Error::Platform(std::io::Error::other("no os code")).status(),
        -EIO
    );
    assert_eq!(
        Error::Platform(std::io::Error::from_raw_os_error(5)).status(),
        5
    );
}

#[test]
fn test_set_platform_error() {
    let mut cpl = Completion {
        result: 7,
        status: Status::default(),
    };
    cpl.set_platform_error(-EINVAL);
    assert_eq!(cpl.result, 0);
    assert_eq!(cpl.status.sc, -EINVAL);
    assert_eq!(cpl.status.sct, StatusCodeType::Vendor);
    assert!(cpl.is_error());
}
