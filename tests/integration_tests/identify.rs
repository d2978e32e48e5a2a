// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use nvme_passthru_rs::{
    cfg::logger::init_logger,
    models::{command::NvmeCommand, completion::CommandContext, opcode::CNS_CONTROLLER},
    submit_admin,
};

use crate::integration_tests::common::{device, load_config, open_device};

const IDENTIFY_LEN: usize = 4096;

#[test]
fn identify_controller_twice() -> Result<()> {
    let _ = init_logger("tests/config_logger.yaml");
    let cfg = load_config()?;
    let Some(file) = open_device(&cfg) else {
        return Ok(());
    };
    let dev = device(&file, &cfg);

    let mut first = vec![0u8; IDENTIFY_LEN];
    let mut ctx = CommandContext::new(&dev, NvmeCommand::identify(CNS_CONTROLLER, 0));
    submit_admin(&mut ctx, &mut first, &mut [])?;

    // VID (bytes 0..2) is never zero on a real controller.
    assert_ne!(u16::from_le_bytes([first[0], first[1]]), 0, "PCI vendor id");
    let model = String::from_utf8_lossy(&first[24..64]);
    eprintln!("controller model: {}", model.trim());

    let mut second = vec![0u8; IDENTIFY_LEN];
    let mut ctx = CommandContext::new(&dev, NvmeCommand::identify(CNS_CONTROLLER, 0));
    submit_admin(&mut ctx, &mut second, &mut [])?;

    assert_eq!(first, second, "identify controller must be stable");
    Ok(())
}

#[test]
fn identify_namespace() -> Result<()> {
    let cfg = load_config()?;
    let Some(file) = open_device(&cfg) else {
        return Ok(());
    };
    let dev = device(&file, &cfg);

    let mut data = vec![0u8; IDENTIFY_LEN];
    let mut ctx = CommandContext::new(&dev, NvmeCommand::identify(0, cfg.device.nsid));
    submit_admin(&mut ctx, &mut data, &mut [])?;

    let nsze = u64::from_le_bytes(data[0..8].try_into()?);
    assert!(nsze > 0, "namespace size");
    Ok(())
}
