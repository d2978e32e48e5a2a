// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use nvme_passthru_rs::{
    models::{command::NvmeCommand, completion::CommandContext},
    submit_admin,
};

use crate::integration_tests::common::{device, load_config, open_device};

/// SMART / Health Information.
const LID_SMART: u8 = 0x02;
const SMART_LEN: usize = 512;

#[test]
fn smart_log_for_all_namespaces() -> Result<()> {
    let cfg = load_config()?;
    let Some(file) = open_device(&cfg) else {
        return Ok(());
    };
    let dev = device(&file, &cfg);

    let mut data = vec![0xFFu8; SMART_LEN];
    let cmd = NvmeCommand::get_log_page(LID_SMART, 0xFFFF_FFFF, SMART_LEN as u32);
    let mut ctx = CommandContext::new(&dev, cmd);
    submit_admin(&mut ctx, &mut data, &mut [])?;

    // Composite temperature in Kelvin; anything below 200 K is garbage.
    let temp = u16::from_le_bytes([data[1], data[2]]);
    assert!(temp > 200, "composite temperature {temp} K");
    Ok(())
}
