// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use nvme_passthru_rs::{
    cfg::{
        config::{Config, PassthroughConfig, resolve_config_path},
        logger::init_logger,
    },
    envelope::scsi_pass_through::ScsiAddress,
};

fn parse(yaml: &str) -> Result<Config> {
    let mut cfg: Config = serde_yaml::from_str(yaml)?;
    cfg.validate_and_normalize()?;
    Ok(cfg)
}

#[test]
fn test_load_fixture() -> Result<()> {
    let cfg = resolve_config_path("tests/config.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    assert_eq!(cfg.device.path, r"\\.\PhysicalDrive1");
    assert_eq!(cfg.device.nsid, 1);
    assert_eq!(cfg.passthrough.address(), ScsiAddress::default());
    Ok(())
}

#[test]
fn test_defaults_and_trim() -> Result<()> {
    let cfg = parse("device:\n  Path: '  \\\\.\\PhysicalDrive3  '\n")?;
    assert_eq!(cfg.device.path, r"\\.\PhysicalDrive3");
    assert_eq!(cfg.device.nsid, 1);
    assert_eq!(cfg.passthrough, PassthroughConfig::default());
    Ok(())
}

#[test]
fn test_passthrough_address() -> Result<()> {
    let cfg = parse(
        "device:\n  Path: x\npassthrough:\n  PathId: 1\n  TargetId: 4\n  Lun: 2\n",
    )?;
    assert_eq!(
        cfg.passthrough.address(),
        ScsiAddress {
            path_id: 1,
            target_id: 4,
            lun: 2
        }
    );
    Ok(())
}

#[test]
fn test_validation_rejects() {
    assert!(parse("device:\n  Path: '   '\n").is_err());
    assert!(parse("device:\n  Path: x\n  Nsid: 0\n").is_err());
    assert!(parse("device:\n  Path: x\n  Nsid: 4294967295\n").is_err());
    assert!(parse("passthrough:\n  Lun: 1\n").is_err());
}

#[test]
fn test_missing_config_file() {
    assert!(Config::load_from_file("tests/does_not_exist.yaml").is_err());
    assert!(resolve_config_path("tests/does_not_exist.yaml").is_err());
}

#[test]
fn test_init_logger() -> Result<()> {
    let _guard = init_logger("tests/config_logger.yaml")?;
    tracing::debug!(nsid = 1u32, "logger installed");
    assert!(init_logger("tests/does_not_exist.yaml").is_err());
    Ok(())
}
