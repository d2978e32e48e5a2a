// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::envelope::scsi_pass_through::ScsiAddress;

/// Namespace used when the config does not name one.
const DEFAULT_NSID: u32 = 1;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Which device to talk to.
    pub device: DeviceConfig,
    /// Addressing of the block pass-through fallback.
    #[serde(default)]
    pub passthrough: PassthroughConfig,
}

/// Device selection. Opening the device stays with the caller; this only
/// records what to open.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DeviceConfig {
    #[serde(rename = "Path")]
    /// Device path, e.g. `\\.\PhysicalDrive1`.
    pub path: String,

    #[serde(rename = "Nsid", default = "default_nsid")]
    /// Namespace the I/O commands address.
    pub nsid: u32,
}

fn default_nsid() -> u32 {
    DEFAULT_NSID
}

/// SCSI address put into every block pass-through envelope.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PassthroughConfig {
    #[serde(default, rename = "PathId")]
    pub path_id: u8,
    #[serde(default, rename = "TargetId")]
    pub target_id: u8,
    #[serde(default, rename = "Lun")]
    pub lun: u8,
}

impl PassthroughConfig {
    pub fn address(&self) -> ScsiAddress {
        ScsiAddress {
            path_id: self.path_id,
            target_id: self.target_id,
            lun: self.lun,
        }
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path:?}"))?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        let trimmed = self.device.path.trim();
        if trimmed.len() != self.device.path.len() {
            self.device.path = trimmed.to_string();
        }
        ensure!(!self.device.path.is_empty(), "device Path must not be empty");

        // 0 is never a valid namespace; the broadcast id cannot carry I/O.
        ensure!(
            self.device.nsid != 0 && self.device.nsid != u32::MAX,
            "Nsid must name a single namespace, got {:#x}",
            self.device.nsid
        );

        Ok(())
    }
}

/// Resolve `rel` against the working directory and canonicalize it.
pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    abs.canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))
}
