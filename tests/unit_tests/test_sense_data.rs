// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::{Context, Result};
use hex_literal::hex;
use nvme_passthru_rs::models::{
    scsi_status::ScsiStatus,
    sense_data::{SenseData, asc_ascq_to_str},
};

#[test]
fn test_parse_fixed_sense() -> Result<()> {
    // ILLEGAL REQUEST, LBA out of range, info field valid.
    let raw = hex!("F0 00 25 00001000 0A 00000000 21 00 00 000000");
    let sense = SenseData::parse(&raw).context("fixed sense expected")?;

    assert!(sense.valid);
    assert_eq!(sense.response_code, 0x70);
    assert_eq!(sense.sense_key, 0x05);
    assert!(sense.ili);
    assert!(!sense.filemark);
    assert_eq!(sense.information, 0x1000);
    assert_eq!(sense.additional_len, 0x0A);
    assert_eq!(sense.description(), "Logical block address out of range");
    Ok(())
}

#[test]
fn test_parse_rejects() {
    assert!(SenseData::parse(&[]).is_none());
    assert!(SenseData::parse(&hex!("70 00 03 00000000 0A 00000000 11")).is_none());
    // Descriptor format.
    assert!(SenseData::parse(&[0x72; 32]).is_none());
    assert!(SenseData::parse(&[0u8; 32]).is_none());
}

#[test]
fn test_asc_ascq_lookup() {
    assert_eq!(asc_ascq_to_str(0x3A, 0x00), "Medium not present");
    assert_eq!(asc_ascq_to_str(0xFF, 0xFF), "UNSPECIFIED / vendor specific");
}

#[test]
fn test_scsi_status_byte() {
    assert_eq!(ScsiStatus::from(0x02), ScsiStatus::CheckCondition);
    assert_eq!(u8::from(ScsiStatus::Busy), 0x08);
    assert_eq!(ScsiStatus::from(0x7E), ScsiStatus::Other(0x7E));
    assert!(ScsiStatus::Good.is_good());
    assert!(ScsiStatus::ConditionMet.is_good());
    assert!(!ScsiStatus::CheckCondition.is_good());
}
