// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Storage property query / set envelopes carrying NVMe protocol-specific
//! requests.
//!
//! Request layout (query):
//!
//! ```text
//! 0        8                                  48                48+N
//! +--------+----------------------------------+------------------+
//! | QUERY  | STORAGE_PROTOCOL_SPECIFIC_DATA   |  payload (N)     |
//! +--------+----------------------------------+------------------+
//! ```
//!
//! The set variant uses `STORAGE_PROPERTY_SET` followed by the 64-byte
//! `STORAGE_PROTOCOL_SPECIFIC_DATA_EXT`. The platform overwrites the buffer
//! in place with a `STORAGE_PROTOCOL_DATA_DESCRIPTOR`.

use core::mem::offset_of;

use tracing::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    envelope::{RequestEnvelope, ioctl::IoctlCode, len_u32},
    error::{Error, Result},
    models::opcode::{CNS_CONTROLLER, CNS_NAMESPACE, FEATURE_VOLATILE_WRITE_CACHE},
};

/// `ProtocolTypeNvme`.
pub const PROTOCOL_TYPE_NVME: u32 = 3;
/// `PropertyStandardQuery`.
const PROPERTY_STANDARD_QUERY: u32 = 0;
/// `PropertyStandardSet`.
const PROPERTY_STANDARD_SET: u32 = 0;

/// `STORAGE_PROPERTY_ID` values for protocol-specific requests.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePropertyId {
    AdapterProtocolSpecific = 49,
    DeviceProtocolSpecific = 50,
}

/// `STORAGE_PROTOCOL_NVME_DATA_TYPE`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvmeDataType {
    Identify = 1,
    LogPage = 2,
    Feature = 3,
}

/// `STORAGE_PROPERTY_QUERY` up to `AdditionalParameters`.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct StoragePropertyQuery {
    pub property_id: u32,
    pub query_type: u32,
}

/// `STORAGE_PROPERTY_SET` up to `AdditionalParameters`.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct StoragePropertySet {
    pub property_id: u32,
    pub set_type: u32,
}

/// `STORAGE_PROTOCOL_SPECIFIC_DATA`.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct StorageProtocolSpecificData {
    pub protocol_type: u32,
    pub data_type: u32,
    pub protocol_data_request_value: u32,
    pub protocol_data_request_sub_value: u32,
    /// Relative to the start of this structure.
    pub protocol_data_offset: u32,
    pub protocol_data_length: u32,
    pub fixed_protocol_return_data: u32,
    pub protocol_data_request_sub_value2: u32,
    pub protocol_data_request_sub_value3: u32,
    pub protocol_data_request_sub_value4: u32,
}

/// `STORAGE_PROTOCOL_SPECIFIC_DATA_EXT`.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct StorageProtocolSpecificDataExt {
    pub protocol_type: u32,
    pub data_type: u32,
    pub protocol_data_value: u32,
    pub protocol_data_sub_value: u32,
    /// Relative to the start of this structure.
    pub protocol_data_offset: u32,
    pub protocol_data_length: u32,
    pub fixed_protocol_return_data: u32,
    pub protocol_data_sub_value2: u32,
    pub protocol_data_sub_value3: u32,
    pub protocol_data_sub_value4: u32,
    pub protocol_data_sub_value5: u32,
    pub reserved: [u32; 5],
}

/// `STORAGE_PROTOCOL_DATA_DESCRIPTOR`, returned in place of the request.
#[repr(C)]
#[derive(Debug, Default, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct StorageProtocolDataDescriptor {
    pub version: u32,
    pub size: u32,
    pub protocol_specific_data: StorageProtocolSpecificData,
}

const _: () = assert!(size_of::<StoragePropertyQuery>() == 8);
const _: () = assert!(size_of::<StoragePropertySet>() == 8);
const _: () = assert!(size_of::<StorageProtocolSpecificData>() == 40);
const _: () = assert!(size_of::<StorageProtocolSpecificDataExt>() == 64);
const _: () = assert!(size_of::<StorageProtocolDataDescriptor>() == 48);

/// Declared version and size every returned descriptor must carry.
pub const DESCRIPTOR_LEN: u32 = size_of::<StorageProtocolDataDescriptor>() as u32;

/// Whether a request addresses the device or the adapter (controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyScope {
    Device,
    Adapter,
}

impl PropertyScope {
    pub const fn property_id(self) -> StoragePropertyId {
        match self {
            PropertyScope::Device => StoragePropertyId::DeviceProtocolSpecific,
            PropertyScope::Adapter => StoragePropertyId::AdapterProtocolSpecific,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAction {
    /// `IOCTL_STORAGE_QUERY_PROPERTY`; payload flows from the device.
    Query,
    /// `IOCTL_STORAGE_SET_PROPERTY`; payload flows to the device.
    Set,
}

/// A protocol-specific property request, independent of its byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRequest {
    pub action: PropertyAction,
    pub scope: PropertyScope,
    pub data_type: NvmeDataType,
    pub value: u32,
    pub sub_value: u32,
}

impl PropertyRequest {
    /// Namespace and controller identify data is addressed to the device;
    /// every other CNS goes to the adapter.
    pub fn identify(cns: u8, nsid: u32) -> Self {
        let scope = match cns {
            CNS_NAMESPACE | CNS_CONTROLLER => PropertyScope::Device,
            _ => PropertyScope::Adapter,
        };
        Self {
            action: PropertyAction::Query,
            scope,
            data_type: NvmeDataType::Identify,
            value: cns as u32,
            sub_value: nsid,
        }
    }

    pub fn log_page(lid: u8, nsid: u32) -> Self {
        Self {
            action: PropertyAction::Query,
            scope: PropertyScope::Device,
            data_type: NvmeDataType::LogPage,
            value: lid as u32,
            sub_value: nsid,
        }
    }

    pub fn get_feature(cdw10: u32, cdw11: u32) -> Self {
        Self {
            action: PropertyAction::Query,
            scope: PropertyScope::Device,
            data_type: NvmeDataType::Feature,
            value: cdw10,
            sub_value: cdw11,
        }
    }

    /// The volatile write cache is an adapter setting; every other feature
    /// is set on the device.
    pub fn set_feature(fid: u8, cdw10: u32, cdw11: u32) -> Self {
        let scope = if fid == FEATURE_VOLATILE_WRITE_CACHE {
            PropertyScope::Adapter
        } else {
            PropertyScope::Device
        };
        Self {
            action: PropertyAction::Set,
            scope,
            data_type: NvmeDataType::Feature,
            value: cdw10,
            sub_value: cdw11,
        }
    }

    pub fn ioctl_code(&self) -> IoctlCode {
        match self.action {
            PropertyAction::Query => IoctlCode::StorageQueryProperty,
            PropertyAction::Set => IoctlCode::StorageSetProperty,
        }
    }
}

/// Payload extracted from a validated descriptor.
#[derive(Debug)]
pub struct PropertyResponse<'a> {
    pub payload: &'a [u8],
    /// Completion DW0 reported alongside the payload.
    pub fixed_return: u32,
}

/// Request buffer for one property query or set.
pub struct PropertyEnvelope {
    request: PropertyRequest,
    buf: RequestEnvelope,
    data_len: usize,
}

impl PropertyEnvelope {
    const HEADER_LEN: usize = size_of::<StoragePropertyQuery>();

    /// Total bytes of a query envelope carrying `data_len` payload bytes.
    pub const fn query_len(data_len: usize) -> usize {
        Self::HEADER_LEN + size_of::<StorageProtocolSpecificData>() + data_len
    }

    /// Total bytes of a set envelope carrying `data_len` payload bytes.
    pub const fn set_len(data_len: usize) -> usize {
        size_of::<StoragePropertySet>() + size_of::<StorageProtocolSpecificDataExt>() + data_len
    }

    /// Lay out `request` for a caller buffer of `data.len()` bytes.
    ///
    /// A query only reserves room for `data`; a set copies `data` into the
    /// payload region.
    pub fn new(request: PropertyRequest, data: &[u8]) -> Result<Self> {
        let data_len = data.len();
        let buf = match request.action {
            PropertyAction::Query => Self::build_query(&request, data_len)?,
            PropertyAction::Set => Self::build_set(&request, data)?,
        };
        Ok(Self {
            request,
            buf,
            data_len,
        })
    }

    fn build_query(request: &PropertyRequest, data_len: usize) -> Result<RequestEnvelope> {
        let psd_len = size_of::<StorageProtocolSpecificData>();
        let payload_offset = Self::HEADER_LEN + psd_len;
        let mut buf = RequestEnvelope::zeroed(Self::query_len(data_len))?;
        buf.check_region(Self::HEADER_LEN, psd_len)?;
        buf.check_region(payload_offset, data_len)?;

        // Feature queries without a payload report through DW0 only.
        let (protocol_data_offset, protocol_data_length) =
            if request.data_type == NvmeDataType::Feature && data_len == 0 {
                (0, 0)
            } else {
                (psd_len as u32, len_u32(data_len, "property payload")?)
            };

        let query = buf.view_mut_at::<StoragePropertyQuery>(0)?;
        query.property_id = request.scope.property_id() as u32;
        query.query_type = PROPERTY_STANDARD_QUERY;

        let psd = buf.view_mut_at::<StorageProtocolSpecificData>(Self::HEADER_LEN)?;
        psd.protocol_type = PROTOCOL_TYPE_NVME;
        psd.data_type = request.data_type as u32;
        psd.protocol_data_request_value = request.value;
        psd.protocol_data_request_sub_value = request.sub_value;
        psd.protocol_data_request_sub_value2 = 0;
        psd.protocol_data_request_sub_value3 = 0;
        psd.protocol_data_offset = protocol_data_offset;
        psd.protocol_data_length = protocol_data_length;

        Ok(buf)
    }

    fn build_set(request: &PropertyRequest, data: &[u8]) -> Result<RequestEnvelope> {
        let header_len = size_of::<StoragePropertySet>();
        let ext_len = size_of::<StorageProtocolSpecificDataExt>();
        let payload_offset = header_len + ext_len;
        let mut buf = RequestEnvelope::zeroed(Self::set_len(data.len()))?;
        buf.check_region(header_len, ext_len)?;
        buf.check_region(payload_offset, data.len())?;

        let (protocol_data_offset, protocol_data_length) = if data.is_empty() {
            (0, 0)
        } else {
            (ext_len as u32, len_u32(data.len(), "property payload")?)
        };

        let set = buf.view_mut_at::<StoragePropertySet>(0)?;
        set.property_id = request.scope.property_id() as u32;
        set.set_type = PROPERTY_STANDARD_SET;

        let ext = buf.view_mut_at::<StorageProtocolSpecificDataExt>(header_len)?;
        ext.protocol_type = PROTOCOL_TYPE_NVME;
        ext.data_type = request.data_type as u32;
        ext.protocol_data_value = request.value;
        ext.protocol_data_sub_value = request.sub_value;
        ext.protocol_data_offset = protocol_data_offset;
        ext.protocol_data_length = protocol_data_length;

        buf.region_mut(payload_offset, data.len())?
            .copy_from_slice(data);

        Ok(buf)
    }

    #[inline]
    pub fn request(&self) -> &PropertyRequest {
        &self.request
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_bytes_mut()
    }

    /// Validate the descriptor the platform wrote back and locate the
    /// payload.
    ///
    /// Nothing beyond the version and size fields is read until both equal
    /// the descriptor size. A payload that would run past the envelope is a
    /// validation failure as well.
    pub fn response(&self) -> Result<PropertyResponse<'_>> {
        let descr = self.buf.view_at::<StorageProtocolDataDescriptor>(0)?;
        if descr.version != DESCRIPTOR_LEN || descr.size != DESCRIPTOR_LEN {
            debug!(
                version = descr.version,
                size = descr.size,
                "data descriptor header not valid"
            );
            return Err(Error::MalformedResponse(format!(
                "version={} size={}, expected {DESCRIPTOR_LEN}",
                descr.version, descr.size
            )));
        }

        let psd = &descr.protocol_specific_data;
        let copy_len = match self.request.action {
            PropertyAction::Query => self.data_len,
            PropertyAction::Set => 0,
        };
        let payload = if copy_len == 0 {
            &[][..]
        } else {
            let start = offset_of!(StorageProtocolDataDescriptor, protocol_specific_data)
                + psd.protocol_data_offset as usize;
            let end = start.checked_add(copy_len).filter(|end| *end <= self.buf.len());
            match end {
                Some(end) => &self.buf.as_bytes()[start..end],
                None => {
                    return Err(Error::MalformedResponse(format!(
                        "payload {start}+{copy_len} exceeds the {}-byte envelope",
                        self.buf.len()
                    )));
                },
            }
        };

        Ok(PropertyResponse {
            payload,
            fixed_return: psd.fixed_protocol_return_data,
        })
    }
}
