// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{cell::RefCell, io};

use nvme_passthru_rs::{
    envelope::{
        ioctl::IoctlCode,
        property::{DESCRIPTOR_LEN, StorageProtocolDataDescriptor},
        protocol_command::StorageProtocolCommand,
        scsi_pass_through::ScsiAddress,
    },
    platform::StorageDevice,
};
use zerocopy::FromBytes;

/// One request as the stub device saw it.
#[derive(Debug, Clone)]
pub struct Call {
    pub code: IoctlCode,
    /// Bytes submitted as input.
    pub request: Vec<u8>,
    pub input_len: usize,
    /// Full length of the in/out buffer.
    pub buffer_len: usize,
}

type Responder = Box<dyn Fn(IoctlCode, &mut [u8]) -> io::Result<usize>>;

/// Records every request and answers with a scripted responder.
pub struct StubDevice {
    calls: RefCell<Vec<Call>>,
    respond: Responder,
    address: ScsiAddress,
}

impl StubDevice {
    pub fn new(respond: impl Fn(IoctlCode, &mut [u8]) -> io::Result<usize> + 'static) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            respond: Box::new(respond),
            address: ScsiAddress::default(),
        }
    }

    /// Succeeds and reports the whole buffer as returned, without touching it.
    pub fn echo() -> Self {
        Self::new(|_, buf| Ok(buf.len()))
    }

    /// Fails every request with the raw OS error `code`.
    pub fn failing(code: i32) -> Self {
        Self::new(move |_, _| Err(io::Error::from_raw_os_error(code)))
    }

    /// Answers property requests with a valid descriptor carrying `payload`
    /// (repeated to fill the request) and `dw0`.
    pub fn property(payload: Vec<u8>, dw0: u32) -> Self {
        Self::new(move |_, buf| {
            write_descriptor(buf, &payload, dw0);
            Ok(buf.len())
        })
    }

    pub fn with_address(mut self, address: ScsiAddress) -> Self {
        self.address = address;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.borrow().last().cloned()
    }
}

impl StorageDevice for StubDevice {
    fn device_io_control(
        &self,
        code: IoctlCode,
        buffer: &mut [u8],
        input_len: usize,
    ) -> io::Result<usize> {
        self.calls.borrow_mut().push(Call {
            code,
            request: buffer[..input_len].to_vec(),
            input_len,
            buffer_len: buffer.len(),
        });
        (self.respond)(code, buffer)
    }

    fn scsi_address(&self) -> ScsiAddress {
        self.address
    }
}

/// Overwrite `buf` the way the platform answers a property request: a valid
/// descriptor header followed by the payload right behind it.
pub fn write_descriptor(buf: &mut [u8], payload: &[u8], dw0: u32) {
    let payload_len = buf.len().saturating_sub(DESCRIPTOR_LEN as usize);
    let Ok((descr, rest)) = StorageProtocolDataDescriptor::mut_from_prefix(buf) else {
        return;
    };
    descr.version = DESCRIPTOR_LEN;
    descr.size = DESCRIPTOR_LEN;
    let psd = &mut descr.protocol_specific_data;
    psd.protocol_data_offset = 40;
    psd.protocol_data_length = payload_len as u32;
    psd.fixed_protocol_return_data = dw0;
    for (dst, src) in rest.iter_mut().zip(payload.iter().cycle()) {
        *dst = *src;
    }
}

/// Answers protocol commands by filling the response region with `fill`
/// and reporting `dw0`.
pub fn protocol_responder(
    fill: u8,
    dw0: u32,
) -> impl Fn(IoctlCode, &mut [u8]) -> io::Result<usize> {
    move |_, buf| {
        let len = buf.len();
        if let Ok((hdr, rest)) = StorageProtocolCommand::mut_from_prefix(buf) {
            hdr.return_status = 1;
            hdr.fixed_protocol_return_data = dw0;
            let response_offset = hdr.data_from_device_buffer_offset as usize;
            let response_len = hdr.data_from_device_transfer_length as usize;
            let start = response_offset - size_of::<StorageProtocolCommand>();
            rest[start..start + response_len].fill(fill);
        }
        Ok(len)
    }
}
