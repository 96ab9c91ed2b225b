#![no_main]

use bacsim_core::apdu::ConfirmedRequestHeader;
use bacsim_core::encoding::reader::Reader;
use bacsim_core::services::read_property::{ReadPropertyRequest, ReadPropertyResult};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(header) = ConfirmedRequestHeader::decode(&mut r) {
        let _ = ReadPropertyRequest::decode_after_header(&mut r, header.invoke_id);
    }

    let mut r = Reader::new(data);
    let _ = ReadPropertyResult::decode_after_header(&mut r);
});
