#![no_main]

use bacsim_core::apdu::UnconfirmedRequestHeader;
use bacsim_core::encoding::reader::Reader;
use bacsim_core::services::i_am::IAmRequest;
use bacsim_core::services::who_is::{WhoIsRequest, SERVICE_WHO_IS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    match UnconfirmedRequestHeader::decode(&mut r) {
        Ok(header) if header.service_choice == SERVICE_WHO_IS => {
            if let Ok(request) = WhoIsRequest::decode_after_header(&mut r) {
                let _ = request.matches(599);
            }
        }
        Ok(_) => {
            let _ = IAmRequest::decode_after_header(&mut r);
        }
        Err(_) => {}
    }
});
