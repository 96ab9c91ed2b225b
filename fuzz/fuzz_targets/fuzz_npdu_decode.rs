#![no_main]

use bacsim_core::apdu::ApduType;
use bacsim_core::encoding::reader::Reader;
use bacsim_core::npdu::Npdu;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = Reader::new(data);
    if let Ok(npdu) = Npdu::decode(&mut r) {
        let _ = npdu.reply();
        if let Ok(first) = r.peek_u8() {
            let _ = ApduType::from_first_octet(first);
        }
    }
});
