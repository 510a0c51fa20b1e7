#![no_main]

use libfuzzer_sys::fuzz_target;
use scom_protocol::{Format, Scom};

fuzz_target!(|data: &[u8]| {
    let scom = Scom::default();
    if let Ok(frame) = scom.validate(data) {
        let _ = frame.decode(Format::Float);
    }
    let _ = scom.decode_response(data);
});
