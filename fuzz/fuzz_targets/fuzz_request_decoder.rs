//! Fuzz target: `codec::decode_request`
//!
//! Drives arbitrary datagrams into the request decoder and asserts that
//! it never panics, and that anything it accepts re-encodes and decodes
//! back to the same request.
//!
//! cargo fuzz run fuzz_request_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartlamp::rpc::codec;

fuzz_target!(|data: &[u8]| {
    let Ok((mid, req)) = codec::decode_request(data) else {
        return;
    };

    let wire = codec::encode_request(mid, &req).expect("decoded request must re-encode");
    let (mid2, req2) = codec::decode_request(wire.as_bytes()).expect("re-encoded request must decode");
    assert_eq!(mid, mid2);
    assert_eq!(req, req2);

    // Lenient query access must never panic either.
    let _ = req.query_int_or_zero("lux");
});
