//! Fuzz target: `codec::decode_response`
//!
//! Arbitrary datagrams into the response decoder, then through the
//! lamp-side suggestion parser.  Neither may panic.
//!
//! cargo fuzz run fuzz_response_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartlamp::rpc::codec;
use smartlamp::rpc::protocol::PredictionResponse;

fuzz_target!(|data: &[u8]| {
    if let Ok((mid, resp)) = codec::decode_response(data) {
        let _ = PredictionResponse::from_response(&resp);

        let wire = codec::encode_response(mid, &resp).expect("decoded response must re-encode");
        let (_, back) = codec::decode_response(wire.as_bytes()).expect("re-encoded response must decode");
        assert_eq!(back, resp);
    }
});
