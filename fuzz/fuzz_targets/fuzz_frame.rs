// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use chatdds::transport::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must survive a re-encode.
    if let Ok(frame) = Frame::decode(data) {
        if let Ok(bytes) = frame.encode() {
            let again = Frame::decode(&bytes).expect("re-encoded frame must decode");
            assert_eq!(again, frame);
        }
    }
});
