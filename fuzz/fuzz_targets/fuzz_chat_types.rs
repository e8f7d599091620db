// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use chatdds::DDS;
use chatdds_chat::{ChatMessage, NameService};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz ChatMessage decoder
    let _ = ChatMessage::decode_cdr2(data);

    // Fuzz NameService decoder
    let _ = NameService::decode_cdr2(data);
});
