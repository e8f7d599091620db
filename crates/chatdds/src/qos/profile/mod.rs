// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Aggregated QoS profile: struct, fluent builders and RxO matching.

mod builders;
mod matching;
mod structs;

pub use matching::QosMismatch;
pub use structs::QoS;
