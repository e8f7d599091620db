// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Core building blocks shared by the DDS layer and the transport.

pub mod ser;
