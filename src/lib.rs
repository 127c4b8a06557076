// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

pub mod analysis;
pub mod client;
pub mod config;
pub mod generation;
pub mod stream;
