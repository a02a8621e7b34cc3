// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod fixture;
pub mod tempdir;
mod logging;

pub use logging::init_tracing;
