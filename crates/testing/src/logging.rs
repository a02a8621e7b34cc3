// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a test-friendly subscriber once per process. The filter is read
/// from `LITEDATUM_LOG` and defaults to `warn`.
pub fn init_tracing() {
	let filter = EnvFilter::try_from_env("LITEDATUM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = fmt().with_env_filter(filter).with_test_writer().with_target(true).try_init();
}
