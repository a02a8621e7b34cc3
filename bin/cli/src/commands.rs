// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{io::Write, path::Path};

use litedatum_type::Result;
use litedatum_value::{Scope, create_from_script, import_image};
use serde_json::json;
use tracing::info;

use crate::{
	error::CliResult,
	format::{OutputFormat, write_rows},
	store,
};

pub fn create<W: Write>(scope: &Scope, value: &Path, script: &str, out: &mut W) -> CliResult<()> {
	let mut handle = create_from_script(scope, script)?;
	let size = store::write_value(&mut handle, value)?;
	info!(path = %value.display(), size, "created value");
	writeln!(out, "created {} ({} bytes)", value.display(), size)?;
	Ok(())
}

pub fn exec<W: Write>(scope: &Scope, value: &Path, sql: &str, out: &mut W) -> CliResult<()> {
	let mut handle = store::read_value(scope, value)?;
	handle.exec(sql)?;
	let size = store::write_value(&mut handle, value)?;
	writeln!(out, "updated {} ({} bytes)", value.display(), size)?;
	Ok(())
}

/// Prints the rows of `sql`. A statement that wrote to the value is stored
/// back.
pub fn query<W: Write>(scope: &Scope, value: &Path, sql: &str, format: OutputFormat, out: &mut W) -> CliResult<()> {
	let mut handle = store::read_value(scope, value)?;
	let (layout, rows) = handle.query_with(sql, |cursor| {
		let rows = cursor.by_ref().collect::<Result<Vec<_>>>()?;
		Ok((cursor.layout().cloned(), rows))
	})?;
	write_rows(out, layout.as_deref(), &rows, format)?;

	if !handle.is_clean() {
		store::write_value(&mut handle, value)?;
	}
	Ok(())
}

pub fn dump<W: Write>(scope: &Scope, value: &Path, out: &mut W) -> CliResult<()> {
	let mut handle = store::read_value(scope, value)?;
	out.write_all(handle.dump_text()?.as_bytes())?;
	Ok(())
}

pub fn info<W: Write>(scope: &Scope, value: &Path, format: OutputFormat, out: &mut W) -> CliResult<()> {
	let mut handle = store::read_value(scope, value)?;
	let info = handle.info()?;

	match format {
		OutputFormat::Table => {
			writeln!(out, "file:       {}", value.display())?;
			writeln!(out, "flat size:  {} bytes", info.flat_size)?;
			writeln!(out, "page size:  {} bytes", info.page_size)?;
			writeln!(out, "pages:      {}", info.page_count)?;
			writeln!(out, "tables:     {}", info.tables.join(", "))?;
		}
		OutputFormat::Json => {
			let doc = json!({
				"file": value.display().to_string(),
				"flat_size": info.flat_size,
				"page_size": info.page_size,
				"page_count": info.page_count,
				"tables": info.tables,
			});
			serde_json::to_writer_pretty(&mut *out, &doc)?;
			writeln!(out)?;
		}
	}
	Ok(())
}

pub fn export<W: Write>(scope: &Scope, value: &Path, image: &Path, out: &mut W) -> CliResult<()> {
	let mut handle = store::read_value(scope, value)?;
	let bytes = handle.export_image()?;
	store::write_bytes(image, &bytes)?;
	writeln!(out, "exported {} ({} bytes)", image.display(), bytes.len())?;
	Ok(())
}

pub fn import<W: Write>(scope: &Scope, image: &Path, value: &Path, out: &mut W) -> CliResult<()> {
	let bytes = store::read_bytes(image)?;
	let mut handle = import_image(scope, &bytes)?;
	let size = store::write_value(&mut handle, value)?;
	writeln!(out, "imported {} ({} bytes)", value.display(), size)?;
	Ok(())
}
