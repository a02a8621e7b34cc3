// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use super::Diagnostic;

pub trait DiagnosticRenderer {
	fn render(&self, diagnostic: &Diagnostic) -> String;
}

pub struct DefaultRenderer;

impl DiagnosticRenderer for DefaultRenderer {
	fn render(&self, d: &Diagnostic) -> String {
		let mut output = String::new();
		render_into(&mut output, d);
		output
	}
}

fn render_into(output: &mut String, d: &Diagnostic) {
	let _ = writeln!(output, "error[{}]: {}", d.code, d.message);

	if let Some(statement) = &d.statement {
		let _ = writeln!(output, "  --> {}", statement);
		if let Some(label) = &d.label {
			let _ = writeln!(output, "   = {}", label);
		}
	}

	if let Some(col) = &d.column {
		let _ = writeln!(output, "\nnote: column `{}` is of type `{}`", col.name, col.ty);
	}

	if let Some(help) = &d.help {
		let _ = writeln!(output, "\nhelp: {}", help);
	}

	for note in &d.notes {
		let _ = writeln!(output, "\nnote: {}", note);
	}
}

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		DefaultRenderer.render(diagnostic)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::diagnostic::{flat, handle, statement};

	#[test]
	fn test_render_header_line() {
		let out = DefaultRenderer::render_string(&flat::buffer_too_short(3));
		assert!(out.starts_with("error[LOAD_001]: "));
	}

	#[test]
	fn test_render_statement_and_help() {
		let out = DefaultRenderer::render_string(&statement::prepare_failed("SELEC 1", "near \"SELEC\": syntax error"));
		assert!(out.contains("--> SELEC 1"));
		assert!(out.contains("help: "));
	}

	#[test]
	fn test_render_notes() {
		let d = handle::session_closed(4).with_note("released scope: `call`");
		let out = DefaultRenderer::render_string(&d);
		assert!(out.starts_with("error[HANDLE_001]: engine session 4 is closed\n"));
		assert!(out.ends_with("\nnote: released scope: `call`\n"));
	}
}
