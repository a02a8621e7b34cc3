// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! `litedatum` stores embedded database values as flat files.
//!
//! ```bash
//! litedatum create people.ld --sql "CREATE TABLE p(name TEXT); INSERT INTO p VALUES ('Ada');"
//! litedatum query people.ld "SELECT * FROM p"
//! litedatum dump people.ld
//! ```

#![cfg_attr(not(debug_assertions), deny(warnings))]

use std::{io, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use litedatum_value::Scope;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod format;
mod store;

use error::CliResult;
use format::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "litedatum", version, about = "Embedded SQLite databases stored as flat values")]
struct Cli {
	/// Session configuration as JSON
	#[arg(long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Output format for query results
	#[arg(short, long, value_enum, default_value = "table", global = true)]
	output: OutputArg,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Creates a value from a SQL script
	Create {
		value: PathBuf,
		/// Script text
		#[arg(long, conflicts_with = "script")]
		sql: Option<String>,
		/// Script file
		#[arg(long, value_name = "FILE")]
		script: Option<PathBuf>,
	},
	/// Runs statements against a value and stores the result
	Exec {
		value: PathBuf,
		sql: String,
	},
	/// Prints the rows of a query
	Query {
		value: PathBuf,
		sql: String,
	},
	/// Prints a SQL script recreating the value
	Dump {
		value: PathBuf,
	},
	/// Prints tables, pages and sizes
	Info {
		value: PathBuf,
	},
	/// Writes the raw engine image of a value
	Export {
		value: PathBuf,
		image: PathBuf,
	},
	/// Creates a value from a raw engine image
	Import {
		image: PathBuf,
		value: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
	Table,
	Json,
}

impl From<OutputArg> for OutputFormat {
	fn from(arg: OutputArg) -> Self {
		match arg {
			OutputArg::Table => OutputFormat::Table,
			OutputArg::Json => OutputFormat::Json,
		}
	}
}

fn main() -> ExitCode {
	init_logging();
	let cli = Cli::parse();

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("{err}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_env("LITEDATUM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn run(cli: Cli) -> CliResult<()> {
	let config = store::load_config(cli.config.as_deref())?;
	let scope = Scope::with_config("cli", config);
	let format = OutputFormat::from(cli.output);
	let mut out = io::stdout().lock();
	debug!(command = ?cli.command, "running command");

	match cli.command {
		Command::Create {
			value,
			sql,
			script,
		} => {
			let script = match (sql, script) {
				(Some(sql), _) => sql,
				(None, Some(path)) => store::read_text(&path)?,
				(None, None) => String::new(),
			};
			commands::create(&scope, &value, &script, &mut out)
		}
		Command::Exec {
			value,
			sql,
		} => commands::exec(&scope, &value, &sql, &mut out),
		Command::Query {
			value,
			sql,
		} => commands::query(&scope, &value, &sql, format, &mut out),
		Command::Dump {
			value,
		} => commands::dump(&scope, &value, &mut out),
		Command::Info {
			value,
		} => commands::info(&scope, &value, format, &mut out),
		Command::Export {
			value,
			image,
		} => commands::export(&scope, &value, &image, &mut out),
		Command::Import {
			image,
			value,
		} => commands::import(&scope, &image, &value, &mut out),
	}
}
