// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Textual dump of a session as a SQL script.
//!
//! The script recreates the schema and the table contents when executed
//! against an empty session:
//!
//! ```text
//! PRAGMA foreign_keys=OFF;
//! BEGIN TRANSACTION;
//! CREATE TABLE t(a INT, b TEXT);
//! INSERT INTO "t"("a","b") VALUES(1,'it''s');
//! CREATE INDEX ib ON t(b);
//! COMMIT;
//! ```
//!
//! Rows name their columns explicitly and leave generated columns out.
//! Virtual tables and internal `sqlite_` tables other than `sqlite_sequence`
//! are not dumped.

use std::fmt::{self, Write};

use rusqlite::{Connection, types::ValueRef};

use crate::{EngineError, EngineResult, error::engine_message};

const TABLES: &str = "SELECT name, sql FROM sqlite_schema \
	WHERE sql NOT NULL AND type == 'table' AND name != 'sqlite_sequence' ORDER BY rowid";

const SEQUENCE: &str = "SELECT count(*) FROM sqlite_schema WHERE type == 'table' AND name == 'sqlite_sequence'";

const OTHERS: &str = "SELECT name, sql FROM sqlite_schema \
	WHERE sql NOT NULL AND type IN ('index', 'trigger', 'view') ORDER BY rowid";

struct SchemaEntry {
	name: String,
	sql: String,
}

pub(crate) fn dump_into<W: Write>(conn: &Connection, out: &mut W) -> EngineResult<()> {
	emit(out, "PRAGMA foreign_keys=OFF;\nBEGIN TRANSACTION;\n")?;

	for table in schema_entries(conn, TABLES)? {
		if table.name.starts_with("sqlite_") || is_virtual(&table.sql) {
			continue;
		}
		emit(out, &table.sql)?;
		emit(out, ";\n")?;
		dump_rows(conn, &table.name, out)?;
	}

	let has_sequence: i64 = conn.query_row(SEQUENCE, [], |row| row.get(0)).map_err(dump_err)?;
	if has_sequence > 0 {
		emit(out, "DELETE FROM sqlite_sequence;\n")?;
		dump_rows(conn, "sqlite_sequence", out)?;
	}

	for entry in schema_entries(conn, OTHERS)? {
		emit(out, &entry.sql)?;
		emit(out, ";\n")?;
	}

	emit(out, "COMMIT;\n")
}

fn schema_entries(conn: &Connection, sql: &str) -> EngineResult<Vec<SchemaEntry>> {
	let mut stmt = conn.prepare(sql).map_err(dump_err)?;
	let entries = stmt
		.query_map([], |row| {
			Ok(SchemaEntry {
				name: row.get(0)?,
				sql: row.get(1)?,
			})
		})
		.map_err(dump_err)?;
	entries.collect::<rusqlite::Result<Vec<_>>>().map_err(dump_err)
}

fn dump_rows<W: Write>(conn: &Connection, table: &str, out: &mut W) -> EngineResult<()> {
	let columns: Vec<String> = stored_columns(conn, table)?.iter().map(|c| quote_identifier(c)).collect();
	let columns = columns.join(",");
	let table = quote_identifier(table);
	let mut stmt = conn.prepare(&format!("SELECT {} FROM {}", columns, table)).map_err(dump_err)?;
	let column_count = stmt.column_count();
	let mut rows = stmt.query([]).map_err(dump_err)?;

	while let Some(row) = rows.next().map_err(dump_err)? {
		let mut line = format!("INSERT INTO {}({}) VALUES(", table, columns);
		for idx in 0..column_count {
			if idx > 0 {
				line.push(',');
			}
			let value = row.get_ref(idx).map_err(dump_err)?;
			write_literal(&mut line, value).map_err(fmt_err)?;
		}
		line.push_str(");\n");
		emit(out, &line)?;
	}
	Ok(())
}

/// Columns of `table` that accept inserted values. Generated columns
/// (`hidden` 2 for virtual, 3 for stored) are computed on replay.
fn stored_columns(conn: &Connection, table: &str) -> EngineResult<Vec<String>> {
	let mut stmt = conn.prepare(&format!("PRAGMA table_xinfo({})", quote_identifier(table))).map_err(dump_err)?;
	let columns = stmt
		.query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(6)?)))
		.map_err(dump_err)?;

	let mut result = Vec::new();
	for column in columns {
		let (name, hidden) = column.map_err(dump_err)?;
		if hidden != 2 && hidden != 3 {
			result.push(name);
		}
	}
	Ok(result)
}

fn is_virtual(sql: &str) -> bool {
	sql.get(..20).is_some_and(|head| head.eq_ignore_ascii_case("CREATE VIRTUAL TABLE"))
}

pub fn quote_identifier(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// Writes a SQL literal that reads back as the same value and storage class.
pub fn write_literal<W: Write>(out: &mut W, value: ValueRef<'_>) -> fmt::Result {
	match value {
		ValueRef::Null => out.write_str("NULL"),
		ValueRef::Integer(i) => write!(out, "{}", i),
		ValueRef::Real(f) => write_real(out, f),
		ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
			Ok(text) if !text.contains('\0') => write_text(out, text),
			_ => {
				out.write_str("CAST(")?;
				write_hex(out, bytes)?;
				out.write_str(" AS TEXT)")
			}
		},
		ValueRef::Blob(bytes) => write_hex(out, bytes),
	}
}

fn write_real<W: Write>(out: &mut W, value: f64) -> fmt::Result {
	if value.is_nan() {
		out.write_str("NULL")
	} else if value.is_infinite() {
		out.write_str(if value > 0.0 { "1e999" } else { "-1e999" })
	} else {
		// Debug keeps a fractional part so the value reads back as REAL
		write!(out, "{:?}", value)
	}
}

fn write_text<W: Write>(out: &mut W, text: &str) -> fmt::Result {
	out.write_char('\'')?;
	for part in text.split_inclusive('\'') {
		out.write_str(part)?;
		if part.ends_with('\'') {
			out.write_char('\'')?;
		}
	}
	out.write_char('\'')
}

fn write_hex<W: Write>(out: &mut W, bytes: &[u8]) -> fmt::Result {
	out.write_str("X'")?;
	for b in bytes {
		write!(out, "{:02x}", b)?;
	}
	out.write_char('\'')
}

fn emit<W: Write>(out: &mut W, text: &str) -> EngineResult<()> {
	out.write_str(text).map_err(fmt_err)
}

fn dump_err(err: rusqlite::Error) -> EngineError {
	EngineError::Dump(engine_message(&err))
}

fn fmt_err(_: fmt::Error) -> EngineError {
	EngineError::Dump("failed to write dump output".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn literal(value: ValueRef<'_>) -> String {
		let mut out = String::new();
		write_literal(&mut out, value).unwrap();
		out
	}

	fn dump(conn: &Connection) -> String {
		let mut out = String::new();
		dump_into(conn, &mut out).unwrap();
		out
	}

	#[test]
	fn test_literals() {
		assert_eq!(literal(ValueRef::Null), "NULL");
		assert_eq!(literal(ValueRef::Integer(-42)), "-42");
		assert_eq!(literal(ValueRef::Real(3.5)), "3.5");
		assert_eq!(literal(ValueRef::Real(1.0)), "1.0");
		assert_eq!(literal(ValueRef::Real(f64::INFINITY)), "1e999");
		assert_eq!(literal(ValueRef::Real(f64::NEG_INFINITY)), "-1e999");
		assert_eq!(literal(ValueRef::Real(f64::NAN)), "NULL");
		assert_eq!(literal(ValueRef::Text(b"it's")), "'it''s'");
		assert_eq!(literal(ValueRef::Text(b"''")), "''''''");
		assert_eq!(literal(ValueRef::Blob(&[0xde, 0xad, 0x01])), "X'dead01'");
		assert_eq!(literal(ValueRef::Text(&[0xff, 0x00])), "CAST(X'ff00' AS TEXT)");
	}

	#[test]
	fn test_quote_identifier() {
		assert_eq!(quote_identifier("t"), "\"t\"");
		assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
	}

	#[test]
	fn test_empty_database() {
		let conn = Connection::open_in_memory().unwrap();
		assert_eq!(dump(&conn), "PRAGMA foreign_keys=OFF;\nBEGIN TRANSACTION;\nCOMMIT;\n");
	}

	#[test]
	fn test_tables_rows_and_indexes() {
		let conn = Connection::open_in_memory().unwrap();
		conn.execute_batch(
			"CREATE TABLE t(a INT, b TEXT);
			 INSERT INTO t VALUES (1, 'x'), (2, NULL);
			 CREATE INDEX ib ON t(b);
			 CREATE VIEW v AS SELECT a FROM t;",
		)
		.unwrap();

		assert_eq!(
			dump(&conn),
			"PRAGMA foreign_keys=OFF;\n\
			 BEGIN TRANSACTION;\n\
			 CREATE TABLE t(a INT, b TEXT);\n\
			 INSERT INTO \"t\"(\"a\",\"b\") VALUES(1,'x');\n\
			 INSERT INTO \"t\"(\"a\",\"b\") VALUES(2,NULL);\n\
			 CREATE INDEX ib ON t(b);\n\
			 CREATE VIEW v AS SELECT a FROM t;\n\
			 COMMIT;\n"
		);
	}

	#[test]
	fn test_autoincrement_sequence() {
		let conn = Connection::open_in_memory().unwrap();
		conn.execute_batch(
			"CREATE TABLE s(id INTEGER PRIMARY KEY AUTOINCREMENT, v);
			 INSERT INTO s(v) VALUES ('a'), ('b');
			 DELETE FROM s WHERE id = 2;",
		)
		.unwrap();

		let text = dump(&conn);
		assert!(text.contains("DELETE FROM sqlite_sequence;\nINSERT INTO \"sqlite_sequence\"(\"name\",\"seq\") VALUES('s',2);\n"));

		let copy = Connection::open_in_memory().unwrap();
		copy.execute_batch(&text).unwrap();
		assert_eq!(dump(&copy), text);
	}

	#[test]
	fn test_dump_recreates_identically() {
		let conn = Connection::open_in_memory().unwrap();
		conn.execute_batch(
			"CREATE TABLE m(k TEXT PRIMARY KEY, r REAL, b BLOB) WITHOUT ROWID;
			 INSERT INTO m VALUES ('one', 1.0, X'00ff'), ('two', 2.25, NULL), ('q''uote', -0.5, X'');
			 CREATE TRIGGER tr AFTER INSERT ON m BEGIN SELECT 1; END;",
		)
		.unwrap();

		let first = dump(&conn);
		let copy = Connection::open_in_memory().unwrap();
		copy.execute_batch(&first).unwrap();
		assert_eq!(dump(&copy), first);
	}

	#[test]
	fn test_generated_columns_left_out() {
		let conn = Connection::open_in_memory().unwrap();
		conn.execute_batch(
			"CREATE TABLE g(a INT, b INT GENERATED ALWAYS AS (a * 2), c INT AS (a + 1) STORED, d TEXT);
			 INSERT INTO g(a, d) VALUES (1, 'x'), (5, NULL);",
		)
		.unwrap();

		let text = dump(&conn);
		assert!(text.contains("INSERT INTO \"g\"(\"a\",\"d\") VALUES(1,'x');\n"));
		assert!(text.contains("INSERT INTO \"g\"(\"a\",\"d\") VALUES(5,NULL);\n"));

		let copy = Connection::open_in_memory().unwrap();
		copy.execute_batch(&text).unwrap();
		assert_eq!(dump(&copy), text);
		let (b, c): (i64, i64) =
			copy.query_row("SELECT b, c FROM g WHERE a = 5", [], |row| Ok((row.get(0)?, row.get(1)?))).unwrap();
		assert_eq!((b, c), (10, 6));
	}
}
