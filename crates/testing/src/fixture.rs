// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Seed scripts shared by tests.

/// One row covering the integer, real and text storage classes.
pub const MIXED: &str = "CREATE TABLE t(a INT, b REAL, c TEXT);\nINSERT INTO t VALUES (42, 3.5, 'hi');\n";

/// A table with NULLs in every column.
pub const NULLS: &str = "CREATE TABLE n(a INT, b REAL, c TEXT, d BLOB);\n\
	INSERT INTO n VALUES (NULL, NULL, NULL, NULL);\n\
	INSERT INTO n VALUES (1, 1.5, 'x', X'01');\n";

/// Two related tables with an index, a view and a trigger.
pub const LIBRARY: &str = "CREATE TABLE author(id INTEGER PRIMARY KEY, name TEXT NOT NULL);\n\
	CREATE TABLE book(id INTEGER PRIMARY KEY AUTOINCREMENT, author_id INT REFERENCES author(id), title TEXT, price REAL);\n\
	CREATE INDEX book_author ON book(author_id);\n\
	CREATE VIEW cheap AS SELECT title FROM book WHERE price < 10;\n\
	CREATE TABLE audit(msg TEXT);\n\
	CREATE TRIGGER book_added AFTER INSERT ON book BEGIN INSERT INTO audit VALUES ('added ' || new.title); END;\n\
	INSERT INTO author VALUES (1, 'Ursula'), (2, 'Italo');\n\
	INSERT INTO book(author_id, title, price) VALUES (1, 'Earthsea', 9.5), (2, 'Invisible Cities', 12.0), (1, 'The Dispossessed', 11.25);\n";

/// Builds a script inserting `rows` numbered rows into table `numbers`.
pub fn numbers(rows: usize) -> String {
	let mut script = String::from("CREATE TABLE numbers(n INT, label TEXT);\n");
	for n in 0..rows {
		script.push_str(&format!("INSERT INTO numbers VALUES ({}, 'row {}');\n", n, n));
	}
	script
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_numbers() {
		let script = numbers(2);
		assert!(script.starts_with("CREATE TABLE numbers"));
		assert!(script.contains("VALUES (1, 'row 1')"));
		assert_eq!(script.lines().count(), 3);
	}
}
