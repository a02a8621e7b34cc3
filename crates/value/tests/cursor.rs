// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use litedatum_testing::{fixture, init_tracing};
use litedatum_value::{Scope, Type, Value, create_from_script, load_from_bytes};

const SEED: &str = "CREATE TABLE t(a INTEGER, b REAL, c TEXT); INSERT INTO t VALUES (42, 3.5, 'hi');";

#[test]
fn test_single_typed_row() {
	init_tracing();
	let scope = Scope::new("query");
	let mut handle = create_from_script(&scope, SEED).unwrap();

	let session = handle.session().unwrap();
	let mut prepared = session.prepare("SELECT * FROM t").unwrap();
	let mut cursor = prepared.rows();

	let row = cursor.next_row().unwrap().unwrap();
	assert_eq!(row.values(), &[Value::Int4(42), Value::Float8(3.5), Value::utf8("hi")]);
	assert_eq!(row.to_string(), "{a: 42, b: 3.5, c: hi}");

	let layout = cursor.layout().unwrap();
	let types: Vec<_> = layout.columns().iter().map(|c| c.ty).collect();
	assert_eq!(types, vec![Type::Int4, Type::Float8, Type::Utf8]);

	assert!(cursor.next_row().unwrap().is_none());
	assert!(cursor.next_row().unwrap().is_none());
	assert_eq!(cursor.rows_produced(), 1);
}

#[test]
fn test_nulls_are_undefined() {
	init_tracing();
	let scope = Scope::new("nulls");
	let mut handle = create_from_script(&scope, fixture::NULLS).unwrap();
	let rows = handle.query_rows("SELECT a, b, c, d FROM n ORDER BY rowid").unwrap();

	assert_eq!(rows.len(), 2);
	assert!(rows[0].values().iter().all(Value::is_undefined));
	assert_eq!(rows[1].values(), &[Value::Int4(1), Value::Float8(1.5), Value::utf8("x"), Value::blob(vec![1u8])]);

	let zero = handle.query_rows("SELECT a FROM n WHERE a IS NULL").unwrap();
	assert_ne!(zero[0].get(0), Some(&Value::Int4(0)));
}

#[test]
fn test_exhaustion_over_many_rows() {
	init_tracing();
	let scope = Scope::new("many");
	let mut handle = create_from_script(&scope, &fixture::numbers(250)).unwrap();

	let count = handle
		.query_with("SELECT n, label FROM numbers ORDER BY n", |cursor| {
			let mut seen = 0;
			while let Some(row) = cursor.next_row()? {
				assert_eq!(row.get_by_name("n"), Some(&Value::Int4(seen)));
				seen += 1;
			}
			assert!(cursor.next().is_none());
			Ok(seen)
		})
		.unwrap();
	assert_eq!(count, 250);
}

#[test]
fn test_query_on_flat_value_expands() {
	init_tracing();
	let scope = Scope::new("lazy");
	let flat = create_from_script(&scope, SEED).unwrap().flatten().unwrap();

	let mut handle = load_from_bytes(&scope, flat.as_bytes()).unwrap();
	assert!(!handle.is_expanded());
	let rows = handle.query_rows("SELECT c FROM t").unwrap();
	assert!(handle.is_expanded());
	assert_eq!(rows[0].get(0), Some(&Value::utf8("hi")));
	assert!(handle.flatten().unwrap().ptr_eq(&handle.flatten().unwrap()));
	assert_eq!(handle.stats().serializations, 0);
}

#[test]
fn test_dynamic_column_coercion() {
	init_tracing();
	let scope = Scope::new("dynamic");
	let mut handle = create_from_script(
		&scope,
		"CREATE TABLE d(v); INSERT INTO d VALUES (2.5), (7), ('12.75'), ('text'), (X'00');",
	)
	.unwrap();

	let rows = handle.query_rows("SELECT v FROM d ORDER BY rowid").unwrap();
	let values: Vec<_> = rows.iter().map(|r| r.get(0).cloned().unwrap()).collect();
	assert_eq!(
		values,
		vec![Value::Float8(2.5), Value::Float8(7.0), Value::Float8(12.75), Value::Undefined, Value::Undefined]
	);
}

#[test]
fn test_large_integer_narrows() {
	init_tracing();
	let scope = Scope::new("narrow");
	let mut handle = create_from_script(&scope, "CREATE TABLE w(v INTEGER); INSERT INTO w VALUES (4294967297);").unwrap();
	let rows = handle.query_rows("SELECT v FROM w").unwrap();
	assert_eq!(rows[0].get(0), Some(&Value::Int4(1)));
}

#[test]
fn test_failed_query_leaves_value_usable() {
	init_tracing();
	let scope = Scope::new("failure");
	let mut handle = create_from_script(&scope, "CREATE TABLE u(id INTEGER PRIMARY KEY);").unwrap();

	let err = handle.query_rows("INSERT INTO u VALUES (1), (1) RETURNING id").unwrap_err();
	assert_eq!(err.code, "STATEMENT_003");
	assert!(err.message.contains("UNIQUE constraint failed"));

	handle.exec("INSERT INTO u VALUES (5)").unwrap();
	let rows = handle.query_rows("SELECT id FROM u").unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].get(0), Some(&Value::Int4(5)));
}
