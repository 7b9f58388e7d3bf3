//! Shared utilities for the SQLite adapter

use catalogue::filter::{FilterDescriptor, IndexField, ResourceType};
use catalogue::prelude::*;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite};

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

pub(crate) fn db_error(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

/// Converts a JSON pointer (`/a/b`) into an SQLite JSON path (`$."a"."b"`)
pub(crate) fn json_path(pointer: &str) -> String {
	let mut path = String::from("$");
	for segment in pointer.split('/').skip(1) {
		let segment = segment.replace("~1", "/").replace("~0", "~");
		path.push_str(".\"");
		path.push_str(&segment.replace('"', "\\\""));
		path.push('"');
	}
	path
}

/// Binds a scalar JSON value the way `json_extract` reports it
pub(crate) fn push_value(query: &mut QueryBuilder<'_, Sqlite>, value: &Value) -> ClResult<()> {
	match value {
		Value::String(s) => {
			query.push_bind(s.clone());
		}
		Value::Bool(b) => {
			query.push_bind(i64::from(*b));
		}
		Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				query.push_bind(i);
			} else if let Some(f) = n.as_f64() {
				query.push_bind(f);
			} else {
				return Err(Error::InvalidQuery(format!("unsupported number: {}", n)));
			}
		}
		Value::Null => {
			query.push("NULL");
		}
		Value::Array(_) | Value::Object(_) => {
			return Err(Error::InvalidQuery("predicate must compare against a scalar".into()));
		}
	}
	Ok(())
}

/// Pushes the SQL expression yielding an indexed field's value
pub(crate) fn push_field(query: &mut QueryBuilder<'_, Sqlite>, field: &IndexField) -> ClResult<()> {
	let path = json_path(&field.pointer);
	match field.default {
		Some(ref default) => {
			query.push("COALESCE(json_extract(payload, ").push_bind(path).push("), ");
			push_value(query, default)?;
			query.push(")");
		}
		None => {
			query.push("json_extract(payload, ").push_bind(path).push(")");
		}
	}
	Ok(())
}

/// Pushes the WHERE clause for a resource type and its filter predicates
pub(crate) fn push_where(
	query: &mut QueryBuilder<'_, Sqlite>,
	resource_type: &ResourceType,
	filter: &FilterDescriptor,
) -> ClResult<()> {
	query.push(" WHERE resource_type = ").push_bind(resource_type.name.to_string());
	for (name, value) in &filter.filters {
		let field = resource_type
			.field(name)
			.ok_or_else(|| Error::InvalidQuery(format!("field '{}' is not indexed", name)))?;
		query.push(" AND ");
		push_field(query, field)?;
		if value.is_null() {
			query.push(" IS NULL");
		} else {
			query.push(" = ");
			push_value(query, value)?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_path() {
		assert_eq!(json_path("/id"), "$.\"id\"");
		assert_eq!(json_path("/latestAuditInfo/actionType"), "$.\"latestAuditInfo\".\"actionType\"");
		assert_eq!(json_path("/payload/a~1b"), "$.\"payload\".\"a/b\"");
	}
}

// vim: ts=4
