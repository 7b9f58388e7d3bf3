use catalogue::filter::{FilterDescriptor, ResourceType, SortField};
use serde_json::Value;
use std::cmp::Ordering;

/// True when `doc` satisfies every equality predicate of `filter`
pub fn matches_filter(doc: &Value, resource_type: &ResourceType, filter: &FilterDescriptor) -> bool {
	filter.filters.iter().all(|(field, expected)| {
		let actual = resource_type.field(field).and_then(|f| f.extract(doc));
		match actual {
			Some(actual) => values_equal(actual, expected),
			None => expected.is_null(),
		}
	})
}

/// Sorts matched documents in place. Ties keep their id order.
pub fn sort_documents(docs: &mut [&Value], resource_type: &ResourceType, sort_fields: &[SortField]) {
	docs.sort_by(|a, b| compare_documents(a, b, resource_type, sort_fields));
}

fn compare_documents(
	a: &Value,
	b: &Value,
	resource_type: &ResourceType,
	sort_fields: &[SortField],
) -> Ordering {
	for sort in sort_fields {
		let Some(field) = resource_type.field(&sort.field) else {
			continue;
		};
		let ord = compare_values(field.extract(a), field.extract(b));
		let ord = if sort.ascending { ord } else { ord.reverse() };

		if ord != Ordering::Equal {
			return ord;
		}
	}

	Ordering::Equal
}

fn values_equal(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
		(a, b) => a == b,
	}
}

pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(Value::Number(a)), Some(Value::Number(b))) => {
			a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal)
		}
		(Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
		(Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
		(Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
	}
}


// vim: ts=4
