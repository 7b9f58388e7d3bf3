//! Query filters, result pages and resource type descriptors.
//!
//! A [`FilterDescriptor`] is a conjunction of equality predicates on indexed
//! fields plus paging and optional sorting. Every store adapter interprets it
//! the same way: predicates are ANDed, an entity lacking a field matches only
//! if the field's index default equals the predicate value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prelude::*;

/// Page size bounds enforced by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
	/// Page size used when the filter does not request one
	pub default_quantity: usize,
	/// Largest page size the store returns
	pub max_quantity: usize,
}

impl Default for QueryLimits {
	fn default() -> Self {
		Self { default_quantity: 10, max_quantity: 10_000 }
	}
}

/// Sort field specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
	pub field: String,
	pub ascending: bool,
}

impl SortField {
	pub fn asc(field: impl Into<String>) -> Self {
		Self { field: field.into(), ascending: true }
	}

	pub fn desc(field: impl Into<String>) -> Self {
		Self { field: field.into(), ascending: false }
	}
}

/// Equality predicates, paging and sorting for a store query.
///
/// A `quantity` of zero or less selects the store's default page size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterDescriptor {
	#[serde(default)]
	pub quantity: i32,
	#[serde(default)]
	pub from: usize,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub filters: Vec<(String, Value)>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sort: Option<Vec<SortField>>,
}

impl FilterDescriptor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_quantity(mut self, quantity: i32) -> Self {
		self.quantity = quantity;
		self
	}

	pub fn starting_at(mut self, from: usize) -> Self {
		self.from = from;
		self
	}

	pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.filters.push((field.into(), value.into()));
		self
	}

	pub fn sort_by(mut self, field: SortField) -> Self {
		self.sort.get_or_insert_with(Vec::new).push(field);
		self
	}

	/// Resolves the effective page size against the store limits
	pub fn page_size(&self, limits: &QueryLimits) -> ClResult<usize> {
		if self.quantity <= 0 {
			return Ok(limits.default_quantity.min(limits.max_quantity));
		}
		#[allow(clippy::cast_sign_loss)]
		let requested = self.quantity as usize;
		if requested > limits.max_quantity {
			return Err(Error::QuantityExceeded { requested, max: limits.max_quantity });
		}
		Ok(requested)
	}

	/// Checks that every predicate and sort field is indexed by the resource type
	pub fn validate(&self, resource_type: &ResourceType) -> ClResult<()> {
		for (field, value) in &self.filters {
			if resource_type.field(field).is_none() {
				return Err(Error::InvalidQuery(format!(
					"field '{}' is not indexed by {}",
					field, resource_type.name
				)));
			}
			if value.is_array() || value.is_object() {
				return Err(Error::InvalidQuery(format!(
					"predicate on '{}' must compare against a scalar",
					field
				)));
			}
		}
		for sort in self.sort.iter().flatten() {
			if resource_type.field(&sort.field).is_none() {
				return Err(Error::InvalidQuery(format!(
					"cannot sort {} by unindexed field '{}'",
					resource_type.name, sort.field
				)));
			}
		}
		Ok(())
	}
}

/// A slice of a query result together with the size of the full match set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// Number of entities matching the predicates, independent of paging
	pub total: usize,
	pub from: usize,
	pub to: usize,
}

impl<T> Page<T> {
	pub fn new(items: Vec<T>, total: usize, from: usize) -> Self {
		let to = from + items.len();
		Self { items, total, from, to }
	}

	pub fn empty() -> Self {
		Self { items: Vec::new(), total: 0, from: 0, to: 0 }
	}

	/// True when the page holds every matching entity
	pub fn is_complete(&self) -> bool {
		self.from == 0 && self.items.len() >= self.total
	}

	pub fn try_map<U, F>(self, f: F) -> ClResult<Page<U>>
	where
		F: FnMut(T) -> ClResult<U>,
	{
		let items = self.items.into_iter().map(f).collect::<ClResult<Vec<U>>>()?;
		Ok(Page { items, total: self.total, from: self.from, to: self.to })
	}
}

/// An indexed field of a resource type
#[derive(Debug, Clone, PartialEq)]
pub struct IndexField {
	pub name: Box<str>,
	/// JSON pointer into the stored document
	pub pointer: Box<str>,
	/// Value used when the document has no value at the pointer
	pub default: Option<Value>,
}

impl IndexField {
	pub fn new(name: impl Into<Box<str>>, pointer: impl Into<Box<str>>) -> Self {
		Self { name: name.into(), pointer: pointer.into(), default: None }
	}

	pub fn with_default(mut self, default: impl Into<Value>) -> Self {
		self.default = Some(default.into());
		self
	}

	/// Value of the field in `doc`, falling back to the index default
	pub fn extract<'a>(&'a self, doc: &'a Value) -> Option<&'a Value> {
		doc.pointer(&self.pointer).filter(|v| !v.is_null()).or(self.default.as_ref())
	}
}

/// A named namespace of entities sharing one payload schema
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
	pub name: Box<str>,
	pub index_fields: Vec<IndexField>,
}

impl ResourceType {
	/// Every resource type indexes the entity id
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self { name: name.into(), index_fields: vec![IndexField::new("id", "/id")] }
	}

	pub fn with_index(mut self, field: IndexField) -> Self {
		self.index_fields.retain(|f| f.name != field.name);
		self.index_fields.push(field);
		self
	}

	pub fn field(&self, name: &str) -> Option<&IndexField> {
		self.index_fields.iter().find(|f| f.name.as_ref() == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn provider_type() -> ResourceType {
		ResourceType::new("provider")
			.with_index(IndexField::new("name", "/payload/name"))
			.with_index(
				IndexField::new("actionType", "/latestAuditInfo/actionType").with_default("unreviewed"),
			)
	}

	#[test]
	fn test_page_size() {
		let limits = QueryLimits { default_quantity: 10, max_quantity: 100 };
		assert_eq!(FilterDescriptor::new().page_size(&limits).unwrap(), 10);
		assert_eq!(FilterDescriptor::new().with_quantity(-5).page_size(&limits).unwrap(), 10);
		assert_eq!(FilterDescriptor::new().with_quantity(100).page_size(&limits).unwrap(), 100);
		assert!(matches!(
			FilterDescriptor::new().with_quantity(101).page_size(&limits),
			Err(Error::QuantityExceeded { requested: 101, max: 100 })
		));
	}

	#[test]
	fn test_validate_rejects_unindexed_fields() {
		let rt = provider_type();
		assert!(FilterDescriptor::new().with_filter("name", "x").validate(&rt).is_ok());
		assert!(matches!(
			FilterDescriptor::new().with_filter("website", "x").validate(&rt),
			Err(Error::InvalidQuery(_))
		));
		assert!(matches!(
			FilterDescriptor::new().with_filter("name", json!(["a"])).validate(&rt),
			Err(Error::InvalidQuery(_))
		));
		assert!(matches!(
			FilterDescriptor::new().sort_by(SortField::asc("website")).validate(&rt),
			Err(Error::InvalidQuery(_))
		));
	}

	#[test]
	fn test_index_default() {
		let rt = provider_type();
		let field = rt.field("actionType").unwrap();
		assert_eq!(field.extract(&json!({ "id": "a" })), Some(&json!("unreviewed")));
		let audited = json!({ "latestAuditInfo": { "actionType": "valid" } });
		assert_eq!(field.extract(&audited), Some(&json!("valid")));
		assert_eq!(rt.field("id").unwrap().extract(&json!({ "id": "a" })), Some(&json!("a")));
	}

	#[test]
	fn test_page_bounds() {
		let page = Page::new(vec![1, 2, 3], 40, 20);
		assert_eq!(page.to, 23);
		assert!(!page.is_complete());
		assert!(Page::new(vec![1, 2], 2, 0).is_complete());
	}
}

// vim: ts=4
