//! Store Adapter
//!
//! Trait for pluggable document stores. A store keeps JSON documents grouped
//! by resource type, keyed by entity id, and answers equality queries on the
//! fields each resource type declares as indexed.
//!
//! Each adapter implementation provides its own constructor handling
//! backend-specific initialization (database path, page size limits, etc.).
//!
//! Every single-document operation is atomic with respect to other
//! operations on the same id.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::filter::{FilterDescriptor, Page, QueryLimits, ResourceType};
use crate::prelude::*;

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Declares a resource type and its indexed fields.
	///
	/// Registering the same name again replaces the index declaration and
	/// keeps stored documents.
	async fn register_type(&self, resource_type: &ResourceType) -> ClResult<()>;

	/// Stores a new document, failing with `DuplicateId` if the id is taken
	async fn create(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()>;

	/// Replaces an existing document, failing with `NotFound` if absent
	async fn update(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()>;

	async fn read(&self, resource_type: &str, id: &str) -> ClResult<Option<Value>>;

	async fn exists(&self, resource_type: &str, id: &str) -> ClResult<bool> {
		Ok(self.read(resource_type, id).await?.is_some())
	}

	/// Returns one page of the documents matching every predicate of `filter`.
	///
	/// Errors are checked in a fixed order: `UnknownResourceType`, then
	/// `InvalidQuery`, then `QuantityExceeded`.
	async fn query(&self, resource_type: &str, filter: &FilterDescriptor) -> ClResult<Page<Value>>;

	/// Page size bounds this store enforces
	fn limits(&self) -> QueryLimits;
}

// vim: ts=4
