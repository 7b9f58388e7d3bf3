//! In-memory implementation of the store adapter.
//!
//! Documents of each resource type live in a `BTreeMap` keyed by id, so scans
//! and unsorted pages come back in id order. A single `parking_lot` lock guards
//! all namespaces; no operation awaits while holding it.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod query;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use catalogue::filter::{FilterDescriptor, Page, QueryLimits, ResourceType};
use catalogue::prelude::*;
use catalogue::store_adapter::StoreAdapter;

#[derive(Debug)]
struct Namespace {
	resource_type: Arc<ResourceType>,
	docs: BTreeMap<Box<str>, Value>,
}

#[derive(Debug)]
pub struct StoreAdapterMemory {
	namespaces: RwLock<HashMap<Box<str>, Namespace>>,
	limits: QueryLimits,
}

impl StoreAdapterMemory {
	pub fn new(limits: QueryLimits) -> Self {
		Self { namespaces: RwLock::new(HashMap::new()), limits }
	}
}

impl Default for StoreAdapterMemory {
	fn default() -> Self {
		Self::new(QueryLimits::default())
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterMemory {
	async fn register_type(&self, resource_type: &ResourceType) -> ClResult<()> {
		let mut namespaces = self.namespaces.write();
		let rt = Arc::new(resource_type.clone());
		match namespaces.get_mut(&resource_type.name) {
			Some(ns) => ns.resource_type = rt,
			None => {
				namespaces.insert(
					resource_type.name.clone(),
					Namespace { resource_type: rt, docs: BTreeMap::new() },
				);
			}
		}
		debug!(resource_type = %resource_type.name, "Registered resource type");
		Ok(())
	}

	async fn create(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()> {
		let mut namespaces = self.namespaces.write();
		let ns = namespaces
			.get_mut(resource_type)
			.ok_or_else(|| Error::UnknownResourceType(resource_type.to_string()))?;
		if ns.docs.contains_key(id) {
			return Err(Error::duplicate_id(resource_type, id));
		}
		ns.docs.insert(id.into(), doc.clone());
		Ok(())
	}

	async fn update(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()> {
		let mut namespaces = self.namespaces.write();
		let ns = namespaces
			.get_mut(resource_type)
			.ok_or_else(|| Error::UnknownResourceType(resource_type.to_string()))?;
		let stored = ns.docs.get_mut(id).ok_or_else(|| Error::not_found(resource_type, id))?;
		*stored = doc.clone();
		Ok(())
	}

	async fn read(&self, resource_type: &str, id: &str) -> ClResult<Option<Value>> {
		let namespaces = self.namespaces.read();
		let ns = namespaces
			.get(resource_type)
			.ok_or_else(|| Error::UnknownResourceType(resource_type.to_string()))?;
		Ok(ns.docs.get(id).cloned())
	}

	async fn exists(&self, resource_type: &str, id: &str) -> ClResult<bool> {
		let namespaces = self.namespaces.read();
		let ns = namespaces
			.get(resource_type)
			.ok_or_else(|| Error::UnknownResourceType(resource_type.to_string()))?;
		Ok(ns.docs.contains_key(id))
	}

	async fn query(&self, resource_type: &str, filter: &FilterDescriptor) -> ClResult<Page<Value>> {
		let namespaces = self.namespaces.read();
		let ns = namespaces
			.get(resource_type)
			.ok_or_else(|| Error::UnknownResourceType(resource_type.to_string()))?;
		let rt = &ns.resource_type;
		filter.validate(rt)?;
		let page_size = filter.page_size(&self.limits)?;

		let mut matched: Vec<&Value> =
			ns.docs.values().filter(|doc| query::matches_filter(doc, rt, filter)).collect();
		if let Some(ref sort_fields) = filter.sort {
			query::sort_documents(&mut matched, rt, sort_fields);
		}

		let total = matched.len();
		let items: Vec<Value> =
			matched.into_iter().skip(filter.from).take(page_size).cloned().collect();
		Ok(Page::new(items, total, filter.from))
	}

	fn limits(&self) -> QueryLimits {
		self.limits
	}
}

// vim: ts=4
