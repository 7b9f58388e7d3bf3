//! Generic resource store.
//!
//! One `ResourceStore<T>` serves one resource type. It owns id assignment,
//! metadata stamping and the conversion between [`Bundle<T>`] and the JSON
//! documents a [`StoreAdapter`] persists. Every entity kind goes through this
//! type, so not-found and duplicate-id semantics are identical across kinds.
//!
//! The audit status of a bundle is only written by [`ResourceStore::record_audit`].
//! `add` drops any status the caller sent and `update` carries the stored one over.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use catalogue_types::audit::{AUDIT_TYPE, AuditStatus};
use catalogue_types::bundle::Metadata;
use catalogue_types::filter::{Page, ResourceType};
use catalogue_types::store_adapter::StoreAdapter;
use catalogue_types::utils::{random_id, validate_id};

use crate::prelude::*;

/// Attempts at drawing an unused random id before giving up
const ID_ATTEMPTS: usize = 5;

#[derive(Debug)]
pub struct ResourceStore<T> {
	adapter: Arc<dyn StoreAdapter>,
	resource_type: Arc<ResourceType>,
	_payload: PhantomData<fn() -> T>,
}

impl<T: Payload> ResourceStore<T> {
	/// Registers `resource_type` with the adapter and binds a store to it
	pub async fn new(adapter: Arc<dyn StoreAdapter>, resource_type: ResourceType) -> ClResult<Self> {
		adapter.register_type(&resource_type).await?;
		Ok(Self { adapter, resource_type: Arc::new(resource_type), _payload: PhantomData })
	}

	pub fn name(&self) -> &str {
		&self.resource_type.name
	}

	pub fn resource_type(&self) -> &ResourceType {
		&self.resource_type
	}

	/// Stores a new bundle.
	///
	/// A caller supplied id is kept and fails with `DuplicateId` when taken.
	/// Without one a fresh random id is assigned.
	pub async fn add(&self, mut bundle: Bundle<T>, actor: &Principal) -> ClResult<Bundle<T>> {
		bundle.payload.validate()?;
		bundle.metadata = Metadata::registered(actor, Timestamp::now());
		bundle.latest_audit_info = None;

		match bundle.id.clone() {
			Some(id) => {
				validate_id(&id)?;
				self.adapter.create(self.name(), &id, &bundle.to_document()?).await?;
			}
			None => self.create_with_random_id(&mut bundle).await?,
		}

		info!(
			resource_type = %self.name(),
			id = bundle.id().unwrap_or_default(),
			actor = %actor,
			"Resource added"
		);
		Ok(bundle)
	}

	async fn create_with_random_id(&self, bundle: &mut Bundle<T>) -> ClResult<()> {
		for _ in 0..ID_ATTEMPTS {
			let id = random_id()?;
			bundle.id = Some(id.as_str().into());
			match self.adapter.create(self.name(), &id, &bundle.to_document()?).await {
				Ok(()) => return Ok(()),
				Err(Error::DuplicateId { .. }) => {
					debug!(resource_type = %self.name(), id = %id, "Random id collision, retrying");
				}
				Err(err) => return Err(err),
			}
		}
		Err(Error::Internal(format!("could not allocate a free id for {}", self.name())))
	}

	/// Replaces a stored bundle. Registration stamps and the audit status are
	/// kept from the stored copy.
	pub async fn update(
		&self,
		mut bundle: Bundle<T>,
		change_reason: &str,
		actor: &Principal,
	) -> ClResult<Bundle<T>> {
		let Some(id) = bundle.id.clone() else {
			return Err(Error::ValidationError(format!("{} update without id", self.name())));
		};
		if change_reason == AUDIT_TYPE {
			return Err(Error::ValidationError(format!("'{}' is reserved for audits", AUDIT_TYPE)));
		}
		bundle.payload.validate()?;

		let stored = self.get(&id).await?;
		bundle.metadata = stored.metadata.modified(actor, Timestamp::now(), change_reason);
		bundle.latest_audit_info = stored.latest_audit_info;
		self.adapter.update(self.name(), &id, &bundle.to_document()?).await?;

		info!(
			resource_type = %self.name(),
			id = %id,
			actor = %actor,
			reason = %change_reason,
			"Resource updated"
		);
		Ok(bundle)
	}

	/// Replaces the audit status of a stored bundle, leaving its payload alone
	pub async fn record_audit(
		&self,
		id: &str,
		status: AuditStatus,
		actor: &Principal,
	) -> ClResult<Bundle<T>> {
		let mut bundle = self.get(id).await?;
		bundle.metadata = bundle.metadata.modified(actor, status.date, AUDIT_TYPE);
		bundle.latest_audit_info = Some(status);
		self.adapter.update(self.name(), id, &bundle.to_document()?).await?;
		Ok(bundle)
	}

	pub async fn get(&self, id: &str) -> ClResult<Bundle<T>> {
		match self.adapter.read(self.name(), id).await? {
			Some(doc) => Bundle::from_document(doc),
			None => Err(Error::not_found(self.name(), id)),
		}
	}

	pub async fn exists(&self, id: &str) -> ClResult<bool> {
		self.adapter.exists(self.name(), id).await
	}

	pub async fn get_all(&self, filter: &FilterDescriptor) -> ClResult<Page<Bundle<T>>> {
		let page = self.adapter.query(self.name(), filter).await?;
		page.try_map(Bundle::from_document)
	}

	/// Fetches the listed ids, skipping the ones that do not exist
	pub async fn get_some(&self, ids: &[&str]) -> ClResult<Vec<Bundle<T>>> {
		let mut bundles = Vec::with_capacity(ids.len());
		for id in ids {
			if let Some(doc) = self.adapter.read(self.name(), id).await? {
				bundles.push(Bundle::from_document(doc)?);
			}
		}
		Ok(bundles)
	}

	/// Groups every stored bundle by the value of an indexed field
	pub async fn get_by(&self, field: &str) -> ClResult<BTreeMap<String, Vec<Bundle<T>>>> {
		let index = self
			.resource_type
			.field(field)
			.ok_or_else(|| Error::InvalidQuery(format!("field '{}' is not indexed", field)))?
			.clone();

		let mut groups: BTreeMap<String, Vec<Bundle<T>>> = BTreeMap::new();
		for doc in self.scan().await? {
			let key = match index.extract(&doc) {
				Some(serde_json::Value::String(s)) => s.clone(),
				Some(value) => value.to_string(),
				None => String::new(),
			};
			groups.entry(key).or_default().push(Bundle::from_document(doc)?);
		}
		Ok(groups)
	}

	/// Checks a bundle the way `add` and `update` would, without storing it
	pub async fn validate(&self, bundle: &Bundle<T>) -> ClResult<()> {
		if let Some(id) = bundle.id() {
			validate_id(id)?;
		}
		bundle.payload.validate()
	}

	/// Reads every document of the resource type, page by page
	async fn scan(&self) -> ClResult<Vec<serde_json::Value>> {
		let max = self.adapter.limits().max_quantity;
		let quantity = i32::try_from(max).unwrap_or(i32::MAX);
		let mut docs = Vec::new();
		loop {
			let filter = FilterDescriptor::new().with_quantity(quantity).starting_at(docs.len());
			let page = self.adapter.query(self.name(), &filter).await?;
			let fetched = page.items.len();
			docs.extend(page.items);
			if fetched == 0 || docs.len() >= page.total {
				return Ok(docs);
			}
		}
	}
}

// vim: ts=4
