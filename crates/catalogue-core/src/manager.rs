//! Entity-kind managers.
//!
//! `ResourceManager<K>` composes a [`ResourceStore`] for the kind's payload
//! with the shared [`CacheInvalidator`]. Mutations evict the kind's declared
//! regions after they commit. Kind specific entry points (`add_provider`,
//! `update_datasource`, ...) are thin aliases over the generic operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalogue_types::audit::AuditStatus;
use catalogue_types::filter::Page;

use crate::cache::CacheInvalidator;
use crate::kind::*;
use crate::prelude::*;
use crate::store::ResourceStore;

#[derive(Debug)]
pub struct ResourceManager<K: Kind> {
	store: ResourceStore<K::Payload>,
	invalidator: Arc<CacheInvalidator>,
	disable_cache: bool,
}

impl<K: Kind> ResourceManager<K> {
	pub async fn new(
		adapter: Arc<dyn catalogue_types::store_adapter::StoreAdapter>,
		invalidator: Arc<CacheInvalidator>,
		disable_cache: bool,
	) -> ClResult<Self> {
		let store = ResourceStore::new(adapter, K::resource_type()).await?;
		Ok(Self { store, invalidator, disable_cache })
	}

	pub fn resource_type(&self) -> &str {
		self.store.name()
	}

	pub async fn add(
		&self,
		bundle: Bundle<K::Payload>,
		actor: &Principal,
	) -> ClResult<Bundle<K::Payload>> {
		self.invalidator.evicting(K::EVICTS, self.store.add(bundle, actor)).await
	}

	pub async fn update(
		&self,
		bundle: Bundle<K::Payload>,
		change_reason: &str,
		actor: &Principal,
	) -> ClResult<Bundle<K::Payload>> {
		self.invalidator.evicting(K::EVICTS, self.store.update(bundle, change_reason, actor)).await
	}

	pub async fn record_audit(
		&self,
		id: &str,
		status: AuditStatus,
		actor: &Principal,
	) -> ClResult<Bundle<K::Payload>> {
		self.invalidator.evicting(K::EVICTS, self.store.record_audit(id, status, actor)).await
	}

	pub async fn get(&self, id: &str) -> ClResult<Bundle<K::Payload>> {
		self.store.get(id).await
	}

	pub async fn get_all(
		&self,
		filter: &FilterDescriptor,
		actor: &Principal,
	) -> ClResult<Page<Bundle<K::Payload>>> {
		debug!(resource_type = %self.resource_type(), actor = %actor, "get_all");
		self.store.get_all(filter).await
	}

	/// Like `get_all`, served from the kind's cache region when it has one
	pub async fn get_all_cached(
		&self,
		filter: &FilterDescriptor,
		actor: &Principal,
	) -> ClResult<Page<Bundle<K::Payload>>> {
		let Some(region) = K::CACHED_VIEW.filter(|_| !self.disable_cache) else {
			return self.get_all(filter, actor).await;
		};

		let key = serde_json::to_string(filter)?;
		match self.invalidator.cache().get(region, &key).await {
			Ok(Some(value)) => return Ok(serde_json::from_value(value)?),
			Ok(None) => {}
			Err(err) => warn!(error = %err, region = %region, "Cache read failed"),
		}

		let generation = self.invalidator.generation(region);
		let page = self.get_all(filter, actor).await?;
		self.invalidator.put_if_current(region, &key, serde_json::to_value(&page)?, generation).await;
		Ok(page)
	}

	pub async fn exists(&self, id: &str) -> ClResult<bool> {
		self.store.exists(id).await
	}

	pub async fn get_some(&self, ids: &[&str]) -> ClResult<Vec<Bundle<K::Payload>>> {
		self.store.get_some(ids).await
	}

	pub async fn get_by(&self, field: &str) -> ClResult<BTreeMap<String, Vec<Bundle<K::Payload>>>> {
		self.store.get_by(field).await
	}

	pub async fn validate(&self, bundle: &Bundle<K::Payload>) -> ClResult<()> {
		self.store.validate(bundle).await
	}
}

pub type ProviderManager = ResourceManager<ProviderKind>;
pub type PendingProviderManager = ResourceManager<PendingProviderKind>;
pub type ServiceManager = ResourceManager<ServiceKind>;
pub type PendingServiceManager = ResourceManager<PendingServiceKind>;
pub type DatasourceManager = ResourceManager<DatasourceKind>;
pub type ConfigurationTemplateManager = ResourceManager<ConfigurationTemplateKind>;
pub type FunderManager = ResourceManager<FunderKind>;
pub type IndicatorManager = ResourceManager<IndicatorKind>;
pub type MeasurementManager = ResourceManager<MeasurementKind>;
pub type ManagerRoleManager = ResourceManager<ManagerRoleKind>;

macro_rules! entry_points {
	($kind:ty, $add:ident, $update:ident) => {
		impl ResourceManager<$kind> {
			pub async fn $add(
				&self,
				bundle: Bundle<<$kind as Kind>::Payload>,
				actor: &Principal,
			) -> ClResult<Bundle<<$kind as Kind>::Payload>> {
				self.add(bundle, actor).await
			}

			pub async fn $update(
				&self,
				bundle: Bundle<<$kind as Kind>::Payload>,
				change_reason: &str,
				actor: &Principal,
			) -> ClResult<Bundle<<$kind as Kind>::Payload>> {
				self.update(bundle, change_reason, actor).await
			}
		}
	};
}

entry_points!(ProviderKind, add_provider, update_provider);
entry_points!(PendingProviderKind, add_pending_provider, update_pending_provider);
entry_points!(ServiceKind, add_service, update_service);
entry_points!(PendingServiceKind, add_pending_service, update_pending_service);
entry_points!(DatasourceKind, add_datasource, update_datasource);
entry_points!(ConfigurationTemplateKind, add_configuration_template, update_configuration_template);
entry_points!(FunderKind, add_funder, update_funder);
entry_points!(IndicatorKind, add_indicator, update_indicator);
entry_points!(MeasurementKind, add_measurement, update_measurement);
entry_points!(ManagerRoleKind, add_manager_role, update_manager_role);

// vim: ts=4
