//! Common test utilities: a memory-backed catalogue and domain fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use catalogue_core::audit::Auditor;
use catalogue_core::cache::{CacheInvalidator, LruCacheAdapter};
use catalogue_core::domain::{Datasource, Provider, Service};
use catalogue_core::manager::{DatasourceManager, FunderManager, ProviderManager, ServiceManager};
use catalogue_core::settings::AuditOpts;
use catalogue_store_adapter_memory::StoreAdapterMemory;
use catalogue_types::bundle::Bundle;
use catalogue_types::cache_adapter::CacheAdapter;
use catalogue_types::filter::QueryLimits;
use catalogue_types::prelude::*;
use catalogue_types::store_adapter::StoreAdapter;

pub struct TestCatalogue {
	pub providers: Arc<ProviderManager>,
	pub services: Arc<ServiceManager>,
	pub datasources: Arc<DatasourceManager>,
	pub funders: Arc<FunderManager>,
	pub invalidator: Arc<CacheInvalidator>,
	pub auditor: Auditor,
}

pub async fn build(
	limits: QueryLimits,
	audit: AuditOpts,
	cache: Arc<dyn CacheAdapter>,
) -> TestCatalogue {
	let store: Arc<dyn StoreAdapter> = Arc::new(StoreAdapterMemory::new(limits));
	let invalidator = Arc::new(CacheInvalidator::new(cache));
	let providers =
		Arc::new(ProviderManager::new(store.clone(), invalidator.clone(), false).await.unwrap());
	let services =
		Arc::new(ServiceManager::new(store.clone(), invalidator.clone(), false).await.unwrap());
	let datasources =
		Arc::new(DatasourceManager::new(store.clone(), invalidator.clone(), false).await.unwrap());
	let funders = Arc::new(FunderManager::new(store, invalidator.clone(), false).await.unwrap());
	let auditor = Auditor::new(providers.clone(), services.clone(), audit);
	TestCatalogue { providers, services, datasources, funders, invalidator, auditor }
}

pub async fn catalogue() -> (TestCatalogue, Arc<LruCacheAdapter>) {
	let cache = Arc::new(LruCacheAdapter::new(100));
	let catalogue = build(QueryLimits::default(), AuditOpts::default(), cache.clone()).await;
	(catalogue, cache)
}

pub fn owner() -> Principal {
	Principal::new("owner@example.org", "Olive Owner").with_role("provider_admin")
}

pub fn reviewer() -> Principal {
	Principal::new("rev@x.org", "Rene Reviewer").with_role("epot")
}

pub fn provider(name: &str) -> Bundle<Provider> {
	Bundle::new(Provider {
		abbreviation: name.to_uppercase().into(),
		name: name.into(),
		..Default::default()
	})
}

pub fn service(name: &str, provider_id: &str) -> Bundle<Service> {
	Bundle::new(Service {
		name: name.into(),
		resource_organisation: provider_id.into(),
		..Default::default()
	})
}

pub fn datasource(service_id: &str) -> Bundle<Datasource> {
	Bundle::new(Datasource { service_id: service_id.into(), ..Default::default() })
}

/// Adds providers `P1..=Pn` with caller supplied ids
pub async fn seed_providers(providers: &ProviderManager, n: usize) {
	for i in 1..=n {
		providers.add(provider(&format!("Provider {}", i)).with_id(format!("P{}", i)), &owner()).await.unwrap();
	}
}

/// Cache whose evictions always fail
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl CacheAdapter for FailingCache {
	async fn get(&self, _region: &str, _key: &str) -> ClResult<Option<Value>> {
		Ok(None)
	}

	async fn put(&self, _region: &str, _key: &str, _value: Value) -> ClResult<()> {
		Ok(())
	}

	async fn evict_all(&self, region: &str) -> ClResult<()> {
		Err(Error::CacheError(format!("cache backend unavailable for {}", region)))
	}
}

// vim: ts=4
