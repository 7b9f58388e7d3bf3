//! Cache region invalidation on manager mutations

mod common;

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use catalogue_core::cache::{CacheInvalidator, LruCacheAdapter};
use catalogue_core::manager::ProviderManager;
use catalogue_core::settings::AuditOpts;
use catalogue_store_adapter_memory::StoreAdapterMemory;
use catalogue_types::cache_adapter::{
	CACHE_DATASOURCES, CACHE_FEATURED_SERVICES, CACHE_PROVIDERS, CacheAdapter,
};
use catalogue_types::filter::{FilterDescriptor, Page, QueryLimits, ResourceType};
use catalogue_types::prelude::*;
use catalogue_types::store_adapter::StoreAdapter;
use common::*;

type Gate = (oneshot::Sender<()>, oneshot::Receiver<()>);

/// Memory store whose next query, once armed, reads its page and then waits
/// for a release signal before returning it
#[derive(Debug, Default)]
struct PausingStore {
	inner: StoreAdapterMemory,
	gate: Mutex<Option<Gate>>,
}

impl PausingStore {
	fn arm(&self, entered: oneshot::Sender<()>, release: oneshot::Receiver<()>) {
		*self.gate.lock().unwrap() = Some((entered, release));
	}
}

#[async_trait]
impl StoreAdapter for PausingStore {
	async fn register_type(&self, resource_type: &ResourceType) -> ClResult<()> {
		self.inner.register_type(resource_type).await
	}

	async fn create(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()> {
		self.inner.create(resource_type, id, doc).await
	}

	async fn update(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()> {
		self.inner.update(resource_type, id, doc).await
	}

	async fn read(&self, resource_type: &str, id: &str) -> ClResult<Option<Value>> {
		self.inner.read(resource_type, id).await
	}

	async fn query(&self, resource_type: &str, filter: &FilterDescriptor) -> ClResult<Page<Value>> {
		let page = self.inner.query(resource_type, filter).await?;
		let gate = self.gate.lock().unwrap().take();
		if let Some((entered, release)) = gate {
			let _ = entered.send(());
			let _ = release.await;
		}
		Ok(page)
	}

	fn limits(&self) -> QueryLimits {
		self.inner.limits()
	}
}

const UNRELATED: &str = "vocabularies";

async fn fill_regions(cache: &dyn CacheAdapter) {
	for region in [CACHE_PROVIDERS, CACHE_FEATURED_SERVICES, CACHE_DATASOURCES, UNRELATED] {
		cache.put(region, "all", json!(["stale"])).await.unwrap();
	}
}

#[tokio::test]
async fn test_datasource_add_evicts_dependent_regions() {
	let (cat, cache) = catalogue().await;
	fill_regions(cache.as_ref()).await;

	cat.datasources.add_datasource(datasource("s1"), &owner()).await.unwrap();

	assert!(cache.is_empty(CACHE_PROVIDERS));
	assert!(cache.is_empty(CACHE_FEATURED_SERVICES));
	assert!(cache.is_empty(CACHE_DATASOURCES));
	// unrelated region untouched
	assert!(!cache.is_empty(UNRELATED));
}

#[tokio::test]
async fn test_provider_update_evicts_provider_regions() {
	let (cat, cache) = catalogue().await;
	let stored = cat.providers.add(provider("Cloud Lab"), &owner()).await.unwrap();
	fill_regions(cache.as_ref()).await;

	cat.providers.update_provider(stored, "content", &owner()).await.unwrap();

	assert!(cache.is_empty(CACHE_PROVIDERS));
	assert!(cache.is_empty(CACHE_FEATURED_SERVICES));
	assert!(!cache.is_empty(CACHE_DATASOURCES));
}

#[tokio::test]
async fn test_failed_mutation_evicts_nothing() {
	let (cat, cache) = catalogue().await;
	fill_regions(cache.as_ref()).await;

	let err = cat
		.providers
		.update(provider("Ghost").with_id("missing"), "content", &owner())
		.await
		.unwrap_err();
	assert!(matches!(err, Error::NotFound { .. }));
	assert!(!cache.is_empty(CACHE_PROVIDERS));
	assert!(!cache.is_empty(CACHE_FEATURED_SERVICES));
}

#[tokio::test]
async fn test_service_add_evicts_featured_only() {
	let (cat, cache) = catalogue().await;
	fill_regions(cache.as_ref()).await;

	cat.services.add(service("Storage", "p1"), &owner()).await.unwrap();
	assert!(cache.is_empty(CACHE_FEATURED_SERVICES));
	assert!(!cache.is_empty(CACHE_PROVIDERS));
}

#[tokio::test]
async fn test_cached_listing_reflects_mutation() {
	let (cat, _cache) = catalogue().await;
	cat.providers.add(provider("Cloud Lab"), &owner()).await.unwrap();

	let filter = FilterDescriptor::new();
	let first = cat.providers.get_all_cached(&filter, &owner()).await.unwrap();
	assert_eq!(first.total, 1);

	cat.providers.add(provider("Data Hub"), &owner()).await.unwrap();
	let second = cat.providers.get_all_cached(&filter, &owner()).await.unwrap();
	assert_eq!(second.total, 2);
}

#[tokio::test]
async fn test_cached_listing_is_served_from_region() {
	let (cat, cache) = catalogue().await;
	cat.datasources.add(datasource("s1"), &owner()).await.unwrap();

	let filter = FilterDescriptor::new();
	cat.datasources.get_all_cached(&filter, &owner()).await.unwrap();
	assert_eq!(cache.len(CACHE_DATASOURCES), 1);

	let cached = cat.datasources.get_all_cached(&filter, &owner()).await.unwrap();
	assert_eq!(cached.items[0].payload.service_id.as_ref(), "s1");
}

#[tokio::test]
async fn test_listing_read_before_mutation_is_not_cached() {
	let store = Arc::new(PausingStore::default());
	let cache = Arc::new(LruCacheAdapter::new(100));
	let invalidator = Arc::new(CacheInvalidator::new(cache.clone()));
	let providers = Arc::new(ProviderManager::new(store.clone(), invalidator, false).await.unwrap());
	providers.add(provider("Cloud Lab"), &owner()).await.unwrap();

	let (entered_tx, entered_rx) = oneshot::channel();
	let (release_tx, release_rx) = oneshot::channel();
	store.arm(entered_tx, release_rx);

	let reader = tokio::spawn({
		let providers = providers.clone();
		async move { providers.get_all_cached(&FilterDescriptor::new(), &owner()).await }
	});
	entered_rx.await.unwrap();
	// the reader holds a page read before this add committed
	providers.add(provider("Data Hub"), &owner()).await.unwrap();
	release_tx.send(()).unwrap();

	let in_flight = reader.await.unwrap().unwrap();
	assert_eq!(in_flight.total, 1);
	assert!(cache.is_empty(CACHE_PROVIDERS));

	let listing = providers.get_all_cached(&FilterDescriptor::new(), &owner()).await.unwrap();
	assert_eq!(listing.total, 2);
}

#[tokio::test]
async fn test_eviction_failure_is_observable_not_fatal() {
	let cat = build(QueryLimits::default(), AuditOpts::default(), Arc::new(FailingCache)).await;

	let stored = cat.providers.add(provider("Cloud Lab"), &owner()).await.unwrap();
	// providers and featuredServices both failed
	assert_eq!(cat.invalidator.failed_evictions(), 2);

	// the mutation committed regardless
	let reread = cat.providers.get(stored.id().unwrap()).await.unwrap();
	assert_eq!(reread.payload.name.as_ref(), "Cloud Lab");

	cat.funders
		.add(catalogue_types::bundle::Bundle::new(Default::default()), &owner())
		.await
		.unwrap();
	assert_eq!(cat.invalidator.failed_evictions(), 2);
}

// vim: ts=4
