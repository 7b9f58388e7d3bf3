//! Cache regions and mutation-driven invalidation.
//!
//! [`CacheInvalidator::evicting`] wraps a mutation future: when the mutation
//! succeeds, every listed region is evicted before the result is handed back.
//! A failed mutation evicts nothing. An eviction failure does not undo the
//! committed mutation; it is logged at warn level and counted.
//!
//! Each region carries a generation that every eviction bumps. A listing read
//! before an eviction must not land in the cache after it, so
//! [`CacheInvalidator::put_if_current`] only keeps a page whose generation is
//! still current once the write is done.

use async_trait::async_trait;
use lru::LruCache;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use catalogue_types::cache_adapter::CacheAdapter;

use crate::prelude::*;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
	Some(capacity) => capacity,
	None => NonZeroUsize::MIN,
};

/// In-process cache keeping one LRU per region
#[derive(Debug)]
pub struct LruCacheAdapter {
	regions: parking_lot::RwLock<HashMap<Box<str>, LruCache<Box<str>, Value>>>,
	capacity: NonZeroUsize,
}

impl LruCacheAdapter {
	/// `capacity` bounds each region separately
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
		Self { regions: parking_lot::RwLock::new(HashMap::new()), capacity }
	}

	pub fn len(&self, region: &str) -> usize {
		self.regions.read().get(region).map_or(0, LruCache::len)
	}

	pub fn is_empty(&self, region: &str) -> bool {
		self.len(region) == 0
	}
}

#[async_trait]
impl CacheAdapter for LruCacheAdapter {
	async fn get(&self, region: &str, key: &str) -> ClResult<Option<Value>> {
		let mut regions = self.regions.write();
		Ok(regions.get_mut(region).and_then(|cache| cache.get(key).cloned()))
	}

	async fn put(&self, region: &str, key: &str, value: Value) -> ClResult<()> {
		let mut regions = self.regions.write();
		let capacity = self.capacity;
		regions.entry(region.into()).or_insert_with(|| LruCache::new(capacity)).put(key.into(), value);
		Ok(())
	}

	async fn evict_all(&self, region: &str) -> ClResult<()> {
		let mut regions = self.regions.write();
		if let Some(cache) = regions.get_mut(region) {
			cache.clear();
		}
		Ok(())
	}
}

#[derive(Debug)]
pub struct CacheInvalidator {
	cache: Arc<dyn CacheAdapter>,
	generations: parking_lot::Mutex<HashMap<Box<str>, u64>>,
	failed_evictions: AtomicU64,
}

impl CacheInvalidator {
	pub fn new(cache: Arc<dyn CacheAdapter>) -> Self {
		Self {
			cache,
			generations: parking_lot::Mutex::new(HashMap::new()),
			failed_evictions: AtomicU64::new(0),
		}
	}

	/// Current generation of `region`, to be captured before reading the store
	pub fn generation(&self, region: &str) -> u64 {
		self.generations.lock().get(region).copied().unwrap_or_default()
	}

	fn bump(&self, region: &str) {
		*self.generations.lock().entry(region.into()).or_default() += 1;
	}

	/// Caches `value` unless `region` was evicted since `generation` was taken.
	///
	/// An eviction racing the write is caught by the second check, which then
	/// evicts the region again.
	pub async fn put_if_current(&self, region: &str, key: &str, value: Value, generation: u64) {
		if self.generation(region) != generation {
			debug!(region = %region, "Region evicted during read, not caching");
			return;
		}
		if let Err(err) = self.cache.put(region, key, value).await {
			warn!(error = %err, region = %region, "Cache write failed");
			return;
		}
		if self.generation(region) != generation {
			debug!(region = %region, "Region evicted during cache write, dropping it");
			self.evict(&[region]).await;
		}
	}

	pub fn cache(&self) -> &Arc<dyn CacheAdapter> {
		&self.cache
	}

	/// Runs `mutation`, then evicts `regions` if it succeeded
	pub async fn evicting<T, F>(&self, regions: &[&str], mutation: F) -> ClResult<T>
	where
		F: Future<Output = ClResult<T>>,
	{
		let res = mutation.await?;
		self.evict(regions).await;
		Ok(res)
	}

	pub async fn evict(&self, regions: &[&str]) {
		for region in regions {
			self.bump(region);
			match self.cache.evict_all(region).await {
				Ok(()) => debug!(region = %region, "Cache region evicted"),
				Err(err) => {
					self.failed_evictions.fetch_add(1, Ordering::Relaxed);
					warn!(error = %err, region = %region, "Cache eviction failed, region may serve stale data");
				}
			}
		}
	}

	/// Number of region evictions that failed since startup
	pub fn failed_evictions(&self) -> u64 {
		self.failed_evictions.load(Ordering::Relaxed)
	}
}


// vim: ts=4
