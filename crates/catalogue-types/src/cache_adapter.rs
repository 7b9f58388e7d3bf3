//! Cache Adapter
//!
//! Cached listings live in named regions. Mutations evict whole regions, so
//! adapters only need region granularity for invalidation.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::prelude::*;

pub const CACHE_PROVIDERS: &str = "providers";
pub const CACHE_FEATURED_SERVICES: &str = "featuredServices";
pub const CACHE_DATASOURCES: &str = "datasources";

#[async_trait]
pub trait CacheAdapter: Debug + Send + Sync {
	async fn get(&self, region: &str, key: &str) -> ClResult<Option<Value>>;

	async fn put(&self, region: &str, key: &str, value: Value) -> ClResult<()>;

	/// Drops every entry of a region
	async fn evict_all(&self, region: &str) -> ClResult<()>;
}

// vim: ts=4
