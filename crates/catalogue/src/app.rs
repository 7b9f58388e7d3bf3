//! Catalogue builder - wires adapters, managers and the auditor together

use std::sync::Arc;

use catalogue_core::audit::Auditor;
use catalogue_core::cache::{CacheInvalidator, LruCacheAdapter};
use catalogue_core::manager::*;
use catalogue_core::settings::{CatalogueOpts, ShortfallPolicy};
use catalogue_types::cache_adapter::CacheAdapter;
use catalogue_types::filter::QueryLimits;
use catalogue_types::store_adapter::StoreAdapter;

use crate::prelude::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Adapters {
	pub store_adapter: Option<Arc<dyn StoreAdapter>>,
	pub cache_adapter: Option<Arc<dyn CacheAdapter>>,
}

#[derive(Debug)]
pub struct CatalogueState {
	pub opts: CatalogueOpts,
	pub providers: Arc<ProviderManager>,
	pub pending_providers: Arc<PendingProviderManager>,
	pub services: Arc<ServiceManager>,
	pub pending_services: Arc<PendingServiceManager>,
	pub datasources: Arc<DatasourceManager>,
	pub configuration_templates: Arc<ConfigurationTemplateManager>,
	pub funders: Arc<FunderManager>,
	pub indicators: Arc<IndicatorManager>,
	pub measurements: Arc<MeasurementManager>,
	pub manager_roles: Arc<ManagerRoleManager>,
	pub auditor: Auditor,
	pub invalidator: Arc<CacheInvalidator>,
}

pub type Catalogue = Arc<CatalogueState>;

pub struct CatalogueBuilder {
	opts: CatalogueOpts,
	adapters: Adapters,
}

/// Installs the global subscriber unless one is already set
fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.try_init();
}

impl CatalogueBuilder {
	pub fn new() -> Self {
		init_tracing();
		CatalogueBuilder {
			opts: CatalogueOpts::default(),
			adapters: Adapters { store_adapter: None, cache_adapter: None },
		}
	}

	/// Starts from options read from `CATALOGUE_*` environment variables
	pub fn from_env() -> ClResult<Self> {
		let mut builder = Self::new();
		builder.opts = CatalogueOpts::from_env()?;
		Ok(builder)
	}

	/// Page size limits store adapters should be created with
	pub fn limits(&self) -> QueryLimits {
		self.opts.limits
	}

	// Opts
	pub fn opts(&mut self, opts: CatalogueOpts) -> &mut Self {
		self.opts = opts;
		self
	}
	pub fn default_quantity(&mut self, quantity: usize) -> &mut Self {
		self.opts.limits.default_quantity = quantity;
		self
	}
	pub fn max_quantity(&mut self, quantity: usize) -> &mut Self {
		self.opts.limits.max_quantity = quantity;
		self
	}
	pub fn audit_sample_size(&mut self, sample_size: usize) -> &mut Self {
		self.opts.audit.sample_size = sample_size;
		self
	}
	pub fn audit_candidate_quantity(&mut self, quantity: usize) -> &mut Self {
		self.opts.audit.candidate_quantity = quantity;
		self
	}
	pub fn audit_shortfall(&mut self, policy: ShortfallPolicy) -> &mut Self {
		self.opts.audit.shortfall = policy;
		self
	}
	pub fn cache_capacity(&mut self, capacity: usize) -> &mut Self {
		self.opts.cache_capacity = capacity;
		self
	}
	pub fn disable_cache(&mut self, disable: bool) -> &mut Self {
		self.opts.disable_cache = disable;
		self
	}

	// Adapters
	pub fn store_adapter(&mut self, store_adapter: Arc<dyn StoreAdapter>) -> &mut Self {
		self.adapters.store_adapter = Some(store_adapter);
		self
	}
	pub fn cache_adapter(&mut self, cache_adapter: Arc<dyn CacheAdapter>) -> &mut Self {
		self.adapters.cache_adapter = Some(cache_adapter);
		self
	}

	pub async fn build(self) -> ClResult<Catalogue> {
		info!("Resource catalogue V{}", VERSION);

		if let Err(err) = self.opts.validate() {
			error!("FATAL: Invalid catalogue options: {}", err);
			return Err(err);
		}
		let Some(store) = self.adapters.store_adapter else {
			error!("FATAL: No store adapter configured");
			return Err(Error::Internal("No store adapter configured".to_string()));
		};
		let store_limits = store.limits();
		if store_limits.max_quantity < self.opts.audit.sample_size {
			warn!(
				max_quantity = store_limits.max_quantity,
				sample_size = self.opts.audit.sample_size,
				"Store page cap is below the audit sample size"
			);
		}

		let cache: Arc<dyn CacheAdapter> = match self.adapters.cache_adapter {
			Some(cache) => cache,
			None => {
				debug!(capacity = self.opts.cache_capacity, "Using in-process LRU cache");
				Arc::new(LruCacheAdapter::new(self.opts.cache_capacity))
			}
		};
		let invalidator = Arc::new(CacheInvalidator::new(cache));
		let disable_cache = self.opts.disable_cache;

		let providers =
			Arc::new(ProviderManager::new(store.clone(), invalidator.clone(), disable_cache).await?);
		let services =
			Arc::new(ServiceManager::new(store.clone(), invalidator.clone(), disable_cache).await?);
		let auditor = Auditor::new(providers.clone(), services.clone(), self.opts.audit);

		let state = CatalogueState {
			opts: self.opts,
			pending_providers: Arc::new(
				PendingProviderManager::new(store.clone(), invalidator.clone(), disable_cache).await?,
			),
			pending_services: Arc::new(
				PendingServiceManager::new(store.clone(), invalidator.clone(), disable_cache).await?,
			),
			datasources: Arc::new(
				DatasourceManager::new(store.clone(), invalidator.clone(), disable_cache).await?,
			),
			configuration_templates: Arc::new(
				ConfigurationTemplateManager::new(store.clone(), invalidator.clone(), disable_cache)
					.await?,
			),
			funders: Arc::new(FunderManager::new(store.clone(), invalidator.clone(), disable_cache).await?),
			indicators: Arc::new(
				IndicatorManager::new(store.clone(), invalidator.clone(), disable_cache).await?,
			),
			measurements: Arc::new(
				MeasurementManager::new(store.clone(), invalidator.clone(), disable_cache).await?,
			),
			manager_roles: Arc::new(
				ManagerRoleManager::new(store, invalidator.clone(), disable_cache).await?,
			),
			providers,
			services,
			auditor,
			invalidator,
		};
		info!("Catalogue ready");

		Ok(Arc::new(state))
	}
}

impl Default for CatalogueBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
