use std::{env, path, sync::Arc};

use catalogue::CatalogueBuilder;
use catalogue::audit::AuditKind;
use catalogue::prelude::*;
use catalogue::types::filter::FilterDescriptor;
use catalogue_store_adapter_sqlite::StoreAdapterSqlite;

pub struct Config {
	pub db_dir: path::PathBuf,
	pub audit_kind: AuditKind,
}

impl Config {
	fn from_env() -> ClResult<Self> {
		let audit_kind = match env::var("AUDIT_KIND") {
			Ok(kind) => kind.parse()?,
			Err(_) => AuditKind::Provider,
		};
		Ok(Config {
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			audit_kind,
		})
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ClResult<()> {
	let config = Config::from_env()?;

	let mut builder = CatalogueBuilder::from_env()?;
	let store = StoreAdapterSqlite::new(config.db_dir.join("catalogue.db"), builder.limits()).await?;
	builder.store_adapter(Arc::new(store));
	let catalogue = builder.build().await?;

	let actor = Principal::system();
	let providers = catalogue.providers.get_all(&FilterDescriptor::new(), &actor).await?;
	let services = catalogue.services.get_all(&FilterDescriptor::new(), &actor).await?;
	info!(providers = providers.total, services = services.total, "Catalogue contents");

	let sample = catalogue.auditor.sample_for_audit(config.audit_kind, &actor).await?;
	info!(kind = ?config.audit_kind, size = sample.len(), "Audit sample drawn");
	for id in sample.ids() {
		info!("  {}", id);
	}

	Ok(())
}

// vim: ts=4
