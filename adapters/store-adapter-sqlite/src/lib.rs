//! SQLite implementation of the store adapter.
//!
//! All resource types share one `documents` table keyed by
//! `(resource_type, id)`. Documents are stored as JSON text and indexed
//! fields are evaluated with `json_extract`, so declaring a new index needs no
//! migration.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod schema;
mod utils;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use sqlx::{
	QueryBuilder, Row, Sqlite,
	sqlite::{self, SqlitePool},
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use catalogue::filter::{FilterDescriptor, Page, QueryLimits, ResourceType};
use catalogue::prelude::*;
use catalogue::store_adapter::StoreAdapter;

use crate::utils::{db_error, inspect, push_field, push_where};

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
	resource_types: RwLock<HashMap<Box<str>, Arc<ResourceType>>>,
	limits: QueryLimits,
}

impl StoreAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>, limits: QueryLimits) -> ClResult<Self> {
		if let Some(parent) = path.as_ref().parent() {
			if !parent.as_os_str().is_empty() {
				tokio::fs::create_dir_all(parent).await?;
			}
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.map_err(db_error)?;

		schema::init_db(&db).await.map_err(db_error)?;
		info!(path = %path.as_ref().display(), "SQLite store opened");

		Ok(Self { db, resource_types: RwLock::new(HashMap::new()), limits })
	}

	fn resource_type(&self, name: &str) -> ClResult<Arc<ResourceType>> {
		self.resource_types
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| Error::UnknownResourceType(name.to_string()))
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	async fn register_type(&self, resource_type: &ResourceType) -> ClResult<()> {
		self.resource_types
			.write()
			.insert(resource_type.name.clone(), Arc::new(resource_type.clone()));
		debug!(resource_type = %resource_type.name, "Registered resource type");
		Ok(())
	}

	async fn create(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()> {
		self.resource_type(resource_type)?;
		let payload = serde_json::to_string(doc)?;
		let res = sqlx::query("INSERT INTO documents (resource_type, id, payload) VALUES (?1, ?2, ?3)")
			.bind(resource_type)
			.bind(id)
			.bind(payload)
			.execute(&self.db)
			.await;

		match res {
			Ok(_) => Ok(()),
			Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
				Err(Error::duplicate_id(resource_type, id))
			}
			Err(err) => Err(db_error(err)),
		}
	}

	async fn update(&self, resource_type: &str, id: &str, doc: &Value) -> ClResult<()> {
		self.resource_type(resource_type)?;
		let payload = serde_json::to_string(doc)?;
		let res = sqlx::query(
			"UPDATE documents SET payload = ?3, updated_at = unixepoch()
			WHERE resource_type = ?1 AND id = ?2",
		)
		.bind(resource_type)
		.bind(id)
		.bind(payload)
		.execute(&self.db)
		.await
		.map_err(db_error)?;

		if res.rows_affected() == 0 {
			return Err(Error::not_found(resource_type, id));
		}
		Ok(())
	}

	async fn read(&self, resource_type: &str, id: &str) -> ClResult<Option<Value>> {
		self.resource_type(resource_type)?;
		let row = sqlx::query("SELECT payload FROM documents WHERE resource_type = ?1 AND id = ?2")
			.bind(resource_type)
			.bind(id)
			.fetch_optional(&self.db)
			.await
			.map_err(db_error)?;

		match row {
			Some(row) => {
				let payload: String = row.try_get("payload").inspect_err(inspect).or(Err(Error::DbError))?;
				Ok(Some(serde_json::from_str(&payload)?))
			}
			None => Ok(None),
		}
	}

	async fn exists(&self, resource_type: &str, id: &str) -> ClResult<bool> {
		self.resource_type(resource_type)?;
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM documents WHERE resource_type = ?1 AND id = ?2",
		)
		.bind(resource_type)
		.bind(id)
		.fetch_one(&self.db)
		.await
		.map_err(db_error)?;
		Ok(count > 0)
	}

	async fn query(&self, resource_type: &str, filter: &FilterDescriptor) -> ClResult<Page<Value>> {
		let rt = self.resource_type(resource_type)?;
		filter.validate(&rt)?;
		let page_size = filter.page_size(&self.limits)?;

		let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT count(*) FROM documents");
		push_where(&mut count_query, &rt, filter)?;
		let total = count_query
			.build_query_scalar::<i64>()
			.fetch_one(&self.db)
			.await
			.map_err(db_error)?;

		let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT payload FROM documents");
		push_where(&mut query, &rt, filter)?;
		query.push(" ORDER BY ");
		for sort in filter.sort.iter().flatten() {
			let field = rt.field(&sort.field).ok_or_else(|| {
				Error::InvalidQuery(format!("cannot sort by unindexed field '{}'", sort.field))
			})?;
			push_field(&mut query, field)?;
			query.push(if sort.ascending { " ASC, " } else { " DESC, " });
		}
		query.push("id ASC");
		query.push(" LIMIT ").push_bind(i64::try_from(page_size).unwrap_or(i64::MAX));
		query.push(" OFFSET ").push_bind(i64::try_from(filter.from).unwrap_or(i64::MAX));

		let rows = query.build().fetch_all(&self.db).await.map_err(db_error)?;
		let mut items = Vec::with_capacity(rows.len());
		for row in rows {
			let payload: String = row.try_get("payload").inspect_err(inspect).or(Err(Error::DbError))?;
			items.push(serde_json::from_str(&payload)?);
		}

		Ok(Page::new(items, usize::try_from(total).unwrap_or_default(), filter.from))
	}

	fn limits(&self) -> QueryLimits {
		self.limits
	}
}

// vim: ts=4
