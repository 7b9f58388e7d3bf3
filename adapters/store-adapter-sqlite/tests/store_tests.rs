//! Store adapter behavior of the SQLite backend

use catalogue::filter::{FilterDescriptor, IndexField, QueryLimits, ResourceType, SortField};
use catalogue::prelude::*;
use catalogue::store_adapter::StoreAdapter;
use catalogue_store_adapter_sqlite::StoreAdapterSqlite;
use serde_json::{Value, json};
use tempfile::TempDir;

fn service_type() -> ResourceType {
	ResourceType::new("service")
		.with_index(IndexField::new("name", "/payload/name"))
		.with_index(IndexField::new("providerId", "/payload/resourceOrganisation"))
		.with_index(IndexField::new("active", "/active"))
		.with_index(IndexField::new("rating", "/payload/rating"))
		.with_index(
			IndexField::new("actionType", "/latestAuditInfo/actionType").with_default("unreviewed"),
		)
}

fn service(id: &str, name: &str, provider: &str, rating: i64) -> Value {
	json!({
		"id": id,
		"payload": { "name": name, "resourceOrganisation": provider, "rating": rating },
		"active": true,
	})
}

async fn create_test_store(limits: QueryLimits) -> (StoreAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().unwrap();
	let store = StoreAdapterSqlite::new(temp_dir.path().join("catalogue.db"), limits).await.unwrap();
	store.register_type(&service_type()).await.unwrap();
	(store, temp_dir)
}

async fn seed(store: &StoreAdapterSqlite) {
	store.create("service", "s1", &service("s1", "Storage", "p1", 3)).await.unwrap();
	store.create("service", "s2", &service("s2", "Compute", "p1", 5)).await.unwrap();
	store.create("service", "s3", &service("s3", "Archive", "p2", 4)).await.unwrap();
}

#[tokio::test]
async fn test_create_read_update() {
	let (store, _temp) = create_test_store(QueryLimits::default()).await;
	seed(&store).await;

	let doc = store.read("service", "s1").await.unwrap().unwrap();
	assert_eq!(doc["payload"]["name"], "Storage");
	assert!(store.exists("service", "s2").await.unwrap());
	assert!(!store.exists("service", "nope").await.unwrap());

	store.update("service", "s1", &service("s1", "Object Storage", "p1", 3)).await.unwrap();
	let doc = store.read("service", "s1").await.unwrap().unwrap();
	assert_eq!(doc["payload"]["name"], "Object Storage");
}

#[tokio::test]
async fn test_duplicate_and_missing_ids() {
	let (store, _temp) = create_test_store(QueryLimits::default()).await;
	seed(&store).await;

	let err = store.create("service", "s1", &service("s1", "Again", "p9", 1)).await.unwrap_err();
	assert!(matches!(err, Error::DuplicateId { .. }));

	let err = store.update("service", "s9", &service("s9", "Ghost", "p9", 1)).await.unwrap_err();
	assert!(matches!(err, Error::NotFound { .. }));
	assert!(store.read("service", "s9").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unregistered_type() {
	let (store, _temp) = create_test_store(QueryLimits::default()).await;
	let err = store.query("funder", &FilterDescriptor::new()).await.unwrap_err();
	assert!(matches!(err, Error::UnknownResourceType(_)));
}

#[tokio::test]
async fn test_query_predicates() {
	let (store, _temp) = create_test_store(QueryLimits::default()).await;
	seed(&store).await;

	let page = store
		.query("service", &FilterDescriptor::new().with_filter("providerId", "p1"))
		.await
		.unwrap();
	assert_eq!(page.total, 2);
	let ids: Vec<_> = page.items.iter().map(|d| d["id"].as_str().unwrap()).collect();
	assert_eq!(ids, vec!["s1", "s2"]);

	let filter =
		FilterDescriptor::new().with_filter("providerId", "p1").with_filter("rating", 5).with_filter("active", true);
	let page = store.query("service", &filter).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.items[0]["id"], "s2");
}

#[tokio::test]
async fn test_query_index_default() {
	let (store, _temp) = create_test_store(QueryLimits::default()).await;
	seed(&store).await;

	let mut audited = service("s3", "Archive", "p2", 4);
	audited["latestAuditInfo"] = json!({ "actionType": "invalid" });
	store.update("service", "s3", &audited).await.unwrap();

	let unreviewed = FilterDescriptor::new().with_filter("actionType", "unreviewed");
	let page = store.query("service", &unreviewed).await.unwrap();
	assert_eq!(page.total, 2);

	let invalid = FilterDescriptor::new().with_filter("actionType", "invalid");
	let page = store.query("service", &invalid).await.unwrap();
	assert_eq!(page.total, 1);
	assert_eq!(page.items[0]["id"], "s3");
}

#[tokio::test]
async fn test_query_paging_sorting_and_limits() {
	let (store, _temp) = create_test_store(QueryLimits { default_quantity: 2, max_quantity: 2 }).await;
	seed(&store).await;

	let page = store.query("service", &FilterDescriptor::new()).await.unwrap();
	assert_eq!(page.items.len(), 2);
	assert_eq!(page.total, 3);

	let filter = FilterDescriptor::new().sort_by(SortField::desc("rating")).starting_at(1);
	let page = store.query("service", &filter).await.unwrap();
	let ids: Vec<_> = page.items.iter().map(|d| d["id"].as_str().unwrap()).collect();
	assert_eq!(ids, vec!["s3", "s1"]);
	assert_eq!((page.from, page.to), (1, 3));

	let err = store
		.query("service", &FilterDescriptor::new().with_quantity(10))
		.await
		.unwrap_err();
	assert!(matches!(err, Error::QuantityExceeded { requested: 10, max: 2 }));

	let err = store
		.query("service", &FilterDescriptor::new().with_filter("website", "x"))
		.await
		.unwrap_err();
	assert!(matches!(err, Error::InvalidQuery(_)));
}

#[tokio::test]
async fn test_invalid_query_reported_before_quantity() {
	let (store, _temp) = create_test_store(QueryLimits { default_quantity: 2, max_quantity: 2 }).await;
	let filter = FilterDescriptor::new().with_quantity(50).with_filter("website", "x");
	let err = store.query("service", &filter).await.unwrap_err();
	assert!(matches!(err, Error::InvalidQuery(_)));
}

#[tokio::test]
async fn test_reopen_keeps_documents() {
	let temp_dir = TempDir::new().unwrap();
	let path = temp_dir.path().join("catalogue.db");
	{
		let store = StoreAdapterSqlite::new(&path, QueryLimits::default()).await.unwrap();
		store.register_type(&service_type()).await.unwrap();
		seed(&store).await;
	}
	let store = StoreAdapterSqlite::new(&path, QueryLimits::default()).await.unwrap();
	store.register_type(&service_type()).await.unwrap();
	let page = store.query("service", &FilterDescriptor::new()).await.unwrap();
	assert_eq!(page.total, 3);
}

// vim: ts=4
