//! Bundles wrap a domain payload with its catalogue bookkeeping.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::audit::{AuditState, AuditStatus};
use crate::prelude::*;

/// A domain payload stored by the catalogue
pub trait Payload: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
	/// Checks the payload before it is persisted
	fn validate(&self) -> ClResult<()> {
		Ok(())
	}
}

impl Payload for serde_json::Value {}

/// Registration and modification stamps, owned by the store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registered_by: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub registered_at: Option<Timestamp>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub modified_by: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub modified_at: Option<Timestamp>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub change_reason: Option<Box<str>>,
}

impl Metadata {
	pub fn registered(actor: &Principal, at: Timestamp) -> Self {
		Self {
			registered_by: Some(actor.email.clone()),
			registered_at: Some(at),
			modified_by: Some(actor.email.clone()),
			modified_at: Some(at),
			change_reason: None,
		}
	}

	pub fn modified(&self, actor: &Principal, at: Timestamp, reason: &str) -> Self {
		Self {
			registered_by: self.registered_by.clone(),
			registered_at: self.registered_at,
			modified_by: Some(actor.email.clone()),
			modified_at: Some(at),
			change_reason: Some(reason.into()),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<T> {
	/// Unassigned until the bundle is first added to a store
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Box<str>>,
	pub payload: T,
	#[serde(default)]
	pub metadata: Metadata,
	#[serde(default)]
	pub active: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub latest_audit_info: Option<AuditStatus>,
}

impl<T: Payload> Bundle<T> {
	pub fn new(payload: T) -> Self {
		Self { id: None, payload, metadata: Metadata::default(), active: false, latest_audit_info: None }
	}

	pub fn with_id(mut self, id: impl Into<Box<str>>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn activated(mut self) -> Self {
		self.active = true;
		self
	}

	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn audit_status(&self) -> Option<&AuditStatus> {
		self.latest_audit_info.as_ref()
	}

	pub fn audit_state(&self) -> AuditState {
		AuditState::derive(self.latest_audit_info.as_ref(), &self.metadata)
	}

	pub fn to_document(&self) -> ClResult<serde_json::Value> {
		Ok(serde_json::to_value(self)?)
	}

	pub fn from_document(doc: serde_json::Value) -> ClResult<Self> {
		Ok(serde_json::from_value(doc)?)
	}
}


// vim: ts=4
