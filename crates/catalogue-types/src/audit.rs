//! Audit status types.
//!
//! An entity carries at most one current [`AuditStatus`]. Entities that have
//! never been audited have none, and are treated as [`ActionType::Unreviewed`]
//! by every query that filters on the action type.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::bundle::Metadata;
use crate::prelude::*;

/// Logging entry type recorded on every audit status
pub const AUDIT_TYPE: &str = "audit";

/// Name of the index field every auditable resource type exposes
pub const FIELD_ACTION_TYPE: &str = "actionType";

/// JSON pointer of the action type inside a stored bundle
pub const POINTER_ACTION_TYPE: &str = "/latestAuditInfo/actionType";

/// Audit outcome. `Unreviewed` is the sentinel for "never audited".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
	Unreviewed,
	Valid,
	Invalid,
}

impl ActionType {
	pub fn as_str(&self) -> &'static str {
		match self {
			ActionType::Unreviewed => "unreviewed",
			ActionType::Valid => "valid",
			ActionType::Invalid => "invalid",
		}
	}
}

impl std::fmt::Display for ActionType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ActionType {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s {
			"unreviewed" => Ok(ActionType::Unreviewed),
			"valid" => Ok(ActionType::Valid),
			"invalid" => Ok(ActionType::Invalid),
			_ => Err(Error::ValidationError(format!("unknown action type: {}", s))),
		}
	}
}

/// The most recent audit decision for an entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStatus {
	pub date: Timestamp,
	pub user_email: Box<str>,
	pub user_full_name: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_role: Option<Box<str>>,
	#[serde(rename = "type")]
	pub typ: Box<str>,
	#[serde(default)]
	pub comment: Box<str>,
	pub action_type: ActionType,
}

impl AuditStatus {
	pub fn new(actor: &Principal, action_type: ActionType, comment: &str) -> Self {
		Self::at(Timestamp::now(), actor, action_type, comment)
	}

	pub fn at(date: Timestamp, actor: &Principal, action_type: ActionType, comment: &str) -> Self {
		Self {
			date,
			user_email: actor.email.clone(),
			user_full_name: actor.full_name.clone(),
			user_role: actor.role.clone(),
			typ: AUDIT_TYPE.into(),
			comment: comment.into(),
			action_type,
		}
	}
}

/// Audit state derived from the audit status and the last modification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditState {
	NotAudited,
	ValidAndNotUpdated,
	ValidAndUpdated,
	InvalidAndNotUpdated,
	InvalidAndUpdated,
}

impl AuditState {
	/// An entity counts as updated when it was modified for something other
	/// than the audit itself after the audit date.
	pub fn derive(audit: Option<&AuditStatus>, metadata: &Metadata) -> AuditState {
		let Some(audit) = audit else {
			return AuditState::NotAudited;
		};
		let updated = match (metadata.modified_at, metadata.change_reason.as_deref()) {
			(_, Some(AUDIT_TYPE)) => false,
			(Some(modified_at), _) => modified_at > audit.date,
			(None, _) => false,
		};
		match (audit.action_type, updated) {
			(ActionType::Unreviewed, _) => AuditState::NotAudited,
			(ActionType::Valid, false) => AuditState::ValidAndNotUpdated,
			(ActionType::Valid, true) => AuditState::ValidAndUpdated,
			(ActionType::Invalid, false) => AuditState::InvalidAndNotUpdated,
			(ActionType::Invalid, true) => AuditState::InvalidAndUpdated,
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			AuditState::NotAudited => "Not Audited",
			AuditState::ValidAndNotUpdated => "Valid and Not Updated",
			AuditState::ValidAndUpdated => "Valid and Updated",
			AuditState::InvalidAndNotUpdated => "Invalid and Not Updated",
			AuditState::InvalidAndUpdated => "Invalid and Updated",
		}
	}
}


// vim: ts=4
