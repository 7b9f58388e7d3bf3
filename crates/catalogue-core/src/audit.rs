//! Auditing subsystem.
//!
//! Sampling draws a uniform random set of distinct unreviewed providers or
//! services. Auditing replaces the entity's single audit status through the
//! owning manager's `record_audit`, stamped with the `audit` change reason.
//! The auditor never talks to the store directly.
//!
//! Sampling reads the candidate set in one query when the store returns it
//! whole. If the store caps the page below the number of matches, distinct
//! random offsets are drawn across the full match count and fetched one by
//! one in id order, so every candidate stays equally likely.

use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;

use catalogue_types::audit::{ActionType, AuditStatus, FIELD_ACTION_TYPE};
use catalogue_types::filter::{Page, SortField};

use crate::domain::{Provider, Service};
use crate::kind::Kind;
use crate::manager::{ProviderManager, ResourceManager, ServiceManager};
use crate::prelude::*;
use crate::settings::{AuditOpts, ShortfallPolicy};

/// Entity kinds that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
	Provider,
	Service,
}

impl std::str::FromStr for AuditKind {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s {
			"provider" => Ok(AuditKind::Provider),
			"service" | "resource" => Ok(AuditKind::Service),
			_ => Err(Error::ValidationError(format!("'{}' cannot be audited", s))),
		}
	}
}

#[derive(Debug)]
pub enum AuditSample {
	Providers(Vec<Bundle<Provider>>),
	Services(Vec<Bundle<Service>>),
}

impl AuditSample {
	pub fn len(&self) -> usize {
		match self {
			AuditSample::Providers(items) => items.len(),
			AuditSample::Services(items) => items.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn ids(&self) -> Vec<&str> {
		match self {
			AuditSample::Providers(items) => items.iter().filter_map(Bundle::id).collect(),
			AuditSample::Services(items) => items.iter().filter_map(Bundle::id).collect(),
		}
	}
}

#[derive(Debug)]
pub enum Audited {
	Provider(Bundle<Provider>),
	Service(Bundle<Service>),
}

impl Audited {
	pub fn audit_status(&self) -> Option<&AuditStatus> {
		match self {
			Audited::Provider(bundle) => bundle.audit_status(),
			Audited::Service(bundle) => bundle.audit_status(),
		}
	}
}

#[derive(Debug)]
pub struct Auditor {
	providers: Arc<ProviderManager>,
	services: Arc<ServiceManager>,
	opts: AuditOpts,
}

impl Auditor {
	pub fn new(providers: Arc<ProviderManager>, services: Arc<ServiceManager>, opts: AuditOpts) -> Self {
		Self { providers, services, opts }
	}

	pub async fn sample_for_audit(&self, kind: AuditKind, actor: &Principal) -> ClResult<AuditSample> {
		match kind {
			AuditKind::Provider => {
				Ok(AuditSample::Providers(sample(&self.providers, &self.opts, actor).await?))
			}
			AuditKind::Service => {
				Ok(AuditSample::Services(sample(&self.services, &self.opts, actor).await?))
			}
		}
	}

	pub async fn get_random_providers(&self, actor: &Principal) -> ClResult<Vec<Bundle<Provider>>> {
		sample(&self.providers, &self.opts, actor).await
	}

	pub async fn get_random_resources(&self, actor: &Principal) -> ClResult<Vec<Bundle<Service>>> {
		sample(&self.services, &self.opts, actor).await
	}

	pub async fn audit(
		&self,
		kind: AuditKind,
		id: &str,
		action_type: ActionType,
		comment: &str,
		actor: &Principal,
	) -> ClResult<Audited> {
		match kind {
			AuditKind::Provider => {
				Ok(Audited::Provider(audit(&self.providers, id, action_type, comment, actor).await?))
			}
			AuditKind::Service => {
				Ok(Audited::Service(audit(&self.services, id, action_type, comment, actor).await?))
			}
		}
	}

	pub async fn audit_provider(
		&self,
		id: &str,
		action_type: ActionType,
		comment: &str,
		actor: &Principal,
	) -> ClResult<Bundle<Provider>> {
		audit(&self.providers, id, action_type, comment, actor).await
	}

	pub async fn audit_resource(
		&self,
		id: &str,
		action_type: ActionType,
		comment: &str,
		actor: &Principal,
	) -> ClResult<Bundle<Service>> {
		audit(&self.services, id, action_type, comment, actor).await
	}
}

async fn audit<K: Kind>(
	manager: &ResourceManager<K>,
	id: &str,
	action_type: ActionType,
	comment: &str,
	actor: &Principal,
) -> ClResult<Bundle<K::Payload>> {
	let status = AuditStatus::new(actor, action_type, comment);
	let bundle = manager.record_audit(id, status, actor).await?;
	info!(
		resource_type = %manager.resource_type(),
		id = %id,
		action_type = %action_type,
		actor = %actor,
		"Audit recorded"
	);
	Ok(bundle)
}

fn candidate_filter(quantity: usize) -> FilterDescriptor {
	FilterDescriptor::new()
		.with_quantity(i32::try_from(quantity).unwrap_or(i32::MAX))
		.with_filter(FIELD_ACTION_TYPE, ActionType::Unreviewed.as_str())
		.sort_by(SortField::asc("id"))
}

async fn candidates<K: Kind>(
	manager: &ResourceManager<K>,
	opts: &AuditOpts,
	actor: &Principal,
) -> ClResult<Page<Bundle<K::Payload>>> {
	let filter = candidate_filter(opts.candidate_quantity);
	match manager.get_all(&filter, actor).await {
		Err(Error::QuantityExceeded { requested, max }) => {
			warn!(
				resource_type = %manager.resource_type(),
				requested = requested,
				max = max,
				"Candidate query capped by the store, sampling by offset"
			);
			manager.get_all(&candidate_filter(max), actor).await
		}
		res => res,
	}
}

async fn sample<K: Kind>(
	manager: &ResourceManager<K>,
	opts: &AuditOpts,
	actor: &Principal,
) -> ClResult<Vec<Bundle<K::Payload>>> {
	let page = candidates(manager, opts, actor).await?;
	let total = page.total;

	if total < opts.sample_size {
		if opts.shortfall == ShortfallPolicy::Fail {
			return Err(Error::InsufficientCandidates {
				resource_type: manager.resource_type().into(),
				available: total,
				required: opts.sample_size,
			});
		}
		warn!(
			resource_type = %manager.resource_type(),
			available = total,
			required = opts.sample_size,
			"Fewer audit candidates than the sample size, returning all of them"
		);
	}
	let amount = opts.sample_size.min(total);

	if page.is_complete() {
		let mut items = page.items;
		{
			let mut rng = rand::rng();
			items.shuffle(&mut rng);
		}
		items.truncate(amount);
		return Ok(items);
	}

	let offsets = {
		let mut rng = rand::rng();
		rand::seq::index::sample(&mut rng, total, amount).into_vec()
	};
	let mut seen = HashSet::with_capacity(amount);
	let mut picked = Vec::with_capacity(amount);
	for offset in offsets {
		let probe = candidate_filter(1).starting_at(offset);
		let Some(bundle) = manager.get_all(&probe, actor).await?.items.into_iter().next() else {
			continue;
		};
		let id = bundle.id().unwrap_or_default().to_string();
		if seen.insert(id) {
			picked.push(bundle);
		}
	}
	Ok(picked)
}

// vim: ts=4
