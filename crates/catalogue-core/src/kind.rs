//! Entity kinds.
//!
//! A kind binds a payload type to its resource type name, its indexed fields
//! and the cache regions its mutations invalidate. Managers are generic over
//! the kind, so adding a kind means adding one `Kind` impl.

use catalogue_types::audit::{ActionType, FIELD_ACTION_TYPE, POINTER_ACTION_TYPE};
use catalogue_types::cache_adapter::{CACHE_DATASOURCES, CACHE_FEATURED_SERVICES, CACHE_PROVIDERS};
use catalogue_types::filter::{IndexField, ResourceType};

use crate::domain;
use crate::prelude::*;

pub const FIELD_ACTIVE: &str = "active";
pub const FIELD_REGISTERED_BY: &str = "registeredBy";

pub trait Kind: Send + Sync + 'static {
	type Payload: Payload;

	const RESOURCE_TYPE: &'static str;

	/// Regions evicted after every successful add or update
	const EVICTS: &'static [&'static str] = &[];

	/// Region serving cached listings of this kind, if any
	const CACHED_VIEW: Option<&'static str> = None;

	/// Payload fields indexed in addition to the common ones
	fn payload_fields() -> Vec<IndexField> {
		Vec::new()
	}

	fn resource_type() -> ResourceType {
		let common = [
			IndexField::new(FIELD_ACTIVE, "/active").with_default(false),
			IndexField::new(FIELD_ACTION_TYPE, POINTER_ACTION_TYPE)
				.with_default(ActionType::Unreviewed.as_str()),
			IndexField::new(FIELD_REGISTERED_BY, "/metadata/registeredBy"),
		];
		common
			.into_iter()
			.chain(Self::payload_fields())
			.fold(ResourceType::new(Self::RESOURCE_TYPE), ResourceType::with_index)
	}
}

fn payload_field(name: &str) -> IndexField {
	IndexField::new(name, format!("/payload/{}", name))
}

#[derive(Debug)]
pub struct ProviderKind;

impl Kind for ProviderKind {
	type Payload = domain::Provider;
	const RESOURCE_TYPE: &'static str = "provider";
	const EVICTS: &'static [&'static str] = &[CACHE_PROVIDERS, CACHE_FEATURED_SERVICES];
	const CACHED_VIEW: Option<&'static str> = Some(CACHE_PROVIDERS);

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name"), payload_field("abbreviation"), payload_field("catalogueId")]
	}
}

/// Provider submissions awaiting approval
#[derive(Debug)]
pub struct PendingProviderKind;

impl Kind for PendingProviderKind {
	type Payload = domain::Provider;
	const RESOURCE_TYPE: &'static str = "pending_provider";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name"), payload_field("abbreviation")]
	}
}

#[derive(Debug)]
pub struct ServiceKind;

impl Kind for ServiceKind {
	type Payload = domain::Service;
	const RESOURCE_TYPE: &'static str = "service";
	const EVICTS: &'static [&'static str] = &[CACHE_FEATURED_SERVICES];

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name"), payload_field("resourceOrganisation"), payload_field("catalogueId")]
	}
}

/// Service submissions awaiting approval
#[derive(Debug)]
pub struct PendingServiceKind;

impl Kind for PendingServiceKind {
	type Payload = domain::Service;
	const RESOURCE_TYPE: &'static str = "pending_service";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name"), payload_field("resourceOrganisation")]
	}
}

#[derive(Debug)]
pub struct DatasourceKind;

impl Kind for DatasourceKind {
	type Payload = domain::Datasource;
	const RESOURCE_TYPE: &'static str = "datasource";
	const EVICTS: &'static [&'static str] =
		&[CACHE_PROVIDERS, CACHE_FEATURED_SERVICES, CACHE_DATASOURCES];
	const CACHED_VIEW: Option<&'static str> = Some(CACHE_DATASOURCES);

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("serviceId"), payload_field("catalogueId")]
	}
}

#[derive(Debug)]
pub struct ConfigurationTemplateKind;

impl Kind for ConfigurationTemplateKind {
	type Payload = domain::ConfigurationTemplate;
	const RESOURCE_TYPE: &'static str = "configuration_template";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name"), payload_field("interoperabilityRecordId")]
	}
}

#[derive(Debug)]
pub struct FunderKind;

impl Kind for FunderKind {
	type Payload = domain::Funder;
	const RESOURCE_TYPE: &'static str = "funder";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name"), payload_field("country")]
	}
}

#[derive(Debug)]
pub struct IndicatorKind;

impl Kind for IndicatorKind {
	type Payload = domain::Indicator;
	const RESOURCE_TYPE: &'static str = "indicator";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("name")]
	}
}

#[derive(Debug)]
pub struct MeasurementKind;

impl Kind for MeasurementKind {
	type Payload = domain::Measurement;
	const RESOURCE_TYPE: &'static str = "measurement";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("indicatorId"), payload_field("serviceId")]
	}
}

#[derive(Debug)]
pub struct ManagerRoleKind;

impl Kind for ManagerRoleKind {
	type Payload = domain::ManagerRole;
	const RESOURCE_TYPE: &'static str = "manager_role";

	fn payload_fields() -> Vec<IndexField> {
		vec![payload_field("email"), payload_field("role"), payload_field("providerId")]
	}
}


// vim: ts=4
