//! Domain payloads stored in the catalogue

use serde::{Deserialize, Serialize};

use crate::prelude::*;

fn require(field: &str, value: &str) -> ClResult<()> {
	if value.trim().is_empty() {
		return Err(Error::ValidationError(format!("field '{}' is required", field)));
	}
	Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
	pub abbreviation: Box<str>,
	pub name: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<Box<str>>,
	#[serde(default)]
	pub legal_entity: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub logo: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<Box<str>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub participating_countries: Vec<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub catalogue_id: Option<Box<str>>,
}

impl Payload for Provider {
	fn validate(&self) -> ClResult<()> {
		require("name", &self.name)?;
		require("abbreviation", &self.abbreviation)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
	pub name: Box<str>,
	/// Id of the provider offering the service
	pub resource_organisation: Box<str>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub resource_providers: Vec<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub webpage: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub catalogue_id: Option<Box<str>>,
}

impl Payload for Service {
	fn validate(&self) -> ClResult<()> {
		require("name", &self.name)?;
		require("resourceOrganisation", &self.resource_organisation)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
	pub service_id: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub catalogue_id: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub jurisdiction: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub datasource_classification: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub research_entity_types: Vec<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thematic: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub harvestable: Option<bool>,
}

impl Payload for Datasource {
	fn validate(&self) -> ClResult<()> {
		require("serviceId", &self.service_id)
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationTemplate {
	pub interoperability_record_id: Box<str>,
	pub name: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<Box<str>>,
	#[serde(default)]
	pub form_model: serde_json::Value,
}

impl Payload for ConfigurationTemplate {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funder {
	pub name: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub abbreviation: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub country: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<Box<str>>,
}

impl Payload for Funder {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
	pub name: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<Box<str>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub units: Vec<Box<str>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub dimensions: Vec<Box<str>>,
}

impl Payload for Indicator {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
	pub indicator_id: Box<str>,
	pub service_id: Box<str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub time: Option<Timestamp>,
	pub value: Box<str>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub locations: Vec<Box<str>>,
}

impl Payload for Measurement {}

/// Assignment of a user to a management role on a provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRole {
	pub email: Box<str>,
	pub role: Box<str>,
	pub provider_id: Box<str>,
}

impl Payload for ManagerRole {
	fn validate(&self) -> ClResult<()> {
		require("email", &self.email)?;
		require("providerId", &self.provider_id)
	}
}


// vim: ts=4
