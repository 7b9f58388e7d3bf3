//! Catalogue options and their environment variable bindings.
//!
//! | Variable                        | Default            |
//! |---------------------------------|--------------------|
//! | `CATALOGUE_DEFAULT_QUANTITY`    | 10                 |
//! | `CATALOGUE_MAX_QUANTITY`        | 10000              |
//! | `CATALOGUE_AUDIT_SAMPLE_SIZE`   | 10                 |
//! | `CATALOGUE_AUDIT_CANDIDATES`    | 10000              |
//! | `CATALOGUE_AUDIT_SHORTFALL`     | `return-available` |
//! | `CATALOGUE_CACHE_CAPACITY`      | 500                |
//! | `CATALOGUE_DISABLE_CACHE`       | false              |

use catalogue_types::filter::QueryLimits;
use std::str::FromStr;

use crate::prelude::*;

/// What sampling does when fewer unreviewed candidates exist than requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortfallPolicy {
	/// Return every available candidate in random order
	ReturnAvailable,
	/// Fail with `InsufficientCandidates`
	Fail,
}

impl FromStr for ShortfallPolicy {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s {
			"return-available" => Ok(ShortfallPolicy::ReturnAvailable),
			"fail" => Ok(ShortfallPolicy::Fail),
			_ => Err(Error::ConfigError(format!("unknown shortfall policy: {}", s))),
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct AuditOpts {
	pub sample_size: usize,
	/// Page size requested when collecting audit candidates
	pub candidate_quantity: usize,
	pub shortfall: ShortfallPolicy,
}

impl Default for AuditOpts {
	fn default() -> Self {
		Self { sample_size: 10, candidate_quantity: 10_000, shortfall: ShortfallPolicy::ReturnAvailable }
	}
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogueOpts {
	pub limits: QueryLimits,
	pub audit: AuditOpts,
	pub cache_capacity: usize,
	pub disable_cache: bool,
}

impl Default for CatalogueOpts {
	fn default() -> Self {
		Self {
			limits: QueryLimits::default(),
			audit: AuditOpts::default(),
			cache_capacity: 500,
			disable_cache: false,
		}
	}
}

impl CatalogueOpts {
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads options through `lookup`, falling back to defaults for unset keys
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let defaults = Self::default();
		let opts = Self {
			limits: QueryLimits {
				default_quantity: parse_var(
					&lookup,
					"CATALOGUE_DEFAULT_QUANTITY",
					defaults.limits.default_quantity,
				)?,
				max_quantity: parse_var(&lookup, "CATALOGUE_MAX_QUANTITY", defaults.limits.max_quantity)?,
			},
			audit: AuditOpts {
				sample_size: parse_var(&lookup, "CATALOGUE_AUDIT_SAMPLE_SIZE", defaults.audit.sample_size)?,
				candidate_quantity: parse_var(
					&lookup,
					"CATALOGUE_AUDIT_CANDIDATES",
					defaults.audit.candidate_quantity,
				)?,
				shortfall: parse_var(&lookup, "CATALOGUE_AUDIT_SHORTFALL", defaults.audit.shortfall)?,
			},
			cache_capacity: parse_var(&lookup, "CATALOGUE_CACHE_CAPACITY", defaults.cache_capacity)?,
			disable_cache: parse_var(&lookup, "CATALOGUE_DISABLE_CACHE", defaults.disable_cache)?,
		};
		opts.validate()?;
		Ok(opts)
	}

	pub fn validate(&self) -> ClResult<()> {
		if self.limits.default_quantity == 0 || self.limits.max_quantity == 0 {
			return Err(Error::ConfigError("page sizes must be positive".into()));
		}
		if self.audit.sample_size == 0 {
			return Err(Error::ConfigError("audit sample size must be positive".into()));
		}
		if self.audit.candidate_quantity < self.audit.sample_size {
			return Err(Error::ConfigError(
				"audit candidate quantity must not be smaller than the sample size".into(),
			));
		}
		if i32::try_from(self.audit.candidate_quantity).is_err() {
			return Err(Error::ConfigError("audit candidate quantity is too large".into()));
		}
		if self.cache_capacity == 0 {
			return Err(Error::ConfigError("cache capacity must be positive".into()));
		}
		Ok(())
	}
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> ClResult<T>
where
	T: FromStr,
{
	match lookup(key) {
		Some(value) => value
			.trim()
			.parse()
			.map_err(|_| Error::ConfigError(format!("invalid value for {}: '{}'", key, value))),
		None => Ok(default),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		move |key| vars.get(key).cloned()
	}

	#[test]
	fn test_defaults() {
		let opts = CatalogueOpts::from_lookup(lookup(&[])).unwrap();
		assert_eq!(opts.limits.default_quantity, 10);
		assert_eq!(opts.limits.max_quantity, 10_000);
		assert_eq!(opts.audit.sample_size, 10);
		assert_eq!(opts.audit.shortfall, ShortfallPolicy::ReturnAvailable);
		assert!(!opts.disable_cache);
	}

	#[test]
	fn test_overrides() {
		let opts = CatalogueOpts::from_lookup(lookup(&[
			("CATALOGUE_MAX_QUANTITY", "500"),
			("CATALOGUE_AUDIT_SHORTFALL", "fail"),
			("CATALOGUE_DISABLE_CACHE", "true"),
		]))
		.unwrap();
		assert_eq!(opts.limits.max_quantity, 500);
		assert_eq!(opts.audit.shortfall, ShortfallPolicy::Fail);
		assert!(opts.disable_cache);
	}

	#[test]
	fn test_invalid_values() {
		let err = CatalogueOpts::from_lookup(lookup(&[("CATALOGUE_MAX_QUANTITY", "lots")])).unwrap_err();
		assert_eq!(err.kind(), "config_error");

		let err =
			CatalogueOpts::from_lookup(lookup(&[("CATALOGUE_AUDIT_SAMPLE_SIZE", "0")])).unwrap_err();
		assert_eq!(err.kind(), "config_error");

		let err = CatalogueOpts::from_lookup(lookup(&[("CATALOGUE_AUDIT_SHORTFALL", "maybe")]))
			.unwrap_err();
		assert_eq!(err.kind(), "config_error");
	}
}

// vim: ts=4
