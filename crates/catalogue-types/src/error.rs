//! Error type shared by the catalogue crates and store adapters.

use std::fmt;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No entity with this id exists in the resource type
	NotFound { resource_type: Box<str>, id: Box<str> },
	/// An entity with this id already exists in the resource type
	DuplicateId { resource_type: Box<str>, id: Box<str> },
	/// Filter names a field the resource type does not index, or a malformed value
	InvalidQuery(String),
	/// Requested page size is larger than the store accepts
	QuantityExceeded { requested: usize, max: usize },
	/// Fewer unreviewed candidates than the requested sample size
	InsufficientCandidates { resource_type: Box<str>, available: usize, required: usize },
	UnknownResourceType(String),
	ValidationError(String),
	CacheError(String),
	ConfigError(String),
	SerializationError(String),
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Stable machine readable name of the error variant
	pub fn kind(&self) -> &'static str {
		match self {
			Error::NotFound { .. } => "not_found",
			Error::DuplicateId { .. } => "duplicate_id",
			Error::InvalidQuery(_) => "invalid_query",
			Error::QuantityExceeded { .. } => "quantity_exceeded",
			Error::InsufficientCandidates { .. } => "insufficient_candidates",
			Error::UnknownResourceType(_) => "unknown_resource_type",
			Error::ValidationError(_) => "validation_error",
			Error::CacheError(_) => "cache_error",
			Error::ConfigError(_) => "config_error",
			Error::SerializationError(_) => "serialization_error",
			Error::DbError => "db_error",
			Error::Internal(_) => "internal_error",
			Error::Io(_) => "io_error",
		}
	}

	pub fn not_found(resource_type: &str, id: &str) -> Self {
		Error::NotFound { resource_type: resource_type.into(), id: id.into() }
	}

	pub fn duplicate_id(resource_type: &str, id: &str) -> Self {
		Error::DuplicateId { resource_type: resource_type.into(), id: id.into() }
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::NotFound { resource_type, id } => {
				write!(f, "{} with id '{}' not found", resource_type, id)
			}
			Error::DuplicateId { resource_type, id } => {
				write!(f, "{} with id '{}' already exists", resource_type, id)
			}
			Error::InvalidQuery(msg) => write!(f, "invalid query: {}", msg),
			Error::QuantityExceeded { requested, max } => {
				write!(f, "quantity {} exceeds the maximum of {}", requested, max)
			}
			Error::InsufficientCandidates { resource_type, available, required } => write!(
				f,
				"only {} unreviewed {} entities available, {} required",
				available, resource_type, required
			),
			Error::UnknownResourceType(rt) => write!(f, "unknown resource type: {}", rt),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::CacheError(msg) => write!(f, "cache error: {}", msg),
			Error::ConfigError(msg) => write!(f, "config error: {}", msg),
			Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::SerializationError(err.to_string())
	}
}


// vim: ts=4
