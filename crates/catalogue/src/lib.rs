//! Resource catalogue.
//!
//! A typed registry of providers, services and related entities with filtered
//! retrieval, cache invalidation and audit sampling. The store backend is
//! pluggable through [`StoreAdapter`](types::store_adapter::StoreAdapter);
//! build a catalogue with [`CatalogueBuilder`].

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;

pub use app::{Catalogue, CatalogueBuilder, CatalogueState};

pub use catalogue_core::{audit, cache, domain, kind, manager, settings};
pub use catalogue_types as types;

pub mod prelude {
	pub use catalogue_core::prelude::*;
	pub use catalogue_types::audit::ActionType;

	pub use crate::app::Catalogue;
}

// vim: ts=4
