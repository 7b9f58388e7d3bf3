//! Shared types, adapter traits, and core utilities for the resource catalogue.
//!
//! This crate contains the foundational types that are shared between the
//! core crate and all store adapter implementations. Keeping them here lets
//! adapter crates compile without pulling in the managers or the auditor.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod bundle;
pub mod cache_adapter;
pub mod error;
pub mod filter;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod utils;

// vim: ts=4
