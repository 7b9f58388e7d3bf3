//! Core catalogue components: the generic resource store, entity-kind
//! managers, cache invalidation, and the auditing subsystem.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod cache;
pub mod domain;
pub mod kind;
pub mod manager;
pub mod prelude;
pub mod settings;
pub mod store;

// vim: ts=4
