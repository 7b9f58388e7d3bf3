pub use catalogue_types::prelude::*;

pub use catalogue_types::bundle::{Bundle, Payload};
pub use catalogue_types::filter::FilterDescriptor;

// vim: ts=4
