//! API handlers organized by resource.

mod analytics;
mod collections;
mod profile;

pub use analytics::*;
pub use collections::*;
pub use profile::*;
