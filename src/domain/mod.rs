//! Domain layer types and invariants.

pub mod analytics;
pub mod clicks;
pub mod collection;
pub mod dates;
pub mod error;
pub mod experiences;
pub mod hackathons;
pub mod links;
pub mod ordering;
pub mod profile;
pub mod projects;
pub mod slug;
pub mod types;
