//! Application services for the administrative surface.

pub mod collection;
pub mod dashboard;
pub mod manager;
pub mod profile;
