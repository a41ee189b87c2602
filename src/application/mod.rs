//! Application services layer.

pub mod admin;
pub mod archive;
pub mod error;
pub mod links;
pub mod portfolio;
pub mod repos;
