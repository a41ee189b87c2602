//! folio: a self-hosted portfolio with a links-in-bio page, click analytics
//! and a private admin surface for ordering and editing content.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
