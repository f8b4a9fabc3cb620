//! HTTP handlers, one module per resource.

pub mod auth;
pub mod deals;
pub mod import;
pub mod portal;
