//! Well-known role name constants.
//!
//! These must match the CHECK constraint in `20250715000001_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_OPS: &str = "OPS";
