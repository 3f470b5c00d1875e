//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) and/or query param struct where the
//!   table supports it

pub mod activity;
pub mod comment;
pub mod complaint;
pub mod profile;
