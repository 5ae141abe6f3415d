//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where the entity is mutable
//!
//! Entities serialize with camelCase field names for the JSON API.

pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod quiz;
pub mod session;
pub mod user;
