//! Domain primitives for the LMS backend.
//!
//! Everything in this crate is storage- and transport-agnostic: ids, role and
//! status enums, the lesson-progress evaluator, quiz scoring, certificate
//! numbering, and the shared [`error::CoreError`] type.

pub mod certificate;
pub mod enrollment;
pub mod error;
pub mod quiz;
pub mod roles;
pub mod seed;
pub mod types;
