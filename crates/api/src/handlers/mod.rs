pub mod admin;
pub mod auth;
pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod quiz;
