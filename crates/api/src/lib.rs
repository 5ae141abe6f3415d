//! LMS API server library.
//!
//! Exposes config, state, error handling, auth, and routes so integration
//! tests and the binaries share one construction path.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod seed;
pub mod state;
pub mod telemetry;
