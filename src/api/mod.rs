//! HTTP API
//!
//! - `GET /api/health-check`
//! - `GET /api/missions/:mission_id/verify`
//! - `GET /api/missions/:mission_id/requirements`
//!
//! Mission failures become a 500 with the error message as plain text.

pub mod routes;
pub mod server;

pub use server::{app, ApiServer};
