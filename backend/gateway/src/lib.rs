//! LiftLens Gateway HTTP API Server
//!
//! Screenshot upload and health endpoints over the analysis pipeline.

pub mod attachments;
pub mod error;
pub mod health_api;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState};
