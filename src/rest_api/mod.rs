//! REST API module for the dashboard frontend
//!
//! Serves database status documents over HTTP.

mod dto;
mod handlers;
mod server;

pub use dto::{ErrorResponse, HealthResponse};
pub use server::{router, run_server, serve, AppState};
