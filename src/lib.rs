//! CNPG Dashboard: status views for CloudNativePG clusters
//!
//! This crate reads CloudNativePG `Cluster`, `Backup` and `ScheduledBackup`
//! resources together with the cluster's pods and folds them into one status
//! document per database, served over a small REST API.

pub mod crd;
pub mod error;
pub mod status;
pub mod telemetry;

#[cfg(feature = "rest-api")]
pub mod rest_api;

use std::net::SocketAddr;

pub use crate::error::{Error, Result};

/// Endpoint the Kubernetes API proxy listens on unless configured otherwise
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8001";
/// Address the REST API binds to unless configured otherwise
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration, resolved once by the binary and passed down
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub proxy_url: String,
    pub listen_addr: SocketAddr,
}
