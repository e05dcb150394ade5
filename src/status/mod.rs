//! Database status views
//!
//! Fetches a CloudNativePG cluster and its pods and backups, derives the
//! per-topic sub-documents and assembles them into one [`DatabaseStatus`].

mod compose;
pub mod derive;
pub mod fetch;
pub mod source;
mod types;

pub use compose::{compose, database_status, list_databases};
pub use fetch::{fetch_cluster, BackupResources, ClusterLookup, FetchedCluster};
pub use source::{ClusterSource, KubeSource};
pub use types::*;
