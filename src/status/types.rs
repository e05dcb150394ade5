//! Documents produced by the status views

use serde::Serialize;

/// Identifies one CNPG cluster
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClusterRef {
    pub namespace: String,
    pub name: String,
}

impl ClusterRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Result of a status request: either the full document or the not-found marker.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DatabaseStatus {
    Found(Box<DatabaseStatusDocument>),
    NotFound(NotFoundDocument),
}

impl DatabaseStatus {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseStatus::NotFound(_))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundDocument {
    pub not_found: bool,
    pub name: String,
    pub namespace: String,
    pub cluster: String,
}

impl NotFoundDocument {
    pub fn for_cluster(target: &ClusterRef) -> Self {
        Self {
            not_found: true,
            name: target.qualified_name(),
            namespace: target.namespace.clone(),
            cluster: target.name.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatusDocument {
    /// `namespace/name`
    pub name: String,
    pub namespace: String,
    pub cluster: String,
    pub image: Option<String>,
    /// Reported verbatim from the cluster status
    pub phase: Option<String>,
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_start_time: Option<String>,
    pub instances: i32,
    pub ready_instances: i32,
    #[serde(rename = "systemID")]
    pub system_id: Option<String>,
    pub services: Services,
    pub backups: Backups,
    pub streaming: Streaming,
    pub instances_table: Vec<InstanceRow>,
}

/// In-cluster DNS names of the services fronting the database
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    pub rw: String,
    pub ro: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pooler_rw: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Backups {
    pub configured: bool,
    pub scheduled_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_backup_time: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Streaming {
    pub configured: bool,
    pub replicas: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstanceRole {
    Primary,
    Replica,
    Unknown,
}

impl InstanceRole {
    pub fn from_label(value: &str) -> Self {
        match value {
            "primary" => InstanceRole::Primary,
            "replica" => InstanceRole::Replica,
            _ => InstanceRole::Unknown,
        }
    }
}

/// One row of the instances table
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRow {
    pub name: String,
    pub role: InstanceRole,
    pub ready: bool,
    pub start_time: Option<String>,
    pub qos_class: Option<String>,
    pub node_name: Option<String>,
}

/// Short form of a cluster used by the database list
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSummary {
    pub name: String,
    pub namespace: String,
    pub phase: Option<String>,
    pub instances: i32,
    pub ready_instances: i32,
    pub primary: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DatabaseList {
    pub items: Vec<DatabaseSummary>,
    pub total: usize,
}
