use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label carrying the owning cluster name on every CNPG-managed pod
pub const CLUSTER_LABEL: &str = "cnpg.io/cluster";
/// Label distinguishing instance pods from other pods of a cluster
pub const POD_ROLE_LABEL: &str = "cnpg.io/podRole";
pub const POD_ROLE_INSTANCE: &str = "instance";
/// Label holding `primary` or `replica` on instance pods
pub const INSTANCE_ROLE_LABEL: &str = "cnpg.io/instanceRole";
/// Pre-1.18 spelling of [`INSTANCE_ROLE_LABEL`]
pub const LEGACY_ROLE_LABEL: &str = "role";
/// Label set on PgBouncer pods created for a `Pooler`
pub const POOLER_NAME_LABEL: &str = "cnpg.io/poolerName";

/// CloudNativePG Cluster Custom Resource
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "postgresql.cnpg.io",
    version = "v1",
    kind = "Cluster",
    namespaced,
    status = "ClusterStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Desired number of PostgreSQL instances
    #[serde(default)]
    pub instances: i32,
    pub image_name: Option<String>,
    pub backup: Option<BackupConfiguration>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfiguration {
    pub retention_policy: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Human readable phase, e.g. "Cluster in healthy state"
    pub phase: Option<String>,
    pub instances: Option<i32>,
    pub ready_instances: Option<i32>,
    pub current_primary: Option<String>,
    #[serde(rename = "systemID")]
    pub system_id: Option<String>,
    pub image: Option<String>,
}

/// Reference from a backup resource to the cluster it belongs to
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ClusterReference {
    pub name: String,
}

/// CloudNativePG Backup Custom Resource
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "postgresql.cnpg.io",
    version = "v1",
    kind = "Backup",
    namespaced,
    status = "BackupStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct BackupSpec {
    #[serde(default)]
    pub cluster: ClusterReference,
    pub method: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    pub phase: Option<String>,
    pub started_at: Option<String>,
    /// Completion time of the backup run
    pub stopped_at: Option<String>,
}

/// CloudNativePG ScheduledBackup Custom Resource
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "postgresql.cnpg.io",
    version = "v1",
    kind = "ScheduledBackup",
    namespaced,
    status = "ScheduledBackupStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBackupSpec {
    #[serde(default)]
    pub cluster: ClusterReference,
    #[serde(default)]
    pub schedule: String,
    pub suspend: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBackupStatus {
    pub last_schedule_time: Option<String>,
    pub last_check_time: Option<String>,
    pub next_schedule_time: Option<String>,
}

impl Backup {
    pub fn belongs_to(&self, cluster: &str) -> bool {
        self.spec.cluster.name == cluster
    }

    pub fn completed_at(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.stopped_at.as_deref())
    }
}

impl ScheduledBackup {
    pub fn belongs_to(&self, cluster: &str) -> bool {
        self.spec.cluster.name == cluster
    }
}
