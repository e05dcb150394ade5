//! Fetching of everything a status document is built from
//!
//! The cluster read gates the rest: a missing cluster short-circuits before
//! any other call is made. The remaining reads run concurrently and each one
//! degrades to its own default when it fails.

use k8s_openapi::api::core::v1::Pod;
use tracing::warn;

use crate::crd::{
    Backup, Cluster, ScheduledBackup, CLUSTER_LABEL, POD_ROLE_INSTANCE, POD_ROLE_LABEL,
    POOLER_NAME_LABEL,
};
use crate::error::Result;

use super::derive::pod_start_time;
use super::source::ClusterSource;
use super::types::ClusterRef;

/// Raw material for one status document
#[derive(Clone, Debug)]
pub struct FetchedCluster {
    pub cluster: Cluster,
    /// `None` when the primary pod could not be read
    pub primary_start_time: Option<String>,
    /// Empty when the listing failed
    pub instance_pods: Vec<Pod>,
    /// Empty when the listing failed
    pub pooler_pods: Vec<Pod>,
    /// `None` when either backup listing failed
    pub backups: Option<BackupResources>,
}

#[derive(Clone, Debug, Default)]
pub struct BackupResources {
    pub scheduled: Vec<ScheduledBackup>,
    pub runs: Vec<Backup>,
}

#[derive(Clone, Debug)]
pub enum ClusterLookup {
    Found(Box<FetchedCluster>),
    NotFound,
}

pub fn instance_selector(cluster: &str) -> String {
    format!(
        "{}={},{}={}",
        CLUSTER_LABEL, cluster, POD_ROLE_LABEL, POD_ROLE_INSTANCE
    )
}

/// Pooler pods of `cluster`; a namespace may host poolers of several clusters
pub fn pooler_selector(cluster: &str) -> String {
    format!("{}={},{}", CLUSTER_LABEL, cluster, POOLER_NAME_LABEL)
}

/// Reads the cluster and, if it exists, everything hanging off it.
///
/// Only a failure of the cluster read itself is returned as an error.
pub async fn fetch_cluster<S>(source: &S, target: &ClusterRef) -> Result<ClusterLookup>
where
    S: ClusterSource + ?Sized,
{
    let cluster = match source.get_cluster(&target.namespace, &target.name).await {
        Ok(cluster) => cluster,
        Err(e) if e.is_not_found() => return Ok(ClusterLookup::NotFound),
        Err(e) => return Err(e),
    };

    let current_primary = cluster
        .status
        .as_ref()
        .and_then(|s| s.current_primary.clone());
    let instances = instance_selector(&target.name);
    let poolers = pooler_selector(&target.name);

    let (primary_start_time, instance_pods, pooler_pods, backups) = tokio::join!(
        read_primary_start_time(source, &target.namespace, current_primary.as_deref()),
        source.list_pods(&target.namespace, &instances),
        source.list_pods(&target.namespace, &poolers),
        list_backup_resources(source, &target.namespace),
    );

    Ok(ClusterLookup::Found(Box::new(FetchedCluster {
        cluster,
        primary_start_time: recover(primary_start_time, "primary pod", target).flatten(),
        instance_pods: recover(instance_pods, "instance pods", target).unwrap_or_default(),
        pooler_pods: recover(pooler_pods, "pooler pods", target).unwrap_or_default(),
        backups: recover(backups, "backups", target),
    })))
}

async fn read_primary_start_time<S>(
    source: &S,
    namespace: &str,
    primary: Option<&str>,
) -> Result<Option<String>>
where
    S: ClusterSource + ?Sized,
{
    let Some(primary) = primary else {
        return Ok(None);
    };
    let pod = source.get_pod(namespace, primary).await?;
    Ok(pod_start_time(&pod))
}

/// Scheduled backups and backup runs are only meaningful together, so a
/// failure of either one fails the pair.
async fn list_backup_resources<S>(source: &S, namespace: &str) -> Result<BackupResources>
where
    S: ClusterSource + ?Sized,
{
    let (scheduled, runs) = tokio::join!(
        source.list_scheduled_backups(namespace),
        source.list_backups(namespace),
    );
    Ok(BackupResources {
        scheduled: scheduled?,
        runs: runs?,
    })
}

fn recover<T>(result: Result<T>, what: &str, target: &ClusterRef) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Failed to read {} for {}: {}",
                what,
                target.qualified_name(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_selector() {
        assert_eq!(
            instance_selector("c"),
            "cnpg.io/cluster=c,cnpg.io/podRole=instance"
        );
    }

    #[test]
    fn test_pooler_selector_is_scoped_to_cluster() {
        assert_eq!(pooler_selector("c"), "cnpg.io/cluster=c,cnpg.io/poolerName");
    }
}
