//! Assembly of the database status document

use kube::ResourceExt;
use tracing::{debug, info, instrument};

use crate::crd::Cluster;
use crate::error::Result;

use super::derive;
use super::fetch::{fetch_cluster, ClusterLookup, FetchedCluster};
use super::source::ClusterSource;
use super::types::{
    ClusterRef, DatabaseList, DatabaseStatus, DatabaseStatusDocument, DatabaseSummary,
    NotFoundDocument,
};

/// Builds the status of one database cluster.
///
/// A missing cluster yields [`DatabaseStatus::NotFound`]; any other failure to
/// read the cluster is returned as an error. Failures of the secondary reads
/// never surface here.
#[instrument(skip(source), fields(namespace = %target.namespace, name = %target.name))]
pub async fn database_status<S>(source: &S, target: &ClusterRef) -> Result<DatabaseStatus>
where
    S: ClusterSource + ?Sized,
{
    match fetch_cluster(source, target).await? {
        ClusterLookup::NotFound => {
            info!("Cluster {} not found", target.qualified_name());
            Ok(DatabaseStatus::NotFound(NotFoundDocument::for_cluster(
                target,
            )))
        }
        ClusterLookup::Found(fetched) => {
            debug!(
                instance_pods = fetched.instance_pods.len(),
                pooler_pods = fetched.pooler_pods.len(),
                "Fetched cluster resources"
            );
            Ok(DatabaseStatus::Found(Box::new(compose(target, *fetched))))
        }
    }
}

pub fn compose(target: &ClusterRef, fetched: FetchedCluster) -> DatabaseStatusDocument {
    let FetchedCluster {
        cluster,
        primary_start_time,
        instance_pods,
        pooler_pods,
        backups,
    } = fetched;

    let status = cluster.status.clone().unwrap_or_default();
    let backups = backups
        .map(|b| derive::backups(&target.name, &b.scheduled, &b.runs))
        .unwrap_or_default();

    DatabaseStatusDocument {
        name: target.qualified_name(),
        namespace: target.namespace.clone(),
        cluster: target.name.clone(),
        image: cluster.spec.image_name.clone().or(status.image),
        phase: status.phase,
        primary: status.current_primary,
        primary_start_time,
        instances: cluster.spec.instances,
        ready_instances: status.ready_instances.unwrap_or(0),
        system_id: status.system_id,
        services: derive::services(target, &pooler_pods),
        backups,
        streaming: derive::streaming(&instance_pods),
        instances_table: derive::instances_table(&instance_pods),
    }
}

/// Lists database clusters, across all namespaces when `namespace` is `None`.
#[instrument(skip(source))]
pub async fn list_databases<S>(source: &S, namespace: Option<&str>) -> Result<DatabaseList>
where
    S: ClusterSource + ?Sized,
{
    let items: Vec<DatabaseSummary> = source
        .list_clusters(namespace)
        .await?
        .iter()
        .map(summarize)
        .collect();
    let total = items.len();
    Ok(DatabaseList { items, total })
}

fn summarize(cluster: &Cluster) -> DatabaseSummary {
    let status = cluster.status.as_ref();
    DatabaseSummary {
        name: cluster.name_any(),
        namespace: cluster.namespace().unwrap_or_default(),
        phase: status.and_then(|s| s.phase.clone()),
        instances: cluster.spec.instances,
        ready_instances: status.and_then(|s| s.ready_instances).unwrap_or(0),
        primary: status.and_then(|s| s.current_primary.clone()),
    }
}
