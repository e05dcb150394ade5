//! Read access to the Kubernetes API
//!
//! [`ClusterSource`] is the seam between the status views and the API server.
//! [`KubeSource`] is the production implementation; tests substitute their own.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, ListParams},
    Client,
};
use tracing::debug;

use crate::crd::{Backup, Cluster, ScheduledBackup};
use crate::error::{Error, Result};

#[async_trait]
pub trait ClusterSource: Send + Sync {
    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Cluster>;

    /// Lists clusters in `namespace`, or in every namespace when `None`
    async fn list_clusters(&self, namespace: Option<&str>) -> Result<Vec<Cluster>>;

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod>;

    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>>;

    async fn list_backups(&self, namespace: &str) -> Result<Vec<Backup>>;

    async fn list_scheduled_backups(&self, namespace: &str) -> Result<Vec<ScheduledBackup>>;
}

/// [`ClusterSource`] backed by a `kube` client
#[derive(Clone)]
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client that talks to the API through `kubectl proxy` (or any
    /// compatible endpoint) at `proxy_url`.
    pub fn from_proxy_url(proxy_url: &str) -> Result<Self> {
        let uri: http::Uri = proxy_url
            .parse()
            .map_err(|e| Error::ConfigError(format!("Invalid proxy URL {}: {}", proxy_url, e)))?;
        let client = Client::try_from(kube::Config::new(uri))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ClusterSource for KubeSource {
    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Cluster> {
        let api: Api<Cluster> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn list_clusters(&self, namespace: Option<&str>) -> Result<Vec<Cluster>> {
        let api: Api<Cluster> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>> {
        debug!("Listing pods in {} matching {}", namespace, label_selector);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = api
            .list(&ListParams::default().labels(label_selector))
            .await?;
        Ok(pods.items)
    }

    async fn list_backups(&self, namespace: &str) -> Result<Vec<Backup>> {
        let api: Api<Backup> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }

    async fn list_scheduled_backups(&self, namespace: &str) -> Result<Vec<ScheduledBackup>> {
        let api: Api<ScheduledBackup> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.list(&ListParams::default()).await?.items)
    }
}
