//! Derivation of the status sub-documents from raw resources
//!
//! Everything here is a pure function of already-fetched objects.

use chrono::{DateTime, SecondsFormat};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::ResourceExt;

use crate::crd::{
    Backup, ScheduledBackup, CLUSTER_LABEL, INSTANCE_ROLE_LABEL, LEGACY_ROLE_LABEL,
    POOLER_NAME_LABEL,
};

use super::types::{Backups, ClusterRef, InstanceRole, InstanceRow, Services, Streaming};

// ── services ────────────────────────────────────────────────────────────────

fn service_host(service: &str, namespace: &str) -> String {
    format!("{}.{}.svc.cluster.local", service, namespace)
}

/// DNS names of the read-write, read-only and (when present) pooler services.
/// The pooler name is taken from the first pooler pod labelled for `target`;
/// pods of other clusters are ignored.
pub fn services(target: &ClusterRef, pooler_pods: &[Pod]) -> Services {
    let pooler_rw = pooler_pods
        .iter()
        .filter(|pod| pod.labels().get(CLUSTER_LABEL) == Some(&target.name))
        .find_map(|pod| pod.labels().get(POOLER_NAME_LABEL))
        .map(|pooler| service_host(&format!("{}-rw", pooler), &target.namespace));

    Services {
        rw: service_host(&format!("{}-rw", target.name), &target.namespace),
        ro: service_host(&format!("{}-ro", target.name), &target.namespace),
        pooler_rw,
    }
}

// ── instances ───────────────────────────────────────────────────────────────

pub fn instance_role(pod: &Pod) -> InstanceRole {
    let labels = pod.labels();
    labels
        .get(INSTANCE_ROLE_LABEL)
        .or_else(|| labels.get(LEGACY_ROLE_LABEL))
        .map(|role| InstanceRole::from_label(role))
        .unwrap_or(InstanceRole::Unknown)
}

/// True when the pod reports a `Ready` condition with status `True`
pub fn pod_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
        .unwrap_or(false)
}

pub fn pod_start_time(pod: &Pod) -> Option<String> {
    pod.status
        .as_ref()
        .and_then(|s| s.start_time.as_ref())
        .map(format_time)
}

pub fn instance_row(pod: &Pod) -> InstanceRow {
    InstanceRow {
        name: pod.name_any(),
        role: instance_role(pod),
        ready: pod_ready(pod),
        start_time: pod_start_time(pod),
        qos_class: pod.status.as_ref().and_then(|s| s.qos_class.clone()),
        node_name: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
    }
}

/// Projects instance pods into table rows, keeping the input order.
pub fn instances_table(pods: &[Pod]) -> Vec<InstanceRow> {
    pods.iter().map(instance_row).collect()
}

pub fn streaming(pods: &[Pod]) -> Streaming {
    let replicas = pods
        .iter()
        .filter(|pod| instance_role(pod) == InstanceRole::Replica)
        .count();
    Streaming {
        configured: replicas > 0,
        replicas,
    }
}

// ── backups ─────────────────────────────────────────────────────────────────

/// Summarises the backup resources that reference `cluster`.
pub fn backups(cluster: &str, scheduled: &[ScheduledBackup], runs: &[Backup]) -> Backups {
    let scheduled_count = scheduled.iter().filter(|s| s.belongs_to(cluster)).count();
    let matching: Vec<&Backup> = runs.iter().filter(|b| b.belongs_to(cluster)).collect();
    let last_backup_time =
        latest_timestamp(matching.iter().filter_map(|b| b.completed_at())).map(str::to_string);

    Backups {
        configured: scheduled_count > 0 || !matching.is_empty(),
        scheduled_count,
        last_backup_time,
    }
}

/// Picks the latest RFC 3339 timestamp. Values that fail to parse sort before
/// parsed ones and are compared as plain strings among themselves.
pub fn latest_timestamp<'a>(timestamps: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    timestamps.max_by(|a, b| {
        let parsed_a = DateTime::parse_from_rfc3339(a).ok();
        let parsed_b = DateTime::parse_from_rfc3339(b).ok();
        parsed_a.cmp(&parsed_b).then_with(|| a.cmp(b))
    })
}

pub fn format_time(time: &Time) -> String {
    time.0.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{BackupSpec, BackupStatus, ClusterReference, ScheduledBackupSpec};
    use chrono::{TimeZone, Utc};
    use k8s_openapi::api::core::v1::{PodCondition, PodSpec, PodStatus};
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    fn pod(name: &str, labels: &[(&str, &str)]) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(
                    labels
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect::<BTreeMap<_, _>>(),
                ),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn instance(name: &str, role: &str) -> Pod {
        pod(name, &[(INSTANCE_ROLE_LABEL, role)])
    }

    fn backup(name: &str, cluster: &str, stopped_at: Option<&str>) -> Backup {
        let mut b = Backup::new(
            name,
            BackupSpec {
                cluster: ClusterReference {
                    name: cluster.to_string(),
                },
                method: None,
            },
        );
        b.status = Some(BackupStatus {
            phase: Some("completed".to_string()),
            started_at: None,
            stopped_at: stopped_at.map(str::to_string),
        });
        b
    }

    fn scheduled(name: &str, cluster: &str) -> ScheduledBackup {
        ScheduledBackup::new(
            name,
            ScheduledBackupSpec {
                cluster: ClusterReference {
                    name: cluster.to_string(),
                },
                schedule: "0 0 0 * * *".to_string(),
                suspend: None,
            },
        )
    }

    // ── services ───────────────────────────────────────────────────────────

    #[test]
    fn test_services_without_pooler() {
        let s = services(&ClusterRef::new("ns", "c"), &[]);
        assert_eq!(s.rw, "c-rw.ns.svc.cluster.local");
        assert_eq!(s.ro, "c-ro.ns.svc.cluster.local");
        assert_eq!(s.pooler_rw, None);
    }

    #[test]
    fn test_services_uses_first_pooler_pod() {
        let poolers = vec![
            pod("a-1", &[(CLUSTER_LABEL, "c"), (POOLER_NAME_LABEL, "test-pooler")]),
            pod("b-1", &[(CLUSTER_LABEL, "c"), (POOLER_NAME_LABEL, "other-pooler")]),
        ];
        let s = services(&ClusterRef::new("ns", "c"), &poolers);
        assert_eq!(
            s.pooler_rw.as_deref(),
            Some("test-pooler-rw.ns.svc.cluster.local")
        );
    }

    #[test]
    fn test_services_pooler_pod_without_label() {
        let s = services(&ClusterRef::new("ns", "c"), &[pod("odd", &[(CLUSTER_LABEL, "c")])]);
        assert_eq!(s.pooler_rw, None);
    }

    #[test]
    fn test_services_ignores_pooler_of_other_cluster() {
        let poolers = vec![
            pod("x-1", &[(CLUSTER_LABEL, "other"), (POOLER_NAME_LABEL, "other-pooler")]),
            pod("unowned", &[(POOLER_NAME_LABEL, "stray-pooler")]),
        ];
        let s = services(&ClusterRef::new("ns", "c"), &poolers);
        assert_eq!(s.pooler_rw, None);

        let mut mixed = poolers.clone();
        mixed.push(pod("c-p", &[(CLUSTER_LABEL, "c"), (POOLER_NAME_LABEL, "c-pooler")]));
        let s = services(&ClusterRef::new("ns", "c"), &mixed);
        assert_eq!(s.pooler_rw.as_deref(), Some("c-pooler-rw.ns.svc.cluster.local"));
    }

    // ── instances ──────────────────────────────────────────────────────────

    #[test]
    fn test_instance_role_falls_back_to_legacy_label() {
        assert_eq!(
            instance_role(&pod("c-2", &[(LEGACY_ROLE_LABEL, "replica")])),
            InstanceRole::Replica
        );
        assert_eq!(instance_role(&pod("c-3", &[])), InstanceRole::Unknown);
    }

    #[test]
    fn test_instance_row_projection() {
        let mut p = instance("c-1", "primary");
        p.spec = Some(PodSpec {
            node_name: Some("worker-1".to_string()),
            ..Default::default()
        });
        p.status = Some(PodStatus {
            qos_class: Some("Burstable".to_string()),
            start_time: Some(Time(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap())),
            conditions: Some(vec![PodCondition {
                type_: "Ready".to_string(),
                status: "True".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        });

        let row = instance_row(&p);
        assert_eq!(row.name, "c-1");
        assert_eq!(row.role, InstanceRole::Primary);
        assert!(row.ready);
        assert_eq!(row.start_time.as_deref(), Some("2026-01-02T03:04:05Z"));
        assert_eq!(row.qos_class.as_deref(), Some("Burstable"));
        assert_eq!(row.node_name.as_deref(), Some("worker-1"));
    }

    #[test]
    fn test_pod_not_ready_without_condition() {
        let mut p = instance("c-2", "replica");
        assert!(!pod_ready(&p));
        p.status = Some(PodStatus {
            conditions: Some(vec![PodCondition {
                type_: "Ready".to_string(),
                status: "False".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        });
        assert!(!pod_ready(&p));
    }

    #[test]
    fn test_instances_table_preserves_order() {
        let pods = vec![
            instance("c-3", "replica"),
            instance("c-1", "primary"),
            instance("c-2", "replica"),
        ];
        let names: Vec<String> = instances_table(&pods).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c-3", "c-1", "c-2"]);
    }

    // ── streaming ──────────────────────────────────────────────────────────

    #[test]
    fn test_streaming_counts_only_replicas() {
        let pods = vec![instance("c-1", "primary"), instance("c-2", "replica")];
        assert_eq!(
            streaming(&pods),
            Streaming {
                configured: true,
                replicas: 1
            }
        );
    }

    #[test]
    fn test_streaming_single_instance() {
        assert_eq!(
            streaming(&[instance("c-1", "primary")]),
            Streaming {
                configured: false,
                replicas: 0
            }
        );
        assert_eq!(streaming(&[]), Streaming::default());
    }

    // ── backups ────────────────────────────────────────────────────────────

    #[test]
    fn test_backups_none_found() {
        assert_eq!(backups("c", &[], &[]), Backups::default());
    }

    #[test]
    fn test_backups_ignores_other_clusters() {
        let summary = backups(
            "c",
            &[scheduled("nightly", "c"), scheduled("theirs", "other")],
            &[
                backup("b1", "c", Some("2026-01-01T00:05:00Z")),
                backup("b2", "other", Some("2026-03-01T00:00:00Z")),
            ],
        );
        assert_eq!(
            summary,
            Backups {
                configured: true,
                scheduled_count: 1,
                last_backup_time: Some("2026-01-01T00:05:00Z".to_string()),
            }
        );
    }

    #[test]
    fn test_backups_picks_latest_completion() {
        let summary = backups(
            "c",
            &[],
            &[
                backup("b1", "c", Some("2026-01-03T00:00:00Z")),
                backup("b2", "c", None),
                backup("b3", "c", Some("2026-01-02T23:00:00-02:00")),
                backup("b4", "c", Some("2026-01-01T00:00:00Z")),
            ],
        );
        // b3 is 2026-01-03T01:00Z once normalised
        assert!(summary.configured);
        assert_eq!(summary.scheduled_count, 0);
        assert_eq!(
            summary.last_backup_time.as_deref(),
            Some("2026-01-02T23:00:00-02:00")
        );
    }

    #[test]
    fn test_latest_timestamp_unparseable_values() {
        let values = ["garbage", "2026-01-01T00:00:00Z", "zzz"];
        assert_eq!(
            latest_timestamp(values.iter().copied()),
            Some("2026-01-01T00:00:00Z")
        );
        let values = ["a", "b"];
        assert_eq!(latest_timestamp(values.iter().copied()), Some("b"));
        assert_eq!(latest_timestamp(std::iter::empty()), None);
    }
}
