//! Recording rules deployed alongside KubeVirt.
//!
//! Recording rules are evaluated by Prometheus, so their output never shows up
//! on a component's own metrics endpoint.

use serde::{Deserialize, Serialize};

use crate::mapping::MetricType;

/// A recording rule together with its documentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRule {
    /// Name of the recorded series.
    pub record: String,
    /// PromQL expression producing the series.
    pub expr: String,
    /// Human-readable description.
    pub description: String,
    /// Type of the recorded series.
    pub metric_type: MetricType,
}

impl RecordingRule {
    fn gauge(record: &str, expr: String, description: &str) -> Self {
        Self {
            record: record.to_string(),
            expr,
            description: description.to_string(),
            metric_type: MetricType::Gauge,
        }
    }
}

/// Build the recording rules for an installation in `namespace`.
pub fn recording_rules(namespace: &str) -> Vec<RecordingRule> {
    vec![
        RecordingRule::gauge(
            "kubevirt_virt_api_up_total",
            format!("sum(up{{namespace='{namespace}', pod=~'virt-api-.*'}}) or vector(0)"),
            "The number of virt-api pods that are up.",
        ),
        RecordingRule::gauge(
            "kubevirt_allocatable_nodes_count",
            "count(count (kube_node_status_allocatable) by (node))".to_string(),
            "The number of nodes in the cluster that have the devices.kubevirt.io/kvm resource available.",
        ),
        RecordingRule::gauge(
            "kubevirt_kvm_available_nodes_count",
            "kubevirt_allocatable_nodes_count - count(kube_node_status_allocatable{resource='devices_kubevirt_io_kvm'} == 0)".to_string(),
            "The number of nodes in the cluster that have the devices.kubevirt.io/kvm resource available.",
        ),
        RecordingRule::gauge(
            "kubevirt_virt_controller_up_total",
            format!("sum(up{{pod=~'virt-controller-.*', namespace='{namespace}'}}) or vector(0)"),
            "The number of virt-controller pods that are up.",
        ),
        RecordingRule::gauge(
            "kubevirt_virt_controller_ready_total",
            format!(
                "sum(kubevirt_virt_controller_ready_status{{namespace='{namespace}'}}) or vector(0)"
            ),
            "The number of virt-controller pods that are ready.",
        ),
        RecordingRule::gauge(
            "kubevirt_virt_operator_up_total",
            format!("sum(up{{namespace='{namespace}', pod=~'virt-operator-.*'}}) or vector(0)"),
            "The number of virt-operator pods that are up.",
        ),
        RecordingRule::gauge(
            "kubevirt_virt_operator_ready_total",
            format!(
                "sum(kubevirt_virt_operator_ready_status{{namespace='{namespace}'}}) or vector(0)"
            ),
            "The number of virt-operator pods that are ready.",
        ),
        RecordingRule::gauge(
            "kubevirt_virt_operator_leading_total",
            format!("sum(kubevirt_virt_operator_leading_status{{namespace='{namespace}'}})"),
            "The number of virt-operator pods that are leading.",
        ),
        RecordingRule::gauge(
            "kubevirt_virt_handler_up_total",
            format!("sum(up{{pod=~'virt-handler-.*', namespace='{namespace}'}}) or vector(0)"),
            "The number of virt-handler pods that are up.",
        ),
        RecordingRule::gauge(
            "kubevirt_vmi_memory_used_bytes",
            "kubevirt_vmi_memory_available_bytes-kubevirt_vmi_memory_usable_bytes".to_string(),
            "Amount of `used` memory as seen by the domain.",
        ),
        RecordingRule::gauge(
            "kubevirt_vm_container_free_memory_bytes_based_on_working_set_bytes",
            "sum by(pod, container) ( kube_pod_container_resource_requests{pod=~'virt-launcher-.*', container='compute', resource='memory'}- on(pod,container) container_memory_working_set_bytes{pod=~'virt-launcher-.*', container='compute'})".to_string(),
            "The current available memory of the VM containers based on the working set.",
        ),
        RecordingRule::gauge(
            "kubevirt_vm_container_free_memory_bytes_based_on_rss",
            "sum by(pod, container) ( kube_pod_container_resource_requests{pod=~'virt-launcher-.*', container='compute', resource='memory'}- on(pod,container) container_memory_rss{pod=~'virt-launcher-.*', container='compute'})".to_string(),
            "The current available memory of the VM containers based on the rss.",
        ),
    ]
}
