//! Metrics that exist in KubeVirt but are absent from the default scrape.
//!
//! Two sources live here: a hand-maintained list of metrics that only appear
//! on non-default code paths (active migrations, phase transitions, operator
//! leadership), and the recording rules evaluated by Prometheus.

use metricdoc_common::{MetricDescriptor, title_case};
use metricdoc_exposition::RecordingRule;
use metricdoc_exposition::collectors::{
    MIGRATE_VMI_DATA_PROCESSED_METRIC_NAME, MIGRATE_VMI_DATA_REMAINING_METRIC_NAME,
    MIGRATE_VMI_DIRTY_MEMORY_RATE_METRIC_NAME, MIGRATE_VMI_DISK_TRANSFER_RATE_METRIC_NAME,
    MIGRATE_VMI_MEMORY_TRANSFER_RATE_METRIC_NAME,
};

// (name, description, type). Update by hand when a metric is added to one of
// the non-default code paths.
const NOT_IN_DEFAULT_EXPOSITION: &[(&str, &str, &str)] = &[
    (
        MIGRATE_VMI_DATA_PROCESSED_METRIC_NAME,
        "The total Guest OS data processed and migrated to the new VM.",
        "Gauge",
    ),
    (
        MIGRATE_VMI_DATA_REMAINING_METRIC_NAME,
        "The remaining guest OS data to be migrated to the new VM.",
        "Gauge",
    ),
    (
        MIGRATE_VMI_DIRTY_MEMORY_RATE_METRIC_NAME,
        "The rate of memory being dirty in the Guest OS.",
        "Gauge",
    ),
    (
        MIGRATE_VMI_MEMORY_TRANSFER_RATE_METRIC_NAME,
        "The rate at which the memory is being transferred.",
        "Gauge",
    ),
    (
        MIGRATE_VMI_DISK_TRANSFER_RATE_METRIC_NAME,
        "The rate at which the disk is being transferred.",
        "Gauge",
    ),
    (
        "kubevirt_vmi_phase_count",
        "Sum of VMIs per phase and node. `phase` can be one of the following: [`Pending`, `Scheduling`, `Scheduled`, `Running`, `Succeeded`, `Failed`, `Unknown`].",
        "Gauge",
    ),
    (
        "kubevirt_vmi_non_evictable",
        "Indication for a VirtualMachine that its eviction strategy is set to Live Migration but is not migratable.",
        "Gauge",
    ),
    (
        "kubevirt_vmi_migration_phase_transition_time_from_creation_seconds",
        "Histogram of VM migration phase transitions duration from creation time in seconds.",
        "Histogram",
    ),
    (
        "kubevirt_vmi_phase_transition_time_seconds",
        "Histogram of VM phase transitions duration between different phases in seconds.",
        "Histogram",
    ),
    (
        "kubevirt_vmi_phase_transition_time_from_creation_seconds",
        "Histogram of VM phase transitions duration from creation time in seconds.",
        "Histogram",
    ),
    (
        "kubevirt_vmi_phase_transition_time_from_deletion_seconds",
        "Histogram of VM phase transitions duration from deletion time in seconds.",
        "Histogram",
    ),
    (
        "kubevirt_virt_operator_leading_status",
        "Indication for an operating virt-operator.",
        "Gauge",
    ),
    (
        "kubevirt_virt_operator_ready_status",
        "Indication for a virt-operator that is ready to take the lead.",
        "Gauge",
    ),
];

/// Metrics registered only on non-default code paths.
pub fn metrics_not_in_default_exposition() -> Vec<MetricDescriptor> {
    NOT_IN_DEFAULT_EXPOSITION
        .iter()
        .map(|(name, description, value_type)| {
            MetricDescriptor::new(*name, *description, *value_type)
        })
        .collect()
}

/// Convert recording rules to descriptors, title-casing the rule type.
pub fn recording_rule_metrics(rules: &[RecordingRule]) -> Vec<MetricDescriptor> {
    rules
        .iter()
        .map(|rule| {
            MetricDescriptor::new(
                rule.record.as_str(),
                rule.description.as_str(),
                title_case(rule.metric_type.as_str()),
            )
        })
        .collect()
}
