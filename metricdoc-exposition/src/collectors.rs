//! Fake collectors populating the exposition endpoint with representative samples.
//!
//! Each collector contributes the metric families a live component would expose.
//! Which collectors run is decided by the caller through [`CollectorsConfig`];
//! nothing registers itself implicitly.

use tracing::info;

use crate::collector::{MetricCollector, MetricFamily};
use crate::config::CollectorsConfig;
use crate::error::ExpositionError;

/// Guest OS data processed during an active migration.
pub const MIGRATE_VMI_DATA_PROCESSED_METRIC_NAME: &str = "kubevirt_migrate_vmi_data_processed_bytes";
/// Guest OS data left to migrate.
pub const MIGRATE_VMI_DATA_REMAINING_METRIC_NAME: &str = "kubevirt_migrate_vmi_data_remaining_bytes";
/// Rate at which guest memory gets dirty during migration.
pub const MIGRATE_VMI_DIRTY_MEMORY_RATE_METRIC_NAME: &str =
    "kubevirt_migrate_vmi_dirty_memory_rate_bytes";
/// Memory transfer rate during migration.
pub const MIGRATE_VMI_MEMORY_TRANSFER_RATE_METRIC_NAME: &str =
    "kubevirt_migrate_vmi_memory_transfer_rate_bytes";
/// Disk transfer rate during migration.
pub const MIGRATE_VMI_DISK_TRANSFER_RATE_METRIC_NAME: &str =
    "kubevirt_migrate_vmi_disk_transfer_rate_bytes";

const VMI_LABELS: &[(&str, &str)] = &[
    ("node", "node01"),
    ("namespace", "default"),
    ("name", "testvmi"),
];

/// Per-domain statistics reported by virt-handler.
pub fn domain_stats_families() -> Vec<MetricFamily> {
    vec![
        MetricFamily::gauge(
            "kubevirt_vmi_memory_resident_bytes",
            "resident set size of the process running the domain.",
        )
        .with_sample(VMI_LABELS, 1_048_576.0),
        MetricFamily::gauge(
            "kubevirt_vmi_memory_available_bytes",
            "amount of usable memory as seen by the domain. This value may not be accurate if a balloon driver is in use or if the guest OS does not initialize all assigned pages",
        )
        .with_sample(VMI_LABELS, 4_294_967_296.0),
        MetricFamily::gauge(
            "kubevirt_vmi_memory_domain_bytes_total",
            "the amount of memory in bytes allocated to the domain. The `memory` value in domain xml file",
        )
        .with_sample(VMI_LABELS, 4_294_967_296.0),
        MetricFamily::counter(
            "kubevirt_vmi_memory_swap_in_traffic_bytes_total",
            "the total amount of data read from swap space of the guest in bytes.",
        )
        .with_sample(VMI_LABELS, 0.0),
        MetricFamily::counter(
            "kubevirt_vmi_memory_swap_out_traffic_bytes_total",
            "the total amount of memory written out to swap space of the guest in bytes.",
        )
        .with_sample(VMI_LABELS, 0.0),
        MetricFamily::counter(
            "kubevirt_vmi_network_receive_bytes_total",
            "Total network traffic received in bytes.",
        )
        .with_sample(&[("name", "testvmi"), ("interface", "vnet0")], 2048.0),
        MetricFamily::counter(
            "kubevirt_vmi_network_transmit_bytes_total",
            "Total network traffic transmitted in bytes.",
        )
        .with_sample(&[("name", "testvmi"), ("interface", "vnet0")], 1024.0),
        MetricFamily::counter(
            "kubevirt_vmi_storage_iops_read_total",
            "I/O read operations.",
        )
        .with_sample(&[("name", "testvmi"), ("drive", "vda")], 30.0),
        MetricFamily::counter(
            "kubevirt_vmi_storage_iops_write_total",
            "I/O write operations.",
        )
        .with_sample(&[("name", "testvmi"), ("drive", "vda")], 12.0),
        MetricFamily::counter(
            "kubevirt_vmi_storage_read_traffic_bytes_total",
            "Storage read traffic in bytes.",
        )
        .with_sample(&[("name", "testvmi"), ("drive", "vda")], 65_536.0),
        MetricFamily::counter(
            "kubevirt_vmi_vcpu_seconds",
            "Vcpu elapsed time.",
        )
        .with_sample(&[("name", "testvmi"), ("id", "0"), ("state", "running")], 12.5),
    ]
}

/// VirtualMachine status metrics reported by virt-controller.
pub fn vm_families() -> Vec<MetricFamily> {
    vec![
        MetricFamily::counter(
            "kubevirt_vm_error_status_last_transition_timestamp_seconds",
            "Virtual Machine last transition timestamp to error status.",
        )
        .with_sample(&[("name", "testvm"), ("namespace", "default")], 0.0),
        MetricFamily::counter(
            "kubevirt_vm_migrating_status_last_transition_timestamp_seconds",
            "Virtual Machine last transition timestamp to migrating status.",
        )
        .with_sample(&[("name", "testvm"), ("namespace", "default")], 0.0),
        MetricFamily::counter(
            "kubevirt_vm_non_running_status_last_transition_timestamp_seconds",
            "Virtual Machine last transition timestamp to paused/stopped status.",
        )
        .with_sample(&[("name", "testvm"), ("namespace", "default")], 0.0),
        MetricFamily::counter(
            "kubevirt_vm_running_status_last_transition_timestamp_seconds",
            "Virtual Machine last transition timestamp to running status.",
        )
        .with_sample(&[("name", "testvm"), ("namespace", "default")], 1_700_000_000.0),
        MetricFamily::counter(
            "kubevirt_vm_starting_status_last_transition_timestamp_seconds",
            "Virtual Machine last transition timestamp to starting status.",
        )
        .with_sample(&[("name", "testvm"), ("namespace", "default")], 1_699_999_990.0),
    ]
}

/// Migration counters reported by virt-controller.
pub fn migration_families() -> Vec<MetricFamily> {
    vec![
        MetricFamily::gauge(
            "kubevirt_migrate_vmi_pending_count",
            "Number of current pending migrations.",
        )
        .with_sample(&[], 0.0),
        MetricFamily::gauge(
            "kubevirt_migrate_vmi_running_count",
            "Number of current running migrations.",
        )
        .with_sample(&[], 1.0),
        MetricFamily::gauge(
            "kubevirt_migrate_vmi_scheduling_count",
            "Number of current scheduling migrations.",
        )
        .with_sample(&[], 0.0),
        MetricFamily::counter(
            "kubevirt_migrate_vmi_failed",
            "Indicates if the VMI migration failed.",
        )
        .with_sample(&[("vmi", "testvmi")], 0.0),
        MetricFamily::counter(
            "kubevirt_migrate_vmi_succeeded",
            "Indicates if the VMI migration succeeded.",
        )
        .with_sample(&[("vmi", "testvmi")], 1.0),
    ]
}

/// Process and runtime metrics exposed by the client library.
///
/// These share the endpoint but are not part of the documented surface.
pub fn process_families() -> Vec<MetricFamily> {
    vec![
        MetricFamily::counter(
            "process_cpu_seconds_total",
            "Total user and system CPU time spent in seconds.",
        )
        .with_sample(&[], 1.27),
        MetricFamily::gauge(
            "process_resident_memory_bytes",
            "Resident memory size in bytes.",
        )
        .with_sample(&[], 48_234_496.0),
        MetricFamily::gauge("process_open_fds", "Number of open file descriptors.")
            .with_sample(&[], 17.0),
        MetricFamily::histogram(
            "rest_client_request_duration_seconds",
            "Request latency in seconds. Broken down by verb and URL.",
        )
        .with_histogram(&[("verb", "GET")], &[(0.005, 3), (0.1, 10), (1.0, 12)], 0.42),
    ]
}

/// Register every enabled collector on `collector`.
pub fn register_collectors(
    collector: &MetricCollector,
    config: &CollectorsConfig,
) -> Result<(), ExpositionError> {
    let enabled: [(&str, bool, fn() -> Vec<MetricFamily>); 4] = [
        ("domain", config.domain, domain_stats_families),
        ("vm", config.vm, vm_families),
        ("migrations", config.migrations, migration_families),
        ("process", config.process, process_families),
    ];

    for (name, on, families) in enabled {
        if !on {
            info!(collector = name, "Collector disabled");
            continue;
        }
        let families = families();
        info!(collector = name, families = families.len(), "Registering collector");
        collector.register_all(families)?;
    }

    Ok(())
}
