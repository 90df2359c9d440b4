//! The merged, name-ordered set of documented metrics.

use metricdoc_common::MetricDescriptor;

/// Descriptors from every source, sorted by name.
///
/// Entries sharing a name are all kept. A catalog cannot be modified once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricCatalog {
    metrics: Vec<MetricDescriptor>,
}

impl MetricCatalog {
    /// Concatenate the parsed, static and rule-derived descriptors and sort by name.
    pub fn merge(
        parsed: Vec<MetricDescriptor>,
        registry: Vec<MetricDescriptor>,
        rules: Vec<MetricDescriptor>,
    ) -> Self {
        Self::from_sources([parsed, registry, rules])
    }

    /// Concatenate any number of sources and sort by name.
    pub fn from_sources(sources: impl IntoIterator<Item = Vec<MetricDescriptor>>) -> Self {
        let mut metrics: Vec<MetricDescriptor> = sources.into_iter().flatten().collect();
        metrics.sort_by(|a, b| a.name.cmp(&b.name));
        Self { metrics }
    }

    /// Number of descriptors, duplicates included.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> std::slice::Iter<'_, MetricDescriptor> {
        self.metrics.iter()
    }
}

impl<'a> IntoIterator for &'a MetricCatalog {
    type Item = &'a MetricDescriptor;
    type IntoIter = std::slice::Iter<'a, MetricDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.metrics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(name: &str) -> MetricDescriptor {
        MetricDescriptor::new(name, format!("{name} description."), "Gauge")
    }

    fn names(catalog: &MetricCatalog) -> Vec<&str> {
        catalog.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_merge_sorts_by_name() {
        let catalog = MetricCatalog::merge(
            vec![metric("kubevirt_vmi_b"), metric("kubevirt_vmi_a")],
            vec![metric("kubevirt_migrate_x")],
            vec![metric("kubevirt_virt_api_up_total")],
        );

        assert_eq!(
            names(&catalog),
            vec![
                "kubevirt_migrate_x",
                "kubevirt_virt_api_up_total",
                "kubevirt_vmi_a",
                "kubevirt_vmi_b",
            ]
        );
    }

    #[test]
    fn test_merge_size_is_sum_of_sources() {
        let catalog = MetricCatalog::merge(
            vec![metric("a1"), metric("a2"), metric("a3")],
            vec![metric("b1"), metric("b2")],
            vec![metric("c1")],
        );
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_duplicates_keep_source_order() {
        let catalog = MetricCatalog::merge(
            vec![MetricDescriptor::new("kubevirt_dup", "Scraped.", "Gauge")],
            vec![
                metric("kubevirt_a"),
                MetricDescriptor::new("kubevirt_dup", "Static.", "Gauge"),
            ],
            vec![MetricDescriptor::new("kubevirt_dup", "Rule.", "Gauge")],
        );

        assert_eq!(catalog.len(), 4);
        let descriptions: Vec<&str> = catalog
            .iter()
            .filter(|m| m.name == "kubevirt_dup")
            .map(|m| m.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Scraped.", "Static.", "Rule."]);
    }

    #[test]
    fn test_byte_order_sort() {
        let catalog = MetricCatalog::merge(
            vec![metric("kubevirt_vmi_z"), metric("kubevirt_VMI_a"), metric("kubevirt_vm")],
            vec![],
            vec![],
        );

        // Upper-case sorts before lower-case; a prefix sorts before its extensions.
        assert_eq!(
            names(&catalog),
            vec!["kubevirt_VMI_a", "kubevirt_vm", "kubevirt_vmi_z"]
        );
    }

    #[test]
    fn test_resorting_is_idempotent() {
        let first = MetricCatalog::merge(
            vec![metric("c"), metric("a")],
            vec![metric("b")],
            vec![metric("a")],
        );
        let flattened: Vec<MetricDescriptor> = first.iter().cloned().collect();
        let second = MetricCatalog::from_sources([flattened]);

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_sources() {
        let catalog = MetricCatalog::merge(vec![], vec![], vec![]);
        assert!(catalog.is_empty());
        assert_eq!(catalog.iter().count(), 0);
    }
}
