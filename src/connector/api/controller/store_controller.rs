use anyhow::Result;

use crate::{ProductId, StoreOptions, SyncReport};

use super::super::Container;

pub struct StoreController<'a> {
    container: &'a Container,
}

impl<'a> StoreController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn store(&self, only_missing: bool) -> Result<String> {
        let use_case = self.container.store_use_case().await?;
        let report = use_case.execute(StoreOptions { only_missing }).await?;

        Ok(format_report(&self.container.namespace(), &report))
    }
}

fn format_report(namespace: &str, report: &SyncReport) -> String {
    let mut output = format!(
        "Embedded {}/{} products in {}",
        report.embedded(),
        report.total(),
        namespace
    );

    if !report.skipped().is_empty() {
        output.push_str(&format!(
            "\nSkipped (no description): {}",
            join_ids(report.skipped())
        ));
    }

    if !report.failed().is_empty() {
        output.push_str(&format!(
            "\nFailed to embed: {}",
            join_ids(report.failed())
        ));
    }

    output
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_when_every_product_failed() {
        let mut report = SyncReport::new(2);
        report.record_failed(ProductId::Int(1));
        report.record_failed(ProductId::Int(2));

        let output = format_report("shopnexus.products", &report);

        assert!(output.starts_with("Embedded 0/2 products in shopnexus.products"));
        assert!(output.contains("Failed to embed: 1, 2"));
        assert!(!output.contains("successfully"));
    }

    #[test]
    fn test_report_lists_skipped_products() {
        let mut report = SyncReport::new(3);
        report.record_embedded();
        report.record_embedded();
        report.record_skipped(ProductId::from("no-text"));

        let output = format_report("shopnexus.products", &report);

        assert_eq!(
            output,
            "Embedded 2/3 products in shopnexus.products\nSkipped (no description): \"no-text\""
        );
    }
}
