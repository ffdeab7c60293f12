use serde::Serialize;

use super::ProductId;

/// Outcome of one `store` run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    total: u64,
    embedded: u64,
    skipped: Vec<ProductId>,
    failed: Vec<ProductId>,
}

impl SyncReport {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_embedded(&mut self) {
        self.embedded += 1;
    }

    pub fn record_skipped(&mut self, id: ProductId) {
        self.skipped.push(id);
    }

    pub fn record_failed(&mut self, id: ProductId) {
        self.failed.push(id);
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn embedded(&self) -> u64 {
        self.embedded
    }

    pub fn skipped(&self) -> &[ProductId] {
        &self.skipped
    }

    pub fn failed(&self) -> &[ProductId] {
        &self.failed
    }

    /// Documents visited so far.
    pub fn processed(&self) -> u64 {
        self.embedded + self.skipped.len() as u64 + self.failed.len() as u64
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Embedding coverage of the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddingStatus {
    pub total: u64,
    pub embedded: u64,
    pub missing: u64,
}

impl EmbeddingStatus {
    pub fn new(total: u64, embedded: u64, missing: u64) -> Self {
        Self {
            total,
            embedded,
            missing,
        }
    }

    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.embedded as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = SyncReport::new(4);
        report.record_embedded();
        report.record_embedded();
        report.record_skipped(ProductId::Int(3));
        report.record_failed(ProductId::Int(4));

        assert_eq!(report.total(), 4);
        assert_eq!(report.embedded(), 2);
        assert_eq!(report.processed(), 4);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_coverage_of_empty_collection() {
        assert_eq!(EmbeddingStatus::default().coverage(), 0.0);
        assert_eq!(EmbeddingStatus::new(4, 1, 3).coverage(), 0.25);
    }

    #[test]
    fn test_status_serializes_for_json_output() {
        let json = serde_json::to_string(&EmbeddingStatus::new(4, 1, 3)).unwrap();
        assert_eq!(json, r#"{"total":4,"embedded":1,"missing":3}"#);
    }
}
