use anyhow::Result;

use crate::{EmbeddingStatus, OutputFormat};

use super::super::Container;

pub struct StatusController<'a> {
    container: &'a Container,
}

impl<'a> StatusController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn status(&self, format: OutputFormat) -> Result<String> {
        let use_case = self.container.status_use_case().await?;
        let status = use_case.execute().await?;

        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&status)?),
            OutputFormat::Text => Ok(self.format_status(&status)),
        }
    }

    fn format_status(&self, status: &EmbeddingStatus) -> String {
        format!(
            "Embedding Status ({})\n=====================\nProducts:  {}\nEmbedded:  {}\nMissing:   {}\nCoverage:  {:.1}%",
            self.container.namespace(),
            status.total,
            status.embedded,
            status.missing,
            status.coverage() * 100.0
        )
    }
}
