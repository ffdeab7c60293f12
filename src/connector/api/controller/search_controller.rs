use anyhow::Result;

use crate::{OutputFormat, ProductMatch, ProductSearchQuery};

use super::super::Container;

pub struct SearchController<'a> {
    container: &'a Container,
}

impl<'a> SearchController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn search(
        &self,
        query: String,
        num: usize,
        min_score: Option<f32>,
        candidates: Option<usize>,
        format: OutputFormat,
    ) -> Result<String> {
        let mut search_query = ProductSearchQuery::new(query)
            .with_limit(num)
            .with_index(self.container.vector_index());

        if let Some(score) = min_score {
            search_query = search_query.with_min_score(score);
        }

        if let Some(candidates) = candidates {
            search_query = search_query.with_num_candidates(candidates);
        }

        let use_case = self.container.search_use_case().await?;
        let results = use_case.execute(search_query).await?;

        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&results)?),
            OutputFormat::Text => Ok(self.format_search_results(&results)),
        }
    }

    fn format_search_results(&self, results: &[ProductMatch]) -> String {
        if results.is_empty() {
            return "No results found.".to_string();
        }

        let mut output = format!("Found {} products:\n\n", results.len());

        for (i, result) in results.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, result.display_line()));

            if let Some(description) = result.description() {
                let preview: String = description.chars().take(160).collect();
                output.push_str(&format!("   | {}\n", preview));
            }
        }

        output
    }
}
