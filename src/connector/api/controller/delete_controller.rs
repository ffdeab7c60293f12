use anyhow::Result;

use super::super::Container;

pub struct DeleteController<'a> {
    container: &'a Container,
}

impl<'a> DeleteController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn delete(&self) -> Result<String> {
        let use_case = self.container.delete_use_case().await?;
        let modified = use_case.execute().await?;

        Ok(self.format_delete_success(modified))
    }

    fn format_delete_success(&self, modified: u64) -> String {
        format!(
            "Embeddings deleted successfully from {} products in {}.",
            modified,
            self.container.namespace()
        )
    }
}
