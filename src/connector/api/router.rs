use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{DeleteController, SearchController, StatusController, StoreController};

pub struct Router<'a> {
    store_controller: StoreController<'a>,
    delete_controller: DeleteController<'a>,
    status_controller: StatusController<'a>,
    search_controller: SearchController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            store_controller: StoreController::new(container),
            delete_controller: DeleteController::new(container),
            status_controller: StatusController::new(container),
            search_controller: SearchController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Store { only_missing } => self.store_controller.store(only_missing).await,
            Commands::Delete => self.delete_controller.delete().await,
            Commands::Status { format } => self.status_controller.status(format).await,
            Commands::Search {
                query,
                num,
                min_score,
                candidates,
                format,
            } => {
                self.search_controller
                    .search(query, num, min_score, candidates, format)
                    .await
            }
        }
    }
}
