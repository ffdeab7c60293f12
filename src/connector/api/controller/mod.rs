pub mod delete_controller;
pub mod search_controller;
pub mod status_controller;
pub mod store_controller;

pub use delete_controller::DeleteController;
pub use search_controller::SearchController;
pub use status_controller::StatusController;
pub use store_controller::StoreController;
