mod embedding;
mod product;
mod search_result;
mod sync_report;

pub use embedding::*;
pub use product::*;
pub use search_result::*;
pub use sync_report::*;
