use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute embeddings for every product description and store them
    Store {
        /// Only embed products that have no embeddings yet
        #[arg(long)]
        only_missing: bool,
    },

    /// Remove the embeddings field from every product
    Delete,

    /// Count products with and without embeddings
    Status {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Find products similar to a query using Atlas vector search
    Search {
        query: String,

        #[arg(long, default_value = "10")]
        num: usize,

        #[arg(short, long)]
        min_score: Option<f32>,

        /// Candidates considered by the vector index before ranking
        #[arg(long)]
        candidates: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Store {
            only_missing: false,
        }
    }
}
