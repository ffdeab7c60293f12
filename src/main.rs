use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shopnexus_embed::{AppConfig, Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "shopnexus-embed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use deterministic hash-based vectors instead of the ONNX model
    #[arg(long, global = true)]
    mock_embeddings: bool,

    /// Database name (overrides MONGODB_DATABASE)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Collection name (overrides MONGODB_COLLECTION)
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Hugging Face model id (overrides EMBEDDING_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Defaults to `store` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut app = AppConfig::from_env()?;
    if let Some(database) = cli.database {
        app.database = database;
    }
    if let Some(collection) = cli.collection {
        app.collection = collection;
    }
    if let Some(model) = cli.model {
        app.model_id = model;
    }

    let command = cli.command.unwrap_or_default();
    info!("Running {:?} on {}.{}", command, app.database, app.collection);

    let container = Container::new(ContainerConfig {
        app,
        mock_embeddings: cli.mock_embeddings,
    });

    let router = Router::new(&container);
    router.route(command).await
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use shopnexus_embed::OutputFormat;

    #[test]
    fn no_subcommand_defaults_to_store() {
        let cli = Cli::try_parse_from(["shopnexus-embed"]).unwrap();
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Store {
                only_missing: false
            }
        ));
    }

    #[test]
    fn delete_is_an_explicit_subcommand() {
        let cli = Cli::try_parse_from(["shopnexus-embed", "delete"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete)));
    }

    #[test]
    fn store_accepts_only_missing_and_global_flags() {
        let cli = Cli::try_parse_from([
            "shopnexus-embed",
            "store",
            "--only-missing",
            "--mock-embeddings",
            "--collection",
            "staging_products",
        ])
        .unwrap();

        assert!(cli.mock_embeddings);
        assert_eq!(cli.collection.as_deref(), Some("staging_products"));
        assert!(matches!(
            cli.command,
            Some(Commands::Store { only_missing: true })
        ));
    }

    #[test]
    fn search_parses_options() {
        let cli = Cli::try_parse_from([
            "shopnexus-embed",
            "search",
            "red running shoes",
            "--num",
            "5",
            "--min-score",
            "0.7",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Search {
                query,
                num,
                min_score,
                candidates,
                format,
            }) => {
                assert_eq!(query, "red running shoes");
                assert_eq!(num, 5);
                assert_eq!(min_score, Some(0.7));
                assert_eq!(candidates, None);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let res = Cli::try_parse_from(["shopnexus-embed", "reindex"]);
        assert!(res.is_err());
    }
}
