mod commands;
pub mod config;

use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::Subcommand;
use config::CatalogConfig;
use std::path::PathBuf;

/// Hybrid semantic + textual search over a document catalog
#[derive(Debug, Parser)]
#[command(name = "catalog", version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH", env = "CATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Load documents from a JSON manifest
    Ingest(IngestArgs),

    /// Search the catalog
    Search(SearchArgs),

    /// List categories
    Categories,
}

#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON array of {title, summary, link, category, keywords}
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Rebuild the vector index from every stored document
    #[arg(long)]
    pub reindex: bool,
}

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Number of results to return (defaults to retrieval.default_limit)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = CatalogConfig::load(self.config.as_deref())?;
        match self.command {
            Command::Serve => commands::run_serve(&config).await,
            Command::Ingest(args) => {
                if args.manifest.is_none() && !args.reindex {
                    bail!("nothing to do: pass a MANIFEST, --reindex, or both");
                }
                commands::run_ingest(&config, args.manifest.as_deref(), args.reindex).await
            }
            Command::Search(args) => {
                let limit = args.limit.unwrap_or(config.retrieval.default_limit);
                commands::run_search(&config, &args.query, limit).await
            }
            Command::Categories => commands::run_categories(&config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["catalog", "search", "brown fox", "-n", "5"]).unwrap();
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "brown fox");
                assert_eq!(args.limit, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_ingest_with_global_config() {
        let cli = Cli::try_parse_from([
            "catalog",
            "ingest",
            "catalog.json",
            "--reindex",
            "--config",
            "catalog.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("catalog.toml")));
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.manifest, Some(PathBuf::from("catalog.json")));
                assert!(args.reindex);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["catalog", "search"]).is_err());
    }
}
