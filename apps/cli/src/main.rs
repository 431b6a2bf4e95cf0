//! # shelfscan CLI
//!
//! Looks up Japanese book metadata by ISBN from the command line.
//!
//! ```bash
//! shelfscan lookup 9784873115658
//! shelfscan lookup 978-4-8399-7420-6 --json
//! shelfscan validate 4839974209 9784839974207
//! shelfscan cover --title "リーダブルコード" --author "Dustin Boswell"
//! ```
//!
//! Settings come from the environment (or a `.env` file), see `config.rs`.

mod commands;
mod config;
mod main_lib;

use clap::{ArgGroup, Parser, Subcommand};
use config::Config;
use main_lib::init_tracing;

#[derive(Parser)]
#[command(name = "shelfscan", version, about = "Resolve ISBNs to book metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an ISBN to a book record.
    Lookup {
        /// ISBN-10 or ISBN-13, hyphens allowed.
        isbn: String,

        /// Skip the in-memory cache.
        #[arg(long)]
        no_cache: bool,

        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check ISBN checksums.
    Validate {
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Find a cover image URL.
    #[command(group(ArgGroup::new("target").required(true).args(["isbn", "title"])))]
    Cover {
        #[arg(long)]
        isbn: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// Narrows a title search.
        #[arg(long, requires = "title")]
        author: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);

    match cli.command {
        Commands::Lookup {
            isbn,
            no_cache,
            json,
        } => commands::lookup(&config, &isbn, no_cache, json).await,
        Commands::Validate { codes } => commands::validate(&codes),
        Commands::Cover {
            isbn,
            title,
            author,
        } => {
            commands::cover(
                &config,
                isbn.as_deref(),
                title.as_deref(),
                author.as_deref(),
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cover_requires_a_target() {
        assert!(Cli::try_parse_from(["shelfscan", "cover"]).is_err());
        assert!(Cli::try_parse_from(["shelfscan", "cover", "--author", "x"]).is_err());
        assert!(Cli::try_parse_from(["shelfscan", "cover", "--isbn", "4839974209"]).is_ok());
    }

    #[test]
    fn test_lookup_flags() {
        let cli = Cli::try_parse_from(["shelfscan", "lookup", "9784873115658", "--no-cache"])
            .unwrap();
        match cli.command {
            Commands::Lookup {
                isbn,
                no_cache,
                json,
            } => {
                assert_eq!(isbn, "9784873115658");
                assert!(no_cache);
                assert!(!json);
            }
            _ => panic!("expected lookup"),
        }
    }
}
