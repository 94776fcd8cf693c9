use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use novelscope::config::Config;
use novelscope::pipeline;

/// Novelscope: word frequency and theme analysis for classic novels.
///
/// Downloads books from Project Gutenberg, tokenizes them, and writes
/// frequency, topic and comparison reports under the data directory.
#[derive(Parser)]
#[command(name = "novelscope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download books from Project Gutenberg
    Download {
        /// Gutenberg book IDs (e.g. 1342 for Pride and Prejudice)
        #[arg(long, num_args = 1.., required = true)]
        book_ids: Vec<u32>,
    },

    /// Clean and tokenize downloaded books
    Preprocess,

    /// Word frequency reports per book and across the corpus
    Analyze,

    /// Discover topics shared across books
    Themes,

    /// Compare books: similarity, distinctive words, rank correlation
    Compare,

    /// Run the whole pipeline
    All {
        /// Download these books first
        #[arg(long, num_args = 1..)]
        book_ids: Vec<u32>,
    },

    /// Show data directory status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("novelscope=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    info!(data_dir = %config.data_dir.display(), "Configuration loaded");

    match cli.command {
        Commands::Download { book_ids } => {
            let books = pipeline::download::run(&config, &book_ids).await?;
            println!("Downloaded {} of {} books:", books.len(), book_ids.len());
            for book in &books {
                println!("  - {} {}", book.id, book.title.bold());
            }
        }

        Commands::Preprocess => {
            let books = pipeline::preprocess::run(&config, &config.tokenizer())?;
            println!("Preprocessed {} books.", books.len());
        }

        Commands::Analyze => {
            pipeline::analyze::run(&config)?;
            print_results_location(&config);
        }

        Commands::Themes => {
            let analyzer = pipeline::load_processed(&config.processed_dir())?;
            pipeline::themes::run(&config, &analyzer)?;
            print_results_location(&config);
        }

        Commands::Compare => {
            let analyzer = pipeline::load_processed(&config.processed_dir())?;
            pipeline::compare::run(&config, &analyzer)?;
            print_results_location(&config);
        }

        Commands::All { book_ids } => {
            if !book_ids.is_empty() {
                pipeline::download::run(&config, &book_ids).await?;
            }
            pipeline::preprocess::run(&config, &config.tokenizer())?;
            let analyzer = pipeline::analyze::run(&config)?;
            pipeline::themes::run(&config, &analyzer)?;
            pipeline::compare::run(&config, &analyzer)?;
            print_results_location(&config);
        }

        Commands::Status => {
            novelscope::status::show(&config)?;
        }
    }

    Ok(())
}

fn print_results_location(config: &Config) {
    println!(
        "\n{}",
        format!("Results written to {}", config.results_dir().display()).dimmed()
    );
}
