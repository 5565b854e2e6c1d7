//! CLI interface for dear-failure

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{self, Config};
use crate::letters::{LetterRepository, MemoryLetterRepository, SeedStore};
use crate::types::{Category, Letter};

#[derive(Parser)]
#[command(name = "dear-failure")]
#[command(about = "Anonymous letter archive: read and write letters to the failures that made you grow", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "DEAR_FAILURE_CONFIG")]
    config: Option<PathBuf>,

    /// Seed letters JSON file (defaults to the bundled letters)
    #[arg(long, global = true, env = "DEAR_FAILURE_SEED")]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default when no command given)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Path prefix to mount the site under (e.g. /dear-failure)
        #[arg(long)]
        base_path: Option<String>,
    },
    /// List letters from the archive
    Letters {
        /// Only letters in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Shuffle the letters
        #[arg(short, long)]
        shuffle: bool,
        /// Maximum letters to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the most recent letters
    Recent {
        /// Number of letters to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the available categories
    Categories,
    /// Show or reset configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Print the config file path
        #[arg(long)]
        path: bool,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_file = match &cli.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };

    let load = |seed: Option<PathBuf>| -> Result<Config> {
        let mut config = Config::load_from(&config_file)?;
        if let Some(seed) = seed {
            config.letters.seed_path = Some(seed);
        }
        Ok(config)
    };

    // Default to serving if no command given
    match cli.command {
        None => {
            serve(load(cli.seed)?, None, None, None).await?;
        }
        Some(Commands::Serve { port, host, base_path }) => {
            serve(load(cli.seed)?, port, host, base_path).await?;
        }
        Some(Commands::Letters { category, shuffle, limit, json }) => {
            let config = load(cli.seed)?;
            let repo = open_repository(config.letters.seed_path.as_deref())?;
            let mut letters = if shuffle {
                repo.sample_shuffled(limit.unwrap_or(config.letters.shuffle_limit))
            } else if let Some(category) = category.as_deref() {
                repo.list_by_category(category)
            } else {
                repo.list_all()
            };
            if let Some(limit) = limit {
                letters.truncate(limit);
            }
            print_letters(&letters, json)?;
        }
        Some(Commands::Recent { limit, json }) => {
            let config = load(cli.seed)?;
            let repo = open_repository(config.letters.seed_path.as_deref())?;
            let letters = repo.recent(limit.unwrap_or(config.letters.recent_limit));
            print_letters(&letters, json)?;
        }
        Some(Commands::Categories) => {
            for category in Category::ALL {
                println!("{}", category);
            }
        }
        Some(Commands::Config { show, path, reset }) => {
            if reset {
                config::reset_config(&config_file)?;
            } else if path {
                println!("{}", config_file.display());
            } else if show {
                config::show_config(&load(cli.seed)?);
            } else {
                println!("Configuration options:");
                println!("  --show    Display current configuration");
                println!("  --path    Print the config file path");
                println!("  --reset   Reset configuration to defaults");
            }
        }
    }

    Ok(())
}

async fn serve(
    mut config: Config,
    port: Option<u16>,
    host: Option<String>,
    base_path: Option<String>,
) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(base_path) = base_path {
        config.server.base_path = base_path;
    }

    let repo = open_repository(config.letters.seed_path.as_deref())?;
    crate::server::start(config, Arc::new(repo)).await
}

fn open_repository(seed_path: Option<&Path>) -> Result<MemoryLetterRepository> {
    let seed = SeedStore::load(seed_path)?;
    tracing::info!("Seed store ready with {} letters", seed.len());
    Ok(MemoryLetterRepository::new(seed))
}

fn print_letters(letters: &[Letter], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(letters)?);
        return Ok(());
    }

    if letters.is_empty() {
        println!("No letters found.");
        return Ok(());
    }

    for letter in letters {
        println!("─── {} ───", letter.id);
        println!("{}", letter.content);
        let mut meta = vec![crate::server::pages::format_date(&letter.created_at)];
        if let Some(category) = &letter.category {
            meta.push(category.clone());
        }
        if let Some(nickname) = &letter.nickname {
            meta.push(format!("by {}", nickname));
        }
        println!("  {}", meta.join(" · "));
        println!();
    }
    println!("{} letter(s)", letters.len());
    Ok(())
}
