//! Gist Inliner CLI - inline gist shortcodes in markdown posts

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use gist_inliner::interface::Context;
use gist_inliner::WritePolicy;

#[derive(Parser)]
#[command(name = "gist-inliner")]
#[command(author, version, about = "Inline gist shortcodes in markdown posts", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language tag for inlined code blocks (overrides config file)
    #[arg(short, long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace gist shortcodes with the fetched code
    Inline {
        /// Dry run - show what would be fetched without doing it
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Suppress normal output
        #[arg(short, long)]
        quiet: bool,

        /// Number of files processed at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// When converted files are written (overrides config file)
        #[arg(short, long, value_enum)]
        write_policy: Option<WritePolicy>,

        /// Only process source files matching these glob patterns
        #[arg(short, long, value_name = "PATTERN")]
        glob: Vec<String>,

        /// Specific files to process
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// List gist shortcodes without fetching anything
    List {
        /// Also list files without shortcodes
        #[arg(short, long)]
        verbose: bool,
    },

    /// Watch for changes and inline automatically
    Watch {
        /// Debounce delay in milliseconds (0 uses the config file value)
        #[arg(short, long, default_value = "0")]
        debounce: u64,
    },

    /// Print the effective configuration
    Config,

    /// Create a default gist-inliner.toml
    Init,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Determine working directory
    let base_dir = cli
        .directory
        .map(|d| std::fs::canonicalize(&d).unwrap_or(d))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    if let Commands::Init = cli.command {
        return finish(commands::init(&base_dir));
    }

    // Read configuration from file or use defaults
    let config = match cli.config {
        Some(ref path) => gist_inliner::config::read_config_file(path),
        None => gist_inliner::config::read_config(&base_dir),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Override language if specified on command line
    if let Some(language) = cli.language {
        config.language = language;
    }

    // Create context
    let mut ctx = match Context::new(config, base_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Inline {
            dry_run,
            quiet,
            jobs,
            write_policy,
            glob,
            files,
        } => {
            let options = commands::InlineOptions {
                dry_run,
                quiet,
                jobs,
                write_policy,
                glob,
                files,
            };
            commands::inline(&mut ctx, options)
        }

        Commands::List { verbose } => {
            let options = commands::ListOptions { verbose };
            commands::list(&ctx, options)
        }

        Commands::Watch { debounce } => {
            let options = commands::WatchOptions {
                debounce_ms: debounce,
            };
            commands::watch(&ctx, options)
        }

        Commands::Config => commands::config(&ctx),

        Commands::Init => unreachable!("handled before configuration is loaded"),
    };

    finish(result)
}

fn finish(result: gist_inliner::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
