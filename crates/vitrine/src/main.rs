//! Vitrine CLI - prerender the agency site into static documents.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Prerender the multilingual agency site into static HTML")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a site in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Prerender every route into the output directory
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip CSS minification
        #[arg(long)]
        no_minify: bool,

        /// Keep building after a route fails (the build still fails)
        #[arg(long)]
        keep_going: bool,

        /// Write the per-route build report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Preview the prerendered site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build {
            output,
            no_minify,
            keep_going,
            report,
        } => {
            let options = commands::build::BuildOptions {
                output,
                minify: if no_minify { Some(false) } else { None },
                keep_going,
                report,
            };
            commands::build::run(&cli.config, options).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
    }

    Ok(())
}
