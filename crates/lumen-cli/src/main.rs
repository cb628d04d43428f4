use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lumen_core::{AppConfig, Page, Site};

mod commands;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Terminal preview of the Lumen site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the site in the terminal (default)
    Run {
        /// Page to open: home, industries, login (or its route)
        #[arg(short, long, default_value = "home")]
        page: Page,
        /// TOML file overriding the built-in site content
        #[arg(long)]
        site: Option<PathBuf>,
    },
    /// List pages with their metadata
    Pages {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// TOML file overriding the built-in site content
        #[arg(long)]
        site: Option<PathBuf>,
    },
    /// Print the typewriter timeline for a text
    Type {
        text: String,
        /// Milliseconds between characters (negative counts as 0)
        #[arg(long, allow_negative_numbers = true)]
        speed: Option<i64>,
        /// Milliseconds before the first character (negative counts as 0)
        #[arg(long, allow_negative_numbers = true)]
        delay: Option<i64>,
        /// Animate on stdout in real time
        #[arg(long)]
        live: bool,
    },
    /// Show the configuration file and effective settings
    Config {
        /// Write the default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    match cli.command {
        Some(Commands::Run { page, site }) => {
            let _guard = init_file_logging(&config)?;
            let site = load_site(site.as_deref())?;
            commands::run::run(config, site, page)
        }
        None => {
            let _guard = init_file_logging(&config)?;
            commands::run::run(config, Site::builtin(), Page::Home)
        }
        Some(Commands::Pages { json, site }) => {
            init_stderr_logging(&config);
            let site = load_site(site.as_deref())?;
            commands::pages::run(&site, json)
        }
        Some(Commands::Type {
            text,
            speed,
            delay,
            live,
        }) => {
            init_stderr_logging(&config);
            let typing = &config.animation.typewriter;
            let options = lumen_core::TypewriterOptions::from_millis(
                speed.unwrap_or(typing.speed_ms),
                delay.unwrap_or(typing.delay_ms),
            );
            if live {
                commands::type_text::live(&text, options).await
            } else {
                commands::type_text::run(&text, options)
            }
        }
        Some(Commands::Config { init }) => {
            init_stderr_logging(&config);
            commands::config::run(&config, init)
        }
    }
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()))
}

/// Log to stderr for one-shot commands
fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Log to `<data_dir>/lumen.log` so the alternate screen stays clean
fn init_file_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let log_path = config.log_path();
    let dir = log_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data_dir());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let file_name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "lumen.log".into());

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(guard)
}

fn load_site(path: Option<&Path>) -> Result<Site> {
    match path {
        Some(path) => Site::load(path)
            .with_context(|| format!("loading site content from {}", path.display())),
        None => Ok(Site::builtin()),
    }
}
