use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::debug;

use file_tree_mirror::app::App;
use file_tree_mirror::config::{AppConfig, FilterConfig, GeneralConfig, TreeConfig};
use file_tree_mirror::error::{AppError, Result};
use file_tree_mirror::fs::sort::SortCriteria;
use file_tree_mirror::log_level::LogLevel;
use file_tree_mirror::render::{render_tree, RenderOptions};

/// Print a lazily loaded directory tree, optionally filtered by extension.
#[derive(Parser, Debug)]
#[command(name = "ftm", version, about)]
struct Cli {
    /// Root path to display (defaults to the configured path, then ".")
    path: Option<PathBuf>,

    /// Config file, read on top of the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sort order for directory children
    #[arg(short, long, value_enum)]
    sort: Option<SortCriteria>,

    /// Number of directory levels to load below the root
    #[arg(short, long)]
    depth: Option<usize>,

    /// Only show files with these extensions (".rs" or "rs")
    #[arg(short, long, num_args = 1..)]
    filter: Vec<String>,

    /// List the extensions found in the loaded tree and exit
    #[arg(long)]
    extensions: bool,

    /// Print an independent filtered copy instead of hiding nodes in place
    #[arg(long)]
    filtered: bool,

    /// Print the tree as JSON
    #[arg(long)]
    json: bool,

    /// Log level for stderr output
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

impl Cli {
    /// CLI flags as a partial config that overrides every file source.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: None,
                log_level: self
                    .log_level
                    .and_then(|l| l.to_possible_value())
                    .map(|v| v.get_name().to_string()),
            },
            tree: TreeConfig {
                sort_by: self.sort.map(|s| s.to_string()),
                expand_depth: self.depth,
            },
            filter: FilterConfig {
                extensions: if self.filter.is_empty() {
                    None
                } else {
                    Some(self.filter.clone())
                },
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    setup_tracing(config.log_level()?);
    debug!("Parsed CLI arguments: {cli:?}");

    let requested = cli
        .path
        .clone()
        .or_else(|| config.default_path().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = requested.canonicalize().map_err(|_| {
        AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;

    let mut app = App::new(&path, &config)?;

    if cli.extensions {
        for ext in app.extensions() {
            println!("{}", ext);
        }
        return Ok(());
    }

    let extensions: Vec<String> = config
        .filter_extensions()
        .iter()
        .map(|e| normalize_extension(e))
        .collect();

    let tree = if cli.filtered {
        app.filtered_tree(&extensions)
    } else {
        if !extensions.is_empty() {
            app.apply_filter(&extensions);
            app.sync_state();
        }
        app.tree().root_node().clone()
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", render_tree(&tree, RenderOptions::default()));
    }
    Ok(())
}

fn setup_tracing(level: LogLevel) {
    if let Some(level) = level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

/// Accept extensions with or without the leading dot.
fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
