use anyhow::Result;
use bubblemap_core::{CategoryFilter, ChartKind, SortKey};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::CliError;

#[derive(Parser)]
#[command(name = "bubblemap")]
#[command(about = "Bubblemap - bubble-chart extraction and label layout")]
#[command(version)]
#[command(long_about = "
Bubblemap reads a spreadsheet export (a JSON grid of cells), extracts the
chart records it holds and computes bubble sizes, overlaps and label positions.

Examples:
  bubblemap extract --input grid.json --kind affinity-map --output points.json
  bubblemap layout --input grid.json --kind media-box --category online --output layout.json
  bubblemap layout --input grid.json --top-n 10 --sort-by y --offsets offsets.json
  bubblemap config --example > bubblemap.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract chart records from a spreadsheet grid
    Extract {
        /// Input grid file (JSON array of rows)
        #[arg(short, long)]
        input: PathBuf,

        /// Spreadsheet layout (defaults to the configured kind)
        #[arg(short, long)]
        kind: Option<KindArg>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract records and compute the full chart layout
    Layout {
        /// Input grid file (JSON array of rows)
        #[arg(short, long)]
        input: PathBuf,

        /// Spreadsheet layout (defaults to the configured kind)
        #[arg(short, long)]
        kind: Option<KindArg>,

        /// Hide a point by name (repeatable)
        #[arg(long)]
        hide: Vec<String>,

        /// Show only one media category
        #[arg(long, default_value = "all")]
        category: CategoryArg,

        /// Keep only the N largest points
        #[arg(long)]
        top_n: Option<usize>,

        /// Axis used by --top-n
        #[arg(long, default_value = "x")]
        sort_by: SortArg,

        /// Highlight a point by name
        #[arg(long)]
        highlight: Option<String>,

        /// Draw a horizontal affinity line at this value
        #[arg(long)]
        affinity_line: Option<f64>,

        /// Manual label offsets saved from an earlier session (JSON)
        #[arg(long)]
        offsets: Option<PathBuf>,

        /// Viewport width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height in pixels
        #[arg(long)]
        height: Option<f64>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or generate configuration
    Config {
        /// Print the built-in defaults instead of the loaded configuration
        #[arg(long)]
        example: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    MediaBox,
    AffinityMap,
}

impl From<KindArg> for ChartKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::MediaBox => ChartKind::MediaBox,
            KindArg::AffinityMap => ChartKind::AffinityMap,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CategoryArg {
    All,
    Online,
    Offline,
}

impl From<CategoryArg> for CategoryFilter {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::All => CategoryFilter::All,
            CategoryArg::Online => CategoryFilter::Online,
            CategoryArg::Offline => CategoryFilter::Offline,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SortArg {
    X,
    Y,
}

impl From<SortArg> for SortKey {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::X => SortKey::X,
            SortArg::Y => SortKey::Y,
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let kind_or_default = |kind: Option<KindArg>| kind.map(ChartKind::from).unwrap_or(config.general.default_kind);

    match cli.command {
        Commands::Extract { input, kind, output } => {
            commands::extract::execute(&config, input, kind_or_default(kind), output)
        }

        Commands::Layout {
            input,
            kind,
            hide,
            category,
            top_n,
            sort_by,
            highlight,
            affinity_line,
            offsets,
            width,
            height,
            output,
        } => {
            let options = commands::layout::LayoutArgs {
                hide,
                category: category.into(),
                top_n,
                sort_by: sort_by.into(),
                highlight,
                affinity_line,
                offsets,
                width,
                height,
            };
            commands::layout::execute(&config, input, kind_or_default(kind), options, output)
        }

        Commands::Config { example, output } => commands::config::execute(&config, example, output),
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => error::print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
