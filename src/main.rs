use alcodash::catalog::{self, DefinitionSummary};
use alcodash::config::DashboardConfig;
use alcodash::dashboard::Dashboard;
use alcodash::data::{self, DataSource};
use alcodash::logging;
use alcodash::options::{self, Category};
use alcodash::session;
use alcodash::{OutputFormat, RenderOptions};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "alcodash")]
#[command(about = "Histograms and boxplots over the alcohol survey dataset", long_about = None)]
struct Args {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset source: http(s) URL, file path (.csv or .json), or '-' for stdin
    #[arg(long, global = true)]
    data: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the chart keys offered for a category
    Options {
        #[arg(value_enum)]
        category: Category,
        /// Print definitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render one chart
    Render {
        #[arg(long, value_enum, default_value_t = Category::Histogram)]
        category: Category,
        /// Chart key; unknown keys fall back to the category's first chart
        #[arg(long)]
        chart: Option<String>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Histogram bin count
        #[arg(long)]
        bins: Option<usize>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive command session on stdin
    Session,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(source) = args.data {
        config.data_source = source;
    }

    match args.command {
        Cmd::Options { category, json } => list_options(category, json),
        Cmd::Render {
            category,
            chart,
            format,
            width,
            height,
            bins,
            output,
        } => {
            let mut render = config.render.clone();
            if let Some(format) = format.or_else(|| output.as_deref().and_then(OutputFormat::from_path)) {
                render.format = format;
            }
            if let Some(width) = width {
                render.width = width;
            }
            if let Some(height) = height {
                render.height = height;
            }
            if let Some(bins) = bins {
                render.bins = bins;
            }

            let mut dashboard = open_dashboard(&config)?;
            dashboard.select_category(category);
            if let Some(key) = chart {
                // The render command is lenient: an unknown key is not an error.
                let resolved = options::resolve_key(category, &key);
                dashboard.select_chart(resolved)?;
            }
            let bytes = dashboard.export(&render)?;
            write_output(&bytes, output.as_deref())
        }
        Cmd::Session => {
            let source = config.source();
            if source == DataSource::Stdin {
                bail!("A session reads commands from stdin; load the dataset from a file or URL");
            }
            let mut dashboard = open_dashboard(&config)?;
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            session::run(&mut dashboard, &config.render, stdin.lock(), &mut out)?;
            out.flush().context("Failed to flush stdout")
        }
    }
}

fn open_dashboard(config: &DashboardConfig) -> Result<Dashboard> {
    let table = data::load(&config.source()).context("Failed to load dataset")?;
    Dashboard::new(Arc::new(table))
}

fn list_options(category: Category, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if json {
        let summaries: Vec<DefinitionSummary> = options::options_for(category)
            .iter()
            .filter_map(|key| catalog::find(key))
            .map(DefinitionSummary::from)
            .collect();
        serde_json::to_writer_pretty(&mut handle, &summaries)
            .context("Failed to serialize chart list")?;
        writeln!(handle)?;
    } else {
        for key in options::options_for(category) {
            writeln!(handle, "{}", key)?;
        }
    }
    handle.flush().context("Failed to flush stdout")
}

fn write_output(bytes: &[u8], path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "chart written");
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(bytes)
                .context("Failed to write chart to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}
