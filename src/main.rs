use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hiscore::corpus;
use hiscore::output::{self, ColorMode};
use hiscore::query::QuerySet;
use hiscore::report;
use hiscore::runner::{self, RunOptions};
use hiscore::utils::app_data::{AppConfig, DEFAULT_REPORT_FLAGS, ReportFlags};
use hiscore::utils::logging;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hiscore")]
#[command(about = "Score and filter text documents with Histogram Query Language expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log progress information to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// When to color terminal output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,
}

/// Documents to process; at least one of the two is required
#[derive(Args)]
#[group(required = true, multiple = true)]
struct InputArgs {
    /// A single document
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Recursively process every matching document in a directory
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score documents against a query file and write reports
    Score {
        /// Query file with one HQL expression per line
        #[arg(short, long)]
        query: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Reports to write ("summary", "reports", "explain", "histograms")
        #[arg(short, long, default_value = DEFAULT_REPORT_FLAGS)]
        config: String,

        /// File name pattern for --dir (overrides the configured one)
        #[arg(long)]
        include: Option<String>,

        /// Worker threads (0 = one per core)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
    /// Print the documents matching a single HQL expression
    Search {
        /// HQL expression
        expression: String,

        #[command(flatten)]
        input: InputArgs,

        /// File name pattern for --dir (overrides the configured one)
        #[arg(long)]
        include: Option<String>,
    },
    /// Compile a query file and list its expressions
    Check {
        /// Query file with one HQL expression per line
        query: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(cli.verbose);

    let mut config = AppConfig::load()?;

    match cli.command {
        Commands::Score {
            query,
            input,
            config: flags,
            include,
            threads,
            quiet,
        } => {
            if let Some(include) = include {
                config.include = include;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            let flags = ReportFlags::parse(&flags);
            run_score(&query, &input, flags, &config, quiet, cli.color)?;
        }
        Commands::Search {
            expression,
            input,
            include,
        } => {
            if let Some(include) = include {
                config.include = include;
            }
            run_search(&expression, &input, &config, cli.color)?;
        }
        Commands::Check { query } => {
            let set = QuerySet::from_file(&query)?;
            let mut out = output::stdout(cli.color);
            output::write_query_set(&mut out, &set)?;
        }
    }

    Ok(())
}

fn collect(input: &InputArgs, config: &AppConfig) -> Result<Vec<PathBuf>> {
    corpus::collect_inputs(input.file.as_deref(), input.dir.as_deref(), &config.include)
}

fn run_score(
    query: &Path,
    input: &InputArgs,
    flags: ReportFlags,
    config: &AppConfig,
    quiet: bool,
    color: ColorMode,
) -> Result<()> {
    let set = QuerySet::from_file(query)?;
    tracing::info!(
        "query {}: {} expressions, {} terms, scores in [{}, {}]",
        query.display(),
        set.len(),
        set.terms().len(),
        set.min_score(),
        set.max_score()
    );

    let inputs = collect(input, config)?;
    let batch = runner::score_documents(&set, &inputs, RunOptions::from_config(config, quiet))?;

    let mut out = output::stdout(color);
    output::write_scores(&mut out, &batch)?;

    let written = report::write_reports(&set, &batch, flags, config.histogram_min_count, query)
        .with_context(|| format!("Failed to write reports for {}", query.display()))?;
    tracing::info!("wrote {} report files", written.len());

    Ok(())
}

fn run_search(expression: &str, input: &InputArgs, config: &AppConfig, color: ColorMode) -> Result<()> {
    let inputs = collect(input, config)?;
    let hits = runner::search_documents(expression, &inputs, RunOptions::from_config(config, true))
        .with_context(|| format!("Search for {} failed", expression))?;

    let mut out = output::stdout(color);
    output::write_search_hits(&mut out, expression, inputs.len(), &hits)?;
    Ok(())
}
