//! `flag-refs` command line: scan a pull-request diff for feature flag references.
//!
//! stdout carries the result (JSON summary or markdown comment body); logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Overrides, ProjectConfig, Settings};
use flag_source::FlagCatalog;
use flagrefs_scanner::{parse_multi_file_diff, preprocess, scan_pull_request, ScanRequest};
use flagrefs_search::{generate_aliases, DelimitedMatcher};
use flags::OutputFormat;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

mod config;
mod flag_source;
mod flags;
mod outputs;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "flag-refs")]
#[command(about = "Find feature flag references added or removed by a pull request", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository checkout at the head of the pull request
    #[arg(long, env = "FLAG_REFS_DIR", default_value = ".")]
    dir: PathBuf,

    /// Unified diff of the pull request (stdin when omitted or "-")
    #[arg(long, env = "FLAG_REFS_DIFF")]
    diff: Option<PathBuf>,

    /// JSON file with known flags: a list of keys or flag objects
    #[arg(long, env = "FLAG_REFS_FLAGS_FILE")]
    flags: Option<PathBuf>,

    /// Known flag key (repeatable)
    #[arg(long = "flag", value_name = "KEY")]
    flag_keys: Vec<String>,

    /// Project config (default: <dir>/.flagrefs.toml)
    #[arg(long, env = "FLAG_REFS_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of distinct flags to report
    #[arg(long, env = "FLAG_REFS_MAX_FLAGS")]
    max_flags: Option<usize>,

    /// Check whether removed flags are still referenced anywhere in the checkout
    #[arg(long, env = "FLAG_REFS_CHECK_EXTINCTIONS", value_name = "BOOL")]
    check_extinctions: Option<bool>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Render a "no flag references" comment instead of nothing
    #[arg(long, env = "FLAG_REFS_PLACEHOLDER_COMMENT")]
    placeholder_comment: bool,

    /// Append step outputs to this file (GitHub Actions)
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    if !cli.dir.is_dir() {
        bail!("Repository directory {} does not exist", cli.dir.display());
    }

    let project = ProjectConfig::load(cli.config.as_deref(), &cli.dir)?;
    let settings = Settings::resolve(
        project,
        Overrides {
            max_flags: cli.max_flags,
            check_extinctions: cli.check_extinctions,
        },
    )?;

    if cli.flags.is_none() && cli.flag_keys.is_empty() {
        bail!("No flags given: pass --flags <file> or --flag <key>");
    }
    let catalog = FlagCatalog::load(cli.flags.as_deref(), &cli.flag_keys)?;
    if catalog.is_empty() {
        log::warn!("Flag list is empty, nothing to search for");
    }
    let keys = catalog.keys();

    let diff = read_diff(cli.diff.as_deref())?;
    let file_diffs = parse_multi_file_diff(&diff).context("Failed to parse diff")?;
    log::info!("Diff touches {} files", file_diffs.len());
    let contents = preprocess(&cli.dir, &file_diffs);

    let aliases = generate_aliases(&keys, &settings.aliases, &cli.dir, &contents)
        .context("Failed to generate flag aliases")?;
    let matcher = DelimitedMatcher::new(&keys, &aliases, settings.delimiters.clone());

    let report = scan_pull_request(
        ScanRequest {
            base_dir: &cli.dir,
            contents: &contents,
            max_flags: settings.max_flags,
            check_extinctions: settings.check_extinctions,
        },
        &matcher,
    )
    .context("Failed to scan pull request")?;

    if let Some(path) = &cli.github_output {
        outputs::write_github_outputs(path, &report.summary)?;
    }

    log::debug!("Rendering {} output", cli.format.as_str());
    match cli.format {
        OutputFormat::Json => print_stdout(&serde_json::to_string_pretty(&report.summary)?),
        OutputFormat::Markdown => {
            match report::render_comment(&report.summary, &catalog, cli.placeholder_comment) {
                Some(body) => print_stdout(&body),
                None => {
                    log::info!("No flag references found");
                    Ok(())
                }
            }
        }
    }
}

fn read_diff(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read diff {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read diff from stdin")?;
            Ok(text)
        }
    }
}
