//! CLI entry point for treegen

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use treegen::{ColorOutput, Settings, SizeLimit, TreeConfig, TreeRenderer, generate_directory_tree};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "treegen")]
#[command(about = "Render a filtered text snapshot of a directory tree")]
#[command(version)]
struct Args {
    /// Directory to display
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Deepest level to list below the root (0 = root's children only)
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// Write the tree to FILE as well as printing it
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Do not print the tree to stdout (useful with --output)
    #[arg(short = 'q', long = "quiet", requires = "output")]
    quiet: bool,

    /// Read settings from this TOML file instead of the per-user one
    #[arg(long = "config", value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore the per-user settings file
    #[arg(long = "no-config")]
    no_config: bool,

    /// List directories only
    #[arg(long = "no-files")]
    no_files: bool,

    /// Hide files below the root directory
    #[arg(long = "no-subdir-files")]
    no_subdir_files: bool,

    /// Keep the filesystem's listing order
    #[arg(long = "no-sort")]
    no_sort: bool,

    /// Exclude folders with this exact name anywhere (repeatable)
    #[arg(long = "exclude-folder", value_name = "NAME")]
    exclude_folders: Vec<String>,

    /// Exclude files and folders whose name starts with PREFIX (repeatable)
    #[arg(long = "exclude-pattern", value_name = "PREFIX")]
    exclude_patterns: Vec<String>,

    /// Exclude files ending with EXT, e.g. ".bak" (repeatable)
    #[arg(long = "exclude-ext", value_name = "EXT")]
    exclude_extensions: Vec<String>,

    /// Never show files directly inside directories named DIR (repeatable)
    #[arg(long = "hide-files-in", value_name = "DIR")]
    hide_files_in: Vec<String>,

    /// Minimum file size in bytes. Use suffixes: K, M, G
    #[arg(long = "min-size", value_name = "SIZE")]
    min_size: Option<String>,

    /// Maximum file size in bytes, or "inf". Use suffixes: K, M, G
    #[arg(long = "max-size", value_name = "SIZE")]
    max_size: Option<String>,

    /// Marker printed before the root name
    #[arg(long = "root-emoji", value_name = "TEXT")]
    root_emoji: Option<String>,

    /// Marker printed before every folder name
    #[arg(long = "subdir-emoji", value_name = "TEXT")]
    subdir_emoji: Option<String>,

    /// Spaces added before file names inside subdirectories
    #[arg(long = "extra-indent", value_name = "N")]
    extra_indent: Option<usize>,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
fn parse_file_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}

/// Parse an upper size bound: "inf" or a size accepted by `parse_file_size`.
fn parse_size_limit(s: &str) -> Result<SizeLimit, String> {
    if s.trim().eq_ignore_ascii_case("inf") {
        Ok(SizeLimit::Unbounded)
    } else {
        parse_file_size(s).map(SizeLimit::Bounded)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Resolve the configuration: defaults, then the settings file, then flags.
fn build_config(args: &Args) -> Result<TreeConfig> {
    let settings = if let Some(path) = &args.config {
        Some(Settings::from_toml_file(path)?)
    } else if args.no_config {
        None
    } else {
        Settings::load_default()?
    };

    let mut config = match settings {
        Some(settings) => settings.apply(TreeConfig::default()),
        None => TreeConfig::default(),
    };

    if let Some(level) = args.level {
        config.tree_depth = level;
    }
    if args.no_files {
        config.show_files = false;
    }
    if args.no_subdir_files {
        config.show_subdirectory_files = false;
    }
    if args.no_sort {
        config.sort_alphabetically = false;
    }
    config
        .exclude_folders
        .extend(args.exclude_folders.iter().cloned());
    config
        .exclude_patterns
        .extend(args.exclude_patterns.iter().cloned());
    config
        .exclude_extensions
        .extend(args.exclude_extensions.iter().cloned());
    config
        .hide_files_in_dirs
        .extend(args.hide_files_in.iter().cloned());

    if let Some(size) = &args.min_size {
        config.min_file_size = parse_file_size(size)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid --min-size '{}'", size))?;
    }
    if let Some(size) = &args.max_size {
        config.max_file_size = parse_size_limit(size)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid --max-size '{}'", size))?;
    }
    if let Some(marker) = &args.root_emoji {
        config.root_emoji = marker.clone();
    }
    if let Some(marker) = &args.subdir_emoji {
        config.subdir_emoji = marker.clone();
    }
    if let Some(indent) = args.extra_indent {
        config.extra_indent = indent;
    }

    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = build_config(&args)?;

    if !args.path.is_dir() {
        bail!("cannot access '{}': Not a directory", args.path.display());
    }
    let root = args.path.as_path();

    if args.output.is_some() || !should_use_color(args.color) {
        let text = generate_directory_tree(root, &config, args.output.as_deref());
        if !args.quiet {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        return Ok(());
    }

    let mut output = ColorOutput::stdout(true);
    let stats = TreeRenderer::new(&config)
        .render_to(root, &mut output)
        .context("error writing output")?;
    log::debug!(
        "{} directories, {} files, {} unreadable",
        stats.dirs,
        stats.files,
        stats.errors
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("treegen: {:#}", e);
        process::exit(1);
    }
}
