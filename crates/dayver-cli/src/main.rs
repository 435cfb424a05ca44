#![deny(unsafe_code)]

//! dayver CLI: prints a `YY.MM.DD[-type].N` version and stamps it into the
//! project manifest.
//!
//! The version is always the last line on stdout; diagnostics go to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::Parser;
use clap::error::ErrorKind;
use dayver_config::{CONFIG_FILE_NAME, DayverConfig};
use dayver_core::logging::{self, LogSettings};
use dayver_core::version::validate_release_type;
use dayver_core::{CommitCounter, GenerationReport, GitCommitCounter, VersionGenerator};
use tracing::{debug, info};

/// dayver: date-and-commit versions for your project.
#[derive(Parser, Debug)]
#[command(
    name = "dayver",
    version,
    long_version = dayver_core::build_info::LONG_VERSION,
    about,
    long_about = None
)]
struct Cli {
    /// Release type embedded in the version ("dev", "beta", ...). An empty
    /// string selects the clean `YY.MM.DD.N` format. A bare number given
    /// without COMMIT_COUNT is used as the commit count with the clean format.
    release_type: Option<String>,

    /// Build number to use instead of counting today's commits.
    commit_count: Option<u64>,

    /// Project directory (defaults to the current directory).
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Path to configuration file (defaults to `<project>/dayver.toml`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Suppress everything except errors and the final version.
    #[arg(short, long)]
    silent: bool,

    /// Generate the build metadata artifact.
    #[arg(long)]
    artifact: bool,

    /// Generate the build metadata artifact at PATH (implies `--artifact`).
    #[arg(long, value_name = "PATH")]
    artifact_path: Option<PathBuf>,

    /// Do not write the version into the manifest.
    #[arg(long)]
    no_manifest: bool,

    /// Compute and print the version without writing any file.
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Process exit status for a successful run (also help and version).
const EXIT_SUCCESS: u8 = 0;
/// Process exit status for invalid input or a failed run.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let code = match Cli::try_parse() {
        Ok(cli) => match execute(&cli) {
            Ok(report) => {
                println!("{}", report.version);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e:#}");
                run_error_code(&e)
            }
        },
        Err(e) => {
            let _ = e.print();
            parse_error_code(&e)
        }
    };
    ExitCode::from(code)
}

/// Exit status for an argument parsing outcome. Help and version requests
/// surface through clap's error path but are not failures.
fn parse_error_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    }
}

/// Exit status for an error raised after argument parsing.
fn run_error_code(_err: &anyhow::Error) -> u8 {
    EXIT_FAILURE
}

fn execute(cli: &Cli) -> Result<GenerationReport> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let config = resolve_config(cli, &cwd)?;

    logging::init(LogSettings {
        silent: config.silent,
        verbose: cli.verbose,
    });

    let counter = GitCommitCounter::default();
    if !counter.available() {
        debug!("git is not available, build number falls back to 0");
    }
    run(config, Box::new(counter), Local::now())
}

/// Generate the version for `config` at the invocation instant `now`.
fn run(
    config: DayverConfig,
    counter: Box<dyn CommitCounter>,
    now: DateTime<Local>,
) -> Result<GenerationReport> {
    if !config.silent {
        info!(
            project = %config.project_path.display(),
            release_type = %config.release_type,
            "Generating version"
        );
    }

    let generator = VersionGenerator::new(config, counter);
    let report = generator.generate(now)?;

    if !generator.config().silent {
        info!(
            version = %report.version,
            display = report.version.display_form(),
            manifest = %report.manifest,
            artifact = %report.artifact,
            "Done"
        );
    }
    Ok(report)
}

/// Merge the config file (if any) with command-line arguments.
///
/// The project directory is `--project` when given, otherwise the file's
/// `project_path` resolved against the file's directory, otherwise `cwd`.
/// Relative paths are resolved once, here.
fn resolve_config(cli: &Cli, cwd: &Path) -> Result<DayverConfig> {
    let search_dir = match &cli.project {
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    };

    let config_path = match &cli.config {
        Some(path) => Some(cwd.join(path)),
        None => Some(search_dir.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
    };

    let mut config = match &config_path {
        Some(path) => DayverConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DayverConfig::default(),
    };

    config.project_path = match (&cli.project, &config_path) {
        (Some(_), _) => search_dir,
        (None, Some(path)) => {
            let base = path.parent().unwrap_or(cwd);
            resolve_against(base, &config.project_path)
        }
        (None, None) => cwd.to_path_buf(),
    };

    let (release_type, commit_count) = positionals(cli);
    if let Some(release_type) = release_type {
        if validate_release_type(&release_type).is_err() {
            bail!("release type must not contain whitespace: {release_type:?}");
        }
        config.release_type = release_type;
    }
    if commit_count.is_some() {
        config.override_commit_count = commit_count;
    }

    config.silent |= cli.silent;
    if cli.no_manifest {
        config.manifest.update = false;
    }
    if cli.artifact {
        config.artifact.enabled = true;
    }
    if let Some(path) = &cli.artifact_path {
        config.artifact.enabled = true;
        config.artifact.path = path.clone();
    }
    if cli.dry_run {
        config.manifest.update = false;
        config.artifact.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

/// Join `path` onto `base` unless it is absolute or the current directory.
fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Interpret the positional arguments. A lone numeric argument is a commit
/// count override for a clean release version.
fn positionals(cli: &Cli) -> (Option<String>, Option<u64>) {
    match (&cli.release_type, cli.commit_count) {
        (Some(first), None) => match first.parse::<u64>() {
            Ok(count) => (Some(String::new()), Some(count)),
            Err(_) => (Some(first.clone()), None),
        },
        (release_type, commit_count) => (release_type.clone(), commit_count),
    }
}
