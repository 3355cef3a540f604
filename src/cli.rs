//! Command-line front end.
//!
//! ```text
//! ts-translator lookup <PATH> <CONTEXT> <SOURCE> [--comment C] [--count N] [ARG...]
//! ts-translator stats [PATH] [--json]
//! ts-translator check [PATH] [--json]
//! ts-translator fmt <FILE> [--check]
//! ```
//!
//! PATH is a `.ts` file or a workspace directory. A directory is indexed
//! with its `.ts-translator.json`; a file is loaded directly with default
//! settings.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use serde::Serialize;
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
    Severity,
    TranslatorSettings,
};
use crate::diagnostics::{
    Diagnostic,
    check_catalog,
};
use crate::indexer::{
    CatalogIndexer,
    IndexerError,
    localizer_for,
};
use crate::input::{
    CatalogFile,
    LoadError,
    read_catalog_file,
};
use crate::stats::CatalogStats;
use crate::ts::{
    TsError,
    parse_document,
    write_document,
};

pub const USAGE: &str = "\
Usage:
    ts-translator lookup <PATH> <CONTEXT> <SOURCE> [--comment <C>] [--count <N>] [ARG...]
    ts-translator stats [PATH] [--json]
    ts-translator check [PATH] [--json]
    ts-translator fmt <FILE> [--check]

PATH is a .ts file or a workspace directory (default: current directory).

Environment:
    RUST_LOG    log filter (default: warn)
";

#[derive(Error, Debug)]
pub enum CliError {
    /// Bad command line; the caller shows [`USAGE`].
    #[error("{0}")]
    Usage(String),

    #[error("Invalid count '{0}': expected a non-negative integer")]
    InvalidCount(String),

    #[error("No translation files found under {0:?}")]
    NoCatalogs(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: TsError,
    },
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lookup {
        path: PathBuf,
        context: String,
        source: String,
        comment: Option<String>,
        count: Option<u64>,
        args: Vec<String>,
    },
    Stats {
        path: PathBuf,
        json: bool,
    },
    Check {
        path: PathBuf,
        json: bool,
    },
    Fmt {
        file: PathBuf,
        check: bool,
    },
    Help,
    Version,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The command ran but found problems (`check`, `fmt --check`).
    Failure,
}

/// Parses arguments, excluding the program name.
///
/// # Errors
/// Returns [`CliError::Usage`] for unknown commands, options or missing
/// operands.
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-V" | "--version" => Ok(Command::Version),
        "lookup" => parse_lookup(args),
        "stats" | "check" => {
            let mut path = None;
            let mut json = false;
            for arg in args {
                match arg.as_str() {
                    "--json" => json = true,
                    option if option.starts_with("--") => {
                        return Err(CliError::Usage(format!("Unknown option: {option}")));
                    }
                    _ if path.is_none() => path = Some(PathBuf::from(arg)),
                    _ => return Err(CliError::Usage(format!("Unexpected argument: {arg}"))),
                }
            }
            let path = path.unwrap_or_else(|| PathBuf::from("."));
            Ok(if command == "stats" {
                Command::Stats { path, json }
            } else {
                Command::Check { path, json }
            })
        }
        "fmt" => {
            let mut file = None;
            let mut check = false;
            for arg in args {
                match arg.as_str() {
                    "--check" => check = true,
                    option if option.starts_with("--") => {
                        return Err(CliError::Usage(format!("Unknown option: {option}")));
                    }
                    _ if file.is_none() => file = Some(PathBuf::from(arg)),
                    _ => return Err(CliError::Usage(format!("Unexpected argument: {arg}"))),
                }
            }
            let file = file.ok_or_else(|| CliError::Usage("fmt requires a file".to_string()))?;
            Ok(Command::Fmt { file, check })
        }
        other => Err(CliError::Usage(format!("Unknown command: {other}"))),
    }
}

fn parse_lookup(mut args: impl Iterator<Item = String>) -> Result<Command, CliError> {
    let mut operands = Vec::new();
    let mut comment = None;
    let mut count = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--comment" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--comment requires a value".to_string()))?;
                comment = Some(value);
            }
            "--count" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--count requires a value".to_string()))?;
                count = Some(value.parse::<u64>().map_err(|_| CliError::InvalidCount(value))?);
            }
            // Everything after `--` is an operand, even if it looks like an option.
            "--" => operands.extend(args.by_ref()),
            option if option.starts_with("--") => {
                return Err(CliError::Usage(format!("Unknown option: {option}")));
            }
            _ => operands.push(arg),
        }
    }

    let mut operands = operands.into_iter();
    let (Some(path), Some(context), Some(source)) =
        (operands.next(), operands.next(), operands.next())
    else {
        return Err(CliError::Usage("lookup requires <PATH> <CONTEXT> <SOURCE>".to_string()));
    };

    Ok(Command::Lookup {
        path: PathBuf::from(path),
        context,
        source,
        comment,
        count,
        args: operands.collect(),
    })
}

/// Runs a command, writing its report to `out`.
///
/// # Errors
/// Returns an error when input cannot be read or parsed.
pub async fn run<W: Write>(command: Command, out: &mut W) -> Result<Status, CliError> {
    match command {
        Command::Help => {
            out.write_all(USAGE.as_bytes())?;
            Ok(Status::Success)
        }
        Command::Version => {
            writeln!(out, "ts-translator {}", env!("CARGO_PKG_VERSION"))?;
            Ok(Status::Success)
        }
        Command::Lookup { path, context, source, comment, count, args } => {
            let (catalogs, settings) = load_catalogs(&path).await?;
            let localizer = localizer_for(&catalogs, &settings);
            let text = match count {
                Some(n) => localizer.tr_n(&context, &source, comment.as_deref(), n, &args),
                None => localizer.tr_disambiguated(&context, &source, comment.as_deref(), &args),
            };
            writeln!(out, "{text}")?;
            Ok(Status::Success)
        }
        Command::Stats { path, json } => {
            let (catalogs, _) = load_catalogs(&path).await?;
            let reports: Vec<FileStats<'_>> = catalogs
                .iter()
                .map(|catalog| FileStats {
                    path: &catalog.path,
                    stats: CatalogStats::from_document(&catalog.document),
                })
                .collect();
            if json {
                serde_json::to_writer_pretty(&mut *out, &reports)?;
                writeln!(out)?;
            } else {
                for report in &reports {
                    writeln!(out, "{}: {}", report.path.display(), report.stats)?;
                }
            }
            Ok(Status::Success)
        }
        Command::Check { path, json } => {
            let (catalogs, settings) = load_catalogs(&path).await?;
            let diagnostics: Vec<Diagnostic> = catalogs
                .iter()
                .flat_map(|catalog| check_catalog(catalog, &settings.diagnostics))
                .collect();
            if json {
                serde_json::to_writer_pretty(&mut *out, &diagnostics)?;
                writeln!(out)?;
            } else {
                for diagnostic in &diagnostics {
                    writeln!(out, "{diagnostic}")?;
                }
            }
            let errors = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
            tracing::debug!(diagnostics = diagnostics.len(), errors, "Checked catalogs");
            Ok(if errors == 0 { Status::Success } else { Status::Failure })
        }
        Command::Fmt { file, check } => format_file(&file, check, out).await,
    }
}

#[derive(Debug, Serialize)]
struct FileStats<'a> {
    path: &'a Path,
    #[serde(flatten)]
    stats: CatalogStats,
}

/// Loads the catalogs at `path` with the settings that apply to them.
async fn load_catalogs(path: &Path) -> Result<(Vec<CatalogFile>, TranslatorSettings), CliError> {
    let is_file = tokio::fs::metadata(path).await.is_ok_and(|metadata| metadata.is_file());
    if is_file {
        let catalog = read_catalog_file(path).await?;
        return Ok((vec![catalog], TranslatorSettings::default()));
    }

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(path.to_path_buf()))?;
    let catalogs = CatalogIndexer::new().index_workspace(path, &config_manager).await?;
    if catalogs.is_empty() {
        return Err(CliError::NoCatalogs(path.to_path_buf()));
    }
    Ok((catalogs, config_manager.get_settings().clone()))
}

async fn format_file<W: Write>(file: &Path, check: bool, out: &mut W) -> Result<Status, CliError> {
    let content = tokio::fs::read_to_string(file).await?;
    let document = parse_document(&content)
        .map_err(|source| CliError::Parse { path: file.to_path_buf(), source })?;
    let formatted = write_document(&document);

    if formatted == content {
        return Ok(Status::Success);
    }
    if check {
        writeln!(out, "Would reformat {}", file.display())?;
        return Ok(Status::Failure);
    }
    tokio::fs::write(file, formatted).await?;
    writeln!(out, "Reformatted {}", file.display())?;
    Ok(Status::Success)
}
