//! Command-line interface for the named-slug binary.
//!
//! The CLI normalizes text into base slugs, assigns slugs to a batch of
//! records described in YAML, and reports how lookup keys are routed.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use named_slug::{
    Document, Error, LookupKey, MemoryStore, RecordId, base_slug, io_error, load_config,
    save_record, should_use_slug, to_param,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "NAMED_SLUG_LOG";

/// Command line interface for deriving and resolving record slugs.
#[derive(Debug, Parser,)]
#[command(name = "named-slug", version, about = "Derive collision-free record slugs")]
struct Cli
{
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Print the base slug of each argument, one per line.
    Normalize(NormalizeArgs,),
    /// Save records from a YAML file and print the slugs they receive.
    Assign(AssignArgs,),
    /// Report whether each key would be looked up by slug or by identifier.
    Dispatch(DispatchArgs,),
}

#[derive(Debug, Args,)]
struct NormalizeArgs
{
    /// Source texts to normalize.
    #[arg(value_name = "TEXT", required = true)]
    texts: Vec<String,>,
}

#[derive(Debug, Args,)]
/// Arguments accepted by the `assign` subcommand.
struct AssignArgs
{
    /// Path to the YAML slug configuration.
    #[arg(long = "config", value_name = "PATH", env = "NAMED_SLUG_CONFIG")]
    config: PathBuf,

    /// Record type whose configuration applies.
    #[arg(long = "type", value_name = "NAME")]
    record_type: String,

    /// Path to the YAML document listing records to save, in order.
    #[arg(long = "records", value_name = "PATH")]
    records: PathBuf,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct DispatchArgs
{
    /// Lookup keys; `:all`, `:first` and `:last` are control tokens.
    #[arg(value_name = "KEY", required = true, allow_hyphen_values = true)]
    keys: Vec<String,>,
}

/// Records document consumed by `assign`.
#[derive(Debug, Deserialize,)]
struct RecordsDocument
{
    #[serde(default)]
    records: Vec<BTreeMap<String, String,>,>,
}

/// Slug assigned to one saved record.
#[derive(Debug, Serialize, PartialEq, Eq,)]
struct AssignedSlug
{
    id:   RecordId,
    slug: Option<String,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_logging();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_logging()
{
    let filter = EnvFilter::try_from_env(LOG_ENV,).unwrap_or_else(|_| EnvFilter::new("warn",),);
    let _ = tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).try_init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from configuration loading, record saving
/// and output serialization.
fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Command::Normalize(args,) => write_lines(&mut handle, normalize_lines(&args.texts,),),
        Command::Assign(args,) => {
            let assigned = run_assign(&args,)?;
            write_json(&mut handle, &assigned, args.pretty,)
        }
        Command::Dispatch(args,) => write_lines(&mut handle, dispatch_lines(&args.keys,),),
    }
}

fn normalize_lines(texts: &[String],) -> Vec<String,>
{
    texts.iter().map(|text| base_slug(Some(text.as_str(),),).unwrap_or_default(),).collect()
}

fn dispatch_lines(keys: &[String],) -> Vec<String,>
{
    keys.iter()
        .map(|raw| {
            let route = if should_use_slug(&LookupKey::parse(raw,),) { "slug" } else { "id" };
            route.to_owned()
        },)
        .collect()
}

/// Saves every record listed in `args.records` through an in-memory store.
///
/// # Errors
///
/// Returns [`Error::Validation`](Error::Validation) when the record type is
/// not configured, and propagates loading and saving failures.
fn run_assign(args: &AssignArgs,) -> Result<Vec<AssignedSlug,>, Error,>
{
    let document = load_config(&args.config,)?;
    let config = document.get(&args.record_type,).ok_or_else(|| {
        Error::validation(format!("record type '{}' is not configured", args.record_type),)
    },)?;

    let records = load_records(&args.records,)?;
    let mut store = MemoryStore::new(config,);
    let mut assigned = Vec::with_capacity(records.len(),);

    for fields in records {
        let mut record = Document::from_fields(fields,);
        let id = save_record(config, &mut record, &mut store,)?;
        assigned.push(AssignedSlug {
            id,
            slug: to_param(config, &record,).map(str::to_owned,),
        },);
    }

    Ok(assigned,)
}

fn load_records(path: &Path,) -> Result<Vec<BTreeMap<String, String,>,>, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| io_error(path, source,),)?;
    let document: RecordsDocument = serde_yaml::from_str(&contents,)?;
    Ok(document.records,)
}

fn write_lines<W: io::Write,>(writer: &mut W, lines: Vec<String,>,) -> Result<(), Error,>
{
    for line in lines {
        writeln!(writer, "{line}").map_err(|source| io_error(Path::new("<stdout>",), source,),)?;
    }
    Ok((),)
}

fn write_json<W: io::Write, T: Serialize + ?Sized,>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, value,)?;
    } else {
        serde_json::to_writer(writer, value,)?;
    }

    Ok((),)
}
