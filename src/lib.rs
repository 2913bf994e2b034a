pub mod cli;
pub mod ddl;
pub mod error;
pub mod io_utils;
pub mod lattice;
pub mod names;
pub mod profile;

use std::{
    env,
    ffi::OsString,
    fs::File,
    io::{self, Write},
    path::Path,
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, error::ErrorKind};
use log::{LevelFilter, debug, info};

use crate::{
    cli::Cli,
    ddl::{DdlOptions, render_create_table},
    error::SchemaError,
    io_utils::{is_dash, resolve_encoding, resolve_input_delimiter},
    names::table_name_from_path,
    profile::{InferOptions, infer_path},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csvschema", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = parse_args(env::args_os())?;
    execute(&cli)
}

/// Parses arguments, printing the usage line to stdout on any argument error.
/// `--help` and `--version` print and exit successfully.
pub fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{}", Cli::command().render_usage());
            Err(SchemaError::Usage(usage_reason(&err)).into())
        }
    }
}

/// First line of clap's rendered error, without its `error: ` prefix.
fn usage_reason(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let reason = rendered
        .lines()
        .next()
        .map(|line| line.trim_start_matches("error:").trim())
        .unwrap_or_default();
    if reason.is_empty() {
        err.kind()
            .as_str()
            .unwrap_or("unrecognised arguments")
            .to_string()
    } else {
        reason.to_string()
    }
}

pub fn execute(cli: &Cli) -> Result<()> {
    let options = InferOptions {
        delimiter: cli.delimiter,
        encoding: resolve_encoding(cli.input_encoding.as_deref())?,
    };
    info!(
        "Inferring schema from '{}' with delimiter '{}'",
        cli.input.display(),
        printable_delimiter(resolve_input_delimiter(&cli.input, cli.delimiter))
    );
    let fields = infer_path(&cli.input, &options)
        .with_context(|| format!("Inferring schema from {:?}", cli.input))?;

    let table = cli
        .table_name
        .clone()
        .unwrap_or_else(|| table_name_from_path(&cli.input));
    let ddl_options = DdlOptions {
        quoting: cli.quote,
        length_scale: cli.length_scale,
    };
    debug!("Rendering table '{}' with {:?}", table, ddl_options);
    let statement = render_create_table(&table, &fields, &ddl_options);
    write_statement(cli.output.as_deref(), &statement)
}

fn write_statement(path: Option<&Path>, statement: &str) -> Result<()> {
    match path {
        Some(p) if !is_dash(p) => {
            let mut file = File::create(p).with_context(|| format!("Creating output file {p:?}"))?;
            file.write_all(statement.as_bytes())
                .with_context(|| format!("Writing statement to {p:?}"))?;
            info!("Statement written to {p:?}");
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(statement.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Writing statement to stdout")?;
        }
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_maps_missing_input_to_usage_error() {
        let err = parse_args(["csvschema"]).expect_err("input is required");
        let schema_err = err.downcast_ref::<SchemaError>().expect("typed error");
        assert!(matches!(schema_err, SchemaError::Usage(_)));
    }

    #[test]
    fn parse_args_keeps_value_parser_message() {
        let err = parse_args(["csvschema", "a.csv", "--length-scale", "0.5"])
            .expect_err("scale below one");
        let message = err.to_string();
        assert!(message.starts_with("invalid arguments: "));
        assert!(message.contains("Length scale must be a finite number of at least 1.0"));
        assert!(!message.contains("error:"));

        let err = parse_args(["csvschema", "a.csv", "--delimiter", "ab"]).expect_err("delimiter");
        assert!(err.to_string().contains("Delimiter must be a single character"));
    }

    #[test]
    fn parse_args_accepts_options() {
        let cli = parse_args([
            "csvschema",
            "people.tsv",
            "--quote",
            "never",
            "--length-scale",
            "2",
            "-t",
            "staff",
        ])
        .expect("parse");
        assert_eq!(cli.quote, ddl::IdentifierQuoting::Never);
        assert_eq!(cli.length_scale, 2.0);
        assert_eq!(cli.table_name.as_deref(), Some("staff"));
    }

    #[test]
    fn printable_delimiter_escapes_whitespace() {
        assert_eq!(printable_delimiter(b'\t'), "\\t");
        assert_eq!(printable_delimiter(b';'), ";");
    }
}
