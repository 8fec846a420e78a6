use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use yamlpipe::batch::BatchInterpreter;
use yamlpipe::command::{execute, Session, YamlCommand};
use yamlpipe::config::Config;
use yamlpipe::document::node::YamlValue;
use yamlpipe::file::loader::{load_document, load_from_stdin};
use yamlpipe::file::saver::{save_document, to_json_string, to_yaml_string};
use yamlpipe::processor::table::format_table;

/// yamlpipe - query and rewrite YAML documents with YAML-paths
#[derive(Parser)]
#[command(name = "yamlpipe")]
#[command(version)]
#[command(about = "Query and rewrite YAML documents with YAML-paths", long_about = None)]
struct Cli {
    /// Input document, or "-" for stdin (default: stdin if piped, else empty)
    #[arg(short, long, global = true)]
    input: Option<String>,

    /// Write the result here instead of stdout ("-" for stdout)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Emit JSON instead of YAML
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.config/yamlpipe/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Yaml(YamlCommand),

    /// Run a batch script against the input
    Batch {
        /// Script file
        script: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if cli.json {
        config.output_format = "json".to_string();
    }
    Ok(config)
}

fn read_input(input: Option<&str>) -> Result<YamlValue> {
    match input {
        Some("-") => load_from_stdin(),
        Some(path) => load_document(path),
        None if !io::stdin().is_terminal() => load_from_stdin(),
        None => Ok(YamlValue::Null),
    }
}

/// Serializes a result for stdout. Table rows print as aligned columns
/// unless JSON was requested.
fn render(value: &YamlValue, config: &Config, as_table: bool) -> Result<String> {
    if config.json_output() {
        return to_json_string(value, config.indent_size);
    }

    if as_table {
        let rows: Vec<Vec<YamlValue>> = value
            .as_array()
            .map(|rows| {
                rows.iter()
                    .map(|row| row.as_array().cloned().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        return Ok(format_table(&rows));
    }

    to_yaml_string(value)
}

fn write_output(value: &YamlValue, output: Option<&str>, config: &Config, as_table: bool) -> Result<()> {
    match output {
        Some(path) if path != "-" => save_document(path, value, config),
        _ => {
            let text = render(value, config, as_table)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.is_empty() && !text.ends_with('\n') {
                writeln!(stdout)?;
            }
            stdout.flush().context("Failed to write to stdout")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let input = read_input(cli.input.as_deref())?;
    let mut session = Session::new(config);

    match &cli.command {
        Commands::Yaml(command) => {
            let result = execute(command, input, &mut session)?;
            let as_table = matches!(command, YamlCommand::Table { .. });
            write_output(&result, cli.output.as_deref(), &session.config, as_table)?;
        }
        Commands::Batch { script } => {
            let mut stdout = io::stdout();
            let result = {
                let mut interpreter = BatchInterpreter::new(&mut session, &mut stdout);
                interpreter.run_file(script, input)?
            };
            stdout.flush()?;
            // Batch output is whatever the script prints; the final value
            // is only written when asked for.
            if cli.output.is_some() {
                write_output(&result, cli.output.as_deref(), &session.config, false)?;
            }
        }
    }

    Ok(())
}
