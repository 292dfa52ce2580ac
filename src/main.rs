use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::ColorChoice;
use yql::output;
use yql::query::{parse_query, ParserConfig};
use yql::QueryError;

#[derive(Parser)]
#[command(name = "yql")]
#[command(about = "Compile a search query into an Elasticsearch query document")]
struct Cli {
    /// Search query (words are joined with spaces)
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,

    /// JSON parser configuration (defaults to the built-in example)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the query document
    #[arg(long)]
    pretty: bool,

    /// Allow terms on the restricted `plugin` field
    #[arg(long)]
    allow_plugin: bool,

    /// When to color error output
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorChoice {
    fn from(when: ColorWhen) -> Self {
        match when {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        }
    }
}

/// Configuration used when no `--config` file is given
fn example_config() -> ParserConfig {
    ParserConfig::new()
        .with_default_fields(["events.hostname", "events.summary"])
        .with_nested_paths(["events"])
        .with_field_mapping([
            ("host", "events.host"),
            ("port", "open_ports"),
            ("fingerprint", "fingerprints"),
            ("ssl", "events.ssl"),
        ])
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("YQL_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let choice = ColorChoice::from(cli.color);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<QueryError>() {
            Some(query_err) => {
                if output::print_error(query_err, choice).is_err() {
                    eprintln!("error: {}", query_err);
                }
                match query_err {
                    QueryError::FieldValidation { .. } => ExitCode::from(2),
                    _ => ExitCode::FAILURE,
                }
            }
            None => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ParserConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => example_config(),
    };

    let allow_plugin = cli.allow_plugin;
    let config = config.with_field_callback("plugin", move |value| {
        if !allow_plugin {
            anyhow::bail!("plugin field not allowed");
        }
        Ok(value.to_string())
    });

    let query = cli.query.join(" ");
    let node = parse_query(&query, &config).into_result()?;
    output::print_document(&output::render(&node, cli.pretty))?;

    Ok(())
}
