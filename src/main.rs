//! Purpose: `polydecode` CLI entry point.
//! Role: Binary crate root; reads a response payload, decodes it, emits JSON on stdout.
//! Invariants: stdout carries only the decoded value; diagnostics and errors go to stderr.
//! Invariants: Errors are emitted as a JSON envelope on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use polydecode::api::{
    Decoder, Error, ErrorKind, Family, GidPattern, Media, WebhookSubscription,
    WebhookSubscriptionEndpoint, parse_document, to_exit_code,
};

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(exit_code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `polydecode --help` for usage."));
            }
        },
    };

    init_tracing();

    let decoder = match &cli.gid_pattern {
        Some(pattern) => Decoder::with_gid_pattern(GidPattern::new(pattern)?),
        None => Decoder::new(),
    };
    debug!(gid_pattern = decoder.gid_pattern().as_str(), "decoder ready");

    let output = match cli.command {
        Command::Entity { family, input } => {
            let document = read_document(input.as_ref())?;
            match family {
                FamilyArg::Media => render(decoder.decode_value::<Media>(document)?)?,
                FamilyArg::Webhook => {
                    render(decoder.decode_value::<WebhookSubscription>(document)?)?
                }
                FamilyArg::Endpoint => {
                    render(decoder.decode_value::<WebhookSubscriptionEndpoint>(document)?)?
                }
            }
        }
        Command::Connection {
            family,
            container,
            input,
        } => {
            let document = read_document(input.as_ref())?;
            let container = container.as_deref();
            match family {
                FamilyArg::Media => render(connection::<Media>(&decoder, document, container)?)?,
                FamilyArg::Webhook => render(connection::<WebhookSubscription>(
                    &decoder, document, container,
                )?)?,
                FamilyArg::Endpoint => render(connection::<WebhookSubscriptionEndpoint>(
                    &decoder, document, container,
                )?)?,
            }
        }
    };

    let text = if cli.compact {
        serde_json::to_string(&output)
    } else {
        serde_json::to_string_pretty(&output)
    }
    .map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    println!("{text}");
    Ok(0)
}

#[derive(Parser)]
#[command(
    name = "polydecode",
    version,
    about = "Decode polymorphic GraphQL response payloads into typed JSON",
    long_about = None,
    after_help = r#"EXAMPLES
  $ polydecode entity --family media media.json
  $ polydecode connection --family webhook --container webhookSubscriptions response.json
  $ curl -s ... | polydecode connection --family media --container media -

Decoded values are printed with their resolved `__typename`.
Set RUST_LOG=debug to see how each discriminator was resolved."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Regex with exactly one capture group extracting the type from an `id`",
        long_help = "Regex with exactly one capture group extracting the type from an `id` \
                     (default: ^gid://shopify/(\\w+)/\\d+$)"
    )]
    gid_pattern: Option<String>,
    #[arg(long, global = true, help = "Emit single-line JSON instead of pretty output")]
    compact: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Decode one entity from a JSON object")]
    Entity {
        #[arg(long, value_enum)]
        family: FamilyArg,
        #[arg(
            help = "Input file (default: stdin; use - for stdin)",
            value_hint = ValueHint::FilePath
        )]
        input: Option<PathBuf>,
    },
    #[command(about = "Decode a paginated connection (edges, nodes, pageInfo)")]
    Connection {
        #[arg(long, value_enum)]
        family: FamilyArg,
        #[arg(
            long,
            help = "Key holding the connection object; omit when the payload root is the connection"
        )]
        container: Option<String>,
        #[arg(
            help = "Input file (default: stdin; use - for stdin)",
            value_hint = ValueHint::FilePath
        )]
        input: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FamilyArg {
    Media,
    Webhook,
    Endpoint,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_document(input: Option<&PathBuf>) -> Result<Value, Error> {
    let bytes = match input {
        Some(path) if path.as_os_str() != "-" => fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        })?,
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            buf
        }
    };
    parse_document(&bytes)
}

fn connection<F: Family>(
    decoder: &Decoder,
    document: Value,
    container: Option<&str>,
) -> Result<polydecode::api::Connection<F>, Error> {
    match container {
        Some(key) => decoder.unwrap_connection(document, key),
        None => decoder.decode_connection_value(document),
    }
}

fn render<T: Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim_start_matches("error: ").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("decode failed")),
    );
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(entity) = err.entity() {
        inner.insert("entity".to_string(), json!(entity));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(shape) = err.shape() {
        inner.insert("shape".to_string(), json!(shape));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn emit_error(err: &Error) {
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}
