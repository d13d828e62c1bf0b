//! rawext CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: command-line flags, with the log filter
//!    falling back to the `RAWEXT_LOG` environment variable.
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON)
//!    on stderr. Events emitted by the `extension` crate, including the
//!    decode diagnostics, flow through this layer.
//! 3. **Run one conversion**: read a document from a file or stdin and
//!    write the result to stdout:
//!    - `encode`: read any JSON/YAML document of the requested kind and
//!      emit the strict compact JSON payload.
//!    - `decode`: read a payload and print the materialized value.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use extension::{DecodeObserver, ExtensionCodec, ExtensionPayload, ProviderExtension};
use tracing_subscriber::EnvFilter;
use vmi::{VirtualMachineInstanceSpec, VirtualMachineInstanceStatus};

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "rawext", version, about = "Encode and decode provider extension payloads")]
struct Cli {
    /// Log filter directive, e.g. `debug` or `rawext::extension=debug`.
    #[arg(long, env = "RAWEXT_LOG", global = true)]
    log_level: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Re-encode a spec or status document as a compact JSON payload.
    Encode {
        #[arg(long, value_enum)]
        kind: Kind,

        /// Read from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Decode a payload and print the value it carries.
    Decode {
        #[arg(long, value_enum)]
        kind: Kind,

        /// Read from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Spec,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_format)?;

    let codec = ExtensionCodec::new();
    let output = match cli.command {
        Command::Encode { kind, input } => {
            let input = read_input(input.as_deref())?;
            match kind {
                Kind::Spec => encode::<VirtualMachineInstanceSpec, _>(&codec, input)?,
                Kind::Status => encode::<VirtualMachineInstanceStatus, _>(&codec, input)?,
            }
        }
        Command::Decode {
            kind,
            input,
            format,
        } => {
            let input = read_input(input.as_deref())?;
            match kind {
                Kind::Spec => decode::<VirtualMachineInstanceSpec, _>(&codec, input, format)?,
                Kind::Status => decode::<VirtualMachineInstanceStatus, _>(&codec, input, format)?,
            }
        }
    };

    io::stdout()
        .lock()
        .write_all(&output)
        .context("failed to write to stdout")?;
    Ok(())
}

/// Installs the global subscriber. Logs go to stderr; stdout carries payloads.
fn init_logging(directive: Option<&str>, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(directive.unwrap_or(DEFAULT_LOG_FILTER))
        .with_context(|| format!("invalid log filter {directive:?}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Reads `input` permissively and writes it back in the strict form.
/// Empty input stays empty.
fn encode<T, O>(codec: &ExtensionCodec<O>, input: Vec<u8>) -> Result<Vec<u8>>
where
    T: ProviderExtension,
    O: DecodeObserver,
{
    let source = ExtensionPayload::from_raw(input);
    let value = if source.is_blank() {
        None
    } else {
        Some(
            codec
                .decode::<T>(Some(&source))
                .with_context(|| format!("input is not a valid {}", T::KIND))?,
        )
    };

    let payload = codec.encode(value.as_ref())?;
    tracing::info!(kind = %T::KIND, bytes = payload.len(), "Encoded payload");
    Ok(payload.into_bytes())
}

fn decode<T, O>(codec: &ExtensionCodec<O>, input: Vec<u8>, format: OutputFormat) -> Result<Vec<u8>>
where
    T: ProviderExtension,
    O: DecodeObserver,
{
    let payload = ExtensionPayload::from_raw(input);
    let value: T = codec.decode(Some(&payload))?;

    let mut rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&value)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered.into_bytes())
}
