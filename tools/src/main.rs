use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codec::{CodecConfig, ProtocolVersion};
use qdelta_tools::{
    format_entities_pretty, format_player_pretty, inspect_entities, inspect_player,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qdelta-tools",
    version,
    about = "qdelta delta-message inspection tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a captured entity delta stream against null baselines.
    InspectEntities {
        /// Path to the message bytes.
        message_path: PathBuf,
        #[command(flatten)]
        options: DecodeOptions,
    },
    /// Decode one captured player-state delta against the null state.
    InspectPlayer {
        /// Path to the message bytes.
        message_path: PathBuf,
        #[command(flatten)]
        options: DecodeOptions,
    },
}

#[derive(Args)]
struct DecodeOptions {
    /// Protocol revision the message was written with.
    #[arg(long, value_enum, default_value_t = ProtocolArg::Precise)]
    protocol: ProtocolArg,
    /// Width of entity numbers in entity headers.
    #[arg(long)]
    entity_bits: Option<u32>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
    /// Print per-delta trace events to stderr.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProtocolArg {
    Legacy,
    Precise,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

impl DecodeOptions {
    fn config(&self) -> Result<CodecConfig> {
        let protocol = match self.protocol {
            ProtocolArg::Legacy => ProtocolVersion::Legacy,
            ProtocolArg::Precise => ProtocolVersion::Precise,
        };
        let mut config = CodecConfig::new(protocol);
        if let Some(bits) = self.entity_bits {
            config.limits.entity_number_bits = bits;
        }
        config
            .validate()
            .map_err(|err| anyhow::anyhow!("invalid options: {err}"))?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::InspectEntities {
            message_path,
            options,
        } => {
            init_tracing(options.trace);
            let config = options.config()?;
            let bytes = read_message(&message_path)?;
            let report = inspect_entities(&bytes, &config)?;
            match options.format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_entities_pretty(&report)),
            }
        }
        Command::InspectPlayer {
            message_path,
            options,
        } => {
            init_tracing(options.trace);
            let config = options.config()?;
            let bytes = read_message(&message_path)?;
            let report = inspect_player(&bytes, &config)?;
            match options.format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_player_pretty(&report)),
            }
        }
    }
    Ok(())
}

fn read_message(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read message {}", path.display()))
}

/// `RUST_LOG` wins; `--trace` alone enables the per-delta events.
fn init_tracing(trace: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    if env_filter.is_none() && !trace {
        return;
    }
    let filter = env_filter.unwrap_or_else(|| EnvFilter::new("warn,qdelta=trace"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
