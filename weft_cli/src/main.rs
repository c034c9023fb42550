use weft_core::{
    AnyCodec, Codec, CodecRegistry, DecodePolicy, WeftConfig, absorb, absorb_all,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "weft.toml";

#[derive(Parser, Debug)]
#[clap(author, version, about = "Inspect and exercise weft codecs", long_about = None)]
struct Cli {
    /// Codec registry to load. Falls back to ./weft.toml, then to one codec per kind.
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered codecs.
    List {
        #[clap(long)]
        json: bool,
    },
    /// Encode a value with the named codec.
    Encode(TransformArgs),
    /// Decode a value with the named codec.
    Decode(TransformArgs),
    /// Find the leading encoded unit(s) of a blob and decode them.
    Absorb {
        #[clap(flatten)]
        input: InputArgs,
        /// Codec name in the registry.
        codec: String,
        /// Keep absorbing until the blob is exhausted.
        #[clap(long)]
        all: bool,
        #[clap(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct TransformArgs {
    #[clap(flatten)]
    input: InputArgs,
    /// Codec name in the registry.
    codec: String,
    /// Write the result as raw bytes instead of hex.
    #[clap(long)]
    raw: bool,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
struct InputArgs {
    /// Input given as hex digits.
    #[clap(long)]
    hex: Option<String>,
    /// Input given as text, taken as its UTF-8 bytes.
    #[clap(long)]
    text: Option<String>,
    /// Input read from a file. Stdin is used when no input option is given.
    #[clap(long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn read(&self) -> Result<Vec<u8>, anyhow::Error> {
        if let Some(hex_input) = &self.hex {
            let compact: String = hex_input.split_whitespace().collect();
            return hex::decode(&compact).context("Invalid --hex input");
        }
        if let Some(text) = &self.text {
            return Ok(text.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return std::fs::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read input file {:?}: {}", path, e));
        }
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .context("Failed to read input from stdin")?;
        Ok(buffer)
    }
}

#[derive(Serialize)]
struct CodecSummary {
    name: String,
    kind: String,
    policy: &'static str,
    absorbs: bool,
    arg: Option<weft_core::CodecArg>,
}

#[derive(Serialize, Debug, PartialEq)]
struct UnitReport {
    offset: usize,
    consumed: usize,
    value: String,
}

#[derive(Serialize, Debug, PartialEq)]
struct AbsorbReport {
    units: Vec<UnitReport>,
    /// Hex of the bytes after the last absorbed unit.
    remaining: String,
}

fn load_config(config_file: Option<PathBuf>) -> Result<WeftConfig, anyhow::Error> {
    match config_file {
        Some(config_path) => {
            log::info!("Loading configuration from specified path: {config_path:?}");
            WeftConfig::load_from_file(&config_path)
        }
        None => {
            let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_config_path.exists() {
                log::info!(
                    "No config file specified via CLI, loading default: {default_config_path:?}"
                );
                WeftConfig::load_from_file(&default_config_path)
            } else {
                log::info!(
                    "No config file specified and default '{DEFAULT_CONFIG_FILE}' not found, using built-in defaults."
                );
                Ok(WeftConfig::default())
            }
        }
    }
}

fn lookup<'a>(registry: &'a CodecRegistry, name: &str) -> Result<&'a AnyCodec, anyhow::Error> {
    registry.get(name).ok_or_else(|| {
        let known: Vec<&str> = registry.names().collect();
        anyhow::anyhow!("No codec named '{}' (known: {})", name, known.join(", "))
    })
}

fn write_output(bytes: &[u8], raw: bool) -> Result<(), anyhow::Error> {
    let mut stdout = std::io::stdout().lock();
    if raw {
        stdout.write_all(bytes)?;
    } else {
        writeln!(stdout, "{}", hex::encode(bytes))?;
    }
    stdout.flush()?;
    Ok(())
}

fn list(registry: &CodecRegistry, json: bool) -> Result<(), anyhow::Error> {
    let summaries: Vec<CodecSummary> = registry
        .iter()
        .map(|(name, codec)| CodecSummary {
            name: name.to_string(),
            kind: codec.kind().to_string(),
            policy: match codec.policy() {
                DecodePolicy::Lenient => "lenient",
                DecodePolicy::Strict => "strict",
            },
            absorbs: codec.absorption().is_some(),
            arg: codec.arg(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in &summaries {
        println!(
            "{:<20} {:<12} {:<8} absorbs={:<5} arg={}",
            summary.name,
            summary.kind,
            summary.policy,
            summary.absorbs,
            summary
                .arg
                .as_ref()
                .map_or_else(|| "-".to_string(), |arg| format!("{arg:?}"))
        );
    }
    Ok(())
}

fn absorb_report(codec: &AnyCodec, blob: &[u8], all: bool) -> Result<AbsorbReport, anyhow::Error> {
    let absorbed = if all {
        absorb_all(codec, blob)?
    } else {
        vec![absorb(codec, blob)?]
    };

    let mut offset = 0;
    let units = absorbed
        .into_iter()
        .map(|unit| {
            let report = UnitReport {
                offset,
                consumed: unit.consumed,
                value: hex::encode(&unit.value),
            };
            offset += unit.consumed;
            report
        })
        .collect();

    Ok(AbsorbReport {
        units,
        remaining: hex::encode(blob.get(offset..).unwrap_or_default()),
    })
}

fn run_absorb(codec: &AnyCodec, blob: &[u8], all: bool, json: bool) -> Result<(), anyhow::Error> {
    let report = absorb_report(codec, blob, all)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for unit in &report.units {
        println!(
            "offset={} consumed={} value={}",
            unit.offset, unit.consumed, unit.value
        );
    }
    if !report.remaining.is_empty() {
        println!("remaining={}", report.remaining);
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(cli.config_file)?;
    log::debug!("Effective configuration: {config:#?}");
    let registry = CodecRegistry::from_config(&config)?;

    match cli.command {
        Command::List { json } => list(&registry, json),
        Command::Encode(args) => {
            let codec = lookup(&registry, &args.codec)?;
            let encoded = codec.encode(&args.input.read()?)?;
            write_output(&encoded, args.raw)
        }
        Command::Decode(args) => {
            let codec = lookup(&registry, &args.codec)?;
            let decoded = codec.decode(&args.input.read()?)?;
            if decoded.is_empty() && codec.policy() == DecodePolicy::Lenient {
                log::warn!(
                    "{} codec is lenient: an empty result may mean the input was not recognized",
                    codec.kind()
                );
            }
            write_output(&decoded, args.raw)
        }
        Command::Absorb {
            input,
            codec,
            all,
            json,
        } => {
            let codec = lookup(&registry, &codec)?;
            run_absorb(codec, &input.read()?, all, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{CodecKind, new_codec};

    #[test]
    fn single_absorb_reports_the_unconsumed_tail() {
        let codec = new_codec(CodecKind::BitInvert, None).unwrap();
        let report = absorb_report(&codec, &[0x01, 0xaa, 0xbb], false).unwrap();
        assert_eq!(
            report.units,
            vec![UnitReport {
                offset: 0,
                consumed: 1,
                value: "80".to_string(),
            }]
        );
        assert_eq!(report.remaining, "aabb");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["remaining"], "aabb");
    }

    #[test]
    fn absorbing_everything_leaves_nothing_remaining() {
        let codec = new_codec(CodecKind::BitInvert, None).unwrap();
        let report = absorb_report(&codec, &[0x01, 0x02], true).unwrap();
        assert_eq!(report.units.len(), 2);
        assert_eq!(report.units[1].offset, 1);
        assert_eq!(report.remaining, "");
    }

    #[test]
    fn framing_codec_cannot_be_absorbed() {
        let codec = new_codec(
            CodecKind::Framing,
            Some(&weft_core::CodecArg::framing(Some(b"<"), Some(b">"))),
        )
        .unwrap();
        assert!(absorb_report(&codec, b"<a>", false).is_err());
    }
}
