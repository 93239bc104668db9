use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codec::{catalogue, CodecLimits, Registry, WireLimits};
use log::{info, warn};
use opdec_tools::{
    collect_files, decode_file, format_pretty, registration_rows, DecodeReport,
};
use protocol::{Opcode, ProtocolBuild};

#[derive(Parser)]
#[command(
    name = "opdec-tools",
    version,
    about = "Decode captured messages with the opdec catalogue"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    limits: LimitArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct LimitArgs {
    /// Largest accepted message payload.
    #[arg(long, global = true)]
    max_message_bytes: Option<usize>,
    /// Largest accepted repeat count.
    #[arg(long, global = true)]
    max_list_entries: Option<usize>,
    /// Largest accepted inflated size.
    #[arg(long, global = true)]
    max_inflated_bytes: Option<usize>,
}

impl LimitArgs {
    fn wire(&self) -> WireLimits {
        let mut limits = WireLimits::default();
        if let Some(value) = self.max_message_bytes {
            limits.max_message_bytes = value;
        }
        limits
    }

    fn codec(&self) -> CodecLimits {
        let mut limits = CodecLimits::default();
        if let Some(value) = self.max_list_entries {
            limits.max_list_entries = value;
        }
        if let Some(value) = self.max_inflated_bytes {
            limits.max_inflated_bytes = value;
        }
        limits
    }
}

#[derive(Args)]
struct Target {
    /// Opcode name, e.g. SMSG_CHAR_ENUM.
    #[arg(long)]
    opcode: Opcode,
    /// Numeric build the message was captured at.
    #[arg(long)]
    build: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one raw message payload.
    Decode {
        /// Path to the payload bytes.
        file: PathBuf,
        #[command(flatten)]
        target: Target,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Decode every payload in a directory, continuing past failures.
    DecodeDir {
        /// Directory of payload files.
        dir: PathBuf,
        #[command(flatten)]
        target: Target,
        /// Only decode files matching this glob.
        #[arg(long)]
        glob: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// List catalogue registrations and the catalogue fingerprint.
    Handlers {
        /// Only list this opcode.
        #[arg(long)]
        opcode: Option<Opcode>,
    },
    /// Show which procedure a build selects.
    Resolve {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let registry = catalogue().context("build catalogue")?;
    let wire_limits = cli.limits.wire();
    let limits = cli.limits.codec();

    match cli.command {
        Command::Decode {
            file,
            target,
            format,
        } => {
            let report = decode_file(
                &registry,
                &file,
                target.opcode,
                ProtocolBuild::new(target.build),
                &wire_limits,
                &limits,
            )?;
            print_report(&report, format)?;
        }
        Command::DecodeDir {
            dir,
            target,
            glob,
            format,
        } => {
            let files = collect_files(&dir, glob.as_deref())?;
            let build = ProtocolBuild::new(target.build);
            let mut failed = 0usize;
            for file in &files {
                let report =
                    match decode_file(&registry, file, target.opcode, build, &wire_limits, &limits)
                    {
                        Ok(report) => report,
                        Err(err) => {
                            warn!("{err:#}");
                            failed += 1;
                            continue;
                        }
                    };
                if !report.is_ok() {
                    failed += 1;
                }
                print_report(&report, format)?;
            }
            info!("decoded {} files, {failed} failed", files.len());
        }
        Command::Handlers { opcode } => {
            print_handlers(&registry, opcode);
        }
        Command::Resolve { target } => {
            let build = ProtocolBuild::new(target.build);
            let registration = registry
                .resolve(target.opcode, build)
                .with_context(|| format!("resolve {} at {build}", target.opcode))?;
            println!(
                "{} @ {build} -> {} {}",
                target.opcode, registration.name, registration.range
            );
        }
    }
    Ok(())
}

fn print_report(report: &DecodeReport, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(report).context("serialize json")?;
            println!("{json}");
        }
        Format::Pretty => print!("{}", format_pretty(report)),
    }
    Ok(())
}

fn print_handlers(registry: &Registry, opcode: Option<Opcode>) {
    let rows = registration_rows(registry, opcode);
    let width = rows
        .iter()
        .map(|row| row.opcode.name().len())
        .max()
        .unwrap_or(0);
    for row in &rows {
        println!(
            "{:width$}  {:<18}  {}",
            row.opcode.name(),
            row.range.to_string(),
            row.handler
        );
    }
    println!("{} registrations", rows.len());
    println!("fingerprint: 0x{:016x}", registry.fingerprint());
}
