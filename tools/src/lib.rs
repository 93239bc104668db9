//! Inspection helpers behind the `opdec-tools` binary.
//!
//! - Decode one raw message file into a record tree and a state snapshot
//! - Decode every matching file in a directory, continuing past failures
//! - List catalogue registrations and resolve a build to its procedure
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what a procedure recorded.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codec::{
    decode_message, CodecLimits, DecodeSummary, InMemoryState, RecordNode, RecordTree, Registry,
    StateSnapshot, WireLimits,
};
use glob::Pattern;
use protocol::{BuildRange, Opcode, ProtocolBuild};
use serde::Serialize;
use wire::RawMessage;

/// Outcome of decoding one message.
#[derive(Debug, Serialize)]
pub struct DecodeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub opcode: Opcode,
    pub build: ProtocolBuild,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DecodeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub records: RecordTree,
    pub state: StateSnapshot,
}

impl DecodeReport {
    /// Returns `true` if the message decoded completely.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Decodes `payload` against a fresh in-memory state.
///
/// Decoding failures are part of the report; only I/O belongs to the
/// caller.
pub fn decode_bytes(
    registry: &Registry,
    opcode: Opcode,
    build: ProtocolBuild,
    payload: &[u8],
    wire_limits: &WireLimits,
    limits: &CodecLimits,
) -> DecodeReport {
    let state = InMemoryState::new();
    let mut records = RecordTree::new();
    let message = RawMessage::new(opcode, build, payload);
    let result = decode_message(
        registry,
        &message,
        &mut records,
        state.handles(),
        wire_limits,
        limits,
    );
    let (summary, error) = match result {
        Ok(summary) => (Some(summary), None),
        Err(err) => (None, Some(err.to_string())),
    };
    DecodeReport {
        file: None,
        opcode,
        build,
        summary,
        error,
        records,
        state: state.snapshot(),
    }
}

/// Reads and decodes one message file.
pub fn decode_file(
    registry: &Registry,
    path: &Path,
    opcode: Opcode,
    build: ProtocolBuild,
    wire_limits: &WireLimits,
    limits: &CodecLimits,
) -> Result<DecodeReport> {
    let bytes = fs::read(path).with_context(|| format!("read message {}", path.display()))?;
    let mut report = decode_bytes(registry, opcode, build, &bytes, wire_limits, limits);
    report.file = Some(path.to_path_buf());
    Ok(report)
}

/// Lists the files of `dir`, optionally filtered by a glob on the path or
/// the file name, sorted by path.
pub fn collect_files(dir: &Path, glob: Option<&str>) -> Result<Vec<PathBuf>> {
    let pattern = glob
        .map(|value| Pattern::new(value).context("invalid glob pattern"))
        .transpose()?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// One row of the registration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRow {
    pub opcode: Opcode,
    pub range: BuildRange,
    pub handler: &'static str,
}

/// Returns the registrations, optionally for one opcode only.
pub fn registration_rows(registry: &Registry, opcode: Option<Opcode>) -> Vec<RegistrationRow> {
    registry
        .registrations()
        .filter(|registration| opcode.map_or(true, |opcode| registration.opcode == opcode))
        .map(|registration| RegistrationRow {
            opcode: registration.opcode,
            range: registration.range,
            handler: registration.name,
        })
        .collect()
}

/// Renders a report as an indented tree.
pub fn format_pretty(report: &DecodeReport) -> String {
    let mut out = String::new();
    if let Some(file) = &report.file {
        let _ = writeln!(out, "== {} ==", file.display());
    }
    let _ = writeln!(out, "{} @ {}", report.opcode, report.build);
    match (&report.summary, &report.error) {
        (Some(summary), _) => {
            let _ = writeln!(
                out,
                "handler: {} trailing: {} bytes",
                summary.handler, summary.trailing_bytes
            );
        }
        (None, Some(error)) => {
            let _ = writeln!(out, "error: {error}");
        }
        (None, None) => {}
    }
    for node in report.records.nodes() {
        write_node(&mut out, node, 1);
    }
    if report.records.is_incomplete() {
        let _ = writeln!(out, "  (incomplete)");
    }
    if !report.state.names.is_empty() {
        let _ = writeln!(out, "names:");
        for (id, name) in &report.state.names {
            let _ = writeln!(out, "  {id}: {name}");
        }
    }
    out
}

fn write_node(out: &mut String, node: &RecordNode, depth: usize) {
    let pad = "  ".repeat(depth);
    match node {
        RecordNode::Field {
            name,
            indices,
            value,
        } => {
            let _ = writeln!(out, "{pad}{name}{}: {value}", format_indices(indices));
        }
        RecordNode::List {
            name,
            indices,
            children,
        } => {
            let _ = writeln!(
                out,
                "{pad}{name}{} [{} entries]",
                format_indices(indices),
                node.entry_count()
            );
            for child in children {
                write_node(out, child, depth + 1);
            }
        }
    }
}

fn format_indices(indices: &[usize]) -> String {
    indices.iter().map(|index| format!("[{index}]")).collect()
}
