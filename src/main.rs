//! Voltlab - DC circuit sandbox
//!
//! Loads a circuit snapshot, validates it, and prints the DC analysis.
//!
//! # Usage
//!
//! ```bash
//! voltlab circuit.json
//! voltlab --pretty circuit.json   # re-emit the sanitized snapshot
//! ```

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use voltlab_core::{
    error::{Result, VoltlabError},
    CircuitSnapshot, Workbench,
};

/// DC circuit sandbox: validate and solve a circuit snapshot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit snapshot file (.json)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Re-emit the sanitized snapshot as pretty JSON instead of simulating
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read and decode the snapshot
    let text = fs::read_to_string(&args.circuit_file)
        .map_err(|e| VoltlabError::file_read(&args.circuit_file, e))?;
    let snapshot: CircuitSnapshot = serde_json::from_str(&text)?;

    // Load (and sanitize) into a workbench
    let mut bench = Workbench::new();
    bench.load(snapshot);

    if args.pretty {
        let out = serde_json::to_string_pretty(&bench.editor().snapshot())
            .map_err(|source| VoltlabError::SnapshotEncode { source })?;
        println!("{out}");
        return Ok(());
    }

    let validation = bench.analysis().validation.clone();
    for finding in &validation.findings {
        println!("[{}] {}", finding.severity, finding.message);
    }

    if !validation.can_run() {
        println!("Circuit cannot run.");
        return Ok(());
    }

    let summary = bench.summary();
    println!(
        "Total: {} V, {} A, {} Ω, {} W",
        summary.total_voltage, summary.total_current, summary.total_resistance, summary.power
    );
    for row in &summary.rows {
        println!(
            "  {:<14} {:<10} {:>8} V {:>8} A {:>8} W",
            row.label, row.value, row.voltage, row.current, row.power
        );
    }

    Ok(())
}
