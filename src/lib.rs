//! # Voltlab Core
//!
//! An interactive DC circuit sandbox and simulation engine.
//!
//! This library provides:
//! - A circuit data model (components, terminals, connections) and an
//!   editor that keeps it consistent under arbitrary edit sequences
//! - Topology analysis: loop discovery and connectivity over the
//!   component/connection graph
//! - Validation: structured findings (short circuit, open circuit,
//!   missing battery, ...) and a single can-run verdict
//! - A series DC solver: per-loop Ohm's-law solve with per-component
//!   voltage/current/power and lamp brightness/burnout
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Data model, editor, topology analyzer, and validator
//! - [`components`] - Component property models (battery, resistor, lamp, switch)
//! - [`solver`] - Series DC solve and display summary
//! - [`workbench`] - Facade tying editing, analysis, and the simulation
//!   lifecycle together
//!
//! ## Usage
//!
//! ```
//! use voltlab_core::{ComponentKind, Endpoint, Point, TerminalId, Workbench};
//!
//! let mut bench = Workbench::new();
//! let battery = bench.add_component(ComponentKind::Battery, Point::new(0.0, 0.0));
//! let lamp = bench.add_component(ComponentKind::Lamp, Point::new(200.0, 0.0));
//! bench.add_connection(
//!     Endpoint::new(battery, TerminalId(1)),
//!     Endpoint::new(lamp, TerminalId(0)),
//! );
//! bench.add_connection(
//!     Endpoint::new(lamp, TerminalId(1)),
//!     Endpoint::new(battery, TerminalId(0)),
//! );
//!
//! if bench.start() {
//!     let live = bench.live().unwrap();
//!     println!("loop current: {} A", live.total_current);
//! }
//! ```
//!
//! ## Simulation method
//!
//! Every discovered loop is treated as an independent series circuit:
//! battery voltages sum, resistor/lamp resistances sum, and Ohm's law
//! gives one current for the whole loop. Parallel loops are never
//! combined into a mesh system; the first loop that carries current is
//! the one reported. See [`solver`] for details.

pub mod circuit;
pub mod components;
pub mod error;
pub mod solver;
pub mod workbench;

// Re-export main types for convenience
pub use circuit::{
    CircuitEditor, CircuitSnapshot, ComponentId, ConnectionId, Endpoint, Finding, FindingKind,
    Point, Rotation, Selection, Severity, TerminalId, TopologyReport, ValidationReport,
};
pub use components::{ComponentKind, PropertyPatch};
pub use error::{Result, VoltlabError};
pub use solver::{AnalysisSummary, DcSolution};
pub use workbench::{Analysis, SimPhase, Workbench};
