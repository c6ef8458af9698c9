//! Circuit representation, editing, and analysis.
//!
//! This module provides the data model for components, terminals, and
//! connections, the [`CircuitEditor`] that keeps them consistent under
//! arbitrary edit sequences, the topology analyzer that discovers loops
//! and disconnected parts, and the validator that decides whether the
//! circuit is safe and complete.

mod state;
mod topology;
mod types;
mod validate;

pub use state::{CircuitEditor, CircuitSnapshot};
pub use topology::{analyze, TopologyReport};
pub use types::*;
pub use validate::{
    validate_circuit, Finding, FindingKind, Severity, ValidationReport, SHORT_CIRCUIT_THRESHOLD,
};
