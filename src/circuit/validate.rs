//! Circuit validation.
//!
//! Classifies the current circuit using the topology report plus component
//! state. Findings are data, never errors: the engine reports them and the
//! UI decides how to show them. Only `Error`-severity findings block the
//! simulation from running.

use std::collections::HashMap;

use serde::Serialize;

use crate::circuit::topology::TopologyReport;
use crate::circuit::types::{ComponentId, Connection};
use crate::components::Component;

/// Resistance floor below which a battery loop with no resistive element
/// is classified as a short circuit, in ohms.
pub const SHORT_CIRCUIT_THRESHOLD: f64 = 1.0;

/// How serious a finding is. Only errors make the circuit invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// The closed set of circuit findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    NoBattery,
    DisconnectedComponents,
    ShortCircuit,
    OpenCircuit,
    AllSwitchesOpen,
}

impl FindingKind {
    /// Fixed severity per kind.
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::NoBattery | FindingKind::ShortCircuit => Severity::Error,
            FindingKind::DisconnectedComponents | FindingKind::OpenCircuit => Severity::Warning,
            FindingKind::AllSwitchesOpen => Severity::Info,
        }
    }
}

/// One validation finding with a display message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

/// The validator's verdict over one circuit state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    /// No error-severity findings.
    pub is_valid: bool,
    /// Valid, at least one loop exists, and at least one loop carries no
    /// open switch.
    pub has_completed_circuit: bool,
}

impl ValidationReport {
    /// Whether the simulation toggle may start. Identical to
    /// [`has_completed_circuit`](Self::has_completed_circuit).
    pub fn can_run(&self) -> bool {
        self.has_completed_circuit
    }

    /// Findings at error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }
}

/// Validate the circuit against the analyzed topology.
pub fn validate_circuit(
    components: &[Component],
    connections: &[Connection],
    topology: &TopologyReport,
) -> ValidationReport {
    let props: HashMap<ComponentId, &Component> =
        components.iter().map(|c| (c.id, c)).collect();
    let mut findings = Vec::new();

    let battery_count = components
        .iter()
        .filter(|c| c.props.source_voltage().is_some())
        .count();
    if battery_count == 0 {
        findings.push(Finding::new(
            FindingKind::NoBattery,
            "Circuit has no battery, so nothing drives a current",
        ));
    }

    if !topology.disconnected.is_empty() {
        findings.push(Finding::new(
            FindingKind::DisconnectedComponents,
            format!(
                "{} component(s) are not connected to the main circuit",
                topology.disconnected.len()
            ),
        ));
    }

    if topology.loops.iter().any(|l| is_short_circuit(l, &props)) {
        findings.push(Finding::new(
            FindingKind::ShortCircuit,
            "Short circuit: a battery loop contains no resistive element",
        ));
    }

    if !components.is_empty() && !connections.is_empty() && topology.loops.is_empty() {
        findings.push(Finding::new(
            FindingKind::OpenCircuit,
            "Circuit is not closed: no complete loop was found",
        ));
    }

    let closed_loop_exists = topology
        .loops
        .iter()
        .any(|l| !loop_has_open_switch(l, &props));
    if topology.has_loops && !closed_loop_exists {
        findings.push(Finding::new(
            FindingKind::AllSwitchesOpen,
            "Every loop is interrupted by an open switch",
        ));
    }

    let is_valid = !findings.iter().any(|f| f.severity == Severity::Error);
    let has_completed_circuit = is_valid && topology.has_loops && closed_loop_exists;

    ValidationReport {
        findings,
        is_valid,
        has_completed_circuit,
    }
}

/// A loop is a short circuit when it contains at least one battery, its
/// resistive elements sum below [`SHORT_CIRCUIT_THRESHOLD`], and it holds
/// no resistive element at all. Loops with any resistor or lamp are never
/// flagged, however small their resistance; that threshold is part of the
/// observable contract.
fn is_short_circuit(members: &[ComponentId], props: &HashMap<ComponentId, &Component>) -> bool {
    let mut has_battery = false;
    let mut resistive_sum = 0.0;
    let mut resistive_count = 0usize;
    for id in members {
        let Some(component) = props.get(id) else {
            continue;
        };
        if component.props.source_voltage().is_some() {
            has_battery = true;
        }
        if let Some(ohms) = component.props.resistance() {
            resistive_sum += ohms;
            resistive_count += 1;
        }
    }
    has_battery && resistive_sum < SHORT_CIRCUIT_THRESHOLD && resistive_count == 0
}

fn loop_has_open_switch(
    members: &[ComponentId],
    props: &HashMap<ComponentId, &Component>,
) -> bool {
    members.iter().any(|id| {
        props
            .get(id)
            .is_some_and(|c| c.props.is_open_switch())
    })
}
