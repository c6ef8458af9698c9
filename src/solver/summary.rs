//! Read-only analysis summary for display.
//!
//! Pure formatting over solver output. The rounding here is part of the
//! observable contract: voltage, resistance, and power round to two
//! decimal places, current to three.

use serde::Serialize;

use crate::circuit::ComponentId;
use crate::components::{Component, ComponentProps};

use super::dc::DcSolution;

/// One display row per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub id: ComponentId,
    /// Kind label plus id, e.g. "Battery C0".
    pub label: String,
    /// The component's primary property, formatted with its unit.
    pub value: String,
    /// Volts, rounded to 2 decimals.
    pub voltage: f64,
    /// Amperes, rounded to 3 decimals.
    pub current: f64,
    /// Watts, rounded to 2 decimals.
    pub power: f64,
}

/// Totals plus per-component rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_voltage: f64,
    pub total_current: f64,
    pub total_resistance: f64,
    /// `total_voltage * total_current`, rounded to 2 decimals.
    pub power: f64,
    pub rows: Vec<SummaryRow>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Format a quantity with its unit, trimming trailing zeros ("9 V",
/// "0.5 Ω").
fn format_quantity(value: f64, unit: &str) -> String {
    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{text} {unit}")
}

fn primary_value(props: &ComponentProps) -> String {
    match props {
        ComponentProps::Battery(b) => format_quantity(b.voltage, "V"),
        ComponentProps::Resistor(r) => format_quantity(r.resistance, "Ω"),
        ComponentProps::Lamp(l) => format_quantity(l.resistance, "Ω"),
        ComponentProps::Switch(s) => {
            if s.closed {
                "closed".to_string()
            } else {
                "open".to_string()
            }
        }
    }
}

/// Build the display summary for the given solution.
pub fn summarize(components: &[Component], solution: &DcSolution) -> AnalysisSummary {
    let rows = components
        .iter()
        .map(|component| {
            let voltage = solution.voltage_across(component.id);
            let current = solution.current_through(component.id);
            SummaryRow {
                id: component.id,
                label: format!("{} {}", component.kind().label(), component.id),
                value: primary_value(&component.props),
                voltage: round2(voltage),
                current: round3(current),
                power: round2(voltage * current),
            }
        })
        .collect();

    AnalysisSummary {
        total_voltage: round2(solution.total_voltage),
        total_current: round3(solution.total_current),
        total_resistance: round2(solution.total_resistance),
        power: round2(solution.total_voltage * solution.total_current),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuit::{
        analyze, ComponentId, Connection, ConnectionId, Endpoint, Point, Rotation, TerminalId,
    };
    use crate::components::{ComponentKind, PropertyPatch};
    use crate::solver::solve;

    fn ring(battery_volts: f64, resistor_ohms: f64) -> (Vec<Component>, Vec<Connection>) {
        let mut battery = Component::new(
            ComponentId(1),
            ComponentKind::Battery,
            Point::default(),
            Rotation::R0,
        );
        battery.props.apply(&PropertyPatch::voltage(battery_volts));
        let mut resistor = Component::new(
            ComponentId(2),
            ComponentKind::Resistor,
            Point::default(),
            Rotation::R0,
        );
        resistor
            .props
            .apply(&PropertyPatch::resistance(resistor_ohms));
        let connections = vec![
            Connection {
                id: ConnectionId(10),
                from: Endpoint::new(ComponentId(1), TerminalId(1)),
                to: Endpoint::new(ComponentId(2), TerminalId(0)),
                points: vec![],
            },
            Connection {
                id: ConnectionId(11),
                from: Endpoint::new(ComponentId(2), TerminalId(1)),
                to: Endpoint::new(ComponentId(1), TerminalId(0)),
                points: vec![],
            },
        ];
        (vec![battery, resistor], connections)
    }

    #[test]
    fn rounds_current_to_three_and_power_to_two() {
        // 10V over 300R: I = 0.0333..., P = 0.3333...
        let (components, connections) = ring(10.0, 300.0);
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);
        let summary = summarize(&components, &solution);

        assert_relative_eq!(summary.total_current, 0.033);
        assert_relative_eq!(summary.power, 0.33);
        assert_relative_eq!(summary.total_voltage, 10.0);
        assert_relative_eq!(summary.total_resistance, 300.0);
    }

    #[test]
    fn rows_carry_labels_and_units() {
        let (components, connections) = ring(9.0, 100.0);
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);
        let summary = summarize(&components, &solution);

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].label, "Battery C1");
        assert_eq!(summary.rows[0].value, "9 V");
        assert_eq!(summary.rows[1].value, "100 Ω");
        assert_relative_eq!(summary.rows[1].voltage, 9.0);
        assert_relative_eq!(summary.rows[1].current, 0.09);
        assert_relative_eq!(summary.rows[1].power, 0.81);
    }

    #[test]
    fn zero_solution_summarizes_to_zeros() {
        let (components, _) = ring(9.0, 100.0);
        let summary = summarize(&components, &DcSolution::zero());
        assert_eq!(summary.total_current, 0.0);
        assert!(summary.total_resistance.is_infinite());
        assert!(summary.rows.iter().all(|r| r.power == 0.0));
    }
}
