//! Single-loop series DC solve.

use std::collections::HashMap;

use serde::Serialize;

use crate::circuit::{ComponentId, TopologyReport};
use crate::components::{Component, ComponentProps};

use super::MIN_LOOP_RESISTANCE;

/// One current path for downstream flow animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentFlow {
    /// The loop's component ids, in cyclic order.
    pub path: Vec<ComponentId>,
    /// Loop current in amperes.
    pub current: f64,
    /// Traversal direction along `path`; always +1.
    pub direction: i8,
}

/// Everything the solver computed for one circuit state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcSolution {
    pub total_voltage: f64,
    pub total_resistance: f64,
    pub total_current: f64,
    pub component_currents: HashMap<ComponentId, f64>,
    pub component_voltages: HashMap<ComponentId, f64>,
    pub flows: Vec<CurrentFlow>,
}

impl DcSolution {
    /// The defined result when no loop carries current: zero everything,
    /// infinite resistance, no flows.
    pub fn zero() -> Self {
        Self {
            total_voltage: 0.0,
            total_resistance: f64::INFINITY,
            total_current: 0.0,
            component_currents: HashMap::new(),
            component_voltages: HashMap::new(),
            flows: Vec::new(),
        }
    }

    /// Whether any current is flowing.
    pub fn is_live(&self) -> bool {
        self.total_current != 0.0
    }

    /// Solved current through a component, zero if it is not in the
    /// solved loop.
    pub fn current_through(&self, id: ComponentId) -> f64 {
        self.component_currents.get(&id).copied().unwrap_or(0.0)
    }

    /// Solved voltage across a component, zero if it is not in the
    /// solved loop.
    pub fn voltage_across(&self, id: ComponentId) -> f64 {
        self.component_voltages.get(&id).copied().unwrap_or(0.0)
    }
}

impl Default for DcSolution {
    fn default() -> Self {
        Self::zero()
    }
}

/// Solve the circuit.
///
/// Walks the discovered loops in order and returns the first one that
/// carries current, solved as a series circuit. Callers are expected to
/// check `can_run` first; called on a circuit that cannot run, this
/// returns [`DcSolution::zero`].
pub fn solve(components: &[Component], topology: &TopologyReport) -> DcSolution {
    let lookup: HashMap<ComponentId, &Component> =
        components.iter().map(|c| (c.id, c)).collect();

    for members in &topology.loops {
        if let Some(solution) = solve_loop(members, &lookup) {
            return solution;
        }
    }
    DcSolution::zero()
}

/// Solve one loop as a series circuit, or `None` if an open switch
/// interrupts it.
fn solve_loop(
    members: &[ComponentId],
    lookup: &HashMap<ComponentId, &Component>,
) -> Option<DcSolution> {
    let open = members.iter().any(|id| {
        lookup
            .get(id)
            .is_some_and(|c| c.props.is_open_switch())
    });
    if open {
        return None;
    }

    let mut total_voltage = 0.0;
    let mut total_resistance = 0.0;
    for id in members {
        let Some(component) = lookup.get(id) else {
            continue;
        };
        if let Some(volts) = component.props.source_voltage() {
            total_voltage += volts;
        }
        if let Some(ohms) = component.props.resistance() {
            total_resistance += ohms;
        }
    }
    if total_resistance == 0.0 {
        total_resistance = MIN_LOOP_RESISTANCE;
    }
    let total_current = total_voltage / total_resistance;

    let mut component_currents = HashMap::with_capacity(members.len());
    let mut component_voltages = HashMap::with_capacity(members.len());
    for id in members {
        let Some(component) = lookup.get(id) else {
            continue;
        };
        component_currents.insert(*id, total_current);
        let volts = match &component.props {
            ComponentProps::Resistor(_) | ComponentProps::Lamp(_) => {
                let ohms = component.props.resistance().unwrap_or(0.0);
                total_current * ohms
            }
            ComponentProps::Battery(b) => b.voltage,
            ComponentProps::Switch(_) => 0.0,
        };
        component_voltages.insert(*id, volts);
    }

    Some(DcSolution {
        total_voltage,
        total_resistance,
        total_current,
        component_currents,
        component_voltages,
        flows: vec![CurrentFlow {
            path: members.to_vec(),
            current: total_current,
            direction: 1,
        }],
    })
}

/// Apply the lamp post-pass to live component state: every lamp gets its
/// brightness and burnout latch updated from the solved voltage and
/// current (zero for lamps outside the solved loop).
pub fn apply_lamp_glow(components: &mut [Component], solution: &DcSolution) {
    for component in components.iter_mut() {
        let voltage = solution.voltage_across(component.id);
        let current = solution.current_through(component.id);
        if let Some(lamp) = component.props.as_lamp_mut() {
            let glow = lamp.glow(voltage, current);
            lamp.set_glow(glow);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuit::{
        analyze, Connection, ConnectionId, Endpoint, Point, Rotation, TerminalId,
    };
    use crate::components::{ComponentKind, PropertyPatch};

    fn component(id: u64, kind: ComponentKind) -> Component {
        Component::new(ComponentId(id), kind, Point::default(), Rotation::R0)
    }

    fn wire(id: u64, from: (u64, usize), to: (u64, usize)) -> Connection {
        Connection {
            id: ConnectionId(id),
            from: Endpoint::new(ComponentId(from.0), TerminalId(from.1)),
            to: Endpoint::new(ComponentId(to.0), TerminalId(to.1)),
            points: vec![],
        }
    }

    /// Battery(9V) and resistor(100R) in a ring.
    fn battery_resistor_ring() -> (Vec<Component>, Vec<Connection>) {
        let components = vec![
            component(1, ComponentKind::Battery),
            component(2, ComponentKind::Resistor),
        ];
        let connections = vec![wire(10, (1, 1), (2, 0)), wire(11, (2, 1), (1, 0))];
        (components, connections)
    }

    #[test]
    fn ohms_law_round_trip() {
        let (components, connections) = battery_resistor_ring();
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);

        assert_relative_eq!(solution.total_current, 0.09);
        assert_relative_eq!(solution.voltage_across(ComponentId(2)), 9.0);
        assert_relative_eq!(solution.voltage_across(ComponentId(1)), 9.0);
        assert_relative_eq!(solution.current_through(ComponentId(1)), 0.09);
        assert_eq!(solution.flows.len(), 1);
        assert_eq!(solution.flows[0].direction, 1);
    }

    #[test]
    fn open_switch_suppresses_current() {
        let mut components = vec![
            component(1, ComponentKind::Battery),
            component(2, ComponentKind::Resistor),
            component(3, ComponentKind::Switch),
        ];
        components[2].props.apply(&PropertyPatch::closed(false));
        let connections = vec![
            wire(10, (1, 1), (2, 0)),
            wire(11, (2, 1), (3, 0)),
            wire(12, (3, 1), (1, 0)),
        ];
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);

        assert_eq!(solution.total_current, 0.0);
        assert!(solution.total_resistance.is_infinite());
        assert!(solution.flows.is_empty());
        assert!(!solution.is_live());
    }

    #[test]
    fn zero_resistance_loop_gets_the_nominal_floor() {
        // Battery ringed through a closed switch: nothing resistive.
        let components = vec![
            component(1, ComponentKind::Battery),
            component(2, ComponentKind::Switch),
        ];
        let connections = vec![wire(10, (1, 1), (2, 0)), wire(11, (2, 1), (1, 0))];
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);

        assert_relative_eq!(solution.total_resistance, MIN_LOOP_RESISTANCE);
        assert_relative_eq!(solution.total_current, 900.0);
        assert_relative_eq!(solution.voltage_across(ComponentId(2)), 0.0);
    }

    #[test]
    fn switch_voltage_is_zero_in_a_live_loop() {
        let mut components = vec![
            component(1, ComponentKind::Battery),
            component(2, ComponentKind::Resistor),
            component(3, ComponentKind::Switch),
        ];
        components[2].props.apply(&PropertyPatch::closed(true));
        let connections = vec![
            wire(10, (1, 1), (2, 0)),
            wire(11, (2, 1), (3, 0)),
            wire(12, (3, 1), (1, 0)),
        ];
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);

        assert_relative_eq!(solution.total_current, 0.09);
        assert_relative_eq!(solution.voltage_across(ComponentId(3)), 0.0);
        assert_relative_eq!(solution.current_through(ComponentId(3)), 0.09);
    }

    #[test]
    fn first_qualifying_loop_wins() {
        // Loop A is interrupted; loop B must be solved instead.
        let mut interrupted = component(9, ComponentKind::Switch);
        interrupted.props.apply(&PropertyPatch::closed(false));
        let components = vec![
            component(1, ComponentKind::Battery),
            interrupted,
            component(2, ComponentKind::Resistor),
        ];
        let topology = TopologyReport {
            loops: vec![
                vec![ComponentId(1), ComponentId(9)],
                vec![ComponentId(1), ComponentId(2)],
            ],
            disconnected: vec![],
            is_connected: true,
            has_loops: true,
        };
        let solution = solve(&components, &topology);
        assert_relative_eq!(solution.total_current, 0.09);
        assert_eq!(
            solution.flows[0].path,
            vec![ComponentId(1), ComponentId(2)]
        );
    }

    #[test]
    fn lamp_scenario_end_to_end() {
        // Battery(9V) -> resistor(100R) -> lamp(50R, min 1.5V, max 0.2A).
        let mut components = vec![
            component(1, ComponentKind::Battery),
            component(2, ComponentKind::Resistor),
            component(3, ComponentKind::Lamp),
        ];
        let connections = vec![
            wire(10, (1, 1), (2, 0)),
            wire(11, (2, 1), (3, 0)),
            wire(12, (3, 1), (1, 0)),
        ];
        let topology = analyze(&components, &connections);
        let solution = solve(&components, &topology);

        assert_relative_eq!(solution.total_current, 0.06);
        assert_relative_eq!(solution.voltage_across(ComponentId(3)), 3.0);

        apply_lamp_glow(&mut components, &solution);
        let lamp = components[2].props.as_lamp().unwrap();
        assert!(!lamp.burned_out);
        assert!(lamp.brightness > 20.0 && lamp.brightness < 100.0);
    }

    #[test]
    fn burnout_latches_across_solves() {
        let mut components = vec![
            component(1, ComponentKind::Battery),
            component(2, ComponentKind::Lamp),
        ];
        // A fragile lamp: 9V across 50R pushes 0.18A past a 0.1A rating.
        components[1].props.apply(&PropertyPatch {
            max_current: Some(0.1),
            ..PropertyPatch::default()
        });
        let connections = vec![wire(10, (1, 1), (2, 0)), wire(11, (2, 1), (1, 0))];
        let topology = analyze(&components, &connections);

        let solution = solve(&components, &topology);
        assert!(solution.total_current > 0.1);
        apply_lamp_glow(&mut components, &solution);
        assert!(components[1].props.as_lamp().unwrap().burned_out);

        // Burned out: every later solve keeps the lamp dark.
        let again = solve(&components, &topology);
        apply_lamp_glow(&mut components, &again);
        let lamp = components[1].props.as_lamp().unwrap();
        assert!(lamp.burned_out);
        assert_eq!(lamp.brightness, 0.0);

        // External reset clears the latch.
        components[1].props.apply(&PropertyPatch::reset_burnout());
        assert!(!components[1].props.as_lamp().unwrap().burned_out);
    }
}
