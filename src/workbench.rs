//! Top-level engine facade.
//!
//! [`Workbench`] owns the circuit editor and recomputes analysis
//! (topology, validation, solver output) atomically and memoized: every
//! mutation routes through the workbench and marks the analysis dirty, so
//! a caller can never pair a validation report with a solver result from
//! a different circuit state.
//!
//! The simulation lifecycle is a two-phase flag. Starting re-snapshots
//! the current solver output; while running, further edits leave that
//! snapshot untouched until an explicit [`refresh`](Workbench::refresh)
//! (or stop/start), so the display never mutates under the user silently.

use crate::circuit::{
    analyze, validate_circuit, CircuitEditor, CircuitSnapshot, ComponentId, ConnectionId,
    Endpoint, Point, Rotation, Selection, TopologyReport, ValidationReport,
};
use crate::components::{ComponentKind, PropertyPatch};
use crate::solver::{apply_lamp_glow, solve, summarize, AnalysisSummary, DcSolution};

/// Topology, validation, and solver output computed together over one
/// circuit state.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub topology: TopologyReport,
    pub validation: ValidationReport,
    pub solution: DcSolution,
}

/// Simulation lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimPhase {
    #[default]
    Idle,
    Running,
}

/// The engine: editor + memoized analysis + simulation lifecycle.
#[derive(Debug, Default)]
pub struct Workbench {
    editor: CircuitEditor,
    /// Memoized analysis; `None` after any mutation.
    cached: Option<Analysis>,
    phase: SimPhase,
    /// Solver snapshot shown while running.
    live: Option<DcSolution>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the circuit state. Mutations must go through the
    /// workbench so the analysis cache stays honest.
    pub fn editor(&self) -> &CircuitEditor {
        &self.editor
    }

    // ------------ mutations (invalidate the analysis) ------------

    pub fn add_component(&mut self, kind: ComponentKind, position: Point) -> ComponentId {
        let id = self.editor.add_component(kind, position);
        self.invalidate();
        id
    }

    pub fn add_component_rotated(
        &mut self,
        kind: ComponentKind,
        position: Point,
        rotation: Rotation,
    ) -> ComponentId {
        let id = self.editor.add_component_rotated(kind, position, rotation);
        self.invalidate();
        id
    }

    pub fn update_properties(&mut self, id: ComponentId, patch: &PropertyPatch) -> bool {
        let changed = self.editor.update_properties(id, patch);
        if changed {
            self.invalidate();
        }
        changed
    }

    pub fn update_position(&mut self, id: ComponentId, position: Point) -> bool {
        // Geometry only, but wires were rewritten; cheap to invalidate.
        let changed = self.editor.update_position(id, position);
        if changed {
            self.invalidate();
        }
        changed
    }

    pub fn rotate(&mut self, id: ComponentId) -> bool {
        self.editor.rotate(id)
    }

    pub fn delete_component(&mut self, id: ComponentId) -> bool {
        let changed = self.editor.delete_component(id);
        if changed {
            self.invalidate();
        }
        changed
    }

    pub fn add_connection(&mut self, from: Endpoint, to: Endpoint) -> Option<ConnectionId> {
        self.add_connection_with_points(from, to, None)
    }

    pub fn add_connection_with_points(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        points: Option<Vec<Point>>,
    ) -> Option<ConnectionId> {
        let id = self.editor.add_connection_with_points(from, to, points);
        if id.is_some() {
            self.invalidate();
        }
        id
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        let changed = self.editor.delete_connection(id);
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Replace the whole circuit. Does not touch the simulation phase:
    /// while running, the previous live snapshot stays on display until
    /// the caller stops or refreshes, like any other edit.
    pub fn load(&mut self, snapshot: CircuitSnapshot) {
        self.editor.load(snapshot);
        self.invalidate();
    }

    pub fn clear(&mut self) {
        self.editor.clear();
        self.invalidate();
    }

    // ------------ selection (no electrical effect) ------------

    pub fn select_component(&mut self, id: ComponentId) -> bool {
        self.editor.select_component(id)
    }

    pub fn select_connection(&mut self, id: ConnectionId) -> bool {
        self.editor.select_connection(id)
    }

    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    pub fn selection(&self) -> Selection {
        self.editor.selection()
    }

    // ------------ analysis ------------

    /// The analysis for the current circuit state, recomputing if a
    /// mutation happened since the last call. Recomputing also applies
    /// the lamp brightness/burnout pass to the live component state.
    pub fn analysis(&mut self) -> &Analysis {
        if self.cached.is_none() {
            let analysis = self.recompute();
            self.cached = Some(analysis);
        }
        self.cached.get_or_insert_with(Analysis::default)
    }

    /// Display summary over the current analysis.
    pub fn summary(&mut self) -> AnalysisSummary {
        let solution = self.analysis().solution.clone();
        summarize(self.editor.components(), &solution)
    }

    fn recompute(&mut self) -> Analysis {
        let topology = analyze(self.editor.components(), self.editor.connections());
        let validation =
            validate_circuit(self.editor.components(), self.editor.connections(), &topology);
        let solution = if validation.can_run() {
            solve(self.editor.components(), &topology)
        } else {
            DcSolution::zero()
        };
        // Lamp state is part of the recompute, not a separate mutation:
        // it must not re-dirty the cache.
        apply_lamp_glow(self.editor.components_mut(), &solution);
        Analysis {
            topology,
            validation,
            solution,
        }
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    // ------------ simulation lifecycle ------------

    /// Start the simulation: re-snapshot the current solver output as the
    /// live view. Refused (false) when the circuit cannot run.
    pub fn start(&mut self) -> bool {
        let solution = {
            let analysis = self.analysis();
            if !analysis.validation.can_run() {
                tracing::info!("simulation start refused: circuit cannot run");
                return false;
            }
            analysis.solution.clone()
        };
        self.live = Some(solution);
        self.phase = SimPhase::Running;
        tracing::info!("simulation started");
        true
    }

    /// Stop the simulation and drop the live snapshot.
    pub fn stop(&mut self) {
        if self.phase == SimPhase::Running {
            self.phase = SimPhase::Idle;
            self.live = None;
            tracing::info!("simulation stopped");
        }
    }

    /// Flip between idle and running. Returns whether the simulation is
    /// running afterwards.
    pub fn toggle(&mut self) -> bool {
        match self.phase {
            SimPhase::Running => {
                self.stop();
                false
            }
            SimPhase::Idle => self.start(),
        }
    }

    /// Re-snapshot the live view from the current state while running.
    /// No-op (false) when idle.
    pub fn refresh(&mut self) -> bool {
        if self.phase != SimPhase::Running {
            return false;
        }
        let solution = self.analysis().solution.clone();
        self.live = Some(solution);
        true
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    /// The solver snapshot being displayed, only while running.
    pub fn live(&self) -> Option<&DcSolution> {
        match self.phase {
            SimPhase::Running => self.live.as_ref(),
            SimPhase::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::circuit::TerminalId;

    fn endpoint(component: ComponentId, terminal: usize) -> Endpoint {
        Endpoint::new(component, TerminalId(terminal))
    }

    /// Battery(9V) -> resistor(100R) -> lamp(50R) ring.
    fn lamp_ring(bench: &mut Workbench) -> (ComponentId, ComponentId, ComponentId) {
        let battery = bench.add_component(ComponentKind::Battery, Point::new(0.0, 0.0));
        let resistor = bench.add_component(ComponentKind::Resistor, Point::new(200.0, 0.0));
        let lamp = bench.add_component(ComponentKind::Lamp, Point::new(400.0, 0.0));
        bench
            .add_connection(endpoint(battery, 1), endpoint(resistor, 0))
            .unwrap();
        bench
            .add_connection(endpoint(resistor, 1), endpoint(lamp, 0))
            .unwrap();
        bench
            .add_connection(endpoint(lamp, 1), endpoint(battery, 0))
            .unwrap();
        (battery, resistor, lamp)
    }

    #[test]
    fn end_to_end_lamp_circuit() {
        let mut bench = Workbench::new();
        let (_, _, lamp) = lamp_ring(&mut bench);

        let analysis = bench.analysis();
        assert!(analysis.validation.has_completed_circuit);
        assert_relative_eq!(analysis.solution.total_current, 0.06);
        assert_relative_eq!(analysis.solution.voltage_across(lamp), 3.0);

        assert!(bench.start());
        let live = bench.live().expect("running");
        assert_relative_eq!(live.total_current, 0.06);

        let glow = bench.editor().component(lamp).unwrap();
        let lamp_props = glow.props.as_lamp().unwrap();
        assert!(!lamp_props.burned_out);
        assert!(lamp_props.brightness > 20.0 && lamp_props.brightness < 100.0);
    }

    #[test]
    fn start_refused_on_incomplete_circuit() {
        let mut bench = Workbench::new();
        let battery = bench.add_component(ComponentKind::Battery, Point::default());
        let resistor = bench.add_component(ComponentKind::Resistor, Point::new(200.0, 0.0));
        bench
            .add_connection(endpoint(battery, 1), endpoint(resistor, 0))
            .unwrap();

        assert!(!bench.start());
        assert!(!bench.is_running());
        assert!(bench.live().is_none());
    }

    #[test]
    fn edits_while_running_do_not_touch_the_live_snapshot() {
        let mut bench = Workbench::new();
        let battery = bench.add_component(ComponentKind::Battery, Point::default());
        let resistor = bench.add_component(ComponentKind::Resistor, Point::new(200.0, 0.0));
        bench
            .add_connection(endpoint(battery, 1), endpoint(resistor, 0))
            .unwrap();
        bench
            .add_connection(endpoint(resistor, 1), endpoint(battery, 0))
            .unwrap();

        assert!(bench.start());
        assert_relative_eq!(bench.live().unwrap().total_current, 0.09);

        // Doubling the resistance mid-run leaves the display alone...
        bench.update_properties(resistor, &PropertyPatch::resistance(200.0));
        assert_relative_eq!(bench.live().unwrap().total_current, 0.09);

        // ...until the explicit refresh.
        assert!(bench.refresh());
        assert_relative_eq!(bench.live().unwrap().total_current, 0.045);
    }

    #[test]
    fn toggle_flips_phases() {
        let mut bench = Workbench::new();
        lamp_ring(&mut bench);

        assert!(bench.toggle());
        assert_eq!(bench.phase(), SimPhase::Running);
        assert!(!bench.toggle());
        assert_eq!(bench.phase(), SimPhase::Idle);
        assert!(bench.live().is_none());
        assert!(!bench.refresh());
    }

    #[test]
    fn analysis_tracks_mutations() {
        let mut bench = Workbench::new();
        let (battery, _, _) = lamp_ring(&mut bench);
        assert!(bench.analysis().validation.can_run());

        bench.delete_component(battery);
        let analysis = bench.analysis();
        assert!(!analysis.validation.can_run());
        assert!(!analysis.topology.has_loops);
    }

    #[test]
    fn burnout_applies_to_editor_state_and_resets_externally() {
        let mut bench = Workbench::new();
        let battery = bench.add_component(ComponentKind::Battery, Point::default());
        let lamp = bench.add_component(ComponentKind::Lamp, Point::new(200.0, 0.0));
        bench
            .add_connection(endpoint(battery, 1), endpoint(lamp, 0))
            .unwrap();
        bench
            .add_connection(endpoint(lamp, 1), endpoint(battery, 0))
            .unwrap();
        // 9V over 50R pushes 0.18A through a 0.1A-rated filament.
        bench.update_properties(
            lamp,
            &PropertyPatch {
                max_current: Some(0.1),
                ..PropertyPatch::default()
            },
        );

        bench.analysis();
        assert!(bench
            .editor()
            .component(lamp)
            .unwrap()
            .props
            .as_lamp()
            .unwrap()
            .burned_out);

        // Drop the drive voltage and reset the latch: the lamp recovers.
        bench.update_properties(battery, &PropertyPatch::voltage(3.0));
        bench.update_properties(lamp, &PropertyPatch::reset_burnout());
        bench.analysis();
        let recovered = bench.editor().component(lamp).unwrap();
        let props = recovered.props.as_lamp().unwrap();
        assert!(!props.burned_out);
        assert!(props.brightness > 0.0);
    }
}
