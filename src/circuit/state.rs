//! Circuit state management.
//!
//! [`CircuitEditor`] owns the mutable component/connection collections and
//! the selection, and is the only way to change them. Connections own the
//! terminal relationship; a derived `(component, terminal) -> connection`
//! index is rebuilt after every mutation that touches wires, so the two
//! sides can never drift apart.
//!
//! Every operation is total: malformed requests (self-connection,
//! duplicate wire, unknown id) are quiet no-ops reported through `bool`/
//! `Option` returns. UI gestures arrive out of order all the time; the
//! editor shrugs them off instead of erroring.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::circuit::types::{
    ComponentId, Connection, ConnectionId, Endpoint, Point, Rotation, Selection,
};
use crate::components::{Component, ComponentKind, PropertyPatch};

/// The wholesale persistence payload: plain components and connections.
/// Insertion order is preserved; it has no electrical meaning but keeps
/// iteration and rendering stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitSnapshot {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

/// Owner of the live circuit state.
#[derive(Debug, Default)]
pub struct CircuitEditor {
    components: Vec<Component>,
    connections: Vec<Connection>,
    selection: Selection,
    next_component: u64,
    next_connection: u64,
    /// Derived index from terminal to the wire attached to it. When two
    /// wires share a terminal the most recently created one wins the
    /// index slot; both remain in `connections`.
    terminal_index: HashMap<Endpoint, ConnectionId>,
}

impl CircuitEditor {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------ component operations ------------

    /// Add a component with default properties and rotation 0. The new
    /// component becomes the selection.
    pub fn add_component(&mut self, kind: ComponentKind, position: Point) -> ComponentId {
        self.add_component_rotated(kind, position, Rotation::R0)
    }

    /// Add a component with an explicit rotation.
    pub fn add_component_rotated(
        &mut self,
        kind: ComponentKind,
        position: Point,
        rotation: Rotation,
    ) -> ComponentId {
        let id = ComponentId(self.next_component);
        self.next_component += 1;
        self.components
            .push(Component::new(id, kind, position, rotation));
        self.selection = Selection::Component(id);
        tracing::debug!("added {} {} at ({}, {})", kind, id, position.x, position.y);
        id
    }

    /// Shallow-merge a property patch into a component. Returns false for
    /// unknown ids.
    pub fn update_properties(&mut self, id: ComponentId, patch: &PropertyPatch) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        component.props.apply(patch);
        tracing::debug!("updated properties of {}", id);
        true
    }

    /// Move a component and eagerly re-derive the endpoint geometry of
    /// every wire attached to it, so the renderer never sees stale wire
    /// endpoints. Interior polyline points are kept.
    pub fn update_position(&mut self, id: ComponentId, position: Point) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        component.position = position;

        let touched: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|w| w.touches(id))
            .map(|w| w.id)
            .collect();
        for wire_id in touched {
            self.refresh_wire_geometry(wire_id);
        }
        true
    }

    /// Rotate a component by 90 degrees. No electrical effect.
    pub fn rotate(&mut self, id: ComponentId) -> bool {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        component.rotation = component.rotation.rotated();
        true
    }

    /// Delete a component and cascade to every wire touching it. Clears
    /// the selection if it pointed at the component or at a cascaded
    /// wire. Idempotent: deleting an unknown id returns false and changes
    /// nothing.
    pub fn delete_component(&mut self, id: ComponentId) -> bool {
        let before = self.components.len();
        self.components.retain(|c| c.id != id);
        if self.components.len() == before {
            return false;
        }

        self.connections.retain(|w| !w.touches(id));
        self.rebuild_terminal_index();

        match self.selection {
            Selection::Component(selected) if selected == id => {
                self.selection = Selection::None;
            }
            Selection::Connection(wire) if self.connection(wire).is_none() => {
                self.selection = Selection::None;
            }
            _ => {}
        }
        tracing::debug!("deleted {} and its wires", id);
        true
    }

    // ------------ connection operations ------------

    /// Wire two terminals together. Rejected (None, no mutation) when the
    /// endpoints sit on the same component, when an equivalent wire
    /// already exists in either direction, or when either endpoint does
    /// not resolve. The new wire becomes the selection.
    pub fn add_connection(&mut self, from: Endpoint, to: Endpoint) -> Option<ConnectionId> {
        self.add_connection_with_points(from, to, None)
    }

    /// Wire two terminals with an explicit polyline instead of the
    /// derived straight segment.
    pub fn add_connection_with_points(
        &mut self,
        from: Endpoint,
        to: Endpoint,
        points: Option<Vec<Point>>,
    ) -> Option<ConnectionId> {
        if from.component == to.component {
            tracing::debug!("rejected self-connection on {}", from.component);
            return None;
        }
        if self.connections.iter().any(|w| w.joins(from, to)) {
            tracing::debug!("rejected duplicate wire {} -> {}", from, to);
            return None;
        }
        let a = self.terminal_position(from)?;
        let b = self.terminal_position(to)?;

        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.connections.push(Connection {
            id,
            from,
            to,
            points: points.unwrap_or_else(|| vec![a, b]),
        });
        self.terminal_index.insert(from, id);
        self.terminal_index.insert(to, id);
        self.selection = Selection::Connection(id);
        tracing::debug!("added wire {} from {} to {}", id, from, to);
        Some(id)
    }

    /// Delete a wire. No-op (false) for unknown ids.
    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|w| w.id != id);
        if self.connections.len() == before {
            return false;
        }
        self.rebuild_terminal_index();
        if self.selection == Selection::Connection(id) {
            self.selection = Selection::None;
        }
        tracing::debug!("deleted wire {}", id);
        true
    }

    // ------------ selection ------------

    pub fn select_component(&mut self, id: ComponentId) -> bool {
        if self.component(id).is_none() {
            return false;
        }
        self.selection = Selection::Component(id);
        true
    }

    pub fn select_connection(&mut self, id: ConnectionId) -> bool {
        if self.connection(id).is_none() {
            return false;
        }
        self.selection = Selection::Connection(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    // ------------ wholesale state exchange ------------

    /// Replace the whole circuit with a snapshot, sanitizing as it loads:
    /// duplicate component ids keep their first occurrence; wires that
    /// reference unknown endpoints, connect a component to itself, or
    /// duplicate an earlier wire are dropped. Id counters resync past the
    /// maximum seen so later additions never collide. Selection resets.
    ///
    /// The payload may come from anywhere, hand-edited files included, so
    /// nothing here assumes the engine produced it.
    pub fn load(&mut self, snapshot: CircuitSnapshot) {
        let CircuitSnapshot {
            components,
            connections,
        } = snapshot;

        let mut seen = HashSet::new();
        self.components = components
            .into_iter()
            .filter(|c| {
                let fresh = seen.insert(c.id);
                if !fresh {
                    tracing::warn!("dropping duplicate component id {}", c.id);
                }
                fresh
            })
            .collect();

        self.connections = Vec::new();
        let mut wire_ids = HashSet::new();
        for wire in connections {
            if wire.from.component == wire.to.component {
                tracing::warn!("dropping self-connection {}", wire.id);
                continue;
            }
            if !self.endpoint_resolves(wire.from) || !self.endpoint_resolves(wire.to) {
                tracing::warn!("dropping wire {} with unresolved endpoint", wire.id);
                continue;
            }
            if !wire_ids.insert(wire.id) {
                tracing::warn!("dropping duplicate wire id {}", wire.id);
                continue;
            }
            if self
                .connections
                .iter()
                .any(|w| w.joins(wire.from, wire.to))
            {
                tracing::warn!("dropping duplicate wire {} -> {}", wire.from, wire.to);
                continue;
            }
            self.connections.push(wire);
        }

        self.next_component = self
            .components
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(0);
        self.next_connection = self
            .connections
            .iter()
            .map(|w| w.id.0 + 1)
            .max()
            .unwrap_or(0);
        self.selection = Selection::None;
        self.rebuild_terminal_index();
        tracing::info!(
            "loaded circuit: {} components, {} wires",
            self.components.len(),
            self.connections.len()
        );
    }

    /// A defensive copy of the current circuit. Mutating the snapshot has
    /// no effect on the editor.
    pub fn snapshot(&self) -> CircuitSnapshot {
        CircuitSnapshot {
            components: self.components.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Empty the circuit entirely.
    pub fn clear(&mut self) {
        self.components.clear();
        self.connections.clear();
        self.terminal_index.clear();
        self.selection = Selection::None;
        self.next_component = 0;
        self.next_connection = 0;
        tracing::info!("cleared circuit");
    }

    // ------------ lookups ------------

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|w| w.id == id)
    }

    /// The wire attached to a terminal, if any, via the derived index.
    pub fn terminal_connection(&self, endpoint: Endpoint) -> Option<ConnectionId> {
        self.terminal_index.get(&endpoint).copied()
    }

    /// Absolute position of a terminal on the canvas.
    pub fn terminal_position(&self, endpoint: Endpoint) -> Option<Point> {
        self.component(endpoint.component)?
            .terminal_position(endpoint.terminal)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.connections.is_empty()
    }

    pub(crate) fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    // ------------ internals ------------

    fn endpoint_resolves(&self, endpoint: Endpoint) -> bool {
        self.component(endpoint.component)
            .and_then(|c| c.terminal(endpoint.terminal))
            .is_some()
    }

    fn rebuild_terminal_index(&mut self) {
        self.terminal_index.clear();
        for wire in &self.connections {
            self.terminal_index.insert(wire.from, wire.id);
            self.terminal_index.insert(wire.to, wire.id);
        }
    }

    /// Re-derive a wire's endpoint geometry from its terminals' absolute
    /// positions, keeping any interior polyline points.
    fn refresh_wire_geometry(&mut self, id: ConnectionId) {
        let Some(wire) = self.connections.iter().find(|w| w.id == id) else {
            return;
        };
        let (from, to) = (wire.from, wire.to);
        let (Some(a), Some(b)) = (self.terminal_position(from), self.terminal_position(to))
        else {
            return;
        };
        if let Some(wire) = self.connections.iter_mut().find(|w| w.id == id) {
            if wire.points.len() >= 2 {
                let last = wire.points.len() - 1;
                wire.points[0] = a;
                wire.points[last] = b;
            } else {
                wire.points = vec![a, b];
            }
        }
    }
}
