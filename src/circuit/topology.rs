//! Circuit topology analysis.
//!
//! Treats the circuit as an undirected multigraph: vertices are component
//! ids, edges are connections. Terminal identity is discarded at this
//! level; a loop is a cycle over components, not terminals.

use std::collections::{HashMap, HashSet};

use crate::circuit::types::{ComponentId, Connection, ConnectionId};
use crate::components::Component;

/// What the analyzer learned about the component/connection graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyReport {
    /// Every discovered simple loop, as component ids in cyclic order.
    /// No fixed starting point or direction is promised.
    pub loops: Vec<Vec<ComponentId>>,
    /// Components outside the largest connected subgraph, in insertion
    /// order over `components`.
    pub disconnected: Vec<ComponentId>,
    pub is_connected: bool,
    pub has_loops: bool,
}

/// Adjacency view: for each component, its neighbors with the wire that
/// reaches them. Parallel wires appear as separate entries.
type Adjacency = HashMap<ComponentId, Vec<(ComponentId, ConnectionId)>>;

fn build_adjacency(connections: &[Connection]) -> Adjacency {
    let mut adjacency: Adjacency = HashMap::new();
    for wire in connections {
        adjacency
            .entry(wire.from.component)
            .or_default()
            .push((wire.to.component, wire.id));
        adjacency
            .entry(wire.to.component)
            .or_default()
            .push((wire.from.component, wire.id));
    }
    adjacency
}

/// A DFS visit record. The traversal keeps these on an explicit stack
/// instead of recursing, so the entry wire is a field rather than an
/// implicit function argument.
struct Frame {
    node: ComponentId,
    /// Wire used to enter this node. Never traversed back out, which is
    /// what stops a single wire from reading as a two-component loop while
    /// still letting two parallel wires form one.
    via: Option<ConnectionId>,
    /// Cursor into the node's adjacency list.
    next_edge: usize,
}

/// Analyze the circuit graph: discover loops and connectivity.
pub fn analyze(components: &[Component], connections: &[Connection]) -> TopologyReport {
    let adjacency = build_adjacency(connections);
    let loops = find_loops(components, &adjacency);
    let disconnected = find_disconnected(components, &adjacency);

    TopologyReport {
        is_connected: disconnected.is_empty(),
        has_loops: !loops.is_empty(),
        loops,
        disconnected,
    }
}

/// Depth-first loop discovery over the multigraph.
///
/// Reaching a component that is already on the traversal stack closes a
/// loop: the stack slice from that component's frame to the top is the
/// loop body. Loops are deduplicated by sorted member signature, so the
/// same ring found from different starting components is reported once.
///
/// This scheme does not promise to enumerate every cycle of a graph whose
/// cycles share edges; the solver only ever uses one loop at a time, so
/// the first discovery per vertex set is enough.
fn find_loops(components: &[Component], adjacency: &Adjacency) -> Vec<Vec<ComponentId>> {
    let mut loops: Vec<Vec<ComponentId>> = Vec::new();
    let mut signatures: HashSet<Vec<ComponentId>> = HashSet::new();
    let mut finished: HashSet<ComponentId> = HashSet::new();

    for start in components {
        if finished.contains(&start.id) {
            continue;
        }

        let mut stack: Vec<Frame> = vec![Frame {
            node: start.id,
            via: None,
            next_edge: 0,
        }];
        let mut on_stack: HashMap<ComponentId, usize> = HashMap::new();
        on_stack.insert(start.id, 0);

        loop {
            let Some(frame) = stack.last_mut() else { break };
            let edges = adjacency
                .get(&frame.node)
                .map(Vec::as_slice)
                .unwrap_or_default();

            if frame.next_edge >= edges.len() {
                let done = frame.node;
                stack.pop();
                on_stack.remove(&done);
                finished.insert(done);
                continue;
            }

            let (peer, wire) = edges[frame.next_edge];
            frame.next_edge += 1;
            let entry = frame.via;

            if entry == Some(wire) {
                continue;
            }

            if let Some(&pos) = on_stack.get(&peer) {
                let body: Vec<ComponentId> = stack[pos..].iter().map(|f| f.node).collect();
                if body.len() >= 2 {
                    let mut signature = body.clone();
                    signature.sort();
                    if signatures.insert(signature) {
                        loops.push(body);
                    }
                }
                continue;
            }

            if finished.contains(&peer) {
                continue;
            }

            on_stack.insert(peer, stack.len());
            stack.push(Frame {
                node: peer,
                via: Some(wire),
                next_edge: 0,
            });
        }
    }

    loops
}

/// Flood-fill connectivity. The largest connected subgraph is "the"
/// circuit; everything outside it is reported disconnected. Ties between
/// equally large subgraphs go to the one discovered first in iteration
/// order over `components`.
fn find_disconnected(components: &[Component], adjacency: &Adjacency) -> Vec<ComponentId> {
    let mut assigned: HashSet<ComponentId> = HashSet::new();
    let mut largest: HashSet<ComponentId> = HashSet::new();

    for start in components {
        if assigned.contains(&start.id) {
            continue;
        }

        let mut group: HashSet<ComponentId> = HashSet::new();
        let mut pending = vec![start.id];
        while let Some(node) = pending.pop() {
            if !group.insert(node) {
                continue;
            }
            if let Some(edges) = adjacency.get(&node) {
                for &(peer, _) in edges {
                    if !group.contains(&peer) {
                        pending.push(peer);
                    }
                }
            }
        }

        assigned.extend(group.iter().copied());
        // Strict > keeps the first-discovered group on ties.
        if group.len() > largest.len() {
            largest = group;
        }
    }

    components
        .iter()
        .map(|c| c.id)
        .filter(|id| !largest.contains(id))
        .collect()
}
