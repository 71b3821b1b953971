//! Electrical-node graph builder.
//!
//! Ports connected by wires are equipotential and collapse into a single
//! electrical node. The builder enumerates every valid port, walks the wire
//! adjacency breadth-first, and numbers each connected group. Any group
//! containing a ground port becomes node 0; the rest receive consecutive
//! positive ids. Ports touched by no wire still get a (singleton) node so
//! that floating subnets flow through the solver instead of crashing it.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;

use crate::circuit::{Circuit, ComponentKind, PortRef};

/// Identifier of an electrical node. Node 0 is the ground rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const GROUND: NodeId = NodeId(0);

    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }

    /// Row/column of this node in the MNA matrix. Ground has none: its
    /// contributions are dropped during stamping.
    pub fn matrix_index(&self) -> Option<usize> {
        if self.0 == 0 { None } else { Some(self.0 - 1) }
    }
}

/// The port→node mapping produced by [`build_node_map`].
#[derive(Debug, Clone)]
pub struct NodeMap {
    port_to_node: IndexMap<PortRef, NodeId>,
    /// Count of non-ground nodes; ids run `1..=num_nodes`.
    pub num_nodes: usize,
    /// True if the circuit contains at least one ground component.
    pub has_ground: bool,
}

impl NodeMap {
    /// Node of a component port, if the port exists.
    pub fn node_of(&self, component: &str, port: usize) -> Option<NodeId> {
        self.port_to_node
            .get(&PortRef::new(component, port))
            .copied()
    }

    /// MNA matrix index of a component port (`None` for ground or a
    /// nonexistent port).
    pub fn index_of(&self, component: &str, port: usize) -> Option<usize> {
        self.node_of(component, port).and_then(|n| n.matrix_index())
    }

    /// All ports with their assigned nodes, in enumeration order.
    pub fn ports(&self) -> impl Iterator<Item = (&PortRef, NodeId)> {
        self.port_to_node.iter().map(|(p, n)| (p, *n))
    }
}

/// Union the ports connected by wires into numbered electrical nodes.
///
/// Wires referencing unknown components or out-of-range ports are ignored;
/// connectivity is taken to be symmetric and transitive.
pub fn build_node_map(circuit: &Circuit) -> NodeMap {
    // Enumerate every valid port in component order.
    let mut ports: Vec<PortRef> = Vec::new();
    let mut port_index: HashMap<PortRef, usize> = HashMap::new();
    let mut grounded: Vec<bool> = Vec::new();
    for component in &circuit.components {
        for port in 0..component.port_count() {
            let port_ref = PortRef::new(component.id.clone(), port);
            port_index.insert(port_ref.clone(), ports.len());
            ports.push(port_ref);
            grounded.push(component.kind == ComponentKind::Ground);
        }
    }

    // Undirected adjacency from wires; both directions.
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); ports.len()];
    for wire in &circuit.wires {
        let (Some(&a), Some(&b)) = (port_index.get(&wire.from), port_index.get(&wire.to)) else {
            continue;
        };
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    // BFS each connected group; ground groups pin to node 0.
    let mut assigned: Vec<Option<NodeId>> = vec![None; ports.len()];
    let mut next_id = 1usize;
    for start in 0..ports.len() {
        if assigned[start].is_some() {
            continue;
        }
        let mut group = Vec::new();
        let mut queue = VecDeque::from([start]);
        assigned[start] = Some(NodeId::GROUND); // placeholder, fixed below
        while let Some(p) = queue.pop_front() {
            group.push(p);
            for &next in &adjacency[p] {
                if assigned[next].is_none() {
                    assigned[next] = Some(NodeId::GROUND);
                    queue.push_back(next);
                }
            }
        }

        let id = if group.iter().any(|&p| grounded[p]) {
            NodeId::GROUND
        } else {
            let id = NodeId(next_id);
            next_id += 1;
            id
        };
        for &p in &group {
            assigned[p] = Some(id);
        }
    }

    let port_to_node = ports
        .into_iter()
        .zip(assigned)
        .map(|(port, node)| (port, node.expect("every port is assigned by BFS")))
        .collect();

    NodeMap {
        port_to_node,
        num_nodes: next_id - 1,
        has_ground: circuit.has_ground(),
    }
}
