//! Network construction
//!
//! Collects node and edge descriptions by label, validates every
//! reference, assigns the stable integer ids, and hands a fully-built
//! world back with its routing table and OD matrix precomputed. Referring
//! to an unknown label is a configuration error and fails the build; it is
//! never silently skipped.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

use super::demand::TripDemand;
use super::edge::Edge;
use super::node::Node;
use super::routing::RoutingTable;
use super::types::{EdgeId, NodeId, Position};
use super::world::SimWorld;

/// Builder for the immutable network topology
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_labels: HashMap<String, NodeId>,
    /// Routes for vehicles seeded at build time, validated in `build`
    seed_routes: Vec<Vec<NodeId>>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Labels must be unique.
    pub fn add_node(&mut self, label: &str, x: f32, y: f32, population: u32) -> Result<NodeId> {
        if self.node_labels.contains_key(label) {
            bail!("duplicate node label '{label}'");
        }
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(id, label.to_string(), Position::new(x, y), population));
        self.node_labels.insert(label.to_string(), id);
        Ok(id)
    }

    /// Adds a directed edge between two previously added nodes.
    ///
    /// `length` and `speed_limit` are independent, explicitly supplied
    /// fields; coordinates are never used to derive either.
    pub fn add_edge(
        &mut self,
        label: &str,
        from: &str,
        to: &str,
        length: f32,
        speed_limit: f32,
        lanes: u32,
    ) -> Result<EdgeId> {
        let from_id = self.resolve(from)?;
        let to_id = self.resolve(to)?;
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(
            id,
            label.to_string(),
            from_id,
            to_id,
            length,
            speed_limit,
            lanes,
        ));
        self.nodes[from_id.0].out_edges.push(id);
        self.nodes[to_id.0].in_edges.push(id);
        Ok(id)
    }

    /// Seeds one vehicle that will drive the given node sequence from the
    /// first tick, independent of the demand model.
    pub fn add_trip(&mut self, labels: &[&str]) -> Result<()> {
        if labels.len() < 2 {
            bail!("a seeded trip needs at least an origin and a destination");
        }
        let route = labels
            .iter()
            .map(|label| self.resolve(label))
            .collect::<Result<Vec<_>>>()?;
        self.seed_routes.push(route);
        Ok(())
    }

    /// Looks up a node id by label.
    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.node_labels.get(label).copied()
    }

    fn resolve(&self, label: &str) -> Result<NodeId> {
        match self.node_labels.get(label) {
            Some(id) => Ok(*id),
            None => bail!("unknown node label '{label}'"),
        }
    }

    /// Finalizes the topology: checks seeded routes against the graph,
    /// precomputes the routing table and the OD matrix, and creates the
    /// world with its seeded random generator.
    pub fn build(self, seed: Option<u64>) -> Result<SimWorld> {
        for route in &self.seed_routes {
            for pair in route.windows(2) {
                let connected = self.nodes[pair[0].0]
                    .out_edges
                    .iter()
                    .any(|&eid| self.edges[eid.0].to == pair[1]);
                if !connected {
                    bail!(
                        "seeded trip references missing edge {} -> {}",
                        self.nodes[pair[0].0].label,
                        self.nodes[pair[1].0].label
                    );
                }
            }
        }

        let routing = RoutingTable::build(self.nodes.len(), &self.edges);
        let demand = TripDemand::new(&self.nodes)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(SimWorld::from_parts(
            self.nodes,
            self.edges,
            routing,
            demand,
            rng,
            self.seed_routes,
        ))
    }
}
