//! Discrete-time traffic microsimulation engine
//!
//! A directed road network of nodes and edges, vehicles with simple
//! kinematics and a rule-based lane/speed policy, precomputed all-pairs
//! routing, and population-driven trip demand. The engine has no
//! rendering or I/O dependencies beyond the network file loader.

pub mod action;
pub mod builder;
pub mod demand;
pub mod edge;
pub mod loader;
pub mod node;
pub mod observation;
pub mod policy;
pub mod routing;
pub mod stats;
pub mod types;
pub mod vehicle;
pub mod world;

pub use action::Action;
pub use builder::NetworkBuilder;
pub use edge::Edge;
pub use loader::{load_network, parse_network};
pub use node::Node;
pub use observation::{NeighborObs, Observation};
pub use routing::RoutingTable;
pub use stats::{SimulationStats, TripRecord};
pub use types::{EdgeId, NodeId, Position, TripId};
pub use vehicle::Vehicle;
pub use world::{SimWorld, VehicleLocation};
