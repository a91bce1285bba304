//! Road map model
//!
//! Nodes live in an arena and refer to each other by `NodeId`, so the road
//! graph can be cyclic without any shared ownership. Events and exports only
//! ever carry ids or coordinates, never the graph itself.

use serde::{Deserialize, Serialize};

/// Grid position of a road node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Stable handle of a node inside a `RoadMap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub coordinate: Coordinate,
    /// Neighbouring nodes, in the order roads were laid
    #[serde(default)]
    pub connected_nodes: Vec<NodeId>,
}

/// Where the vehicles sit before the first move: on `current`, facing away from `previous`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPosition {
    pub current_node: NodeId,
    pub previous_node: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: usize,
    pub node: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LightColour {
    Red,
    Green,
}

impl LightColour {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightColour::Red => "RED",
            LightColour::Green => "GREEN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLight {
    pub id: usize,
    /// Colour the light shows when the level starts
    pub state: LightColour,
    pub node: NodeId,
}

/// Scenery placed on the map; purely visual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decor {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Arena of road nodes plus the start and the delivery destinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadMap {
    pub nodes: Vec<Node>,
    pub start: StartPosition,
    #[serde(default)]
    pub destinations: Vec<Destination>,
}

impl RoadMap {
    /// Build a map from coordinates; node `i` gets `NodeId(i)`.
    /// The start faces from the first node towards the second (or sits on the first if alone).
    pub fn from_coordinates(coords: &[Coordinate]) -> Self {
        let nodes = coords
            .iter()
            .map(|&coordinate| Node { coordinate, connected_nodes: Vec::new() })
            .collect();
        let current = if coords.len() > 1 { 1 } else { 0 };
        Self {
            nodes,
            start: StartPosition {
                current_node: NodeId(current),
                previous_node: NodeId(0),
            },
            destinations: Vec::new(),
        }
    }

    /// Lay a two-way road between two nodes. Unknown ids and duplicate roads are ignored.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return;
        }
        if !self.nodes[a.0].connected_nodes.contains(&b) {
            self.nodes[a.0].connected_nodes.push(b);
        }
        if !self.nodes[b.0].connected_nodes.contains(&a) {
            self.nodes[b.0].connected_nodes.push(a);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up the node sitting on a coordinate
    pub fn node_at(&self, coordinate: Coordinate) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.coordinate == coordinate)
            .map(NodeId)
    }

    pub fn coordinate_of(&self, id: NodeId) -> Option<Coordinate> {
        self.node(id).map(|n| n.coordinate)
    }
}

/// Everything the scheduler needs to put the board back into its starting state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub map: RoadMap,
    #[serde(default)]
    pub decor: Vec<Decor>,
    #[serde(default)]
    pub traffic_lights: Vec<TrafficLight>,
}

impl Level {
    pub fn new(map: RoadMap) -> Self {
        Self {
            map,
            decor: Vec::new(),
            traffic_lights: Vec::new(),
        }
    }
}
