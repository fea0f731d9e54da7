//! Process Graph - fixed and alternative steps joined by material-flow edges
//!
//! The graph exists for presentation. The cost model sums over the catalog
//! and never walks these edges.

use serde::Serialize;
use std::collections::VecDeque;
use thiserror::Error;

use crate::core::catalog::{
    Catalog, BIOREACTOR, BUFFER_PREP, CAPTURE_STEP, FINAL_FORMULATION, HARVEST_CLARIFICATION,
    POLISHING,
};
use crate::core::configuration::ConfigurationState;
use crate::core::error::ConfigurationError;
use crate::core::parameters::{Choice, ParameterSet};

/// Whether a node offers alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Fixed,
    Alternative,
}

/// A node of the process graph, named by its catalog key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessNode {
    pub key: &'static str,
    pub kind: NodeKind,
}

/// Directed material flow between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: &'static str,
    pub to: &'static str,
}

/// Graph structure errors
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown process node '{0}'")]
    UnknownNode(String),

    #[error("process graph contains a cycle through '{0}'")]
    Cycle(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

const STANDARD_NODES: &[ProcessNode] = &[
    ProcessNode {
        key: BIOREACTOR,
        kind: NodeKind::Fixed,
    },
    ProcessNode {
        key: HARVEST_CLARIFICATION,
        kind: NodeKind::Alternative,
    },
    ProcessNode {
        key: CAPTURE_STEP,
        kind: NodeKind::Alternative,
    },
    ProcessNode {
        key: POLISHING,
        kind: NodeKind::Fixed,
    },
    ProcessNode {
        key: BUFFER_PREP,
        kind: NodeKind::Alternative,
    },
    ProcessNode {
        key: FINAL_FORMULATION,
        kind: NodeKind::Fixed,
    },
];

const STANDARD_EDGES: &[Edge] = &[
    Edge {
        from: BIOREACTOR,
        to: HARVEST_CLARIFICATION,
    },
    Edge {
        from: HARVEST_CLARIFICATION,
        to: CAPTURE_STEP,
    },
    Edge {
        from: CAPTURE_STEP,
        to: POLISHING,
    },
    Edge {
        from: BUFFER_PREP,
        to: CAPTURE_STEP,
    },
    Edge {
        from: POLISHING,
        to: FINAL_FORMULATION,
    },
];

/// Presentation view of one node under a given configuration
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub key: &'static str,
    pub kind: NodeKind,
    pub label: &'static str,
    pub description: String,
    /// Selected option key, for alternative nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<&'static str>,
    /// Selected option label, for alternative nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_label: Option<&'static str>,
    pub option_count: usize,
    pub equipment_share: f64,
}

/// Ordered nodes plus directed edges
#[derive(Debug, Clone, Copy)]
pub struct ProcessGraph {
    catalog: Catalog,
    nodes: &'static [ProcessNode],
    edges: &'static [Edge],
}

impl Default for ProcessGraph {
    fn default() -> Self {
        Self::standard()
    }
}

impl ProcessGraph {
    /// The downstream-processing line over the standard catalog
    pub const fn standard() -> Self {
        Self {
            catalog: Catalog::standard(),
            nodes: STANDARD_NODES,
            edges: STANDARD_EDGES,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn nodes(&self) -> &'static [ProcessNode] {
        self.nodes
    }

    pub fn edges(&self) -> &'static [Edge] {
        self.edges
    }

    pub fn node(&self, key: &str) -> Option<&'static ProcessNode> {
        let nodes: &'static [ProcessNode] = self.nodes;
        nodes.iter().find(|node| node.key == key)
    }

    /// Nodes fed by `key`, in edge order
    pub fn successors(&self, key: &str) -> Result<Vec<&'static str>, GraphError> {
        self.require(key)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.from == key)
            .map(|edge| edge.to)
            .collect())
    }

    /// Nodes feeding `key`, in edge order
    pub fn predecessors(&self, key: &str) -> Result<Vec<&'static str>, GraphError> {
        self.require(key)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| edge.to == key)
            .map(|edge| edge.from)
            .collect())
    }

    fn require(&self, key: &str) -> Result<&'static ProcessNode, GraphError> {
        self.node(key)
            .ok_or_else(|| GraphError::UnknownNode(key.to_string()))
    }

    /// Nodes in flow order. Ready nodes are released FIFO, and nodes freed
    /// by the same predecessor in declaration order, so the result is stable.
    pub fn topological_order(&self) -> Result<Vec<&'static ProcessNode>, GraphError> {
        let index_of = |key: &str| self.nodes.iter().position(|node| node.key == key);

        let mut in_degree = vec![0usize; self.nodes.len()];
        for edge in self.edges {
            index_of(edge.from).ok_or_else(|| GraphError::UnknownNode(edge.from.to_string()))?;
            let to = index_of(edge.to).ok_or_else(|| GraphError::UnknownNode(edge.to.to_string()))?;
            in_degree[to] += 1;
        }

        let mut ready: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(i) = ready.pop_front() {
            let nodes: &'static [ProcessNode] = self.nodes;
            let node = &nodes[i];
            order.push(node);

            let mut released = Vec::new();
            for edge in self.edges.iter().filter(|edge| edge.from == node.key) {
                if let Some(to) = index_of(edge.to) {
                    in_degree[to] -= 1;
                    if in_degree[to] == 0 {
                        released.push(to);
                    }
                }
            }
            released.sort_unstable();
            ready.extend(released);
        }

        if order.len() < self.nodes.len() {
            let stuck = self
                .nodes
                .iter()
                .enumerate()
                .find(|(i, _)| in_degree[*i] > 0)
                .map(|(_, node)| node.key)
                .unwrap_or_default();
            return Err(GraphError::Cycle(stuck.to_string()));
        }

        Ok(order)
    }

    /// Resolve every node against the parameters and current selections
    pub fn describe(
        &self,
        parameters: &ParameterSet,
        configuration: &ConfigurationState,
    ) -> Result<Vec<NodeView>, GraphError> {
        self.nodes
            .iter()
            .map(|node| match node.kind {
                NodeKind::Fixed => {
                    let step = self
                        .catalog
                        .fixed_step(node.key)
                        .ok_or_else(|| GraphError::UnknownNode(node.key.to_string()))?;
                    let description = if step.key == BIOREACTOR {
                        format!("{} cells", parameters.microbial_host.label())
                    } else {
                        step.description.to_string()
                    };
                    Ok(NodeView {
                        key: step.key,
                        kind: NodeKind::Fixed,
                        label: step.label,
                        description,
                        selected: None,
                        selected_label: None,
                        option_count: 0,
                        equipment_share: step.equipment_share,
                    })
                }
                NodeKind::Alternative => {
                    let step = self.catalog.step(node.key)?;
                    let option = configuration.selected_option(step)?;
                    Ok(NodeView {
                        key: step.key,
                        kind: NodeKind::Alternative,
                        label: step.label,
                        description: step.description.to_string(),
                        selected: Some(option.key),
                        selected_label: Some(option.label),
                        option_count: step.options.len(),
                        equipment_share: option.equipment_share,
                    })
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parameters::MicrobialHost;

    #[test]
    fn test_nodes_match_catalog() {
        let graph = ProcessGraph::standard();
        let catalog = Catalog::standard();
        for node in graph.nodes() {
            match node.kind {
                NodeKind::Fixed => assert!(catalog.fixed_step(node.key).is_some()),
                NodeKind::Alternative => assert!(catalog.step(node.key).is_ok()),
            }
        }
        let alternatives = graph
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Alternative)
            .count();
        assert_eq!(alternatives, catalog.alternatives().len());
    }

    #[test]
    fn test_edges_reference_known_nodes() {
        let graph = ProcessGraph::standard();
        for edge in graph.edges() {
            assert!(graph.node(edge.from).is_some(), "{}", edge.from);
            assert!(graph.node(edge.to).is_some(), "{}", edge.to);
        }
    }

    #[test]
    fn test_capture_step_has_two_feeds() {
        let graph = ProcessGraph::standard();
        assert_eq!(
            graph.predecessors(CAPTURE_STEP).unwrap(),
            vec![HARVEST_CLARIFICATION, BUFFER_PREP]
        );
        assert_eq!(graph.successors(CAPTURE_STEP).unwrap(), vec![POLISHING]);
        assert!(graph.successors(FINAL_FORMULATION).unwrap().is_empty());
        assert!(matches!(
            graph.successors("lyophilizer"),
            Err(GraphError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_topological_order_is_stable() {
        let order: Vec<_> = ProcessGraph::standard()
            .topological_order()
            .unwrap()
            .into_iter()
            .map(|n| n.key)
            .collect();
        assert_eq!(
            order,
            vec![
                BIOREACTOR,
                BUFFER_PREP,
                HARVEST_CLARIFICATION,
                CAPTURE_STEP,
                POLISHING,
                FINAL_FORMULATION
            ]
        );
    }

    #[test]
    fn test_cycle_is_detected() {
        const LOOP: &[Edge] = &[
            Edge {
                from: POLISHING,
                to: CAPTURE_STEP,
            },
            Edge {
                from: CAPTURE_STEP,
                to: POLISHING,
            },
        ];
        let graph = ProcessGraph {
            edges: LOOP,
            ..ProcessGraph::standard()
        };
        assert!(matches!(
            graph.topological_order(),
            Err(GraphError::Cycle(_))
        ));
    }

    #[test]
    fn test_describe_reflects_selection_and_host() {
        let mut params = ParameterSet::default();
        params.microbial_host = MicrobialHost::Yeast;
        let mut config = ConfigurationState::default();
        config.select(CAPTURE_STEP, "Large Resin").unwrap();

        let views = ProcessGraph::standard().describe(&params, &config).unwrap();
        assert_eq!(views.len(), 6);
        assert_eq!(views[0].description, "Yeast cells");

        let capture = views.iter().find(|v| v.key == CAPTURE_STEP).unwrap();
        assert_eq!(capture.selected, Some("Large Resin"));
        assert_eq!(capture.selected_label, Some("Larger Column Size"));
        assert_eq!(capture.option_count, 2);
        assert_eq!(capture.equipment_share, 0.12);
    }
}
