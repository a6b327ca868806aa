//! Component dependency graph.
//!
//! Nodes are component names (the simple name of a constructor's first result),
//! edges point from a component to every component its constructor takes as an
//! argument. Nodes and edges keep insertion order so cycle reports are reproducible.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

use crate::core::DiconError;
use crate::model::FuncType;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is on the current DFS path.
    Gray,
    /// Node and everything reachable from it has been explored.
    Black,
}

/// One level of the explicit DFS stack.
struct Frame {
    node: NodeIndex,
    children: Vec<NodeIndex>,
    cursor: usize,
}

/// Directed graph of component dependencies.
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<String, ()>,
    /// Map from component names to their graph indices.
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the graph induced by a set of constructors.
    ///
    /// Every constructor contributes a node even when it has no arguments. Arguments
    /// that are not named types do not name a component and add no edge.
    pub fn from_constructors(constructors: &[FuncType]) -> Self {
        let mut graph = Self::new();
        for constructor in constructors {
            if let Some(component) = constructor.component_name() {
                graph.ensure_node(component);
            }
        }
        for constructor in constructors {
            let Some(component) = constructor.component_name() else {
                continue;
            };
            for argument in &constructor.argument_types {
                match argument.simple_name() {
                    Some(dependency) => graph.add_dependency(component, dependency),
                    None => debug!("{} argument {} names no component", constructor.name, argument),
                }
            }
        }
        graph
    }

    /// Add a node to the graph if it doesn't already exist.
    ///
    /// Returns the node index in the graph.
    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(name) {
            index
        } else {
            let index = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), index);
            index
        }
    }

    /// Record that `from` needs `to` to be constructed.
    pub fn add_dependency(&mut self, from: &str, to: &str) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Dependencies of `node` in the order they were added.
    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks the adjacency list newest edge first
        let mut children: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        children.reverse();
        children
    }

    /// Verify the graph is acyclic.
    ///
    /// Runs a depth-first search from every unvisited node in insertion order, using
    /// an explicit stack. When an edge reaches a node that is still on the stack, the
    /// stack suffix from that node, closed with the node again, is the reported cycle.
    ///
    /// # Errors
    ///
    /// Returns [`DiconError::CyclicDependency`] with a path such as `A -> B -> C -> A`.
    pub fn detect_cycles(&self) -> Result<(), DiconError> {
        let mut colors: Vec<Color> = vec![Color::White; self.graph.node_count()];

        for start in self.graph.node_indices() {
            if colors[start.index()] != Color::White {
                continue;
            }

            colors[start.index()] = Color::Gray;
            let mut stack = vec![Frame {
                node: start,
                children: self.children(start),
                cursor: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                if frame.cursor >= frame.children.len() {
                    colors[frame.node.index()] = Color::Black;
                    stack.pop();
                    continue;
                }

                let next = frame.children[frame.cursor];
                frame.cursor += 1;

                match colors[next.index()] {
                    Color::Gray => {
                        let from = stack.iter().position(|f| f.node == next).unwrap_or_default();
                        let mut path: Vec<String> =
                            stack[from..].iter().map(|f| self.graph[f.node].clone()).collect();
                        path.push(self.graph[next].clone());
                        return Err(DiconError::CyclicDependency {
                            path,
                        });
                    }
                    Color::White => {
                        colors[next.index()] = Color::Gray;
                        stack.push(Frame {
                            node: next,
                            children: self.children(next),
                            cursor: 0,
                        });
                    }
                    Color::Black => {}
                }
            }
        }

        Ok(())
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_of(graph: &DependencyGraph) -> Vec<String> {
        match graph.detect_cycles() {
            Err(DiconError::CyclicDependency {
                path,
            }) => path,
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_dependency_chain() {
        let mut graph = DependencyGraph::new();

        // A -> B -> C
        graph.add_dependency("A", "B");
        graph.add_dependency("B", "C");

        assert!(graph.detect_cycles().is_ok());
        assert_eq!(graph.graph.edge_count(), 2);
    }

    #[test]
    fn test_three_node_cycle_path() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A", "B");
        graph.add_dependency("B", "C");
        graph.add_dependency("C", "A");

        assert_eq!(cycle_of(&graph), vec!["A", "B", "C", "A"]);
        assert_eq!(
            graph.detect_cycles().unwrap_err().to_string(),
            "detect cyclic dependency 'A' -> 'B' -> 'C' -> 'A'"
        );
    }

    #[test]
    fn test_cycle_path_contains_only_cycle_members() {
        let mut graph = DependencyGraph::new();
        // Root -> A -> B -> A
        graph.add_dependency("Root", "A");
        graph.add_dependency("A", "B");
        graph.add_dependency("B", "A");

        assert_eq!(cycle_of(&graph), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_self_dependency() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A", "A");

        assert_eq!(cycle_of(&graph), vec!["A", "A"]);
    }

    #[test]
    fn test_diamond_dependency() {
        let mut graph = DependencyGraph::new();

        // A -> B, A -> C, B -> D, C -> D (diamond)
        graph.add_dependency("A", "B");
        graph.add_dependency("A", "C");
        graph.add_dependency("B", "D");
        graph.add_dependency("C", "D");

        // D is reached twice but never while on the stack
        assert!(graph.detect_cycles().is_ok());

        graph.add_dependency("D", "A");
        assert_eq!(cycle_of(&graph), vec!["A", "B", "D", "A"]);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A", "C");
        graph.add_dependency("A", "B");
        graph.add_dependency("A", "D");

        let names: Vec<&str> =
            graph.children(graph.node_map["A"]).into_iter().map(|c| graph.graph[c].as_str()).collect();
        assert_eq!(names, vec!["C", "B", "D"]);

        // the first child closes the reported cycle
        graph.add_dependency("B", "A");
        graph.add_dependency("C", "A");
        assert_eq!(cycle_of(&graph), vec!["A", "C", "A"]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::new();
        assert_eq!(graph.graph.node_count(), 0);
        assert!(graph.detect_cycles().is_ok());
    }

    #[test]
    fn test_duplicate_edges() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A", "B");
        graph.add_dependency("A", "B");

        assert_eq!(graph.graph.edge_count(), 1);
        assert_eq!(graph.graph.node_count(), 2);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut graph = DependencyGraph::new();
        for i in 0..20_000 {
            graph.add_dependency(&format!("C{i}"), &format!("C{}", i + 1));
        }
        assert!(graph.detect_cycles().is_ok());

        graph.add_dependency("C20000", "C0");
        let path = cycle_of(&graph);
        assert_eq!(path.len(), 20_002);
        assert_eq!(path.first(), path.last());
    }
}
