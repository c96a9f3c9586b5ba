use super::node::Node;
use crate::error::{Error, Result};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Add;

/// An unordered collection of nodes wired together by dataset names.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    nodes: Vec<Node>,
}

impl Pipeline {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Datasets consumed by some node but produced by none. These must be
    /// in the catalog before the run starts.
    pub fn inputs(&self) -> BTreeSet<String> {
        let produced = self.all_outputs();
        self.nodes
            .iter()
            .flat_map(|n| n.inputs())
            .filter(|name| !produced.contains(*name))
            .cloned()
            .collect()
    }

    /// Datasets produced by some node and consumed by none.
    pub fn outputs(&self) -> BTreeSet<String> {
        let consumed: HashSet<&String> = self.nodes.iter().flat_map(|n| n.inputs()).collect();
        self.all_outputs()
            .into_iter()
            .filter(|name| !consumed.contains(name))
            .collect()
    }

    pub fn all_outputs(&self) -> BTreeSet<String> {
        self.nodes.iter().flat_map(|n| n.outputs()).cloned().collect()
    }

    /// Rejects duplicate node names and datasets produced by more than one node.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut producers: HashMap<&str, &str> = HashMap::new();

        for node in &self.nodes {
            if !names.insert(node.name()) {
                return Err(Error::Pipeline(format!(
                    "pipeline contains duplicate node name '{}'",
                    node.name()
                )));
            }
            for output in node.outputs() {
                if let Some(other) = producers.insert(output.as_str(), node.name()) {
                    return Err(Error::Pipeline(format!(
                        "dataset '{output}' is produced by both '{other}' and '{}'",
                        node.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Orders nodes so every node runs after the producers of its inputs.
    /// Ties keep declaration order.
    pub fn toposort(&self) -> Result<Vec<&Node>> {
        let producers: HashMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(i, n)| n.outputs().iter().map(move |o| (o.as_str(), i)))
            .collect();

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        let mut in_degree = vec![0usize; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            let upstream: BTreeSet<usize> = node
                .inputs()
                .iter()
                .filter_map(|input| producers.get(input.as_str()).copied())
                .collect();
            in_degree[i] = upstream.len();
            for producer in upstream {
                dependents[producer].push(i);
            }
        }

        let mut ready: BTreeSet<usize> = (0..self.nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(i) = ready.pop_first() {
            order.push(&self.nodes[i]);
            for &dependent in &dependents[i] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < self.nodes.len() {
            let stuck: Vec<&str> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, n)| n.name())
                .collect();
            return Err(Error::Pipeline(format!(
                "circular dependency between nodes {stuck:?}"
            )));
        }

        Ok(order)
    }
}

impl Add for Pipeline {
    type Output = Pipeline;

    fn add(mut self, other: Pipeline) -> Pipeline {
        self.nodes.extend(other.nodes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::catalog::Dataset;
    use crate::pipeline::node::node;

    fn passthrough(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
        Ok(vec![inputs[0].clone()])
    }

    #[test]
    fn test_toposort_follows_dependencies() {
        // declared out of order on purpose
        let pipeline = Pipeline::new(vec![
            node(passthrough, &["b"], &["c"], "second"),
            node(passthrough, &["a"], &["b"], "first"),
            node(passthrough, &["c"], &["d"], "third"),
        ]);

        let order: Vec<&str> = pipeline.toposort().unwrap().iter().map(|n| n.name()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
        assert_eq!(pipeline.inputs(), BTreeSet::from(["a".to_string()]));
        assert_eq!(pipeline.outputs(), BTreeSet::from(["d".to_string()]));
    }

    #[test]
    fn test_toposort_detects_cycle() {
        let pipeline = Pipeline::new(vec![
            node(passthrough, &["x"], &["y"], "left"),
            node(passthrough, &["y"], &["x"], "right"),
        ]);
        assert!(matches!(pipeline.toposort(), Err(Error::Pipeline(msg)) if msg.contains("circular")));
    }

    #[test]
    fn test_validate_duplicate_outputs() {
        let pipeline = Pipeline::new(vec![
            node(passthrough, &["a"], &["b"], "one"),
            node(passthrough, &["a"], &["b"], "two"),
        ]);
        assert!(pipeline.validate().is_err());
    }

    #[test]
    fn test_add_combines_and_validates_names() {
        let first = Pipeline::new(vec![node(passthrough, &["a"], &["b"], "one")]);
        let second = Pipeline::new(vec![node(passthrough, &["b"], &["c"], "two")]);

        let combined = first.clone() + second;
        assert_eq!(combined.nodes().len(), 2);
        assert!(combined.validate().is_ok());

        let doubled = first.clone() + first;
        assert!(doubled.validate().is_err());
    }
}
