use super::catalog::Dataset;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

type NodeFn = dyn Fn(&[&Dataset]) -> Result<Vec<Dataset>> + Send + Sync;

/// A named transformation with named input and output ports.
///
/// The function receives its inputs in the order of `inputs` and must return
/// exactly one dataset per entry of `outputs`.
#[derive(Clone)]
pub struct Node {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    func: Arc<NodeFn>,
}

impl Node {
    pub fn new<F>(func: F, inputs: &[&str], outputs: &[&str], name: impl Into<String>) -> Self
    where
        F: Fn(&[&Dataset]) -> Result<Vec<Dataset>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn run(&self, inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
        if inputs.len() != self.inputs.len() {
            return Err(Error::Pipeline(format!(
                "node '{}' expects {} inputs, got {}",
                self.name,
                self.inputs.len(),
                inputs.len()
            )));
        }

        let outputs = (self.func)(inputs)?;
        if outputs.len() != self.outputs.len() {
            return Err(Error::Pipeline(format!(
                "node '{}' declared {} outputs but returned {}",
                self.name,
                self.outputs.len(),
                outputs.len()
            )));
        }
        Ok(outputs)
    }
}

/// Shorthand for [`Node::new`].
pub fn node<F>(func: F, inputs: &[&str], outputs: &[&str], name: &str) -> Node
where
    F: Fn(&[&Dataset]) -> Result<Vec<Dataset>> + Send + Sync + 'static,
{
    Node::new(func, inputs, outputs, name)
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] -> [{}]",
            self.name,
            self.inputs.join(", "),
            self.outputs.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn double(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
        let v = inputs[0].as_vector()?;
        Ok(vec![Dataset::from(v * 2.0)])
    }

    #[test]
    fn test_node_run() {
        let n = node(double, &["x"], &["y"], "double_node");
        let input = Dataset::from(array![1.0, 2.0]);

        let outputs = n.run(&[&input]).unwrap();
        assert_eq!(outputs[0].as_vector().unwrap(), &array![2.0, 4.0]);
        assert_eq!(n.to_string(), "double_node: [x] -> [y]");
    }

    #[test]
    fn test_node_output_count_checked() {
        let n = node(double, &["x"], &["y", "z"], "bad_node");
        let input = Dataset::from(array![1.0]);
        assert!(matches!(n.run(&[&input]), Err(Error::Pipeline(_))));
    }

    #[test]
    fn test_node_input_count_checked() {
        let n = node(double, &["x"], &["y"], "double_node");
        assert!(n.run(&[]).is_err());
    }
}
