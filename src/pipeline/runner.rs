use super::catalog::{DataCatalog, Dataset};
use super::pipeline::Pipeline;
use crate::error::{Error, Result};
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs the nodes of a pipeline one at a time in dependency order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialRunner;

impl SequentialRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, pipeline: &Pipeline, catalog: &mut DataCatalog) -> Result<()> {
        pipeline.validate()?;

        let missing: Vec<String> = pipeline
            .inputs()
            .into_iter()
            .filter(|name| !catalog.exists(name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Pipeline(format!(
                "pipeline inputs {missing:?} not found in the catalog"
            )));
        }

        let order = pipeline.toposort()?;
        let total = order.len();
        for (done, node) in order.into_iter().enumerate() {
            let start = Instant::now();
            debug!(node = node.name(), "Running node");

            let inputs: Vec<&Dataset> = node
                .inputs()
                .iter()
                .map(|name| catalog.load(name))
                .collect::<Result<_>>()?;

            let outputs = node.run(&inputs).inspect_err(|e| {
                error!(node = node.name(), error = %e, "Node failed");
            })?;

            for (name, data) in node.outputs().iter().zip(outputs) {
                catalog.save(name.as_str(), data);
            }

            info!(
                node = node.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Completed {} out of {} tasks",
                done + 1,
                total
            );
        }

        Ok(())
    }
}
