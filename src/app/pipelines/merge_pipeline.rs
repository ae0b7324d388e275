use crate::core::merger;
use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use std::path::PathBuf;

pub struct MergePipeline {
    input_dir: PathBuf,
    output: PathBuf,
}

impl MergePipeline {
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
        }
    }
}

#[async_trait::async_trait]
impl Pipeline for MergePipeline {
    fn name(&self) -> &'static str {
        "merge"
    }

    async fn run(&self) -> Result<RunReport> {
        let rows = merger::merge(&self.input_dir, &self.output)?;
        Ok(RunReport {
            pipeline: self.name(),
            output_path: self.output.display().to_string(),
            items: rows,
            pages: None,
        })
    }
}
