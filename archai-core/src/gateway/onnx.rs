//! ONNX classifier backed by tract.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use tract_onnx::prelude::*;

use super::StyleScorer;
use crate::error::{ArchError, Result};
use crate::tensor::TensorBatch;

/// The trained network, exported to ONNX and optimized into a runnable plan.
///
/// The plan is immutable after loading. Each `run` builds its own execution
/// state, so concurrent `predict` calls need no lock.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    input_shape: Vec<usize>,
    output_len: Option<usize>,
    path: PathBuf,
}

impl OnnxClassifier {
    /// Load a model that takes the batch as (1, 256, 256, 1).
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_input_shape(path, &TensorBatch::EXPECTED_SHAPE)
    }

    /// Load a model whose input layout differs from the batch layout but has
    /// the same element count, e.g. (1, 256, 256) for networks that reshape
    /// internally.
    pub fn load_with_input_shape(path: &Path, input_shape: &[usize]) -> Result<Self> {
        if !path.is_file() {
            return Err(ArchError::ModelUnavailable(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let unavailable = |stage: &str, e: TractError| {
            ArchError::ModelUnavailable(format!("{stage} {}: {e:#}", path.display()))
        };

        info!(path = %path.display(), input_shape = ?input_shape, "Loading ONNX classifier");

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| unavailable("failed to parse", e))?
            .with_input_fact(0, f32::fact(input_shape.to_vec()).into())
            .map_err(|e| unavailable("failed to set input shape for", e))?
            .into_optimized()
            .map_err(|e| unavailable("failed to optimize", e))?;

        let output_len = model
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().and_then(|s| s.last().copied()));

        let plan = model
            .into_runnable()
            .map_err(|e| unavailable("failed to build plan for", e))?;

        debug!(output_len = ?output_len, "ONNX plan ready");

        Ok(Self {
            plan,
            input_shape: input_shape.to_vec(),
            output_len,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StyleScorer for OnnxClassifier {
    fn predict(&self, batch: &TensorBatch) -> Result<Vec<f32>> {
        let inference = |e: TractError| ArchError::Inference(format!("{e:#}"));

        let input = tract_ndarray::ArrayD::from_shape_vec(
            tract_ndarray::IxDyn(&self.input_shape),
            batch.as_slice().to_vec(),
        )
        .map_err(|e| {
            ArchError::Inference(format!(
                "cannot reshape batch {:?} to model input {:?}: {}",
                batch.shape(),
                self.input_shape,
                e
            ))
        })?;
        let input: Tensor = input.into();

        let outputs = self.plan.run(tvec!(input.into())).map_err(inference)?;
        let output = outputs
            .first()
            .ok_or_else(|| ArchError::Inference("model produced no outputs".into()))?;
        let scores = output.to_array_view::<f32>().map_err(inference)?;

        Ok(scores.iter().copied().collect())
    }

    fn output_len(&self) -> Option<usize> {
        self.output_len
    }

    fn describe(&self) -> String {
        format!("onnx({})", self.path.display())
    }
}
