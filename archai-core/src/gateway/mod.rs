//! Classifier gateway.
//!
//! The trained network is an opaque scorer: it takes a normalized batch and
//! returns one score per style. Everything model-specific (loading, running,
//! mapping runtime failures) lives behind [`StyleScorer`]; the rest of the
//! crate only sees [`ClassifierGateway::score`].
//!
//! ## Scorers
//!
//! - **OnnxClassifier** - the trained network exported to ONNX, run with tract
//!   (feature `onnx`)
//! - **MockClassifier** - deterministic pseudo-scores for testing
//!
//! ## Concurrency
//!
//! One scorer is loaded at startup and shared through an `Arc`. Scorers must
//! be `Send + Sync` and reentrant: `predict` takes `&self` and may be called
//! from many threads at once. tract plans satisfy this because each run
//! builds its own execution state.

mod mock;
#[cfg(feature = "onnx")]
mod onnx;

pub use mock::MockClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::StyleCatalog;
use crate::error::{ArchError, Result};
use crate::tensor::TensorBatch;

/// An opaque scoring model.
pub trait StyleScorer: Send + Sync {
    /// Score a batch of one image. Returns one value per style.
    fn predict(&self, batch: &TensorBatch) -> Result<Vec<f32>>;

    /// Number of scores this model produces, if it is known up front.
    fn output_len(&self) -> Option<usize> {
        None
    }

    /// Short identifier for logs.
    fn describe(&self) -> String;
}

/// Classifier scores, one per style, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityVector(Vec<f32>);

impl ProbabilityVector {
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    /// Index of the highest score. The first index wins ties and NaN never wins.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in self.0.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Indices of the `k` highest scores, best first, ties broken by lower index.
    pub fn top_k(&self, k: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.0.len())
            .filter(|&i| !self.0[i].is_nan())
            .collect();
        // Stable sort keeps lower indices first among equal scores
        indices.sort_by(|&a, &b| self.0[b].total_cmp(&self.0[a]));
        indices.truncate(k);
        indices
    }
}

/// Sole access point to the loaded classifier.
#[derive(Clone)]
pub struct ClassifierGateway {
    scorer: Arc<dyn StyleScorer>,
}

impl std::fmt::Debug for ClassifierGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierGateway")
            .field("scorer", &self.scorer.describe())
            .finish()
    }
}

impl ClassifierGateway {
    pub fn new<S: StyleScorer + 'static>(scorer: S) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    pub fn from_shared(scorer: Arc<dyn StyleScorer>) -> Self {
        Self { scorer }
    }

    /// Load the ONNX classifier and check it against the catalog.
    ///
    /// Any failure here is fatal: the caller must not serve requests.
    #[cfg(feature = "onnx")]
    pub fn load_onnx(path: &std::path::Path, catalog: &StyleCatalog) -> Result<Self> {
        let gateway = Self::new(OnnxClassifier::load(path)?);
        gateway.check_catalog(catalog)?;
        tracing::info!(model = %gateway.describe(), styles = catalog.len(), "Classifier ready");
        Ok(gateway)
    }

    /// A gateway over the deterministic mock scorer, sized to the catalog.
    pub fn mock(catalog: &StyleCatalog) -> Self {
        Self::new(MockClassifier::new(catalog.len()))
    }

    /// Verify the declared output width matches the catalog.
    ///
    /// Scorers that cannot report their width up front pass this check and are
    /// validated on every call instead.
    pub fn check_catalog(&self, catalog: &StyleCatalog) -> Result<()> {
        match self.scorer.output_len() {
            Some(scores) if scores != catalog.len() => Err(ArchError::CatalogMismatch {
                scores,
                styles: catalog.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Score a batch of one normalized image.
    pub fn score(&self, batch: &TensorBatch) -> Result<ProbabilityVector> {
        if !batch.has_expected_shape() {
            return Err(ArchError::Inference(format!(
                "batch shape {:?} does not match {:?}",
                batch.shape(),
                TensorBatch::EXPECTED_SHAPE
            )));
        }

        let scores = self.scorer.predict(batch).map_err(|e| match e {
            ArchError::Inference(msg) => ArchError::Inference(msg),
            other => ArchError::Inference(other.to_string()),
        })?;

        if scores.is_empty() {
            return Err(ArchError::Inference("classifier returned no scores".into()));
        }
        if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
            return Err(ArchError::Inference(format!(
                "classifier returned non-finite score at index {i}"
            )));
        }

        debug!(scores = scores.len(), model = %self.scorer.describe(), "Scored batch");
        Ok(ProbabilityVector::new(scores))
    }

    pub fn describe(&self) -> String {
        self.scorer.describe()
    }
}
