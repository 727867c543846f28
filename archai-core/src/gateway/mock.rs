//! Mock classifier for testing.

use sha3::{Digest, Sha3_256};

use super::StyleScorer;
use crate::error::Result;
use crate::tensor::TensorBatch;

/// Deterministic stand-in for the trained network.
///
/// Scores are derived from a SHA3-256 digest of the input tensor, so the same
/// image always gets the same scores and different images usually get
/// different ones. The scores sum to 1.
/// WARNING: Do not use in production - the scores carry no meaning!
#[derive(Debug, Clone)]
pub struct MockClassifier {
    classes: usize,
    seed: u64,
}

impl MockClassifier {
    pub fn new(classes: usize) -> Self {
        Self::with_seed(classes, 0xA4C1_7EC7)
    }

    pub fn with_seed(classes: usize, seed: u64) -> Self {
        Self { classes, seed }
    }

    /// Digest of the input as seen by this mock.
    pub fn fingerprint(&self, batch: &TensorBatch) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(b"archai-mock-classifier");
        for value in batch.as_slice() {
            hasher.update(value.to_le_bytes());
        }

        let result = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        digest
    }
}

impl StyleScorer for MockClassifier {
    fn predict(&self, batch: &TensorBatch) -> Result<Vec<f32>> {
        let digest = self.fingerprint(batch);
        tracing::debug!(fingerprint = %hex::encode(&digest[..8]), "Mock classifier input");

        let raw: Vec<f32> = (0..self.classes)
            .map(|i| {
                let byte = digest[i % digest.len()].rotate_left((i / digest.len()) as u32);
                byte as f32 + 1.0
            })
            .collect();
        let total: f32 = raw.iter().sum();
        Ok(raw.into_iter().map(|v| v / total).collect())
    }

    fn output_len(&self) -> Option<usize> {
        Some(self.classes)
    }

    fn describe(&self) -> String {
        format!("mock({} classes)", self.classes)
    }
}
