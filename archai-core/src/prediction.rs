//! Prediction service: image in, style out.

use std::fmt;

use image::RgbImage;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::catalog::{StyleCatalog, StyleRecord};
use crate::error::{ArchError, Result};
use crate::gateway::{ClassifierGateway, ProbabilityVector};
use crate::normalize::ImageNormalizer;
use crate::tensor::ImageTensor;

/// One classified image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted style with its metadata
    pub style: StyleRecord,
    /// Classifier output index of the style
    pub index: usize,
    /// Score of the predicted style, in [0, 1]
    pub confidence: f32,
}

impl PredictionResult {
    /// Confidence as a percentage string with two decimals, e.g. `87.25%`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }

    /// Multi-line description shown to the user.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estilo arquitectónico: {}", self.style.name)?;
        writeln!(f, "Probabilidad: {}", self.confidence_percent())?;
        writeln!(f)?;
        writeln!(f, "Información detallada:")?;
        writeln!(f, "• Época histórica: {}", self.style.era)?;
        writeln!(f, "• Características: {}", self.style.features)?;
        writeln!(f, "• Materiales: {}", self.style.materials)?;
        write!(f, "• Relación: {}", self.style.lineage)
    }
}

/// Orchestrates normalization, scoring and decoding.
///
/// Holds no per-request state; clones share the same loaded classifier, so a
/// single service can be handed to any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct PredictionService {
    normalizer: ImageNormalizer,
    gateway: ClassifierGateway,
    catalog: StyleCatalog,
}

impl PredictionService {
    pub fn new(gateway: ClassifierGateway, catalog: StyleCatalog) -> Self {
        Self {
            normalizer: ImageNormalizer::new(),
            gateway,
            catalog,
        }
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    pub fn gateway(&self) -> &ClassifierGateway {
        &self.gateway
    }

    /// Classify an RGB image.
    pub fn classify(&self, image: &RgbImage) -> Result<PredictionResult> {
        let tensor = self.normalizer.normalize(image)?;
        self.classify_tensor(tensor)
    }

    /// Classify an encoded image file (JPEG, PNG, ...).
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<PredictionResult> {
        let tensor = self.normalizer.normalize_bytes(bytes)?;
        self.classify_tensor(tensor)
    }

    /// Classify an already normalized tensor.
    pub fn classify_tensor(&self, tensor: ImageTensor) -> Result<PredictionResult> {
        let probs = self.gateway.score(&tensor.into_batch())?;
        self.check_width(&probs)?;

        let index = probs
            .argmax()
            .ok_or_else(|| ArchError::Inference("no comparable scores".into()))?;
        let result = self.decode(&probs, index)?;

        info!(
            style = result.style.name,
            index,
            confidence = result.confidence,
            "Classified image"
        );
        Ok(result)
    }

    /// Classify an optional image and render the outcome as display text.
    ///
    /// Per-request failures become the matching warning text. Nothing is
    /// propagated to the caller.
    pub fn classify_to_text(&self, image: Option<&RgbImage>) -> String {
        let outcome = self
            .normalizer
            .normalize_input(image)
            .and_then(|tensor| self.classify_tensor(tensor));

        match outcome {
            Ok(result) => result.render(),
            Err(e) => {
                if e.is_fatal() {
                    error!(error = %e, "Classification failed on a configuration error");
                } else {
                    warn!(error = %e, "Classification request rejected");
                }
                e.user_message().to_string()
            }
        }
    }

    /// The `k` most likely styles for an encoded image, best first.
    pub fn classify_top_k(&self, bytes: &[u8], k: usize) -> Result<Vec<PredictionResult>> {
        let tensor = self.normalizer.normalize_bytes(bytes)?;
        let probs = self.gateway.score(&tensor.into_batch())?;
        self.check_width(&probs)?;

        probs
            .top_k(k)
            .into_iter()
            .map(|index| self.decode(&probs, index))
            .collect()
    }

    fn check_width(&self, probs: &ProbabilityVector) -> Result<()> {
        if probs.len() != self.catalog.len() {
            error!(
                scores = probs.len(),
                styles = self.catalog.len(),
                "Classifier output does not match the style catalog"
            );
            return Err(ArchError::CatalogMismatch {
                scores: probs.len(),
                styles: self.catalog.len(),
            });
        }
        Ok(())
    }

    fn decode(&self, probs: &ProbabilityVector, index: usize) -> Result<PredictionResult> {
        let mismatch = || ArchError::CatalogMismatch {
            scores: probs.len(),
            styles: self.catalog.len(),
        };
        let style = *self.catalog.get(index).ok_or_else(mismatch)?;
        let confidence = probs.get(index).ok_or_else(mismatch)?;
        debug!(index, style = style.name, "Decoded classifier output");

        Ok(PredictionResult {
            style,
            index,
            confidence,
        })
    }
}
