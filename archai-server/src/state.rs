//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use archai_core::{
    ArchError, ClassifierGateway, FeedbackRecorder, PredictionService, StyleCatalog,
};

use crate::config::Config;
use crate::validation::DEFAULT_MAX_FILE_SIZE;

/// Application state containing shared resources.
///
/// Built once before the listener binds. The classifier inside `service` is
/// never reloaded.
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifier, catalog and normalizer
    pub service: Arc<PredictionService>,
    /// Feedback log writer
    pub feedback: Arc<FeedbackRecorder>,
    /// Maximum upload size in bytes
    pub max_file_size: usize,
}

impl AppState {
    pub fn new(service: PredictionService, feedback: FeedbackRecorder) -> Self {
        Self {
            service: Arc::new(service),
            feedback: Arc::new(feedback),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Override the per-upload size limit.
    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Load the catalog and classifier named by `config`.
    ///
    /// A missing or unloadable model is an error unless the mock classifier
    /// is allowed. A catalog mismatch is always an error.
    pub fn from_config(config: &Config) -> Result<Self, ArchError> {
        let catalog = match &config.labels_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading label index");
                StyleCatalog::load_label_file(path)?
            }
            None => StyleCatalog::builtin(),
        };

        let gateway = match ClassifierGateway::load_onnx(&config.model_path, &catalog) {
            Ok(gateway) => gateway,
            Err(ArchError::ModelUnavailable(reason)) if config.allow_mock_classifier => {
                tracing::warn!(
                    reason = %reason,
                    "Model unavailable, serving the mock classifier (ALLOW_MOCK_CLASSIFIER=true)"
                );
                ClassifierGateway::mock(&catalog)
            }
            Err(e) => return Err(e),
        };

        let service = PredictionService::new(gateway, catalog);
        let feedback = FeedbackRecorder::new(&config.feedback_log_path);

        Ok(Self::new(service, feedback).with_max_file_size(config.max_file_size()))
    }

    /// State over the mock classifier and the given feedback log.
    pub fn mock(feedback: FeedbackRecorder) -> Self {
        let catalog = StyleCatalog::builtin();
        let gateway = ClassifierGateway::mock(&catalog);
        Self::new(PredictionService::new(gateway, catalog), feedback)
    }
}
