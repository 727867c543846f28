//! ArchAI Core - architectural style classification pipeline
//!
//! This crate turns a photograph of a building into one of a fixed set of
//! architectural styles, with a confidence score and a short description of
//! the style, and keeps an append-only log of user feedback.
//!
//! # Pipeline
//!
//! - [`ImageNormalizer`] - RGB image to a 256x256 grayscale `f32` tensor
//! - [`ClassifierGateway`] - the only access point to the trained network
//! - [`PredictionService`] - argmax, catalog decoding and display text
//! - [`StyleCatalog`] - style metadata in classifier output order
//! - [`FeedbackRecorder`] - timestamped correct/incorrect verdicts
//!
//! # Example
//!
//! ```no_run
//! use archai_core::{ClassifierGateway, PredictionService, StyleCatalog};
//!
//! # fn example() -> archai_core::Result<()> {
//! let catalog = StyleCatalog::builtin();
//! // Load once at startup; a failure here means the service must not start
//! let gateway = ClassifierGateway::load_onnx("ArchiNet.onnx".as_ref(), &catalog)?;
//! let service = PredictionService::new(gateway, catalog);
//!
//! let bytes = std::fs::read("cathedral.jpg").unwrap();
//! let result = service.classify_bytes(&bytes)?;
//! println!("{}", result.render());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod normalize;
pub mod prediction;
pub mod tensor;

// Re-export main types for convenience
pub use catalog::{StyleCatalog, StyleRecord, BUILTIN_STYLE_COUNT};
pub use error::{
    ArchError, ImageFault, Result, MALFORMED_IMAGE_MESSAGE, NO_IMAGE_MESSAGE,
    PROCESSING_ERROR_MESSAGE,
};
pub use feedback::{
    persistence_message, FeedbackEntry, FeedbackRecorder, FeedbackSummary, Verdict,
    TIMESTAMP_FORMAT,
};
pub use gateway::{ClassifierGateway, MockClassifier, ProbabilityVector, StyleScorer};
pub use normalize::ImageNormalizer;
pub use prediction::{PredictionResult, PredictionService};
pub use tensor::{ImageTensor, TensorBatch, TENSOR_CHANNELS, TENSOR_HEIGHT, TENSOR_WIDTH};

#[cfg(feature = "onnx")]
pub use gateway::OnnxClassifier;
