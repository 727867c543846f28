use thiserror::Error;

/// Text shown when no image was supplied with the request.
pub const NO_IMAGE_MESSAGE: &str =
    "Por favor, sube una imagen o captura una con la cámara para realizar la predicción.";

/// Text shown when the pipeline failed after the image was accepted.
pub const PROCESSING_ERROR_MESSAGE: &str =
    "⚠️ Hubo un error al procesar la imagen. Inténtalo de nuevo.";

/// Text shown when the supplied image could not be interpreted.
pub const MALFORMED_IMAGE_MESSAGE: &str = "⚠️ Por favor, asegúrate de subir una imagen válida. La imagen debe estar en un formato común (JPG, PNG, etc.) y no estar dañada.";

/// Why an input image was rejected before normalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageFault {
    #[error("no image supplied")]
    Missing,

    #[error("image has zero area ({width}x{height})")]
    ZeroArea { width: u32, height: u32 },

    #[error("pixel buffer layout mismatch: {0}")]
    Layout(String),

    #[error("failed to decode image: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum ArchError {
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageFault),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Catalog mismatch: classifier produces {scores} scores but catalog holds {styles} styles")]
    CatalogMismatch { scores: usize, styles: usize },

    #[error("Label index error: {0}")]
    LabelIndex(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ArchError {
    /// Whether this error means the deployment itself is misconfigured.
    ///
    /// Per-request conditions (bad image, failed scoring, failed feedback write)
    /// return `false`.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable(_) | Self::CatalogMismatch { .. } | Self::LabelIndex(_)
        )
    }

    /// User-facing warning text for a failed classification request.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidImage(ImageFault::Missing) => NO_IMAGE_MESSAGE,
            Self::InvalidImage(_) => MALFORMED_IMAGE_MESSAGE,
            _ => PROCESSING_ERROR_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchError>;
