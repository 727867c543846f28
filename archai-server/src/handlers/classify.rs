//! Classification handler
//!
//! Handles POST /classify requests: one uploaded photograph in, the predicted
//! architectural style and its description out.

use axum::{
    extract::{Multipart, State},
    Json,
};
use archai_core::PredictionResult;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::multipart::MultipartFields;
use crate::state::AppState;
use crate::validation::parse_top;

/// Response for a successful classification
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassifyResponse {
    /// Identifier for this request, echoed in the server logs
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub request_id: String,
    /// Predicted style
    #[schema(example = "Arquitectura gótica")]
    pub style: String,
    /// Classifier output index of the predicted style
    #[schema(example = 15)]
    pub index: usize,
    /// Score of the predicted style, in [0, 1]
    #[schema(example = 0.8725)]
    pub confidence: f32,
    /// Confidence formatted as a percentage with two decimals
    #[schema(example = "87.25%")]
    pub confidence_percent: String,
    /// Historical period
    #[schema(example = "Siglos XII-XVI")]
    pub era: String,
    /// Characteristic features
    pub features: String,
    /// Typical materials
    pub materials: String,
    /// Relationship to other styles
    pub lineage: String,
    /// Full description as shown to the user
    pub message: String,
    /// Next most likely styles, best first (only when `top` > 1)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<StyleScore>,
}

/// One ranked style
#[derive(Debug, Serialize, ToSchema)]
pub struct StyleScore {
    #[schema(example = 22)]
    pub index: usize,
    #[schema(example = "Arquitectura románica")]
    pub style: String,
    #[schema(example = 0.061)]
    pub confidence: f32,
}

impl From<&PredictionResult> for StyleScore {
    fn from(result: &PredictionResult) -> Self {
        Self {
            index: result.index,
            style: result.style.name.to_string(),
            confidence: result.confidence,
        }
    }
}

impl ClassifyResponse {
    fn new(request_id: String, best: &PredictionResult, alternatives: Vec<StyleScore>) -> Self {
        Self {
            request_id,
            style: best.style.name.to_string(),
            index: best.index,
            confidence: best.confidence,
            confidence_percent: best.confidence_percent(),
            era: best.style.era.to_string(),
            features: best.style.features.to_string(),
            materials: best.style.materials.to_string(),
            lineage: best.style.lineage.to_string(),
            message: best.render(),
            alternatives,
        }
    }
}

/// Classify an uploaded photograph of a building
///
/// Accepts multipart/form-data with:
/// - **file** (required): the image (JPEG, PNG, GIF, WebP or BMP, max 10MB)
/// - **top** (optional): number of ranked styles to return (default: 1)
///
/// The image is converted to grayscale, resized to 256x256 and scored by the
/// loaded classifier. Error responses carry the same user-facing text as the
/// web form in `error`.
#[utoipa::path(
    post,
    path = "/classify",
    tag = "Classification",
    request_body(
        content_type = "multipart/form-data",
        description = "Image file to classify with an optional `top` count"
    ),
    responses(
        (status = 200, description = "Style predicted", body = ClassifyResponse),
        (status = 400, description = "No image, unreadable image or invalid field (codes NO_IMAGE, INVALID_IMAGE, INVALID_INPUT)"),
        (status = 413, description = "Request body too large"),
        (status = 500, description = "Inference failed or classifier does not match the catalog (codes INFERENCE_FAILED, CATALOG_MISMATCH)")
    )
)]
pub async fn classify_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let fields = MultipartFields::parse(&mut multipart, state.max_file_size).await?;
    let top = parse_top(fields.get_text("top"), state.service.catalog().len())?;
    let file = fields.into_file()?;

    let request_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(
        request_id = %request_id,
        bytes = file.data.len(),
        content_type = ?file.content_type,
        file_name = ?file.file_name,
        top,
        "Classification request"
    );

    // Decoding and inference are CPU-bound
    let service = state.service.clone();
    let data = file.data;
    let ranked = tokio::task::spawn_blocking(move || service.classify_top_k(&data, top))
        .await
        .map_err(|e| ApiError::internal(format!("Classification task failed: {}", e)))??;

    let (best, rest) = ranked
        .split_first()
        .ok_or_else(|| ApiError::internal("Classifier returned no ranked styles"))?;

    tracing::info!(
        request_id = %request_id,
        style = best.style.name,
        confidence = best.confidence,
        "Image classified"
    );

    let alternatives = rest.iter().map(StyleScore::from).collect();
    Ok(Json(ClassifyResponse::new(request_id, best, alternatives)))
}
