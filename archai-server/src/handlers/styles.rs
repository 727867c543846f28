//! Style catalog handler

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// One catalog entry
#[derive(Debug, Serialize, ToSchema)]
pub struct StyleEntry {
    /// Classifier output index
    #[schema(example = 15)]
    pub index: usize,
    #[schema(example = "Arquitectura gótica")]
    pub name: String,
    #[schema(example = "Siglos XII-XVI")]
    pub era: String,
    pub features: String,
    pub materials: String,
    pub lineage: String,
}

/// All styles the classifier can predict
#[derive(Debug, Serialize, ToSchema)]
pub struct StylesResponse {
    #[schema(example = 25)]
    pub count: usize,
    pub styles: Vec<StyleEntry>,
}

/// List the style catalog in classifier output order
#[utoipa::path(
    get,
    path = "/styles",
    tag = "Styles",
    responses(
        (status = 200, description = "Style catalog", body = StylesResponse)
    )
)]
pub async fn styles_handler(State(state): State<AppState>) -> Json<StylesResponse> {
    let styles: Vec<StyleEntry> = state
        .service
        .catalog()
        .iter()
        .enumerate()
        .map(|(index, record)| StyleEntry {
            index,
            name: record.name.to_string(),
            era: record.era.to_string(),
            features: record.features.to_string(),
            materials: record.materials.to_string(),
            lineage: record.lineage.to_string(),
        })
        .collect();

    Json(StylesResponse {
        count: styles.len(),
        styles,
    })
}
