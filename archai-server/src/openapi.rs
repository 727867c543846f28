//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 document for the ArchAI API.

use utoipa::OpenApi;

use crate::handlers::{
    ClassifyResponse, FeedbackResponse, HealthResponse, ReadyResponse, StyleEntry, StyleScore,
    StylesResponse,
};

/// ArchAI API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ArchAI - Architectural Style API",
        version = "0.1.0",
        description = r#"
## Architectural Style Classification API

Upload a photograph of a building and ArchAI predicts which of 25
architectural styles it belongs to, from Achaemenid to Tudor Revival.

### How It Works

1. **Classify** a photo via `POST /classify`
2. The image is converted to grayscale, resized to 256x256 and scored by a
   trained convolutional network
3. The response names the style with its confidence, period, features,
   materials and lineage
4. Tell us whether it was right via `POST /feedback/correct` or
   `POST /feedback/incorrect`

User-facing texts (`message`, `error`) are in Spanish.
"#,
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/archaitect/archai/blob/main/LICENSE"
        ),
        contact(
            name = "ArchAI Team",
            url = "https://github.com/archaitect/archai"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Classification", description = "Predict the architectural style of a photograph"),
        (name = "Feedback", description = "Record whether a prediction was correct"),
        (name = "Styles", description = "The style catalog"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::classify::classify_handler,
        crate::handlers::feedback::feedback_correct_handler,
        crate::handlers::feedback::feedback_incorrect_handler,
        crate::handlers::styles::styles_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            ClassifyResponse,
            StyleScore,
            FeedbackResponse,
            StylesResponse,
            StyleEntry,
        )
    )
)]
pub struct ApiDoc;
