//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod classify;
pub mod feedback;
pub mod health;
pub mod styles;

pub use crate::state::AppState;
pub use classify::{classify_handler, ClassifyResponse, StyleScore};
pub use feedback::{feedback_correct_handler, feedback_incorrect_handler, FeedbackResponse};
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use styles::{styles_handler, StyleEntry, StylesResponse};
