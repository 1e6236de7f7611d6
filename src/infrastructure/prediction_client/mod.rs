pub mod http;

use crate::domain::error::Result;
use crate::domain::feature::FeatureVector;
use crate::domain::prediction::PredictionResponse;
use async_trait::async_trait;

pub use http::HttpPredictionClient;

/// The remote prediction endpoint.
///
/// Implementations return `AppError::Transport` when the endpoint cannot be
/// reached and `AppError::Backend` when it answers with something that is not
/// a prediction envelope. A `success: false` envelope is returned as-is.
#[async_trait]
pub trait PredictionClient {
    async fn predict(&self, features: &FeatureVector) -> Result<PredictionResponse>;
}
