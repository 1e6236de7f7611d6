pub mod use_cases;

pub use use_cases::chart_builder::ChartBuilder;
pub use use_cases::prediction::{PredictionUseCase, Submission, SubmissionState};
pub use use_cases::prediction_request::{FormValues, PredictionRequestBuilder};
pub use use_cases::visualization::{ActivationReport, ChartDeck, VisualizationUseCase};
