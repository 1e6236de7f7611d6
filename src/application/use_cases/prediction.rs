use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::application::use_cases::prediction_request::{FormValues, PredictionRequestBuilder};
use crate::domain::error::{AppError, Result, ValidationError};
use crate::domain::prediction::{PredictionResult, ResultView};
use crate::infrastructure::prediction_client::PredictionClient;

/// One submission's lifecycle.
///
/// `Idle → Validating → {ValidationFailed | Submitting}`, then
/// `Submitting → {Succeeded | NetworkFailed | BackendFailed}`, then back to
/// `Idle`. There is no retry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    ValidationFailed { error: ValidationError },
    Submitting,
    Succeeded { result: PredictionResult },
    NetworkFailed { error: String },
    BackendFailed { error: String },
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::ValidationFailed { .. }
                | SubmissionState::Succeeded { .. }
                | SubmissionState::NetworkFailed { .. }
                | SubmissionState::BackendFailed { .. }
        )
    }

    fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Validating => "validating",
            SubmissionState::ValidationFailed { .. } => "validation_failed",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded { .. } => "succeeded",
            SubmissionState::NetworkFailed { .. } => "network_failed",
            SubmissionState::BackendFailed { .. } => "backend_failed",
        }
    }

    fn can_follow(&self, previous: &SubmissionState) -> bool {
        use SubmissionState::*;
        match (previous, self) {
            (Idle, Validating) => true,
            (Validating, ValidationFailed { .. }) | (Validating, Submitting) => true,
            (Submitting, Succeeded { .. })
            | (Submitting, NetworkFailed { .. })
            | (Submitting, BackendFailed { .. }) => true,
            (prev, Idle) => prev.is_terminal(),
            _ => false,
        }
    }
}

/// Record of the states one submission went through
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    trail: Vec<SubmissionState>,
}

impl Submission {
    fn start() -> Self {
        Self {
            trail: vec![SubmissionState::Idle],
        }
    }

    fn current(&self) -> &SubmissionState {
        self.trail.last().unwrap_or(&SubmissionState::Idle)
    }

    fn advance(&mut self, next: SubmissionState) {
        debug_assert!(
            next.can_follow(self.current()),
            "illegal transition {} -> {}",
            self.current().name(),
            next.name()
        );
        debug!(from = self.current().name(), to = next.name(), "Submission transition");
        self.trail.push(next);
    }

    pub fn trail(&self) -> &[SubmissionState] {
        &self.trail
    }

    /// The terminal state reached before returning to idle
    pub fn outcome(&self) -> &SubmissionState {
        self.trail
            .iter()
            .rev()
            .find(|state| state.is_terminal())
            .unwrap_or(&SubmissionState::Idle)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self.outcome() {
            SubmissionState::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<ResultView> {
        self.result().map(ResultView::from)
    }

    pub fn into_result(self) -> Result<PredictionResult> {
        match self.outcome().clone() {
            SubmissionState::Succeeded { result } => Ok(result),
            SubmissionState::ValidationFailed { error } => Err(AppError::Validation(error)),
            SubmissionState::NetworkFailed { error } => Err(AppError::Transport(error)),
            SubmissionState::BackendFailed { error } => Err(AppError::Backend(error)),
            other => Err(AppError::Internal(format!(
                "Submission ended in {}",
                other.name()
            ))),
        }
    }
}

pub struct PredictionUseCase {
    client: Arc<dyn PredictionClient + Send + Sync>,
}

impl PredictionUseCase {
    pub fn new(client: Arc<dyn PredictionClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Validate the form and, when it is complete, submit it once.
    pub async fn submit(&self, form: &FormValues) -> Submission {
        let mut submission = Submission::start();
        submission.advance(SubmissionState::Validating);

        let features = match PredictionRequestBuilder::build(form) {
            Ok(features) => features,
            Err(error) => {
                warn!(missing = ?error.missing, invalid = ?error.invalid, "Prediction form rejected");
                submission.advance(SubmissionState::ValidationFailed { error });
                submission.advance(SubmissionState::Idle);
                return submission;
            }
        };

        let out_of_range = features.out_of_range();
        if !out_of_range.is_empty() {
            debug!(features = ?out_of_range, "Inputs outside advisory ranges");
        }

        submission.advance(SubmissionState::Submitting);

        let terminal = match self.client.predict(&features).await {
            Ok(response) => match PredictionResult::try_from(response) {
                Ok(result) => {
                    let expected = result.thresholds.classify(result.co2_emission);
                    if expected != result.category {
                        warn!(
                            reported = %result.category,
                            expected = %expected,
                            co2_emission = result.co2_emission,
                            "Backend category disagrees with its thresholds"
                        );
                    }
                    SubmissionState::Succeeded { result }
                }
                Err(err) => Self::failure_state(err),
            },
            Err(err) => Self::failure_state(err),
        };

        submission.advance(terminal);
        submission.advance(SubmissionState::Idle);
        submission
    }

    fn failure_state(err: AppError) -> SubmissionState {
        error!(error = %err, "Prediction request failed");
        match err {
            AppError::Backend(error) => SubmissionState::BackendFailed { error },
            AppError::Transport(error) => SubmissionState::NetworkFailed { error },
            other => SubmissionState::NetworkFailed {
                error: other.to_string(),
            },
        }
    }
}
