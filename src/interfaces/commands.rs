use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::PoisonError;

use crate::application::{ActivationReport, FormValues, Submission, SubmissionState};
use crate::domain::chart_slot::ChartSlot;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::chart_board::LiveChart;
use crate::interfaces::http::add_log;
use crate::interfaces::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Predict,
    Visualizations,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Predict => "predict",
            Tab::Visualizations => "visualizations",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "predict" => Ok(Tab::Predict),
            "visualizations" => Ok(Tab::Visualizations),
            other => Err(AppError::NotFound(format!("Unknown tab: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TabActivation {
    pub tab: Tab,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<ActivationReport>,
}

/// Submit the prediction form once. Failures are part of the returned
/// submission, never an `Err`.
pub async fn submit_prediction(state: &AppState, form: FormValues) -> Submission {
    let submission = state.prediction_use_case.submit(&form).await;

    match submission.outcome() {
        SubmissionState::Succeeded { result } => add_log(
            &state.logs,
            "INFO",
            "Prediction",
            &format!(
                "Predicted {:.2} kt ({})",
                result.co2_emission, result.category
            ),
        ),
        SubmissionState::ValidationFailed { error } => {
            add_log(&state.logs, "WARN", "Prediction", &error.to_string())
        }
        SubmissionState::NetworkFailed { error } => add_log(
            &state.logs,
            "ERROR",
            "Prediction",
            &format!("Connection error: {}", error),
        ),
        SubmissionState::BackendFailed { error } => {
            add_log(&state.logs, "ERROR", "Prediction", &format!("Error: {}", error))
        }
        _ => {}
    }

    submission
}

/// Load the dataset and redraw all four charts.
///
/// A data load failure leaves the previous charts in place and is reported on
/// the diagnostic log as well as returned.
pub async fn render_charts(state: &AppState) -> Result<ActivationReport> {
    match state.visualization_use_case.activate(&state.deck).await {
        Ok(report) => {
            if !report.missing_columns.is_empty() {
                add_log(
                    &state.logs,
                    "WARN",
                    "Visualizations",
                    &format!("Missing columns: {}", report.missing_columns.join(", ")),
                );
            }
            add_log(
                &state.logs,
                "INFO",
                "Visualizations",
                &format!(
                    "Rendered {} charts from {} rows",
                    report.rendered.len(),
                    report.row_count
                ),
            );
            Ok(report)
        }
        Err(err) => {
            add_log(&state.logs, "ERROR", "Visualizations", &err.to_string());
            Err(err)
        }
    }
}

/// Switch tabs; activating the visualizations tab renders the charts.
pub async fn open_tab(state: &AppState, tab: Tab) -> Result<TabActivation> {
    *state
        .active_tab
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = tab;

    match tab {
        Tab::Predict => Ok(TabActivation { tab, charts: None }),
        Tab::Visualizations => {
            let report = render_charts(state).await?;
            Ok(TabActivation {
                tab,
                charts: Some(report),
            })
        }
    }
}

pub fn active_tab(state: &AppState) -> Tab {
    *state
        .active_tab
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

pub fn charts(state: &AppState) -> Vec<LiveChart> {
    let deck = state.deck.lock().unwrap_or_else(PoisonError::into_inner);
    deck.board().charts().into_iter().cloned().collect()
}

pub fn chart(state: &AppState, slot: ChartSlot) -> Result<LiveChart> {
    let deck = state.deck.lock().unwrap_or_else(PoisonError::into_inner);
    deck.board()
        .get(slot)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No chart rendered in {}", slot)))
}
