use std::sync::{Arc, Mutex};

use crate::application::{ChartDeck, PredictionUseCase, VisualizationUseCase};
use crate::interfaces::commands::Tab;
use crate::interfaces::http::LogEntry;

pub struct AppState {
    pub prediction_use_case: PredictionUseCase,
    pub visualization_use_case: VisualizationUseCase,
    /// The four chart slots and the handles to what they show
    pub deck: Mutex<ChartDeck>,
    pub active_tab: Mutex<Tab>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl AppState {
    pub fn new(
        prediction_use_case: PredictionUseCase,
        visualization_use_case: VisualizationUseCase,
        logs: Arc<Mutex<Vec<LogEntry>>>,
    ) -> Self {
        Self {
            prediction_use_case,
            visualization_use_case,
            deck: Mutex::new(ChartDeck::new()),
            active_tab: Mutex::new(Tab::default()),
            logs,
        }
    }
}
