use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{ChartBuilder, PredictionUseCase, VisualizationUseCase};
use crate::domain::error::Result;
use crate::infrastructure::config::{ConfigService, DashboardConfig};
use crate::infrastructure::dataset_source::dataset_source_from_location;
use crate::infrastructure::prediction_client::HttpPredictionClient;
use crate::interfaces::http::{add_log, start_server};
use crate::interfaces::AppState;

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn build_state(config: &DashboardConfig) -> Result<Arc<AppState>> {
    let timeout = config.request_timeout();

    let client = Arc::new(HttpPredictionClient::new(&config.prediction_base_url, timeout)?);
    let source = dataset_source_from_location(&config.dataset, timeout)?;
    let builder = ChartBuilder::new(config.numeric_policy())
        .with_caps(config.scatter_cap, config.trend_cap);

    let logs = Arc::new(Mutex::new(Vec::new()));
    add_log(
        &logs,
        "INFO",
        "Server",
        &format!(
            "Prediction API at {}, dataset at {}",
            client.endpoint(),
            source.describe()
        ),
    );

    Ok(Arc::new(AppState::new(
        PredictionUseCase::new(client),
        VisualizationUseCase::new(source, builder, config.cache_dataset),
        logs,
    )))
}

pub async fn run() -> std::io::Result<()> {
    let config_service = ConfigService::new();
    let config = match config_service.load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            error!(error = %e, path = %config_service.path().display(), "Invalid configuration");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                e.to_string(),
            ));
        }
    };
    init_tracing(&config.log_level);

    info!(
        config = %config_service.path().display(),
        strict_numeric = config.strict_numeric,
        cache_dataset = config.cache_dataset,
        "Starting Sustainalyze"
    );

    let state = build_state(&config).map_err(|e| {
        error!(error = %e, "Failed to initialise clients");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let logs = state.logs.clone();
    start_server(state, logs, &config.host, config.port)?.await
}
