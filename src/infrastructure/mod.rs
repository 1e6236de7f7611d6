pub mod chart_board;
pub mod config;
pub mod csv;
pub mod dataset_source;
pub mod prediction_client;
