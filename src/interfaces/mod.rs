pub mod commands;
pub mod http;
pub(crate) mod state;

pub use state::AppState;
