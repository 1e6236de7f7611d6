pub mod chart;
pub mod chart_slot;
pub mod error;
pub mod feature;
pub mod prediction;

// Energy dataset rows
pub mod csv;
