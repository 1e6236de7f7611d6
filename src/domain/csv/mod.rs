// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for the energy dataset
// No I/O, no async, no external dependencies

mod csv_row;
mod numeric_policy;

pub use csv_row::{CsvField, CsvRow, Dataset};
pub use numeric_policy::{NumericCell, NumericPolicy};

/// Dataset columns the dashboard charts read
pub mod columns {
    pub const CO2_EMISSION: &str = "Co2_emission";
    pub const ELECTRICITY_RENEWABLES: &str = "Electricity from renewables (TWh)";
    pub const ELECTRICITY_FOSSIL: &str = "Electricity from fossil fuels (TWh)";
    pub const ELECTRICITY_NUCLEAR: &str = "Electricity from nuclear (TWh)";
    pub const GDP_PER_CAPITA: &str = "gdp_per_capita";
    pub const RENEWABLE_SHARE: &str =
        "Renewable energy share in the total final energy consumption (%)";

    pub const REQUIRED: [&str; 6] = [
        CO2_EMISSION,
        ELECTRICITY_RENEWABLES,
        ELECTRICITY_FOSSIL,
        ELECTRICITY_NUCLEAR,
        GDP_PER_CAPITA,
        RENEWABLE_SHARE,
    ];
}
