// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing and encoding detection

mod csv_parser;

pub use csv_parser::CsvParser;
