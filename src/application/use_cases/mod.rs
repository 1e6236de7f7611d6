pub mod bucketizer;
pub mod chart_builder;
pub mod pair_extractor;
pub mod predicate_counter;
pub mod prediction;
pub mod prediction_request;
pub mod row_normalizer;
pub mod visualization;
