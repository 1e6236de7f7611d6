//! Turns a dataset into the four dashboard chart descriptors.

use serde::Serialize;

use crate::application::use_cases::bucketizer::{bucketize, BucketBoundaries};
use crate::application::use_cases::pair_extractor::extract_pairs;
use crate::application::use_cases::predicate_counter::{count_matching, Predicate};
use crate::application::use_cases::row_normalizer::numeric_column;
use crate::domain::chart::{ChartDescriptor, ChartKind, SeriesData};
use crate::domain::chart_slot::ChartSlot;
use crate::domain::csv::{columns, Dataset, NumericPolicy};
use crate::domain::error::Result;

pub const DEFAULT_SCATTER_CAP: usize = 50;
pub const DEFAULT_TREND_CAP: usize = 50;

/// Rows producing electricity from each source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnergySourceCounts {
    pub renewable: usize,
    pub fossil: usize,
    pub nuclear: usize,
}

#[derive(Debug, Clone)]
pub struct ChartBuilder {
    policy: NumericPolicy,
    boundaries: BucketBoundaries,
    scatter_cap: usize,
    trend_cap: usize,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self {
            policy: NumericPolicy::lenient(),
            boundaries: BucketBoundaries::emissions(),
            scatter_cap: DEFAULT_SCATTER_CAP,
            trend_cap: DEFAULT_TREND_CAP,
        }
    }
}

impl ChartBuilder {
    pub fn new(policy: NumericPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn with_caps(mut self, scatter_cap: usize, trend_cap: usize) -> Self {
        self.scatter_cap = scatter_cap;
        self.trend_cap = trend_cap;
        self
    }

    pub fn emissions_histogram(&self, dataset: &Dataset) -> Result<ChartDescriptor> {
        let emissions = numeric_column(dataset, columns::CO2_EMISSION, &self.policy)?;
        let histogram = bucketize(&self.boundaries, &emissions);

        Ok(ChartDescriptor::new(ChartKind::Bar)
            .with_labels(histogram.labels)
            .with_dataset(Some("CO₂ Emissions (kt)"), SeriesData::Counts(histogram.counts))
            .with_tooltip()
            .with_axis_titles("Emissions Range (kt)", "# of Countries"))
    }

    pub fn energy_source_counts(&self, dataset: &Dataset) -> EnergySourceCounts {
        let producing = Predicate::gt(0.0);
        let count = |column: &str| count_matching(dataset, column, &producing, &self.policy);

        EnergySourceCounts {
            renewable: count(columns::ELECTRICITY_RENEWABLES),
            fossil: count(columns::ELECTRICITY_FOSSIL),
            nuclear: count(columns::ELECTRICITY_NUCLEAR),
        }
    }

    pub fn energy_sources(&self, dataset: &Dataset) -> ChartDescriptor {
        let counts = self.energy_source_counts(dataset);

        ChartDescriptor::new(ChartKind::Pie)
            .with_labels(vec![
                "Renewables".to_string(),
                "Fossil Fuels".to_string(),
                "Nuclear".to_string(),
            ])
            .with_dataset(
                None,
                SeriesData::Counts(vec![counts.renewable, counts.fossil, counts.nuclear]),
            )
            .with_tooltip()
    }

    pub fn gdp_correlation(&self, dataset: &Dataset) -> ChartDescriptor {
        let points = extract_pairs(
            dataset,
            columns::GDP_PER_CAPITA,
            columns::CO2_EMISSION,
            self.scatter_cap,
            &self.policy,
        );

        ChartDescriptor::new(ChartKind::Scatter)
            .with_dataset(Some("GDP per Capita vs CO₂"), SeriesData::Points(points))
            .without_parsing()
            .with_tooltip()
            .with_axis_titles("GDP per Capita (USD)", "CO₂ Emissions (kt)")
    }

    /// First values of the renewable share column in row order; the dataset is
    /// not sorted by year first.
    pub fn renewable_trend(&self, dataset: &Dataset) -> Result<ChartDescriptor> {
        let mut shares = numeric_column(dataset, columns::RENEWABLE_SHARE, &self.policy)?;
        shares.truncate(self.trend_cap);

        let labels = (1..=shares.len()).map(|i| format!("Point {}", i)).collect();

        Ok(ChartDescriptor::new(ChartKind::Line)
            .with_labels(labels)
            .with_dataset(Some("Renewable Share (%)"), SeriesData::Values(shares)))
    }

    pub fn build(&self, slot: ChartSlot, dataset: &Dataset) -> Result<ChartDescriptor> {
        match slot {
            ChartSlot::Emissions => self.emissions_histogram(dataset),
            ChartSlot::EnergySources => Ok(self.energy_sources(dataset)),
            ChartSlot::GdpCorrelation => Ok(self.gdp_correlation(dataset)),
            ChartSlot::RenewableShare => self.renewable_trend(dataset),
        }
    }

    /// All four charts, or the first failure
    pub fn build_all(&self, dataset: &Dataset) -> Result<Vec<(ChartSlot, ChartDescriptor)>> {
        ChartSlot::ALL
            .into_iter()
            .map(|slot| self.build(slot, dataset).map(|descriptor| (slot, descriptor)))
            .collect()
    }
}
