use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info, warn};

use crate::application::use_cases::chart_builder::ChartBuilder;
use crate::domain::chart::ChartDescriptor;
use crate::domain::chart_slot::{render, ChartHandle, ChartSlot};
use crate::domain::csv::{columns, Dataset};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::chart_board::ChartBoard;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::dataset_source::DatasetSource;

/// The chart board together with the handles to what is on it.
#[derive(Debug, Default)]
pub struct ChartDeck {
    board: ChartBoard,
    handles: HashMap<ChartSlot, ChartHandle>,
}

impl ChartDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &ChartBoard {
        &self.board
    }

    /// Put `descriptor` in `slot`, destroying whatever chart was there first.
    pub fn render(&mut self, slot: ChartSlot, descriptor: ChartDescriptor) -> Result<()> {
        let handle = match self.handles.remove(&slot) {
            Some(previous) => previous.rerender(&mut self.board, descriptor)?,
            None => render(&mut self.board, slot, descriptor)?,
        };
        self.handles.insert(slot, handle);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivationReport {
    pub source: String,
    pub row_count: usize,
    pub from_cache: bool,
    pub missing_columns: Vec<String>,
    pub rendered: Vec<ChartSlot>,
}

pub struct VisualizationUseCase {
    source: Arc<dyn DatasetSource + Send + Sync>,
    builder: ChartBuilder,
    cache: Option<Mutex<Option<Arc<Dataset>>>>,
}

impl VisualizationUseCase {
    /// Without `cache_dataset` every activation fetches and parses the CSV again.
    pub fn new(
        source: Arc<dyn DatasetSource + Send + Sync>,
        builder: ChartBuilder,
        cache_dataset: bool,
    ) -> Self {
        Self {
            source,
            builder,
            cache: cache_dataset.then(|| Mutex::new(None)),
        }
    }

    fn cached(&self) -> Option<Arc<Dataset>> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    /// Fetch and parse the dataset. The flag is true when it came from cache.
    pub async fn load_dataset(&self) -> Result<(Arc<Dataset>, bool)> {
        if let Some(dataset) = self.cached() {
            return Ok((dataset, true));
        }

        let bytes = self.source.fetch().await?;
        let dataset = CsvParser::new()
            .with_trim(true)
            .parse_bytes(&bytes)
            .map(Arc::new)
            .map_err(|e| {
                AppError::DataLoad(format!("Failed to parse {}: {}", self.source.describe(), e))
            })?;

        if let Some(cache) = &self.cache {
            *cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(dataset.clone());
        }

        Ok((dataset, false))
    }

    /// Load the dataset and render all four charts onto `deck`.
    ///
    /// Charts are built before the deck is locked, and the lock is held across
    /// every destroy/create pair with no suspension point.
    pub async fn activate(&self, deck: &Mutex<ChartDeck>) -> Result<ActivationReport> {
        let (dataset, from_cache) = self.load_dataset().await.map_err(|err| {
            error!(error = %err, source = %self.source.describe(), "Failed to load dataset");
            err
        })?;

        let missing_columns = dataset.missing_columns(&columns::REQUIRED);
        if !missing_columns.is_empty() {
            warn!(columns = ?missing_columns, "Dataset lacks chart columns");
        }

        let charts = self.builder.build_all(&dataset).map_err(|err| {
            error!(error = %err, "Failed to build charts");
            AppError::DataLoad(err.to_string())
        })?;

        let mut rendered = Vec::with_capacity(charts.len());
        {
            let mut deck = deck.lock().unwrap_or_else(PoisonError::into_inner);
            for (slot, descriptor) in charts {
                deck.render(slot, descriptor)?;
                rendered.push(slot);
            }
        }

        info!(
            rows = dataset.len(),
            from_cache,
            charts = rendered.len(),
            "Visualizations rendered"
        );

        Ok(ActivationReport {
            source: self.source.describe(),
            row_count: dataset.len(),
            from_cache,
            missing_columns,
            rendered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::SeriesData;
    use crate::domain::csv::NumericPolicy;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SAMPLE_CSV: &str = "\
Entity,Co2_emission,Electricity from renewables (TWh),Electricity from fossil fuels (TWh),Electricity from nuclear (TWh),gdp_per_capita,Renewable energy share in the total final energy consumption (%)
A,0,5,0,0,100,44.9
B,49,0,0,0,0,
C,50,3,1,0,250.5,12.5
D,100,,,,abc,n/a
E,10001,1,7,2,50000,3.1
";

    struct StaticSource {
        body: Option<&'static str>,
        fetches: AtomicUsize,
    }

    impl StaticSource {
        fn new(body: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                body,
                fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DatasetSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.body
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| AppError::DataLoad("Failed to load CSV file".to_string()))
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[tokio::test]
    async fn test_activation_renders_all_slots() {
        let use_case = VisualizationUseCase::new(
            StaticSource::new(Some(SAMPLE_CSV)),
            ChartBuilder::default(),
            false,
        );
        let deck = Mutex::new(ChartDeck::new());

        let report = use_case.activate(&deck).await.unwrap();
        assert_eq!(report.row_count, 5);
        assert!(report.missing_columns.is_empty());
        assert_eq!(report.rendered, ChartSlot::ALL.to_vec());

        let deck = deck.lock().unwrap();
        let bar = &deck.board().get(ChartSlot::Emissions).unwrap().descriptor;
        assert_eq!(bar.first_series(), Some(&SeriesData::Counts(vec![2, 1, 1, 0, 0, 0, 1])));
        let pie = &deck.board().get(ChartSlot::EnergySources).unwrap().descriptor;
        assert_eq!(pie.first_series(), Some(&SeriesData::Counts(vec![3, 2, 1])));
        let line = &deck.board().get(ChartSlot::RenewableShare).unwrap().descriptor;
        assert_eq!(line.data.labels, vec!["Point 1", "Point 2", "Point 3"]);
    }

    #[tokio::test]
    async fn test_reactivation_replaces_charts_and_refetches() {
        let source = StaticSource::new(Some(SAMPLE_CSV));
        let use_case = VisualizationUseCase::new(source.clone(), ChartBuilder::default(), false);
        let deck = Mutex::new(ChartDeck::new());

        use_case.activate(&deck).await.unwrap();
        let report = use_case.activate(&deck).await.unwrap();

        assert!(!report.from_cache);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        let deck = deck.lock().unwrap();
        assert_eq!(deck.board().live_count(), 4);
        assert_eq!(deck.board().lifecycle_counts(), (8, 4));
    }

    #[tokio::test]
    async fn test_cache_skips_refetch() {
        let source = StaticSource::new(Some(SAMPLE_CSV));
        let use_case = VisualizationUseCase::new(source.clone(), ChartBuilder::default(), true);
        let deck = Mutex::new(ChartDeck::new());

        use_case.activate(&deck).await.unwrap();
        let report = use_case.activate(&deck).await.unwrap();
        assert!(report.from_cache);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_failure_renders_nothing() {
        let use_case = VisualizationUseCase::new(StaticSource::new(None), ChartBuilder::default(), false);
        let deck = Mutex::new(ChartDeck::new());

        assert!(matches!(use_case.activate(&deck).await, Err(AppError::DataLoad(_))));
        assert_eq!(deck.lock().unwrap().board().live_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_columns_are_reported_not_fatal() {
        let use_case = VisualizationUseCase::new(
            StaticSource::new(Some("Entity,Co2_emission\nA,12\n")),
            ChartBuilder::default(),
            false,
        );
        let deck = Mutex::new(ChartDeck::new());

        let report = use_case.activate(&deck).await.unwrap();
        assert_eq!(report.missing_columns.len(), 5);
        assert_eq!(report.rendered.len(), 4);
    }

    #[tokio::test]
    async fn test_strict_policy_turns_bad_cells_into_load_error() {
        let use_case = VisualizationUseCase::new(
            StaticSource::new(Some(SAMPLE_CSV)),
            ChartBuilder::new(NumericPolicy::strict()),
            false,
        );
        let deck = Mutex::new(ChartDeck::new());

        match use_case.activate(&deck).await {
            Err(AppError::DataLoad(msg)) => assert!(msg.contains("Row 4")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
